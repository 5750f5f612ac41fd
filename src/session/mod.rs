use crate::assembly::{self, TierPartitions};
use crate::backend::{
    AnalyticsRequest, ApiClient, ExportArticle, ExportPdfRequest, SendEmailRequest,
};
use crate::mock::MockGenerator;
use crate::model::{Article, Client, DailyReport, Tier};
use crate::selection::{self, SortKey, SortOrder};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Names offered when the backend search is unreachable.
const POPULAR_CLIENTS: [&str; 10] = [
    "Beyoncé",
    "Harry Styles",
    "Taylor Swift",
    "Netflix",
    "Apple",
    "Tesla",
    "Microsoft",
    "Google",
    "Amazon",
    "Meta",
];

/// Everything shown while a report is on screen: the report itself plus the
/// view state the feed table and preview panel derive from.
#[derive(Debug)]
pub struct Dashboard {
    pub report: DailyReport,
    pub include_international: bool,
    pub filter_tier: Option<Tier>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub exporting: bool,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub enum SessionState {
    Welcome,
    Loading { client_name: String },
    Ready(Box<Dashboard>),
}

/// Token for one in-flight report request. Committing with a superseded
/// ticket is rejected, which gives last-requester-wins semantics without
/// cancelling the underlying call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
    include_international: bool,
}

#[derive(Debug)]
pub enum ExportOutcome {
    /// No report on screen, or an export already in flight.
    Ignored,
    Exported {
        download_url: String,
        filename: String,
        email_id: Option<String>,
    },
    Failed(String),
}

/// Owns all transient session state and every transition on it. Single
/// instance, `&mut self` methods only; no locking needed.
pub struct SessionController {
    backend: ApiClient,
    mock: MockGenerator,
    state: SessionState,
    request_seq: u64,
}

impl SessionController {
    pub fn new(backend: ApiClient, mock: MockGenerator) -> Self {
        Self {
            backend,
            mock,
            state: SessionState::Welcome,
            request_seq: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_report(&self) -> Option<&DailyReport> {
        self.dashboard().map(|dashboard| &dashboard.report)
    }

    /// Enters `Loading` and hands back the ticket the eventual response must
    /// present. A newer ticket invalidates all earlier ones.
    pub fn begin_request(&mut self, client_name: &str, include_international: bool) -> RequestTicket {
        self.request_seq += 1;
        self.state = SessionState::Loading {
            client_name: client_name.to_string(),
        };

        RequestTicket {
            seq: self.request_seq,
            include_international,
        }
    }

    /// Commits a fetched report, unless a newer request has started since
    /// the ticket was issued; stale responses are discarded untouched.
    pub fn commit_report(&mut self, ticket: RequestTicket, report: DailyReport) -> bool {
        if ticket.seq != self.request_seq {
            info!(client = %report.client_name, "discarding superseded report response");
            return false;
        }

        self.state = SessionState::Ready(Box::new(Dashboard {
            report,
            include_international: ticket.include_international,
            filter_tier: None,
            sort_key: SortKey::Date,
            sort_order: SortOrder::Desc,
            exporting: false,
            last_error: None,
        }));
        true
    }

    /// Abandons an in-flight request, back to the selection screen. Stale
    /// tickets are ignored here too.
    pub fn fail_request(&mut self, ticket: RequestTicket) -> bool {
        if ticket.seq != self.request_seq {
            return false;
        }

        self.state = SessionState::Welcome;
        true
    }

    /// Full client-selection flow: backend analytics with a mock fallback,
    /// committed under the supersede rule.
    pub async fn select_client(
        &mut self,
        client_name: &str,
        include_international: bool,
        date: NaiveDate,
    ) -> bool {
        let ticket = self.begin_request(client_name, include_international);
        let report = self
            .fetch_report(client_name, include_international, date)
            .await;
        self.commit_report(ticket, report)
    }

    /// Selection without touching the backend at all. A seed makes the
    /// generated report reproducible.
    pub fn select_client_offline(
        &mut self,
        client_name: &str,
        include_international: bool,
        date: NaiveDate,
        seed: Option<u64>,
    ) -> bool {
        let ticket = self.begin_request(client_name, include_international);
        let report = match seed {
            Some(seed) => self
                .mock
                .generate_seeded(client_name, include_international, date, seed),
            None => self.mock.generate(client_name, include_international, date),
        };
        self.commit_report(ticket, report)
    }

    /// Legacy roster selection by client id. The strict lookup may fail for
    /// an unknown id, which abandons the request back to the selection
    /// screen; free-text selection never takes this path.
    pub fn select_roster_client(
        &mut self,
        client_id: &str,
        include_international: bool,
        date: NaiveDate,
    ) -> bool {
        let ticket = self.begin_request(client_id, include_international);
        match self
            .mock
            .generate_for_client_id(client_id, include_international, date)
        {
            Ok(report) => self.commit_report(ticket, report),
            Err(error) => {
                warn!(error = %error, client_id, "roster lookup failed. report discarded");
                self.fail_request(ticket);
                false
            }
        }
    }

    /// The selection screen's client list.
    pub fn roster(&self) -> &[Client] {
        self.mock.roster()
    }

    /// Regenerates the current client's report, entering `Loading` again.
    pub async fn refresh(&mut self) -> bool {
        let Some(dashboard) = self.dashboard() else {
            return false;
        };
        let client_name = dashboard.report.client_name.clone();
        let include_international = dashboard.include_international;
        let date = dashboard.report.date;

        self.select_client(&client_name, include_international, date)
            .await
    }

    /// Logo click: discard the report and all view state.
    pub fn reset(&mut self) {
        self.state = SessionState::Welcome;
    }

    /// Replaces the report wholesale for a new date while staying `Ready`
    /// and keeping the view state. Also supersede-guarded.
    pub async fn change_date(&mut self, date: NaiveDate) -> bool {
        let Some(dashboard) = self.dashboard() else {
            return false;
        };
        let client_name = dashboard.report.client_name.clone();
        let include_international = dashboard.include_international;

        self.request_seq += 1;
        let seq = self.request_seq;

        let report = self
            .fetch_report(&client_name, include_international, date)
            .await;

        if seq != self.request_seq {
            return false;
        }
        match self.dashboard_mut() {
            Some(dashboard) => {
                dashboard.report = report;
                true
            }
            None => false,
        }
    }

    /// Second click on the active tier clears the filter.
    pub fn toggle_tier_filter(&mut self, tier: Tier) {
        if let Some(dashboard) = self.dashboard_mut() {
            dashboard.filter_tier = if dashboard.filter_tier == Some(tier) {
                None
            } else {
                Some(tier)
            };
        }
    }

    /// Re-sorting by the current key flips the direction; a new key starts
    /// descending.
    pub fn set_sort(&mut self, key: SortKey) {
        if let Some(dashboard) = self.dashboard_mut() {
            if dashboard.sort_key == key {
                dashboard.sort_order = dashboard.sort_order.flipped();
            } else {
                dashboard.sort_key = key;
                dashboard.sort_order = SortOrder::Desc;
            }
        }
    }

    pub fn toggle_include(&mut self, article_id: u32, included: bool) {
        if let Some(dashboard) = self.dashboard_mut() {
            dashboard.report.articles =
                selection::set_included(&dashboard.report.articles, article_id, included);
        }
    }

    /// The feed table's view of the articles: filtered and sorted.
    pub fn visible_articles(&self) -> Vec<Article> {
        match self.dashboard() {
            Some(dashboard) => selection::select(
                &dashboard.report.articles,
                dashboard.filter_tier,
                dashboard.sort_key,
                dashboard.sort_order,
            ),
            None => Vec::new(),
        }
    }

    /// The preview panel's view: included articles grouped by tier.
    pub fn preview(&self) -> Option<TierPartitions> {
        self.dashboard()
            .map(|dashboard| assembly::assemble(&dashboard.report))
    }

    /// Exports the included set as a PDF, optionally chaining an email send.
    /// A duplicate trigger while an export is in flight is a no-op; failure
    /// surfaces a message and stays `Ready`.
    pub async fn export_report(&mut self, recipient: Option<&str>) -> ExportOutcome {
        let Some(dashboard) = self.dashboard_mut() else {
            return ExportOutcome::Ignored;
        };
        if dashboard.exporting {
            return ExportOutcome::Ignored;
        }
        dashboard.exporting = true;
        dashboard.last_error = None;

        let request = ExportPdfRequest {
            client_name: dashboard.report.client_name.clone(),
            date: dashboard.report.date,
            articles: assembly::assemble(&dashboard.report)
                .flatten()
                .iter()
                .map(ExportArticle::from)
                .collect(),
            include_international: dashboard.include_international,
        };

        let result = self.backend.export_pdf(&request).await;

        match result {
            Ok(response) => {
                let email_id = match recipient {
                    Some(recipient) => {
                        self.send_report_email(&request.client_name, &response.download_url, recipient)
                            .await
                    }
                    None => None,
                };

                if let Some(dashboard) = self.dashboard_mut() {
                    dashboard.exporting = false;
                }
                ExportOutcome::Exported {
                    download_url: response.download_url,
                    filename: response.filename,
                    email_id,
                }
            }
            Err(error) => {
                warn!(error = %error, client = %request.client_name, "PDF export failed");
                let message = format!("PDF export failed: {error}");
                if let Some(dashboard) = self.dashboard_mut() {
                    dashboard.exporting = false;
                    dashboard.last_error = Some(message.clone());
                }
                ExportOutcome::Failed(message)
            }
        }
    }

    /// Backend suggestion search, degrading to the static popular-names
    /// list when the call fails.
    pub async fn search_clients(&self, query: &str) -> Vec<String> {
        match self.backend.search_clients(query).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                warn!(error = %error, query, "client search failed. using local fallback list");
                fallback_suggestions(query)
            }
        }
    }

    async fn fetch_report(
        &self,
        client_name: &str,
        include_international: bool,
        date: NaiveDate,
    ) -> DailyReport {
        let request = AnalyticsRequest {
            client_id: crate::mock::scenario::normalize_subject(client_name).replace(' ', "-"),
            include_international,
            date,
        };

        match self.backend.get_analytics(&request).await {
            Ok(report) => {
                info!(client = client_name, articles = report.articles.len(), "analytics report received");
                report
            }
            Err(error) => {
                warn!(error = %error, client = client_name, "analytics fetch failed. falling back to mock report");
                self.mock.generate(client_name, include_international, date)
            }
        }
    }

    async fn send_report_email(
        &self,
        client_name: &str,
        pdf_url: &str,
        recipient: &str,
    ) -> Option<String> {
        let request = SendEmailRequest {
            client_name: client_name.to_string(),
            pdf_url: pdf_url.to_string(),
            recipient_email: Some(recipient.to_string()),
        };

        match self.backend.send_email(&request).await {
            Ok(sent) if sent.success => Some(sent.email_id),
            Ok(_) => {
                warn!(client = client_name, "email send reported no success");
                None
            }
            Err(error) => {
                warn!(error = %error, client = client_name, "email send failed");
                None
            }
        }
    }

    fn dashboard(&self) -> Option<&Dashboard> {
        match &self.state {
            SessionState::Ready(dashboard) => Some(dashboard),
            _ => None,
        }
    }

    fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        match &mut self.state {
            SessionState::Ready(dashboard) => Some(dashboard),
            _ => None,
        }
    }
}

/// Local substring filter over the popular-names list. A documented
/// degradation of backend search, not a silent success.
pub fn fallback_suggestions(query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < 2 {
        return Vec::new();
    }

    POPULAR_CLIENTS
        .iter()
        .filter(|name| name.to_lowercase().contains(&query))
        .map(|name| name.to_string())
        .collect()
}
