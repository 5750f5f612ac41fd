use crate::config::Config;
use crate::model::{Article, DailyReport};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ARTICLES: u32 = 20;

/// Failure taxonomy for remote calls. `Network` means the request never
/// produced an HTTP response; `Server` carries the non-2xx status with the
/// body kept for diagnostics only, never parsed for control flow.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
}

/// Article subset the PDF export endpoint expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArticle {
    pub id: u32,
    pub title: String,
    pub outlet: String,
    pub tier: String,
    pub focus_type: String,
    pub summary: String,
}

impl From<&Article> for ExportArticle {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            outlet: article.outlet.clone(),
            tier: format!("{:?}", article.tier),
            focus_type: format!("{:?}", article.focus_type),
            summary: article.summary.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPdfRequest {
    pub client_name: String,
    pub date: NaiveDate,
    pub articles: Vec<ExportArticle>,
    pub include_international: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPdfResponse {
    pub download_url: String,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub client_name: String,
    pub pdf_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub success: bool,
    pub email_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    pub client_id: String,
    pub include_international: bool,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    suggestions: Vec<String>,
}

/// Thin async wrapper over the report backend. One method per remote
/// capability; no retries (callers pick the fallback policy).
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Requests a rendered PDF report for a subject. Returns the raw
    /// `application/pdf` bytes.
    pub async fn generate_report(
        &self,
        client_name: &str,
        include_international: bool,
    ) -> Result<Vec<u8>, ApiError> {
        let (language, country) = if include_international {
            ("en-US", "US")
        } else {
            ("en-GB", "GB")
        };
        let body = json!({
            "subject": client_name,
            "max_articles": DEFAULT_MAX_ARTICLES,
            "filename": format!("{}-coverage.pdf", client_name.replace(' ', "_")),
            "language": language,
            "country": country,
        });

        let response = self
            .http
            .post(self.endpoint("generate-report"))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.bytes().await?.to_vec())
    }

    pub async fn export_pdf(
        &self,
        request: &ExportPdfRequest,
    ) -> Result<ExportPdfResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("reports/export/pdf"))
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }

    pub async fn send_email(
        &self,
        request: &SendEmailRequest,
    ) -> Result<SendEmailResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("reports/send-email"))
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }

    /// Suggestion lookup. Queries shorter than two characters return empty
    /// without touching the network.
    pub async fn search_clients(&self, query: &str) -> Result<Vec<String>, ApiError> {
        if query.trim().chars().count() < 2 {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(self.endpoint("clients/search"))
            .query(&[("q", query)])
            .send()
            .await?;
        let response = check_status(response).await?;

        let payload: SearchResponse = response.json().await?;
        Ok(payload.suggestions)
    }

    /// Fetches a structured coverage report. The response summary is treated
    /// as provisional and recomputed from the received articles.
    pub async fn get_analytics(
        &self,
        request: &AnalyticsRequest,
    ) -> Result<DailyReport, ApiError> {
        let response = self
            .http
            .post(self.endpoint("reports/analytics"))
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let report: DailyReport = response.json().await?;
        if let Err(error) = report.validate() {
            warn!(error = %error, client_id = %request.client_id, "analytics summary inconsistent. recomputing from articles");
        }
        Ok(report.normalized())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sentiment, Tier, test_article};

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn export_article_flattens_enums_to_strings() {
        let article = test_article(1, Tier::Mid, Sentiment::Neutral, true);
        let export = ExportArticle::from(&article);

        assert_eq!(export.tier, "Mid");
        assert_eq!(export.focus_type, "Headline");
        assert_eq!(export.id, 1);
    }

    #[test]
    fn export_request_uses_backend_field_names() {
        let article = test_article(7, Tier::Top, Sentiment::Positive, true);
        let request = ExportPdfRequest {
            client_name: "Netflix".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 22).unwrap(),
            articles: vec![ExportArticle::from(&article)],
            include_international: true,
        };

        let value = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(value["clientName"], "Netflix");
        assert_eq!(value["date"], "2025-07-22");
        assert_eq!(value["includeInternational"], true);
        assert_eq!(value["articles"][0]["focusType"], "Headline");
    }

    #[test]
    fn email_request_omits_missing_recipient() {
        let request = SendEmailRequest {
            client_name: "Apple".to_string(),
            pdf_url: "https://cdn.example.com/report.pdf".to_string(),
            recipient_email: None,
        };

        let value = serde_json::to_value(&request).expect("request serializes");
        assert!(value.get("recipientEmail").is_none());
        assert_eq!(value["pdfUrl"], "https://cdn.example.com/report.pdf");
    }

    #[test]
    fn analytics_request_shape() {
        let request = AnalyticsRequest {
            client_id: "4".to_string(),
            include_international: false,
            date: NaiveDate::from_ymd_opt(2025, 7, 22).unwrap(),
        };

        let value = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(value["clientId"], "4");
        assert_eq!(value["includeInternational"], false);
    }

    #[test]
    fn endpoints_join_without_double_slashes() {
        let client = ApiClient::new(&config()).expect("client builds");

        assert_eq!(
            client.endpoint("reports/export/pdf"),
            "http://localhost:8000/api/v1/reports/export/pdf"
        );
        assert_eq!(
            client.endpoint("/generate-report"),
            "http://localhost:8000/api/v1/generate-report"
        );
    }

    #[tokio::test]
    async fn short_search_queries_skip_the_network() {
        let client = ApiClient::new(&config()).expect("client builds");

        let suggestions = client.search_clients("a").await.expect("short-circuit");
        assert!(suggestions.is_empty());
    }

    #[test]
    fn server_error_keeps_status_and_body() {
        let error = ApiError::Server {
            status: 503,
            body: "maintenance".to_string(),
        };

        assert_eq!(error.to_string(), "server error 503: maintenance");
    }
}
