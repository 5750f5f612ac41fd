use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Editorial weight of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Top,
    Mid,
    Blog,
}

/// Whether the client is the headline subject or an incidental mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusType {
    Headline,
    Mention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Read-only client reference data. Never mutated by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub is_active: bool,
}

/// One piece of coverage inside a report.
///
/// `included_in_report` is the only field that changes after creation, and
/// only via full-record replacement in the selection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub outlet: String,
    pub tier: Tier,
    pub focus_type: FocusType,
    pub est_views: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    pub published_at: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub summary: String,
    pub included_in_report: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

/// Aggregate counts over every article in a report, independent of the
/// per-article inclusion flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummary {
    pub top_tier_count: u32,
    pub mid_tier_count: u32,
    pub blog_count: u32,
    pub total_mentions: u32,
    pub sentiment_breakdown: SentimentBreakdown,
}

impl MediaSummary {
    pub fn from_articles(articles: &[Article]) -> Self {
        let mut summary = Self {
            total_mentions: articles.len() as u32,
            ..Self::default()
        };

        for article in articles {
            match article.tier {
                Tier::Top => summary.top_tier_count += 1,
                Tier::Mid => summary.mid_tier_count += 1,
                Tier::Blog => summary.blog_count += 1,
            }
            match article.sentiment {
                Sentiment::Positive => summary.sentiment_breakdown.positive += 1,
                Sentiment::Neutral => summary.sentiment_breakdown.neutral += 1,
                Sentiment::Negative => summary.sentiment_breakdown.negative += 1,
            }
        }

        summary
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("summary counts diverge from articles: tier counts {tier_total} + sentiment {sentiment_total} vs {article_count} articles (totalMentions {total_mentions})")]
    SummaryMismatch {
        article_count: u32,
        total_mentions: u32,
        tier_total: u32,
        sentiment_total: u32,
    },
}

/// A full day of coverage for one client. Created wholesale and replaced
/// wholesale; never merged incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub client_id: String,
    pub client_name: String,
    pub date: NaiveDate,
    pub articles: Vec<Article>,
    pub summary: MediaSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl DailyReport {
    /// The summary is always derived from `articles`; a caller-supplied
    /// summary is never accepted.
    pub fn new(
        client_id: impl Into<String>,
        client_name: impl Into<String>,
        date: NaiveDate,
        articles: Vec<Article>,
    ) -> Self {
        let summary = MediaSummary::from_articles(&articles);

        Self {
            client_id: client_id.into(),
            client_name: client_name.into(),
            date,
            articles,
            summary,
            generated_at: Some(Utc::now()),
        }
    }

    /// Checks the summary-consistency formulas. Deserialized reports from
    /// untrusted sources should be normalized with [`Self::normalized`]
    /// instead of trusted after a failed validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let article_count = self.articles.len() as u32;
        let tier_total = self.summary.top_tier_count
            + self.summary.mid_tier_count
            + self.summary.blog_count;
        let breakdown = self.summary.sentiment_breakdown;
        let sentiment_total = breakdown.positive + breakdown.neutral + breakdown.negative;

        let consistent = self.summary.total_mentions == article_count
            && tier_total == article_count
            && sentiment_total == article_count
            && self.summary == MediaSummary::from_articles(&self.articles);

        if consistent {
            Ok(())
        } else {
            Err(ValidationError::SummaryMismatch {
                article_count,
                total_mentions: self.summary.total_mentions,
                tier_total,
                sentiment_total,
            })
        }
    }

    /// Recomputes the summary from the articles, discarding whatever the
    /// producer claimed. Used on analytics responses whose shape is
    /// provisional.
    pub fn normalized(mut self) -> Self {
        self.summary = MediaSummary::from_articles(&self.articles);
        self
    }
}

/// Test fixture shared across module test suites.
#[cfg(test)]
pub(crate) fn test_article(id: u32, tier: Tier, sentiment: Sentiment, included: bool) -> Article {
    use chrono::TimeZone;

    Article {
        id,
        title: format!("Article {id}"),
        url: format!("https://example.com/article{id}"),
        outlet: "BBC".to_string(),
        tier,
        focus_type: FocusType::Headline,
        est_views: 1_000,
        screenshot: None,
        published_at: Utc.with_ymd_and_hms(2025, 7, 22, 10, 30, 0).unwrap(),
        sentiment,
        summary: "Coverage.".to_string(),
        included_in_report: included,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: u32, tier: Tier, sentiment: Sentiment, included: bool) -> Article {
        test_article(id, tier, sentiment, included)
    }

    #[test]
    fn summary_counts_match_articles() {
        let articles = vec![
            article(1, Tier::Top, Sentiment::Positive, true),
            article(2, Tier::Top, Sentiment::Neutral, false),
            article(3, Tier::Mid, Sentiment::Negative, true),
            article(4, Tier::Blog, Sentiment::Positive, true),
        ];

        let summary = MediaSummary::from_articles(&articles);

        assert_eq!(summary.total_mentions, 4);
        assert_eq!(
            summary.top_tier_count + summary.mid_tier_count + summary.blog_count,
            summary.total_mentions
        );
        let breakdown = summary.sentiment_breakdown;
        assert_eq!(
            breakdown.positive + breakdown.neutral + breakdown.negative,
            summary.total_mentions
        );
        assert_eq!(summary.top_tier_count, 2);
        assert_eq!(breakdown.positive, 2);
    }

    #[test]
    fn summary_ignores_inclusion_flag() {
        let included = vec![
            article(1, Tier::Top, Sentiment::Positive, true),
            article(2, Tier::Mid, Sentiment::Neutral, true),
        ];
        let mut excluded = included.clone();
        for entry in &mut excluded {
            entry.included_in_report = false;
        }

        assert_eq!(
            MediaSummary::from_articles(&included),
            MediaSummary::from_articles(&excluded)
        );
    }

    #[test]
    fn report_recomputes_summary_on_construction() {
        let report = DailyReport::new(
            "1",
            "Beyoncé",
            NaiveDate::from_ymd_opt(2025, 7, 22).unwrap(),
            vec![
                article(1, Tier::Top, Sentiment::Positive, true),
                article(2, Tier::Blog, Sentiment::Negative, false),
            ],
        );

        assert!(report.validate().is_ok());
        assert_eq!(report.summary.total_mentions, 2);
        assert_eq!(report.summary.blog_count, 1);
    }

    #[test]
    fn validate_rejects_divergent_summary() {
        let mut report = DailyReport::new(
            "1",
            "Beyoncé",
            NaiveDate::from_ymd_opt(2025, 7, 22).unwrap(),
            vec![article(1, Tier::Top, Sentiment::Positive, true)],
        );
        report.summary.total_mentions = 9;

        assert!(report.validate().is_err());
        assert!(report.normalized().validate().is_ok());
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let report = DailyReport::new(
            "4",
            "Netflix",
            NaiveDate::from_ymd_opt(2025, 7, 22).unwrap(),
            vec![article(1, Tier::Top, Sentiment::Neutral, true)],
        );

        let value = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(value["clientName"], "Netflix");
        assert_eq!(value["articles"][0]["tier"], "Top");
        assert_eq!(value["articles"][0]["focusType"], "Headline");
        assert_eq!(value["articles"][0]["sentiment"], "neutral");
        assert_eq!(value["summary"]["totalMentions"], 1);
        assert!(value["articles"][0]["includedInReport"].as_bool().unwrap());
    }
}
