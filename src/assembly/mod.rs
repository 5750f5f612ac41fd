use crate::model::{Article, DailyReport, Tier};

/// Included articles partitioned by tier, in report order within each tier.
/// This is the structure behind the preview panel and the export payload.
#[derive(Debug, Clone, Default)]
pub struct TierPartitions {
    pub top: Vec<Article>,
    pub mid: Vec<Article>,
    pub blog: Vec<Article>,
}

impl TierPartitions {
    pub fn total_included(&self) -> usize {
        self.top.len() + self.mid.len() + self.blog.len()
    }

    /// Flattens in tier order Top, Mid, Blog. This is the exact article
    /// order the export endpoints receive.
    pub fn flatten(self) -> Vec<Article> {
        let mut articles = self.top;
        articles.extend(self.mid);
        articles.extend(self.blog);
        articles
    }
}

pub fn assemble(report: &DailyReport) -> TierPartitions {
    let mut partitions = TierPartitions::default();

    for article in &report.articles {
        if !article.included_in_report {
            continue;
        }

        match article.tier {
            Tier::Top => partitions.top.push(article.clone()),
            Tier::Mid => partitions.mid.push(article.clone()),
            Tier::Blog => partitions.blog.push(article.clone()),
        }
    }

    partitions
}

/// Text rendering of the preview panel: summary counts plus the included
/// articles grouped by tier.
pub fn render_preview(report: &DailyReport) -> String {
    let partitions = assemble(report);
    let breakdown = report.summary.sentiment_breakdown;

    format!(
        "# {} - {}\n\n## Summary\n- Total mentions: {}\n- Top-tier: {} | Mid-tier: {} | Blog & social: {}\n- Sentiment: {} positive / {} neutral / {} negative\n- Included in report: {}\n\n## Top-Tier\n{}\n\n## Mid-Tier\n{}\n\n## Blog & Social\n{}\n",
        report.client_name,
        report.date.format("%Y-%m-%d"),
        report.summary.total_mentions,
        report.summary.top_tier_count,
        report.summary.mid_tier_count,
        report.summary.blog_count,
        breakdown.positive,
        breakdown.neutral,
        breakdown.negative,
        partitions.total_included(),
        list_articles(&partitions.top),
        list_articles(&partitions.mid),
        list_articles(&partitions.blog),
    )
}

fn list_articles(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "- No coverage included".to_string();
    }

    articles
        .iter()
        .map(|article| {
            format!(
                "- {} ({}, ~{} views) {}",
                article.title, article.outlet, article.est_views, article.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sentiment, test_article};
    use chrono::NaiveDate;

    fn report() -> DailyReport {
        DailyReport::new(
            "1",
            "Beyoncé",
            NaiveDate::from_ymd_opt(2025, 7, 22).unwrap(),
            vec![
                test_article(1, Tier::Top, Sentiment::Positive, true),
                test_article(2, Tier::Mid, Sentiment::Neutral, true),
                test_article(3, Tier::Blog, Sentiment::Positive, false),
                test_article(4, Tier::Top, Sentiment::Neutral, true),
                test_article(5, Tier::Mid, Sentiment::Negative, true),
                test_article(6, Tier::Top, Sentiment::Positive, false),
                test_article(7, Tier::Blog, Sentiment::Neutral, true),
                test_article(8, Tier::Mid, Sentiment::Positive, false),
            ],
        )
    }

    #[test]
    fn partitions_included_articles_by_tier() {
        let partitions = assemble(&report());

        assert_eq!(partitions.top.len(), 2);
        assert_eq!(partitions.mid.len(), 2);
        assert_eq!(partitions.blog.len(), 1);
        assert_eq!(partitions.total_included(), 5);
    }

    #[test]
    fn partitions_keep_report_order_within_tiers() {
        let partitions = assemble(&report());

        let top_ids = partitions
            .top
            .iter()
            .map(|article| article.id)
            .collect::<Vec<_>>();
        assert_eq!(top_ids, vec![1, 4]);
    }

    #[test]
    fn flatten_yields_tier_order() {
        let ids = assemble(&report())
            .flatten()
            .into_iter()
            .map(|article| article.id)
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![1, 4, 2, 5, 7]);
    }

    #[test]
    fn preview_render_reports_included_count() {
        let rendered = render_preview(&report());

        assert!(rendered.contains("Included in report: 5"));
        assert!(rendered.contains("## Top-Tier"));
        assert!(rendered.contains("Total mentions: 8"));
    }

    #[test]
    fn excluded_articles_never_appear() {
        let partitions = assemble(&report());
        let all = partitions.flatten();

        assert!(all.iter().all(|article| article.included_in_report));
        assert!(all.iter().all(|article| ![3, 6, 8].contains(&article.id)));
    }
}
