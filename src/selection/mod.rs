use crate::model::{Article, Tier};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Views,
    Outlet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Pure projection of the article list for the coverage feed: tier filter
/// first, then a stable sort by the chosen key. Ties keep the input order;
/// there is no secondary key.
pub fn select(
    articles: &[Article],
    filter_tier: Option<Tier>,
    sort_key: SortKey,
    sort_order: SortOrder,
) -> Vec<Article> {
    let mut visible = articles
        .iter()
        .filter(|article| filter_tier.is_none_or(|tier| article.tier == tier))
        .cloned()
        .collect::<Vec<_>>();

    visible.sort_by(|left, right| {
        let ordering = match sort_key {
            SortKey::Date => left.published_at.cmp(&right.published_at),
            SortKey::Views => left.est_views.cmp(&right.est_views),
            SortKey::Outlet => compare_outlets(&left.outlet, &right.outlet),
        };

        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    visible
}

/// Replaces the inclusion flag of exactly the matching article, leaving all
/// others untouched. An unknown id is a silent no-op; the feed never offers
/// an invalid one.
pub fn set_included(articles: &[Article], article_id: u32, included: bool) -> Vec<Article> {
    articles
        .iter()
        .map(|article| {
            if article.id == article_id {
                Article {
                    included_in_report: included,
                    ..article.clone()
                }
            } else {
                article.clone()
            }
        })
        .collect()
}

fn compare_outlets(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sentiment, test_article};

    fn feed() -> Vec<Article> {
        let mut first = test_article(1, Tier::Top, Sentiment::Positive, true);
        first.est_views = 500;
        first.outlet = "BBC".to_string();

        let mut second = test_article(2, Tier::Mid, Sentiment::Neutral, true);
        second.est_views = 100_000;
        second.outlet = "the Guardian".to_string();

        let mut third = test_article(3, Tier::Top, Sentiment::Negative, false);
        third.est_views = 3_000;
        third.outlet = "Sky News".to_string();

        vec![first, second, third]
    }

    #[test]
    fn filters_to_requested_tier_only() {
        let visible = select(&feed(), Some(Tier::Top), SortKey::Date, SortOrder::Asc);

        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|article| article.tier == Tier::Top));
        // Same-date sort is stable, so relative order survives filtering.
        assert_eq!(visible[0].id, 1);
        assert_eq!(visible[1].id, 3);
    }

    #[test]
    fn sorts_by_views_descending() {
        let visible = select(&feed(), None, SortKey::Views, SortOrder::Desc);

        let views = visible
            .iter()
            .map(|article| article.est_views)
            .collect::<Vec<_>>();
        assert_eq!(views, vec![100_000, 3_000, 500]);
    }

    #[test]
    fn outlet_sort_is_case_insensitive() {
        let visible = select(&feed(), None, SortKey::Outlet, SortOrder::Asc);

        let outlets = visible
            .iter()
            .map(|article| article.outlet.as_str())
            .collect::<Vec<_>>();
        assert_eq!(outlets, vec!["BBC", "Sky News", "the Guardian"]);
    }

    #[test]
    fn date_sort_with_ties_preserves_input_order() {
        // All fixture articles share one timestamp.
        let visible = select(&feed(), None, SortKey::Date, SortOrder::Asc);
        let ids = visible.iter().map(|article| article.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);

        let reversed_input = feed().into_iter().rev().collect::<Vec<_>>();
        let visible = select(&reversed_input, None, SortKey::Date, SortOrder::Asc);
        let ids = visible.iter().map(|article| article.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn select_leaves_input_untouched() {
        let input = feed();
        let _ = select(&input, Some(Tier::Blog), SortKey::Views, SortOrder::Desc);
        assert_eq!(input, feed());
    }

    #[test]
    fn set_included_replaces_only_the_target() {
        let updated = set_included(&feed(), 3, true);

        assert!(updated[2].included_in_report);
        assert_eq!(updated[0], feed()[0]);
        assert_eq!(updated[1], feed()[1]);
    }

    #[test]
    fn set_included_is_idempotent() {
        let once = set_included(&feed(), 1, false);
        let twice = set_included(&once, 1, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn set_included_ignores_unknown_id() {
        assert_eq!(set_included(&feed(), 999, false), feed());
    }
}
