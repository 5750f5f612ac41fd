use crate::model::{FocusType, Sentiment, Tier};
use std::collections::HashMap;

/// Template for one article of a scenario fixture. The client name and the
/// report date are filled in at generation time.
#[derive(Debug, Clone)]
pub struct ScenarioEntry {
    pub title_phrase: String,
    pub outlet: String,
    pub tier: Tier,
    pub focus_type: FocusType,
    pub sentiment: Sentiment,
    pub est_views: u64,
}

/// A hand-authored article set with a predetermined sentiment/tier
/// distribution, used in place of randomized generation for demonstration
/// subjects.
#[derive(Debug, Clone)]
pub struct ScenarioFixture {
    pub name: String,
    pub entries: Vec<ScenarioEntry>,
}

/// Named scenario fixtures keyed by normalized subject string, consulted
/// before falling back to randomized generation.
#[derive(Debug, Default)]
pub struct ScenarioRegistry {
    fixtures: HashMap<String, ScenarioFixture>,
}

impl ScenarioRegistry {
    pub fn with_builtin_scenarios() -> Self {
        let mut registry = Self::default();
        registry.register("crisis drill", crisis_fixture());
        registry
    }

    pub fn register(&mut self, subject: &str, fixture: ScenarioFixture) {
        self.fixtures.insert(normalize_subject(subject), fixture);
    }

    /// Exact match on the normalized subject first, then a substring fuzzy
    /// match in either direction.
    pub fn lookup(&self, subject: &str) -> Option<&ScenarioFixture> {
        let normalized = normalize_subject(subject);
        if normalized.is_empty() {
            return None;
        }

        self.fixtures.get(&normalized).or_else(|| {
            self.fixtures
                .iter()
                .find(|(key, _)| normalized.contains(key.as_str()) || key.contains(&normalized))
                .map(|(_, fixture)| fixture)
        })
    }
}

pub fn normalize_subject(subject: &str) -> String {
    subject
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Built-in demo scenario: a subject in the middle of a press crisis, every
/// article negative.
fn crisis_fixture() -> ScenarioFixture {
    let entries = [
        ("Faces Mounting Backlash Over Leaked Memo", "BBC", Tier::Top, FocusType::Headline, 95_000),
        ("Crisis Deepens As Partners Walk Away", "The Guardian", Tier::Top, FocusType::Headline, 72_000),
        ("Regulator Opens Inquiry Into Conduct", "The Times", Tier::Top, FocusType::Headline, 54_000),
        ("Analysts Question Leadership Response", "Sky News", Tier::Mid, FocusType::Headline, 31_000),
        ("Industry Roundup: A Week To Forget", "Independent", Tier::Mid, FocusType::Mention, 18_000),
        ("Trade Press Slates Handling Of Recall", "Bloomberg", Tier::Mid, FocusType::Mention, 22_000),
        ("Social Feeds Turn Hostile Overnight", "BuzzFeed", Tier::Blog, FocusType::Mention, 40_000),
        ("Commentators Pile On As Apology Falls Flat", "Reuters", Tier::Blog, FocusType::Mention, 12_000),
        ("Forum Reaction: Trust Is Gone", "Medium", Tier::Blog, FocusType::Mention, 6_000),
    ];

    ScenarioFixture {
        name: "crisis-drill".to_string(),
        entries: entries
            .into_iter()
            .map(|(phrase, outlet, tier, focus_type, est_views)| ScenarioEntry {
                title_phrase: phrase.to_string(),
                outlet: outlet.to_string(),
                tier,
                focus_type,
                sentiment: Sentiment::Negative,
                est_views,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_subject("  Crisis   DRILL "), "crisis drill");
    }

    #[test]
    fn exact_lookup_finds_builtin_fixture() {
        let registry = ScenarioRegistry::with_builtin_scenarios();
        let fixture = registry.lookup("Crisis Drill").expect("builtin fixture");

        assert_eq!(fixture.entries.len(), 9);
        assert!(
            fixture
                .entries
                .iter()
                .all(|entry| entry.sentiment == Sentiment::Negative)
        );
    }

    #[test]
    fn fuzzy_lookup_matches_substrings_both_ways() {
        let registry = ScenarioRegistry::with_builtin_scenarios();

        assert!(registry.lookup("acme crisis drill rehearsal").is_some());
        assert!(registry.lookup("crisis").is_some());
        assert!(registry.lookup("netflix").is_none());
    }

    #[test]
    fn empty_subject_never_matches() {
        let registry = ScenarioRegistry::with_builtin_scenarios();
        assert!(registry.lookup("   ").is_none());
    }
}
