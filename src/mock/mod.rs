pub mod scenario;

use crate::model::{Article, Client, DailyReport, FocusType, Sentiment, Tier};
use crate::mock::scenario::{ScenarioFixture, ScenarioRegistry};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Fixed UK outlet pool for domestic coverage.
pub const DOMESTIC_OUTLETS: [&str; 5] = [
    "BBC",
    "The Guardian",
    "The Times",
    "Sky News",
    "Independent",
];

/// Added to the pool when international coverage is requested.
pub const INTERNATIONAL_OUTLETS: [&str; 7] = [
    "CNN",
    "Reuters",
    "AP",
    "Bloomberg",
    "Wall Street Journal",
    "New York Times",
    "France24",
];

const TITLE_PHRASES: [&str; 8] = [
    "Makes Headlines",
    "In the News",
    "Featured Story",
    "Breaking News",
    "Global Coverage",
    "International Spotlight",
    "Media Buzz",
    "Industry Focus",
];

const DOMESTIC_ARTICLE_RANGE: (usize, usize) = (5, 14);
const INTERNATIONAL_ARTICLE_RANGE: (usize, usize) = (8, 22);
const INCLUDE_PROBABILITY: f64 = 0.8;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("client {0} not found in the reference roster")]
    ClientNotFound(String),
}

/// Synthesizes structurally valid reports when the backend is unreachable.
/// The free-text path never fails; only the legacy fixed-roster lookup can.
pub struct MockGenerator {
    scenarios: ScenarioRegistry,
    roster: Vec<Client>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            scenarios: ScenarioRegistry::with_builtin_scenarios(),
            roster: reference_roster(),
        }
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_scenario(&mut self, subject: &str, fixture: ScenarioFixture) {
        self.scenarios.register(subject, fixture);
    }

    pub fn roster(&self) -> &[Client] {
        &self.roster
    }

    /// Free-text generation for any subject. Scenario fixtures win over
    /// randomized output; a degenerate (empty) name still yields a valid
    /// zero-article report.
    pub fn generate(
        &self,
        client_name: &str,
        include_international: bool,
        as_of: NaiveDate,
    ) -> DailyReport {
        self.generate_with_rng(client_name, include_international, as_of, &mut rand::rng())
    }

    pub fn generate_with_rng<R: Rng>(
        &self,
        client_name: &str,
        include_international: bool,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> DailyReport {
        let client_name = client_name.trim();
        let client_id = slugify(client_name);

        if client_name.is_empty() {
            return DailyReport::new(client_id, client_name, as_of, Vec::new());
        }

        if let Some(fixture) = self.scenarios.lookup(client_name) {
            let articles = fixture_articles(fixture, client_name, as_of);
            return DailyReport::new(client_id, client_name, as_of, articles);
        }

        let articles = random_articles(client_name, include_international, as_of, rng);
        DailyReport::new(client_id, client_name, as_of, articles)
    }

    /// Legacy strict lookup against the fixed roster. Free-text callers
    /// should use [`Self::generate`]; this path alone may fail.
    pub fn generate_for_client_id(
        &self,
        client_id: &str,
        include_international: bool,
        as_of: NaiveDate,
    ) -> Result<DailyReport, MockError> {
        let client = self
            .roster
            .iter()
            .find(|client| client.id == client_id)
            .ok_or_else(|| MockError::ClientNotFound(client_id.to_string()))?;

        let name = client.name.clone();
        Ok(self.generate(&name, include_international, as_of))
    }

    /// Seeded variant for reproducible output.
    pub fn generate_seeded(
        &self,
        client_name: &str,
        include_international: bool,
        as_of: NaiveDate,
        seed: u64,
    ) -> DailyReport {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with_rng(client_name, include_international, as_of, &mut rng)
    }
}

fn random_articles<R: Rng>(
    client_name: &str,
    include_international: bool,
    as_of: NaiveDate,
    rng: &mut R,
) -> Vec<Article> {
    let outlets = outlet_pool(include_international);
    let (min, max) = if include_international {
        INTERNATIONAL_ARTICLE_RANGE
    } else {
        DOMESTIC_ARTICLE_RANGE
    };
    let count = rng.random_range(min..=max);
    let id_base = rng.random_range(1_000..2_000);
    let scope = if include_international {
        "International"
    } else {
        "UK"
    };
    let day_end = end_of_day(as_of);

    (0..count)
        .map(|index| {
            let outlet = outlets[index % outlets.len()];
            let published_at = day_end - Duration::seconds(rng.random_range(0..86_400));

            Article {
                id: id_base + index as u32,
                title: format!("{client_name} {}", TITLE_PHRASES[index % TITLE_PHRASES.len()]),
                url: format!("https://example.com/article{index}"),
                outlet: outlet.to_string(),
                tier: [Tier::Top, Tier::Mid, Tier::Blog][rng.random_range(0..3)],
                focus_type: [FocusType::Headline, FocusType::Mention][rng.random_range(0..2)],
                est_views: rng.random_range(1_000..=101_000),
                screenshot: Some(format!("/screenshots/article-{index}.png")),
                published_at,
                sentiment: [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
                    [rng.random_range(0..3)],
                summary: format!("{scope} coverage featuring {client_name} in {outlet}."),
                included_in_report: rng.random_bool(INCLUDE_PROBABILITY),
            }
        })
        .collect()
}

fn fixture_articles(
    fixture: &ScenarioFixture,
    client_name: &str,
    as_of: NaiveDate,
) -> Vec<Article> {
    let day_end = end_of_day(as_of);

    fixture
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Article {
            id: 1 + index as u32,
            title: format!("{client_name} {}", entry.title_phrase),
            url: format!("https://example.com/{}/article{index}", fixture.name),
            outlet: entry.outlet.clone(),
            tier: entry.tier,
            focus_type: entry.focus_type,
            est_views: entry.est_views,
            screenshot: Some(format!("/screenshots/{}-{index}.png", fixture.name)),
            published_at: day_end - Duration::hours(1 + index as i64),
            sentiment: entry.sentiment,
            summary: format!("{} coverage of {client_name}.", entry.outlet),
            included_in_report: true,
        })
        .collect()
}

fn outlet_pool(include_international: bool) -> Vec<&'static str> {
    let mut pool = DOMESTIC_OUTLETS.to_vec();
    if include_international {
        pool.extend(INTERNATIONAL_OUTLETS);
    }
    pool
}

fn end_of_day(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap_or_default())
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// The legacy client list the selection screen was seeded with: five real
/// accounts plus generated filler, every tenth filler account inactive.
fn reference_roster() -> Vec<Client> {
    let named = [
        ("1", "Beyoncé", "Music"),
        ("2", "Harry Styles", "Music"),
        ("3", "Taylor Swift", "Music"),
        ("4", "Netflix", "Entertainment"),
        ("5", "Apple", "Technology"),
    ];
    let industries = ["Technology", "Entertainment", "Fashion", "Sports", "Finance"];

    named
        .into_iter()
        .map(|(id, name, industry)| Client {
            id: id.to_string(),
            name: name.to_string(),
            industry: Some(industry.to_string()),
            is_active: true,
        })
        .chain((0..75).map(|index| Client {
            id: (index + 6).to_string(),
            name: format!("Client {}", index + 6),
            industry: Some(industries[index % industries.len()].to_string()),
            is_active: index % 10 != 0,
        }))
        .collect()
}
