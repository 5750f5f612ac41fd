use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Base-URL environment override, the only configuration knob.
pub const API_URL_ENV: &str = "CLIPPINGS_API_URL";

/// Runtime configuration. Nothing is persisted; everything lives for the
/// duration of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let parsed =
            Url::parse(raw.trim()).with_context(|| format!("Invalid {API_URL_ENV} value: {raw}"))?;

        Ok(Self {
            api_base_url: parsed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(
            Config::default().api_base_url,
            "http://localhost:8000/api/v1"
        );
    }

    #[test]
    fn url_validation_rejects_garbage() {
        assert!(Url::parse("not a url").is_err());
        assert!(Url::parse(DEFAULT_API_URL).is_ok());
    }
}
