use std::time::Duration;

use rec_client::HttpRecommendationClient;
use serde::Deserialize;

/// Prefix of every environment variable read by [`BrowseConfig`].
pub const ENV_PREFIX: &str = "REEL_";

/// Browser configuration loaded from `REEL_*` environment variables
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Recommendation service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Quiet period before a search edit triggers a fetch
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-request timeout; unset means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: None,
        }
    }
}

impl BrowseConfig {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX)
            .from_env::<BrowseConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load configuration from explicit `(name, value)` pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, BrowseConfig>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// HTTP client pointed at `base_url` with the configured timeout
    pub fn build_client(&self) -> anyhow::Result<HttpRecommendationClient> {
        HttpRecommendationClient::with_timeout(self.base_url.clone(), self.request_timeout())
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = BrowseConfig::from_vars(vars(&[("PATH", "/usr/bin")])).unwrap();
        assert_eq!(config, BrowseConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_prefixed_values_override_defaults() {
        let config = BrowseConfig::from_vars(vars(&[
            ("REEL_BASE_URL", "http://recs.internal:8080"),
            ("REEL_DEBOUNCE_MS", "50"),
            ("REEL_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://recs.internal:8080");
        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = BrowseConfig::from_vars(vars(&[("REEL_DEBOUNCE_MS", "soon")]));
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("Failed to load config"));
    }

    #[test]
    fn test_build_client_uses_base_url() {
        let config = BrowseConfig {
            base_url: "http://localhost:9000".to_string(),
            ..BrowseConfig::default()
        };
        let client = config.build_client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}
