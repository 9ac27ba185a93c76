//! Configuration types for the FAQ bridge.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FaqError, Result};

/// Two-character prefix every API key starts with.
pub const CREDENTIAL_PREFIX: &str = "fq";

/// Default service base address.
pub const DEFAULT_BASE_URL: &str = "https://api.faqbase.io/v1";

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqConfig {
    /// API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// MCP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the FAQ service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Usually supplied through `FAQ_API_KEY` instead.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Cache lifetime in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Minimum delay between requests in milliseconds. Stored, not enforced.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            cache_ttl_ms: 300_000,
            request_delay_ms: 1000,
            user_agent: default_user_agent(),
        }
    }
}

/// MCP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported in the `initialize` handshake.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Default number of search results shown by the tools.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            max_results: 10,
        }
    }
}

// Default value functions

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache_ttl_ms() -> u64 {
    300_000
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    format!("faq-mcp/{}", env!("CARGO_PKG_VERSION"))
}

fn default_server_name() -> String {
    "faq-mcp".to_string()
}

fn default_max_results() -> usize {
    10
}

impl FaqConfig {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| FaqError::config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("faq-mcp").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        // Try local config
        let local_config = PathBuf::from("faq-mcp.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        Ok(Self::default())
    }

    /// Apply `FAQ_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup, so tests need not touch the
    /// process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FAQ_API_KEY") {
            debug!("Using API key from FAQ_API_KEY");
            self.api.api_key = Some(key);
        }
        if let Some(url) = lookup("FAQ_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(ttl) = lookup("FAQ_CACHE_TTL_MS") {
            self.api.cache_ttl_ms = parse_millis("FAQ_CACHE_TTL_MS", &ttl)?;
        }
        if let Some(delay) = lookup("FAQ_REQUEST_DELAY_MS") {
            self.api.request_delay_ms = parse_millis("FAQ_REQUEST_DELAY_MS", &delay)?;
        }
        Ok(())
    }
}

fn parse_millis(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| FaqError::config(format!("{} must be a number of milliseconds, got '{}'", name, value)))
}

/// An API key that passed the prefix check.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate a raw API key.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FaqError::config("API key is missing"));
        }
        if !trimmed.starts_with(CREDENTIAL_PREFIX) {
            return Err(FaqError::config(format!(
                "API key must start with '{}'",
                CREDENTIAL_PREFIX
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw key, for the Authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({}***)", CREDENTIAL_PREFIX)
    }
}

/// Validated, immutable settings a client is built from.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub credential: Credential,
    pub cache_ttl: Duration,
    pub request_delay: Duration,
    pub user_agent: String,
}

impl EndpointConfig {
    /// Endpoint with default base URL and timings.
    pub fn new(credential: Credential) -> Self {
        let api = ApiConfig::default();
        Self {
            base_url: api.base_url,
            credential,
            cache_ttl: Duration::from_millis(api.cache_ttl_ms),
            request_delay: Duration::from_millis(api.request_delay_ms),
            user_agent: api.user_agent,
        }
    }

    /// Build from loaded configuration. Fails if the key is absent or malformed.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let raw = api
            .api_key
            .clone()
            .ok_or_else(|| FaqError::config("API key is missing; set FAQ_API_KEY"))?;
        let credential = Credential::parse(raw)?;

        Ok(Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            credential,
            cache_ttl: Duration::from_millis(api.cache_ttl_ms),
            request_delay: Duration::from_millis(api.request_delay_ms),
            user_agent: api.user_agent.clone(),
        })
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the cache lifetime.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FaqConfig::default();
        assert_eq!(config.api.cache_ttl_ms, 300_000);
        assert_eq!(config.api.request_delay_ms, 1000);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.server.max_results, 10);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://localhost:9000\"\ncache_ttl_ms = 50").unwrap();

        let config = FaqConfig::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.cache_ttl_ms, 50);
        assert_eq!(config.api.request_delay_ms, 1000);
        assert_eq!(config.server.name, "faq-mcp");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api = 3 = 4").unwrap();

        let err = FaqConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, FaqError::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FAQ_API_KEY", "fq_live_123"),
            ("FAQ_CACHE_TTL_MS", "1500"),
        ]
        .into_iter()
        .collect();

        let mut config = FaqConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.api_key.as_deref(), Some("fq_live_123"));
        assert_eq!(config.api.cache_ttl_ms, 1500);
    }

    #[test]
    fn test_env_override_not_a_number() {
        let mut config = FaqConfig::default();
        let err = config
            .apply_overrides(|k| (k == "FAQ_REQUEST_DELAY_MS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, FaqError::Config { .. }));
    }

    #[test]
    fn test_credential_prefix() {
        assert!(Credential::parse("fq_abc").is_ok());
        assert!(matches!(
            Credential::parse("sk_abc"),
            Err(FaqError::Config { .. })
        ));
        assert!(matches!(Credential::parse("  "), Err(FaqError::Config { .. })));
    }

    #[test]
    fn test_credential_debug_redacted() {
        let credential = Credential::parse("fq_secret_value").unwrap();
        assert!(!format!("{:?}", credential).contains("secret"));
    }

    #[test]
    fn test_endpoint_requires_key() {
        let err = EndpointConfig::from_config(&ApiConfig::default()).unwrap_err();
        assert!(matches!(err, FaqError::Config { .. }));

        let api = ApiConfig {
            api_key: Some("fq_key".into()),
            base_url: "http://localhost:1/".into(),
            ..Default::default()
        };
        let endpoint = EndpointConfig::from_config(&api).unwrap();
        assert_eq!(endpoint.base_url, "http://localhost:1");
        assert_eq!(endpoint.cache_ttl, Duration::from_millis(300_000));
    }
}
