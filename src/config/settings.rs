//! Settings structures for the Pixabay search provider

use crate::locales;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, mirrors `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub pixabay: PixabaySettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub cache: CacheSettings,
    pub launcher: LauncherSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (PIXABAY_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("PIXABAY_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("PIXABAY_API_KEY") {
            self.pixabay.api_key = val;
        }
        if let Ok(val) = std::env::var("PIXABAY_LANG") {
            self.pixabay.lang = val;
        }
        if let Ok(val) = std::env::var("PIXABAY_BASE_URL") {
            self.pixabay.base_url = val;
        }
        if let Ok(val) = std::env::var("PIXABAY_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.search.debounce_ms = ms;
            }
        }
    }

    /// Reject settings the provider cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.search.prefix.is_empty() {
            bail!("search.prefix must not be empty");
        }
        if !locales::is_supported(&self.pixabay.lang) {
            bail!("unsupported Pixabay language: {}", self.pixabay.lang);
        }
        url::Url::parse(&self.pixabay.base_url)
            .map_err(|e| anyhow::anyhow!("invalid pixabay.base_url: {}", e))?;
        let timeout = self.outgoing.request_timeout;
        if !(timeout > 0.0) || Duration::try_from_secs_f64(timeout).is_err() {
            bail!("outgoing.request_timeout must be a positive number of seconds");
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Identifier the provider reports to its host
    pub provider_id: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            provider_id: "pixabay-search-provider".to_string(),
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PixabaySettings {
    /// API key sent as the `key` parameter
    pub api_key: String,
    /// Language code sent as the `lang` parameter
    pub lang: String,
    /// Endpoint every search is sent to
    pub base_url: String,
}

impl Default for PixabaySettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            lang: "en".to_string(),
            base_url: "https://pixabay.com/api/".to_string(),
        }
    }
}

/// How a refined search is answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsearchPolicy {
    /// Run the refined terms through the full gate/debounce/fetch path
    #[default]
    Requery,
    /// Narrow the previous ids by matching cached tags, no network
    FilterTags,
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Marker the first term must start with to trigger a remote search
    pub prefix: String,
    /// Delay between the last keystroke and the remote call
    pub debounce_ms: u64,
    /// Refinement policy
    pub subsearch: SubsearchPolicy,
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            prefix: "p:".to_string(),
            debounce_ms: 1500,
            subsearch: SubsearchPolicy::Requery,
        }
    }
}

/// Outgoing HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-request timeout in seconds
    pub request_timeout: f64,
    /// Idle connections kept per host
    pub pool_maxsize: usize,
    /// Proxy used for every request
    pub proxy: Option<String>,
    /// Verify TLS certificates
    pub verify_ssl: bool,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 4,
            proxy: None,
            verify_ssl: true,
            user_agent: format!("pixabay-search/{}", crate::VERSION),
        }
    }
}

/// Result cache bounds; both unset means the cache grows with every result set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_capacity: Option<u64>,
    pub ttl_seconds: Option<u64>,
}

/// External viewer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Program invoked with the page URL as its only argument
    pub command: String,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            command: "xdg-open".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search.prefix, "p:");
        assert_eq!(settings.search.debounce(), Duration::from_millis(1500));
        assert_eq!(settings.search.subsearch, SubsearchPolicy::Requery);
        assert_eq!(settings.pixabay.base_url, "https://pixabay.com/api/");
        assert!(settings.cache.max_capacity.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
pixabay:
  api_key: "secret"
  lang: "es"
search:
  debounce_ms: 250
  subsearch: filter_tags
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.pixabay.api_key, "secret");
        assert_eq!(settings.pixabay.lang, "es");
        assert_eq!(settings.search.debounce_ms, 250);
        assert_eq!(settings.search.subsearch, SubsearchPolicy::FilterTags);
        assert_eq!(settings.search.prefix, "p:");
        assert_eq!(settings.launcher.command, "xdg-open");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.search.prefix.clear();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pixabay.lang = "xx".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pixabay.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.outgoing.request_timeout = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unbounded_timeout() {
        for timeout in [f64::INFINITY, f64::NAN, 1e30] {
            let mut settings = Settings::default();
            settings.outgoing.request_timeout = timeout;
            assert!(settings.validate().is_err(), "accepted {}", timeout);
        }

        let yaml = "outgoing:\n  request_timeout: .inf\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.validate().is_err());
    }
}
