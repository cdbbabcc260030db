//! Configuration for the nutrition advisor.
//!
//! Maps directly to `nutri.toml`. Provider credentials can also come from the
//! environment (`ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, `OPENAI_API_KEY`);
//! credential presence is what decides which providers are available.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutriConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Per-provider credentials and endpoints.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Retry and timeout bounds for the fallback chain.
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
    /// Response cache for the structured capabilities.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl NutriConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `NutriError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::NutriError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Render the configuration back to TOML.
    ///
    /// # Errors
    /// Returns `NutriError::Serialization` if a value cannot be represented.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::NutriError::Serialization(e.to_string()))
    }

    /// Overlay provider API keys from the process environment.
    ///
    /// Variables that are unset or blank leave the file value untouched.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay provider API keys from an arbitrary lookup function.
    #[must_use]
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let slots = [
            ("ANTHROPIC_API_KEY", &mut self.providers.anthropic),
            ("GEMINI_API_KEY", &mut self.providers.gemini),
            ("OPENAI_API_KEY", &mut self.providers.openai),
        ];
        for (var, settings) in slots {
            if let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) {
                tracing::debug!(var, "provider credential taken from environment");
                settings.api_key = Some(key);
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: pretty, json, compact.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Credentials and endpoints for every known provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Anthropic Messages API.
    #[serde(default)]
    pub anthropic: ProviderSettings,
    /// Google Gemini `generateContent` API.
    #[serde(default)]
    pub gemini: ProviderSettings,
    /// `OpenAI` chat completions API.
    #[serde(default)]
    pub openai: ProviderSettings,
}

/// Settings for one provider.
///
/// `model` and `base_url` fall back to the adapter's built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API key. A provider without a key is never registered.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model override.
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL override (proxies, tests).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ProviderSettings {
    /// Settings with only a key.
    #[must_use]
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Whether a non-blank key is configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Bounds on the provider fallback chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Attempts per provider before moving to the next one.
    #[serde(default = "default_2")]
    pub max_retries: u32,
    /// Hard timeout for any single provider call in milliseconds.
    #[serde(default = "default_10000")]
    pub request_timeout_ms: u64,
    /// Previous chat turns included in the chat prompt.
    #[serde(default = "default_5_usize")]
    pub history_turns: usize,
    /// Food names listed in the meal plan prompt.
    #[serde(default = "default_50_usize")]
    pub max_prompt_foods: usize,
    /// Directory with TOML prompt overrides; built-ins are used when unset.
    #[serde(default)]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            request_timeout_ms: 10_000,
            history_turns: 5,
            max_prompt_foods: 50,
            prompts_dir: None,
        }
    }
}

/// Response cache for repeated structured requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether provider responses are cached at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Entry lifetime in seconds.
    #[serde(default = "default_600")]
    pub ttl_seconds: u64,
    /// Maximum number of cached responses; the oldest is evicted first.
    #[serde(default = "default_256")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 600,
            max_entries: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }
fn default_2() -> u32 { 2 }
fn default_5_usize() -> usize { 5 }
fn default_50_usize() -> usize { 50 }
fn default_256() -> usize { 256 }
fn default_600() -> u64 { 600 }
fn default_10000() -> u64 { 10_000 }

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = NutriConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.orchestration.max_retries, 2);
        assert_eq!(config.orchestration.request_timeout_ms, 10_000);
        assert_eq!(config.orchestration.history_turns, 5);
        assert!(config.cache.enabled);
        assert!(!config.providers.anthropic.has_credentials());
    }

    #[test]
    fn partial_provider_section() {
        let config = NutriConfig::from_toml(
            r#"
            [providers.gemini]
            api_key = "g-key"

            [orchestration]
            max_retries = 3
            "#,
        )
        .expect("parses");
        assert!(config.providers.gemini.has_credentials());
        assert_eq!(config.providers.gemini.model, None);
        assert!(!config.providers.openai.has_credentials());
        assert_eq!(config.orchestration.max_retries, 3);
        assert_eq!(config.orchestration.request_timeout_ms, 10_000);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = NutriConfig::from_toml("[orchestration\nmax_retries = ").unwrap_err();
        assert!(matches!(err, crate::NutriError::Config(_)));
    }

    #[test]
    fn blank_key_is_not_a_credential() {
        assert!(!ProviderSettings::with_key("   ").has_credentials());
        assert!(ProviderSettings::with_key("k").has_credentials());
    }

    #[test]
    fn env_overlay_only_sets_present_keys() {
        let config = NutriConfig::default().apply_env_with(|var| match var {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "GEMINI_API_KEY" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.providers.openai.api_key.as_deref(), Some("sk-test"));
        assert!(!config.providers.gemini.has_credentials());
        assert!(!config.providers.anthropic.has_credentials());
    }

    #[test]
    fn round_trips_through_file() {
        let mut config = NutriConfig::default();
        config.providers.anthropic = ProviderSettings::with_key("a-key");
        config.cache.max_entries = 8;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(config.to_toml().expect("serializes").as_bytes())
            .expect("write");

        let loaded = NutriConfig::from_file(file.path()).expect("loads");
        assert_eq!(loaded.providers.anthropic, config.providers.anthropic);
        assert_eq!(loaded.cache.max_entries, 8);
    }
}
