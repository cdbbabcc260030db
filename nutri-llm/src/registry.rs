//! Provider registry with a fixed priority order.
//!
//! Built once at startup from credential presence. A provider whose adapter
//! fails to construct is simply absent; it is never retried later. The
//! registry is read-only afterwards and is shared behind an `Arc`.
//!
//! ```text
//!   ProvidersConfig ──▶ anthropic? ──▶ gemini? ──▶ openai?
//!                          │             │            │
//!                          └──────┬──────┴────────────┘
//!                                 ▼
//!                   [available adapters, priority order]
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use nutri_core::config::{ProviderSettings, ProvidersConfig};

use crate::error::LlmError;
use crate::provider::{AnthropicAdapter, GeminiAdapter, OpenAiAdapter, ProviderAdapter};
use crate::types::ProviderKind;

/// The available providers, highest priority first.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.kinds())
            .finish()
    }
}

impl ProviderRegistry {
    /// A registry with no providers. Every orchestrated call returns `None`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build every provider that has credentials, in [`ProviderKind::PRIORITY`] order.
    ///
    /// `timeout` bounds connection setup for each adapter's HTTP client.
    #[must_use]
    pub fn from_config(config: &ProvidersConfig, timeout: Duration) -> Self {
        let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

        for kind in ProviderKind::PRIORITY {
            let settings = settings_for(config, kind);
            if !settings.has_credentials() {
                debug!(provider = %kind, "no credentials, provider disabled");
                continue;
            }
            match build(kind, settings, timeout) {
                Ok(adapter) => providers.push(adapter),
                Err(e) => debug!(provider = %kind, error = %e, "provider construction failed"),
            }
        }

        let registry = Self { providers };
        info!(providers = ?registry.kinds(), "provider registry ready");
        registry
    }

    /// Use the given adapters as-is; their order is the priority order.
    #[must_use]
    pub fn from_adapters(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { providers }
    }

    /// Available providers in priority order.
    #[must_use]
    pub fn available_providers(&self) -> &[Arc<dyn ProviderAdapter>] {
        &self.providers
    }

    /// Kinds of the available providers in priority order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Number of available providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn settings_for(config: &ProvidersConfig, kind: ProviderKind) -> &ProviderSettings {
    match kind {
        ProviderKind::Anthropic => &config.anthropic,
        ProviderKind::Gemini => &config.gemini,
        ProviderKind::OpenAi => &config.openai,
    }
}

fn build(
    kind: ProviderKind,
    settings: &ProviderSettings,
    timeout: Duration,
) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
    Ok(match kind {
        ProviderKind::Anthropic => Arc::new(AnthropicAdapter::from_settings(settings, timeout)?),
        ProviderKind::Gemini => Arc::new(GeminiAdapter::from_settings(settings, timeout)?),
        ProviderKind::OpenAi => Arc::new(OpenAiAdapter::from_settings(settings, timeout)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_secs(1);

    #[test]
    fn no_credentials_means_empty() {
        let registry = ProviderRegistry::from_config(&ProvidersConfig::default(), T);
        assert!(registry.is_empty());
    }

    #[test]
    fn priority_order_regardless_of_config_order() {
        let config = ProvidersConfig {
            openai: ProviderSettings::with_key("o"),
            anthropic: ProviderSettings::with_key("a"),
            gemini: ProviderSettings::default(),
        };
        let registry = ProviderRegistry::from_config(&config, T);
        assert_eq!(registry.kinds(), vec![ProviderKind::Anthropic, ProviderKind::OpenAi]);
    }

    #[test]
    fn all_three_present() {
        let config = ProvidersConfig {
            anthropic: ProviderSettings::with_key("a"),
            gemini: ProviderSettings::with_key("g"),
            openai: ProviderSettings::with_key("o"),
        };
        let registry = ProviderRegistry::from_config(&config, T);
        assert_eq!(registry.kinds(), ProviderKind::PRIORITY.to_vec());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn blank_key_is_absent() {
        let config = ProvidersConfig {
            gemini: ProviderSettings::with_key("   "),
            ..ProvidersConfig::default()
        };
        assert!(ProviderRegistry::from_config(&config, T).is_empty());
    }
}
