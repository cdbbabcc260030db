//! The advisory service.
//!
//! Every capability first decides what the rule engine would say, then asks
//! the provider chain whether it can do better:
//!
//! - **chat**: a provider answer (fences stripped) replaces the rule reply.
//! - **analyze**: a provider JSON object is merged into the rule analysis.
//! - **recommend**: rules only.
//! - **plan**: a provider JSON object replaces the baseline template.
//!
//! Provider failures, timeouts and unparseable answers are logged and end in
//! the rule-engine result. Nothing here returns an error.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use nutri_core::rules::{self, analysis::AnalysisOverlay};
use nutri_core::types::{
    ChatRole, ChatTurn, MealPlanRequirements, MealRecord, NutritionGoals, NutritionTotals,
    UserProfile,
};
use nutri_core::{BehaviorAnalysis, DailyTemplate, NutriConfig};
use nutri_llm::cache::CacheStats;
use nutri_llm::prompt::PromptEngine;
use nutri_llm::{
    BraceSpanNormalizer, Capability, CompletionRequest, ExpectedShape, Normalizer, Orchestrator,
    ProviderRegistry, ResponseCache,
};

use crate::error::Result;
use crate::request::{AdvisoryRequest, PromptBuilder};

type Rendered = std::result::Result<AdvisoryRequest, nutri_llm::LlmError>;

/// Reply for an empty message.
pub const APOLOGY: &str =
    "Sorry, a technical error occurred. Try rephrasing your question or come back later.";

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Deterministic rule engine only.
    RuleBased,
    /// A provider contributed.
    AiEnhanced,
}

impl From<bool> for Provenance {
    fn from(ai_enhanced: bool) -> Self {
        if ai_enhanced { Self::AiEnhanced } else { Self::RuleBased }
    }
}

/// A chat answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// Reply text. Never empty.
    #[serde(rename = "response")]
    pub text: String,
    /// Always [`ChatRole::Assistant`].
    pub role: ChatRole,
    /// Whether a provider wrote it.
    pub provenance: Provenance,
}

impl ChatReply {
    fn new(text: String, provenance: Provenance) -> Self {
        Self {
            text,
            role: ChatRole::Assistant,
            provenance,
        }
    }
}

/// A meal plan: whatever a provider generated, or the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MealPlan {
    /// Provider-generated JSON object, passed through as-is.
    Generated(Map<String, Value>),
    /// Fixed baseline template.
    Baseline(DailyTemplate),
}

impl MealPlan {
    /// Where this plan came from.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        Provenance::from(matches!(self, Self::Generated(_)))
    }
}

/// Chat, analysis, recommendations and meal plans with guaranteed answers.
pub struct AdvisoryService {
    orchestrator: Orchestrator,
    normalizer: Box<dyn Normalizer>,
    prompts: PromptBuilder,
    cache: Option<ResponseCache>,
    timeout: Duration,
}

impl std::fmt::Debug for AdvisoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryService")
            .field("orchestrator", &self.orchestrator)
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AdvisoryService {
    /// Build the registry from configured credentials and wire everything up.
    ///
    /// # Errors
    ///
    /// Prompt overrides in `orchestration.prompts_dir` that fail to load.
    pub fn from_config(config: &NutriConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.orchestration.request_timeout_ms);
        let registry = ProviderRegistry::from_config(&config.providers, timeout);
        Self::with_registry(registry, config)
    }

    /// Wire up an explicit registry (alternative backends, tests).
    ///
    /// # Errors
    ///
    /// Prompt overrides in `orchestration.prompts_dir` that fail to load.
    pub fn with_registry(registry: ProviderRegistry, config: &NutriConfig) -> Result<Self> {
        let orchestration = &config.orchestration;
        let engine = match &orchestration.prompts_dir {
            Some(dir) => PromptEngine::with_overrides(dir)?,
            None => PromptEngine::builtin(),
        };
        let cache = config.cache.enabled.then(|| {
            ResponseCache::new(
                config.cache.max_entries,
                Duration::from_secs(config.cache.ttl_seconds),
            )
        });

        info!(
            providers = ?registry.kinds(),
            max_retries = orchestration.max_retries,
            cache = cache.is_some(),
            "advisory service ready"
        );

        Ok(Self {
            orchestrator: Orchestrator::new(Arc::new(registry), orchestration.max_retries),
            normalizer: Box::new(BraceSpanNormalizer),
            prompts: PromptBuilder::new(engine, orchestration),
            cache,
            timeout: Duration::from_millis(orchestration.request_timeout_ms),
        })
    }

    /// Replace the response normalizer.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Whether any provider is available.
    #[must_use]
    pub fn has_providers(&self) -> bool {
        self.orchestrator.has_providers()
    }

    /// The underlying orchestrator (for stats).
    #[must_use]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Cache statistics, when caching is enabled.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ResponseCache::stats)
    }

    // -----------------------------------------------------------------------
    // Capabilities
    // -----------------------------------------------------------------------

    /// Answer a chat message. Always returns a non-empty reply.
    pub async fn chat(&self, message: &str, history: &[ChatTurn], profile: &UserProfile) -> ChatReply {
        if message.trim().is_empty() {
            return ChatReply::new(APOLOGY.to_string(), Provenance::RuleBased);
        }

        if self.has_providers() {
            if let Some(text) = self.provider_text(self.prompts.chat(message, history, profile)).await {
                match self.normalizer.normalize(&text, ExpectedShape::PlainText) {
                    Ok(normalized) => {
                        if let Some(reply) = normalized.into_text() {
                            return ChatReply::new(reply, Provenance::AiEnhanced);
                        }
                    }
                    Err(e) => warn!(error = %e, "chat answer unusable, using rule reply"),
                }
            }
        }

        ChatReply::new(rules::reply(message, profile), Provenance::RuleBased)
    }

    /// Analyze eating behavior. Provider output is merged into the rule
    /// analysis; with no providers the rule analysis is returned unchanged.
    pub async fn analyze_behavior(&self, meals: &[MealRecord], profile: &UserProfile) -> BehaviorAnalysis {
        let base = rules::analyze(meals, profile);
        if !self.has_providers() {
            return base;
        }

        let Some(object) = self.structured(self.prompts.analysis(meals, profile)).await else {
            return base;
        };

        match serde_json::from_value::<AnalysisOverlay>(Value::Object(object)) {
            Ok(overlay) if overlay.is_empty() => {
                debug!("analysis object carried nothing to merge");
                base
            }
            Ok(overlay) => base.merge(overlay),
            Err(e) => {
                warn!(error = %e, "analysis object has the wrong shape, using rule analysis");
                base
            }
        }
    }

    /// Recommendations for the rest of the day. Rules only.
    #[must_use]
    pub fn get_recommendations(&self, goals: &NutritionGoals, current: &NutritionTotals) -> Vec<String> {
        rules::recommend(goals, current)
    }

    /// Generate a meal plan, or return the baseline template.
    pub async fn generate_meal_plan(&self, requirements: &MealPlanRequirements) -> MealPlan {
        if self.has_providers() {
            if let Some(object) = self.structured(self.prompts.meal_plan(requirements)).await {
                return MealPlan::Generated(object);
            }
        }
        MealPlan::Baseline(rules::baseline())
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn build(&self, rendered: Rendered) -> Option<(Capability, CompletionRequest)> {
        match rendered {
            Ok(r) => Some((r.capability, r.to_completion(self.timeout))),
            Err(e) => {
                warn!(error = %e, "could not render prompt");
                None
            }
        }
    }

    async fn provider_text(&self, rendered: Rendered) -> Option<String> {
        let (_, request) = self.build(rendered)?;
        self.orchestrator.complete(&request).await.map(|c| c.text)
    }

    /// Cached or fresh provider text, extracted as a JSON object.
    ///
    /// Only text that extracted cleanly is cached.
    async fn structured(&self, rendered: Rendered) -> Option<Map<String, Value>> {
        let (capability, request) = self.build(rendered)?;
        let key = ResponseCache::key(capability, &request);

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(key)) {
            debug!(%capability, "serving cached provider answer");
            if let Some(object) = self.extract(&cached) {
                return Some(object);
            }
        }

        let completion = self.orchestrator.complete(&request).await?;
        let object = self.extract(&completion.text)?;
        if let Some(cache) = &self.cache {
            cache.insert(key, completion.text);
        }
        Some(object)
    }

    fn extract(&self, text: &str) -> Option<Map<String, Value>> {
        match self.normalizer.normalize(text, ExpectedShape::JsonObject) {
            Ok(normalized) => normalized.into_object(),
            Err(e) => {
                warn!(error = %e, "structured answer unusable, falling back to rules");
                None
            }
        }
    }
}
