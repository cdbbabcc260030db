//! Advisory requests: capability, system instructions and rendered prompt.
//!
//! [`PromptBuilder`] turns structured context (profile, history, meals,
//! requirements) into the text sent down the provider chain.

use std::fmt::Write as _;
use std::time::Duration;

use nutri_core::config::OrchestrationConfig;
use nutri_core::types::{ChatRole, ChatTurn, MealPlanRequirements, MealRecord, UserProfile};
use nutri_llm::prompt::{PromptEngine, PromptId};
use nutri_llm::{Capability, CompletionRequest, LlmError};

const NOT_SPECIFIED: &str = "not specified";
const NOT_SET: &str = "not set";

/// One rendered request for a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryRequest {
    /// Capability served.
    pub capability: Capability,
    /// System instructions.
    pub system: String,
    /// User prompt.
    pub prompt: String,
}

impl AdvisoryRequest {
    /// The provider-level request with a per-call timeout.
    #[must_use]
    pub fn to_completion(&self, timeout: Duration) -> CompletionRequest {
        CompletionRequest::new(self.prompt.clone())
            .with_system(self.system.clone())
            .with_timeout(timeout)
    }
}

/// Renders advisory requests from structured context.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    prompts: PromptEngine,
    history_turns: usize,
    max_prompt_foods: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(PromptEngine::builtin(), &OrchestrationConfig::default())
    }
}

impl PromptBuilder {
    /// Create a builder over a prompt engine with the configured limits.
    #[must_use]
    pub fn new(prompts: PromptEngine, config: &OrchestrationConfig) -> Self {
        Self {
            prompts,
            history_turns: config.history_turns,
            max_prompt_foods: config.max_prompt_foods,
        }
    }

    /// Chat request: profile in the system text, the last turns of history
    /// and the new message in the prompt.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the chat template is not loaded.
    pub fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
        profile: &UserProfile,
    ) -> Result<AdvisoryRequest, LlmError> {
        let goal = profile.goal.to_string();
        let weight = opt_num(profile.weight_kg, NOT_SPECIFIED);
        let height = opt_num(profile.height_cm, NOT_SPECIFIED);
        let age = profile.age.map_or_else(|| NOT_SPECIFIED.to_string(), |a| a.to_string());
        let gender = profile.gender.map_or(NOT_SPECIFIED, |g| match g {
            nutri_core::Gender::Male => "M",
            nutri_core::Gender::Female => "F",
            nutri_core::Gender::Other => "Other",
        });
        let activity = profile.activity_level.unwrap_or_default().to_string();
        let goal_calories = opt_num(profile.goal_calories, NOT_SET);
        let goal_protein = opt_num(profile.goal_protein, NOT_SET);
        let preference = preference_or_none(profile.dietary_preference.as_deref());
        let history = self.format_history(history);

        let (system, prompt) = self.prompts.render(
            PromptId::Chat,
            &[
                ("goal", goal.as_str()),
                ("goal_text", profile.goal.describe()),
                ("weight", weight.as_str()),
                ("height", height.as_str()),
                ("age", age.as_str()),
                ("gender", gender),
                ("activity_level", activity.as_str()),
                ("goal_calories", goal_calories.as_str()),
                ("goal_protein", goal_protein.as_str()),
                ("dietary_preference", preference),
                ("history", history.as_str()),
                ("message", message.trim()),
            ],
        )?;

        Ok(AdvisoryRequest {
            capability: Capability::Chat,
            system,
            prompt,
        })
    }

    /// Behavior analysis request with the meal history as JSON.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the analysis template is not loaded.
    pub fn analysis(
        &self,
        meals: &[MealRecord],
        profile: &UserProfile,
    ) -> Result<AdvisoryRequest, LlmError> {
        let meals_json = serde_json::to_string_pretty(meals)
            .map_err(|e| LlmError::ParseError(e.to_string()))?;
        let goal_calories = opt_num(profile.goal_calories, NOT_SET);
        let goal_protein = opt_num(profile.goal_protein, NOT_SET);

        let (system, prompt) = self.prompts.render(
            PromptId::BehaviorAnalysis,
            &[
                ("goal_text", profile.goal.describe()),
                ("goal_calories", goal_calories.as_str()),
                ("goal_protein", goal_protein.as_str()),
                ("meals_json", meals_json.as_str()),
            ],
        )?;

        Ok(AdvisoryRequest {
            capability: Capability::Analyze,
            system,
            prompt,
        })
    }

    /// Meal plan request listing at most `max_prompt_foods` available foods.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the meal plan template is not loaded.
    pub fn meal_plan(&self, requirements: &MealPlanRequirements) -> Result<AdvisoryRequest, LlmError> {
        let days = requirements.days.max(1).to_string();
        let calories = num(requirements.calories);
        let protein = num(requirements.protein);
        let carbs = num(requirements.carbs);
        let fat = num(requirements.fat);

        let preference = match preference_or_none(requirements.dietary_preference.as_deref()) {
            "none" => String::new(),
            p => format!("- Dietary preference: {p}"),
        };
        let foods_context = if requirements.available_foods.is_empty() {
            String::new()
        } else {
            let listed: Vec<&str> = requirements
                .available_foods
                .iter()
                .take(self.max_prompt_foods)
                .map(String::as_str)
                .collect();
            format!("\nAvailable foods: {}", listed.join(", "))
        };

        let (system, prompt) = self.prompts.render(
            PromptId::MealPlan,
            &[
                ("days", days.as_str()),
                ("calories", calories.as_str()),
                ("protein", protein.as_str()),
                ("carbs", carbs.as_str()),
                ("fat", fat.as_str()),
                ("dietary_preference", preference.as_str()),
                ("foods_context", foods_context.as_str()),
            ],
        )?;

        Ok(AdvisoryRequest {
            capability: Capability::Plan,
            system,
            prompt,
        })
    }

    fn format_history(&self, history: &[ChatTurn]) -> String {
        let skip = history.len().saturating_sub(self.history_turns);
        let mut out = String::new();
        for turn in &history[skip..] {
            let speaker = match turn.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            let _ = writeln!(out, "{speaker}: {}", turn.content);
        }
        out
    }
}

fn num(value: f64) -> String {
    format!("{value}")
}

fn opt_num(value: Option<f64>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), num)
}

fn preference_or_none(preference: Option<&str>) -> &str {
    match preference.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => "none",
    }
}
