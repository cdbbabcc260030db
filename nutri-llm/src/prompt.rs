//! Prompt templates for the advisory capabilities.
//!
//! Built-in templates are compiled in. A directory of versioned TOML files
//! (`prompts/v1/*.toml`) can override any of them at startup.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::LlmError;

/// Chat persona. Profile fields are interpolated.
pub const CHAT_SYSTEM: &str = r"You are a personal AI dietitian and nutrition assistant.

USER PROFILE:
- Goal: {goal} ({goal_text})
- Weight: {weight} kg
- Height: {height} cm
- Age: {age} years
- Gender: {gender}
- Activity level: {activity_level}
- Calorie target: {goal_calories} kcal/day
- Protein target: {goal_protein} g/day
- Dietary preference: {dietary_preference}

YOUR ROLE:
- Answer questions about nutrition
- Help plan the diet
- Give concrete product recommendations
- Take the user's goals and profile into account
- Be friendly and professional
- Give concrete, practical advice";

/// Chat turn: recent history followed by the new message.
pub const CHAT_USER: &str = "{history}\nUser: {message}\nAssistant:";

/// Behavior analysis persona.
pub const ANALYSIS_SYSTEM: &str =
    "You are an expert dietitian. Analyze objectively and give concrete recommendations.";

/// Behavior analysis request.
pub const ANALYSIS_USER: &str = r#"Analyze the user's eating data for the last 7 days.

PROFILE:
- Goal: {goal_text}
- Calorie target: {goal_calories} kcal/day
- Protein target: {goal_protein} g/day

EATING DATA:
{meals_json}

Return ONLY JSON:
{{
    "patterns": ["positive pattern 1", "positive pattern 2"],
    "issues": ["issue 1 with numbers", "issue 2"],
    "recommendations": ["recommendation 1", "recommendation 2"],
    "summary": "Short summary (2-3 sentences)"
}}"#;

/// Meal plan persona.
pub const MEAL_PLAN_SYSTEM: &str = "You are an expert dietitian. Create practical meal plans.";

/// Meal plan request.
pub const MEAL_PLAN_USER: &str = r#"Create a {days}-day meal plan with SPECIFIC foods and quantities.

REQUIREMENTS:
- Calories: {calories} kcal/day
- Protein: {protein} g
- Carbohydrates: {carbs} g
- Fat: {fat} g
{dietary_preference}{foods_context}

Return ONLY JSON:
{{
    "days": [
        {{
            "day_number": 1,
            "breakfast": {{"foods": [{{"name": "Oatmeal", "quantity_grams": 100}}], "total": {{"calories": 389}}}},
            "lunch": {{...}},
            "dinner": {{...}},
            "snacks": {{...}},
            "day_total": {{"calories": 2000, "protein": 150, "carbs": 200, "fat": 65}}
        }}
    ]
}}"#;

/// Simple template interpolation for prompts.
///
/// One left-to-right pass: `{{` / `}}` become literal braces, `{key}` is
/// replaced with its value, unknown placeholders stay as written. Inserted
/// values are never rescanned.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
            continue;
        }
        if let Some(end) = tail.find('}').filter(|_| tail.starts_with('{')) {
            let key = &tail[1..end];
            if let Some((_, value)) = vars.iter().find(|(k, _)| *k == key) {
                out.push_str(value);
                rest = &tail[end + 1..];
                continue;
            }
        }
        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// PromptEngine: built-ins plus versioned TOML overrides
// ---------------------------------------------------------------------------

/// Identifies a prompt template by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Conversational advice.
    Chat,
    /// Eating behavior analysis.
    BehaviorAnalysis,
    /// Meal plan generation.
    MealPlan,
}

impl PromptId {
    /// All prompt IDs.
    pub const ALL: [PromptId; 3] = [Self::Chat, Self::BehaviorAnalysis, Self::MealPlan];

    /// TOML filename (without path) for this prompt.
    #[must_use]
    pub fn filename(self) -> &'static str {
        match self {
            Self::Chat => "chat.toml",
            Self::BehaviorAnalysis => "behavior_analysis.toml",
            Self::MealPlan => "meal_plan.toml",
        }
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chat => "chat",
            Self::BehaviorAnalysis => "behavior_analysis",
            Self::MealPlan => "meal_plan",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "behavior_analysis" => Ok(Self::BehaviorAnalysis),
            "meal_plan" => Ok(Self::MealPlan),
            _ => Err(format!("unknown prompt id: '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: TomlPromptData,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlPromptData {
    version: String,
    system: String,
    user: String,
}

/// A loaded, ready-to-render prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Version string ("builtin" for compiled-in templates).
    pub version: String,
    /// System instructions (contains `{key}` placeholders).
    pub system: String,
    /// User prompt (contains `{key}` placeholders).
    pub user: String,
}

impl PromptTemplate {
    fn builtin(system: &str, user: &str) -> Self {
        Self {
            version: "builtin".into(),
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Holds one template per [`PromptId`] and renders them.
#[derive(Debug, Clone)]
pub struct PromptEngine {
    templates: HashMap<PromptId, PromptTemplate>,
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptEngine {
    /// The compiled-in templates. Needs no files on disk.
    #[must_use]
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(PromptId::Chat, PromptTemplate::builtin(CHAT_SYSTEM, CHAT_USER));
        templates.insert(
            PromptId::BehaviorAnalysis,
            PromptTemplate::builtin(ANALYSIS_SYSTEM, ANALYSIS_USER),
        );
        templates.insert(
            PromptId::MealPlan,
            PromptTemplate::builtin(MEAL_PLAN_SYSTEM, MEAL_PLAN_USER),
        );
        Self { templates }
    }

    /// Built-ins, with any TOML file found in `dir` replacing its template.
    ///
    /// Files that do not match a [`PromptId`] filename are ignored.
    ///
    /// # Errors
    ///
    /// `ConfigError` if a matching file cannot be read or parsed.
    pub fn with_overrides(dir: impl AsRef<Path>) -> Result<Self, LlmError> {
        let dir = dir.as_ref();
        let mut engine = Self::builtin();

        for id in PromptId::ALL {
            let path = dir.join(id.filename());
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|e| {
                LlmError::ConfigError(format!("failed to read {}: {e}", path.display()))
            })?;
            let parsed: TomlPromptFile = toml::from_str(&content).map_err(|e| {
                LlmError::ConfigError(format!("failed to parse {}: {e}", path.display()))
            })?;
            let d = parsed.prompt;
            tracing::debug!(prompt = %id, version = %d.version, "prompt override loaded");
            engine.templates.insert(
                id,
                PromptTemplate {
                    version: d.version,
                    system: d.system,
                    user: d.user,
                },
            );
        }

        Ok(engine)
    }

    /// Get a template by ID.
    #[must_use]
    pub fn get(&self, id: PromptId) -> Option<&PromptTemplate> {
        self.templates.get(&id)
    }

    /// Render `(system, user)` for a given ID.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the ID is not loaded.
    pub fn render(&self, id: PromptId, vars: &[(&str, &str)]) -> Result<(String, String), LlmError> {
        let tpl = self
            .get(id)
            .ok_or_else(|| LlmError::ConfigError(format!("prompt template '{id}' not loaded")))?;
        Ok((render_template(&tpl.system, vars), render_template(&tpl.user, vars)))
    }
}
