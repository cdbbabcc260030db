//! Prompt Quality Evaluation — Golden Test Set.
//!
//! Curated template→expectation pairs checking that every advisory prompt
//! renders into a well-formed request: all placeholders resolved, profile
//! numbers present, and a JSON instruction wherever the answer is parsed.
//!
//! Run with `cargo test -p nutri-llm --test eval_golden`.

use nutri_llm::prompt::{self, PromptEngine, PromptId};

/// A golden test case for prompt evaluation.
struct GoldenCase {
    /// Human-readable name for the test case.
    name: &'static str,
    /// Which prompt template constant to use.
    template: &'static str,
    /// Template variables to fill in.
    vars: Vec<(&'static str, &'static str)>,
    /// Strings that MUST appear in the rendered prompt.
    prompt_must_contain: Vec<&'static str>,
    /// Strings that MUST NOT appear in the rendered prompt.
    prompt_must_not_contain: Vec<&'static str>,
}

fn chat_profile_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        ("goal", "weight_loss"),
        ("goal_text", "weight loss"),
        ("weight", "82"),
        ("height", "178"),
        ("age", "34"),
        ("gender", "M"),
        ("activity_level", "moderate"),
        ("goal_calories", "1900"),
        ("goal_protein", "140"),
        ("dietary_preference", "none"),
    ]
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        // ---------------------------------------------------------------
        // 1. Chat persona with a complete profile
        // ---------------------------------------------------------------
        GoldenCase {
            name: "chat_system_full_profile",
            template: prompt::CHAT_SYSTEM,
            vars: chat_profile_vars(),
            prompt_must_contain: vec!["weight loss", "82 kg", "1900 kcal/day", "140 g/day"],
            prompt_must_not_contain: vec!["{goal}", "{weight}", "{goal_calories}"],
        },
        GoldenCase {
            name: "chat_system_unknown_values",
            template: prompt::CHAT_SYSTEM,
            vars: vec![
                ("goal", "maintenance"),
                ("goal_text", "weight maintenance"),
                ("weight", "not specified"),
                ("height", "not specified"),
                ("age", "not specified"),
                ("gender", "not specified"),
                ("activity_level", "moderate"),
                ("goal_calories", "not set"),
                ("goal_protein", "not set"),
                ("dietary_preference", "none"),
            ],
            prompt_must_contain: vec!["weight maintenance", "not set kcal/day"],
            prompt_must_not_contain: vec!["{age}", "{gender}"],
        },
        // ---------------------------------------------------------------
        // 2. Chat turn with history
        // ---------------------------------------------------------------
        GoldenCase {
            name: "chat_user_with_history",
            template: prompt::CHAT_USER,
            vars: vec![
                ("history", "User: hi\nAssistant: Hello! How can I help?\n"),
                ("message", "what about dinner?"),
            ],
            prompt_must_contain: vec!["Assistant: Hello!", "User: what about dinner?", "\nAssistant:"],
            prompt_must_not_contain: vec!["{history}", "{message}"],
        },
        GoldenCase {
            name: "chat_user_without_history",
            template: prompt::CHAT_USER,
            vars: vec![("history", ""), ("message", "hello")],
            prompt_must_contain: vec!["User: hello"],
            prompt_must_not_contain: vec!["{history}"],
        },
        // ---------------------------------------------------------------
        // 3. Behavior analysis
        // ---------------------------------------------------------------
        GoldenCase {
            name: "analysis_with_targets",
            template: prompt::ANALYSIS_USER,
            vars: vec![
                ("goal_text", "weight gain"),
                ("goal_calories", "2800"),
                ("goal_protein", "160"),
                ("meals_json", "[{\"date\": \"2024-05-01\", \"meal_type\": \"breakfast\", \"calories\": 600.0}]"),
            ],
            prompt_must_contain: vec!["weight gain", "2800 kcal/day", "2024-05-01", "\"patterns\"", "\"summary\""],
            prompt_must_not_contain: vec!["{meals_json}", "{{"],
        },
        GoldenCase {
            name: "analysis_without_targets",
            template: prompt::ANALYSIS_USER,
            vars: vec![
                ("goal_text", "weight maintenance"),
                ("goal_calories", "not set"),
                ("goal_protein", "not set"),
                ("meals_json", "[]"),
            ],
            prompt_must_contain: vec!["not set kcal/day", "[]"],
            prompt_must_not_contain: vec!["{goal_text}"],
        },
        GoldenCase {
            name: "analysis_system",
            template: prompt::ANALYSIS_SYSTEM,
            vars: vec![],
            prompt_must_contain: vec!["dietitian"],
            prompt_must_not_contain: vec!["{"],
        },
        // ---------------------------------------------------------------
        // 4. Meal plan
        // ---------------------------------------------------------------
        GoldenCase {
            name: "meal_plan_week_with_foods",
            template: prompt::MEAL_PLAN_USER,
            vars: vec![
                ("days", "7"),
                ("calories", "2000"),
                ("protein", "150"),
                ("carbs", "200"),
                ("fat", "65"),
                ("dietary_preference", ""),
                ("foods_context", "\nAvailable foods: Oatmeal, Chicken Breast, Salmon"),
            ],
            prompt_must_contain: vec!["7-day meal plan", "2000 kcal/day", "Available foods: Oatmeal", "\"day_number\""],
            prompt_must_not_contain: vec!["{days}", "{foods_context}", "{{"],
        },
        GoldenCase {
            name: "meal_plan_vegetarian_three_days",
            template: prompt::MEAL_PLAN_USER,
            vars: vec![
                ("days", "3"),
                ("calories", "1600"),
                ("protein", "110"),
                ("carbs", "180"),
                ("fat", "50"),
                ("dietary_preference", "- Dietary preference: vegetarian"),
                ("foods_context", ""),
            ],
            prompt_must_contain: vec!["3-day meal plan", "vegetarian", "110 g"],
            prompt_must_not_contain: vec!["{dietary_preference}", "Available foods"],
        },
        GoldenCase {
            name: "meal_plan_system",
            template: prompt::MEAL_PLAN_SYSTEM,
            vars: vec![],
            prompt_must_contain: vec!["meal plans"],
            prompt_must_not_contain: vec!["{"],
        },
    ]
}

// ---------------------------------------------------------------------------
// Offline Tests — Template Rendering Validation
// ---------------------------------------------------------------------------

#[test]
fn golden_prompts_render_without_unresolved_vars() {
    for case in &golden_cases() {
        let rendered = prompt::render_template(case.template, &case.vars);

        for needle in &case.prompt_must_contain {
            assert!(
                rendered.contains(needle),
                "Golden case '{}': rendered prompt must contain '{}' but doesn't.\nRendered:\n{}",
                case.name,
                needle,
                &rendered[..rendered.len().min(500)]
            );
        }

        for needle in &case.prompt_must_not_contain {
            assert!(
                !rendered.contains(needle),
                "Golden case '{}': rendered prompt must NOT contain '{}' but does.\nRendered:\n{}",
                case.name,
                needle,
                &rendered[..rendered.len().min(500)]
            );
        }
    }
}

#[test]
fn golden_set_has_minimum_coverage() {
    let cases = golden_cases();
    assert!(
        cases.len() >= 10,
        "Golden set must have at least 10 test cases, got {}",
        cases.len()
    );
}

#[test]
fn structured_prompts_ask_for_json() {
    for (name, template) in [
        ("behavior_analysis", prompt::ANALYSIS_USER),
        ("meal_plan", prompt::MEAL_PLAN_USER),
    ] {
        assert!(template.contains("JSON"), "prompt '{name}' must ask for JSON output");
    }
}

#[test]
fn shipped_toml_prompts_match_builtins() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/v1");
    let shipped = PromptEngine::with_overrides(dir).expect("prompt files load");
    let builtin = PromptEngine::builtin();

    for id in PromptId::ALL {
        let a = shipped.get(id).expect("shipped");
        let b = builtin.get(id).expect("builtin");
        assert_eq!(a.system.trim(), b.system.trim(), "{id} system differs");
        assert_eq!(a.user.trim(), b.user.trim(), "{id} user differs");
    }
}
