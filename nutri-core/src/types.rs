//! Core type definitions for the nutrition advisor.
//!
//! These are plain values: the storage layer builds them from its records and
//! the API layer serializes whatever the advisor returns. Nothing here does I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// What the user is trying to achieve with their diet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Calorie deficit.
    WeightLoss,
    /// Calorie surplus.
    WeightGain,
    /// Hold current weight.
    #[default]
    Maintenance,
}

impl Goal {
    /// Short noun phrase used inside generated prose ("weight loss").
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight loss",
            Self::WeightGain => "weight gain",
            Self::Maintenance => "weight maintenance",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WeightLoss => "weight_loss",
            Self::WeightGain => "weight_gain",
            Self::Maintenance => "maintenance",
        };
        write!(f, "{name}")
    }
}

/// Biological sex as recorded in the profile (drives the BMR formula).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    #[serde(rename = "M")]
    Male,
    /// Female.
    #[serde(rename = "F")]
    Female,
    /// Anything else; formulas average the male and female variants.
    #[serde(rename = "Other")]
    Other,
}

/// Self-reported activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise.
    Sedentary,
    /// Light exercise 1-3 days/week.
    Light,
    /// Moderate exercise 3-5 days/week.
    #[default]
    Moderate,
    /// Hard exercise 6-7 days/week.
    Active,
    /// Very hard exercise or a physical job.
    VeryActive,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        };
        write!(f, "{name}")
    }
}

/// Everything the advisor knows about the user.
///
/// Every field except `goal` may be missing; the rule engine falls back to
/// generic advice when it has nothing to personalise with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Dietary goal.
    #[serde(default)]
    pub goal: Goal,
    /// Body weight in kilograms.
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Height in centimetres.
    #[serde(default)]
    pub height_cm: Option<f64>,
    /// Age in whole years.
    #[serde(default)]
    pub age: Option<u32>,
    /// Recorded sex.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Activity level.
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    /// Daily calorie target (kcal), if the user has one.
    #[serde(default)]
    pub goal_calories: Option<f64>,
    /// Daily protein target (g), if the user has one.
    #[serde(default)]
    pub goal_protein: Option<f64>,
    /// Free-form dietary preference ("vegetarian", "none", ...).
    #[serde(default)]
    pub dietary_preference: Option<String>,
}

impl UserProfile {
    /// Calorie target, ignoring zero or negative placeholders.
    #[must_use]
    pub fn calorie_target(&self) -> Option<f64> {
        self.goal_calories.filter(|c| *c > 0.0)
    }

    /// Protein target, ignoring zero or negative placeholders.
    #[must_use]
    pub fn protein_target(&self) -> Option<f64> {
        self.goal_protein.filter(|p| *p > 0.0)
    }
}

// ---------------------------------------------------------------------------
// Meals
// ---------------------------------------------------------------------------

/// Which slot of the day a meal was logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Morning meal.
    Breakfast,
    /// Midday meal.
    Lunch,
    /// Evening meal.
    Dinner,
    /// Anything in between.
    Snack,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        };
        write!(f, "{name}")
    }
}

/// One logged diary entry with its already-computed nutrient totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    /// Calendar day the meal belongs to.
    pub date: NaiveDate,
    /// Meal slot.
    pub meal_type: MealType,
    /// Food name, when known.
    #[serde(default)]
    pub food: Option<String>,
    /// Portion in grams, when known.
    #[serde(default)]
    pub quantity_grams: Option<f64>,
    /// Energy (kcal).
    pub calories: f64,
    /// Protein (g).
    pub protein: f64,
    /// Carbohydrates (g).
    pub carbs: f64,
    /// Fat (g).
    pub fat: f64,
}

impl MealRecord {
    /// Create a record without food name or portion.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        meal_type: MealType,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
    ) -> Self {
        Self {
            date,
            meal_type,
            food: None,
            quantity_grams: None,
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Attach a food name and portion.
    #[must_use]
    pub fn with_food(mut self, name: impl Into<String>, quantity_grams: f64) -> Self {
        self.food = Some(name.into());
        self.quantity_grams = Some(quantity_grams);
        self
    }
}

// ---------------------------------------------------------------------------
// Goals & totals
// ---------------------------------------------------------------------------

/// Daily nutrition targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    /// kcal per day.
    pub daily_calories: f64,
    /// Protein grams per day.
    pub daily_protein: f64,
    /// Carbohydrate grams per day.
    pub daily_carbs: f64,
    /// Fat grams per day.
    pub daily_fat: f64,
}

impl Default for NutritionGoals {
    /// Used when the user has never set goals.
    fn default() -> Self {
        Self {
            daily_calories: 2000.0,
            daily_protein: 150.0,
            daily_carbs: 200.0,
            daily_fat: 65.0,
        }
    }
}

/// Accumulated nutrients (typically "today so far").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    /// kcal.
    pub calories: f64,
    /// Protein grams.
    pub protein: f64,
    /// Carbohydrate grams.
    pub carbs: f64,
    /// Fat grams.
    pub fat: f64,
}

impl NutritionTotals {
    /// Sum the nutrients of a set of meals.
    #[must_use]
    pub fn from_meals<'a>(meals: impl IntoIterator<Item = &'a MealRecord>) -> Self {
        meals.into_iter().fold(Self::default(), |acc, m| Self {
            calories: acc.calories + m.calories,
            protein: acc.protein + m.protein,
            carbs: acc.carbs + m.carbs,
            fat: acc.fat + m.fat,
        })
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The human.
    User,
    /// The advisor.
    Assistant,
}

/// One previous message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who said it.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
}

impl ChatTurn {
    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Meal plan requirements
// ---------------------------------------------------------------------------

/// Inputs for meal plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRequirements {
    /// kcal per day.
    pub calories: f64,
    /// Protein grams per day.
    pub protein: f64,
    /// Carbohydrate grams per day.
    pub carbs: f64,
    /// Fat grams per day.
    pub fat: f64,
    /// Food names the plan should prefer (from the food catalogue).
    #[serde(default)]
    pub available_foods: Vec<String>,
    /// How many days to plan.
    pub days: u32,
    /// Dietary preference, if any.
    #[serde(default)]
    pub dietary_preference: Option<String>,
}

impl MealPlanRequirements {
    /// Requirements matching a set of daily goals.
    #[must_use]
    pub fn from_goals(goals: &NutritionGoals, days: u32) -> Self {
        Self {
            calories: goals.daily_calories,
            protein: goals.daily_protein,
            carbs: goals.daily_carbs,
            fat: goals.daily_fat,
            available_foods: Vec::new(),
            days,
            dietary_preference: None,
        }
    }
}

impl Default for MealPlanRequirements {
    fn default() -> Self {
        Self::from_goals(&NutritionGoals::default(), 7)
    }
}
