//! Rule-based eating behavior analysis.
//!
//! Meals are grouped by calendar day and three checks run over the days:
//!
//! - **Breakfast adherence**: share of days with a breakfast entry. Below
//!   [`BREAKFAST_ADHERENCE_PERCENT`] it is an issue, otherwise a positive pattern.
//! - **Calorie overage**: days whose total exceeds the target by more than
//!   [`CALORIE_OVERAGE_FACTOR`]. Only checked when a calorie target exists.
//! - **Protein shortfall**: days whose protein is below
//!   [`PROTEIN_SHORTFALL_FACTOR`] of the target. Only checked when a protein
//!   target exists.
//!
//! AI output is merged into this result, never substituted for it; see
//! [`BehaviorAnalysis::merge`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{MealRecord, MealType, UserProfile};

/// Minimum share of days (percent) with breakfast to count as a habit.
pub const BREAKFAST_ADHERENCE_PERCENT: f64 = 70.0;
/// A day counts as over target above `goal_calories × CALORIE_OVERAGE_FACTOR`.
pub const CALORIE_OVERAGE_FACTOR: f64 = 1.1;
/// A day counts as low on protein below `goal_protein × PROTEIN_SHORTFALL_FACTOR`.
pub const PROTEIN_SHORTFALL_FACTOR: f64 = 0.7;

/// Issue text returned when there are no meals at all.
pub const INSUFFICIENT_DATA_ISSUE: &str =
    "Insufficient data for analysis. Log your meals for the last 7 days.";
/// Summary returned when there are no meals at all.
pub const INSUFFICIENT_DATA_SUMMARY: &str = "Insufficient data for analysis.";

/// Result of a behavior analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorAnalysis {
    /// Positive habits.
    pub patterns: Vec<String>,
    /// Problems, with numbers where possible.
    pub issues: Vec<String>,
    /// Actionable advice.
    pub recommendations: Vec<String>,
    /// Short summary sentence(s).
    pub summary: String,
    /// Whether a provider contributed to this result.
    #[serde(default)]
    pub ai_enhanced: bool,
}

/// Structured analysis extracted from a provider response.
///
/// Every field is optional so a partial object still merges.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisOverlay {
    /// Extra positive habits.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Extra issues.
    #[serde(default)]
    pub issues: Vec<String>,
    /// Extra recommendations.
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Replacement summary.
    #[serde(default)]
    pub summary: Option<String>,
}

impl AnalysisOverlay {
    /// True when merging would add nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
            && self.issues.is_empty()
            && self.recommendations.is_empty()
            && self.summary.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

impl BehaviorAnalysis {
    /// The fixed result for an empty meal history.
    #[must_use]
    pub fn insufficient_data() -> Self {
        Self {
            patterns: Vec::new(),
            issues: vec![INSUFFICIENT_DATA_ISSUE.to_string()],
            recommendations: vec!["Start logging your meals in the diary.".to_string()],
            summary: INSUFFICIENT_DATA_SUMMARY.to_string(),
            ai_enhanced: false,
        }
    }

    /// Merge provider output into this rule-based result.
    ///
    /// Lists are concatenated (rule entries first), the summary is taken from
    /// the overlay when it has a non-blank one, and the result is marked
    /// `ai_enhanced`.
    #[must_use]
    pub fn merge(mut self, overlay: AnalysisOverlay) -> Self {
        self.patterns.extend(overlay.patterns);
        self.issues.extend(overlay.issues);
        self.recommendations.extend(overlay.recommendations);
        if let Some(summary) = overlay.summary.filter(|s| !s.trim().is_empty()) {
            self.summary = summary;
        }
        self.ai_enhanced = true;
        self
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    calories: f64,
    protein: f64,
}

/// Analyze a meal history against the profile's targets.
#[must_use]
pub fn analyze(meals: &[MealRecord], profile: &UserProfile) -> BehaviorAnalysis {
    if meals.is_empty() {
        return BehaviorAnalysis::insufficient_data();
    }

    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    let mut breakfast_days: BTreeSet<NaiveDate> = BTreeSet::new();
    for meal in meals {
        let day = days.entry(meal.date).or_default();
        day.calories += meal.calories;
        day.protein += meal.protein;
        if meal.meal_type == MealType::Breakfast {
            breakfast_days.insert(meal.date);
        }
    }

    let mut patterns = Vec::new();
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    let total_days = days.len();

    #[allow(clippy::cast_precision_loss)]
    let breakfast_rate = breakfast_days.len() as f64 / total_days as f64 * 100.0;
    if breakfast_rate < BREAKFAST_ADHERENCE_PERCENT {
        issues.push(format!(
            "Skipped breakfast: no breakfast logged on {:.0}% of days.",
            100.0 - breakfast_rate
        ));
        recommendations.push(
            "Try to eat breakfast every day. It gives you energy and helps control appetite."
                .to_string(),
        );
    } else {
        patterns.push("Regular breakfasts - a great habit!".to_string());
    }

    if let Some(goal) = profile.calorie_target() {
        let over = days
            .values()
            .filter(|d| d.calories > goal * CALORIE_OVERAGE_FACTOR)
            .count();
        if over > 0 {
            issues.push(format!(
                "Calorie overage: exceeded your target ({goal:.0} kcal) on {over} day(s)."
            ));
            recommendations.push(format!("Try to stay within {goal:.0} kcal a day."));
        }
    }

    if let Some(goal) = profile.protein_target() {
        let low = days
            .values()
            .filter(|d| d.protein < goal * PROTEIN_SHORTFALL_FACTOR)
            .count();
        if low > 0 {
            #[allow(clippy::cast_precision_loss)]
            let average = days.values().map(|d| d.protein).sum::<f64>() / total_days as f64;
            issues.push(format!(
                "Protein shortfall: protein below target ({goal:.0}g) on {low} day(s). \
                 Average intake: {average:.0}g."
            ));
            recommendations.push(format!("Increase your protein intake to {goal:.0}g a day."));
        }
    }

    if patterns.is_empty() && issues.is_empty() {
        patterns.push("Stable eating!".to_string());
    }

    let summary = summarize(total_days, issues.len(), patterns.len());
    BehaviorAnalysis {
        patterns,
        issues,
        recommendations,
        summary,
        ai_enhanced: false,
    }
}

fn summarize(days: usize, issues: usize, patterns: usize) -> String {
    let mut parts = vec![format!("Analyzed {days} days.")];
    if issues > 0 {
        parts.push(format!("Found {issues} problem patterns."));
    }
    if patterns > 0 {
        parts.push(format!("Identified {patterns} positive habits."));
    }
    parts.join(" ")
}
