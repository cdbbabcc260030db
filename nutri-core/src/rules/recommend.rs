//! Targeted recommendations for the rest of the day.

use crate::types::{NutritionGoals, NutritionTotals};

/// Calories left (or over) beyond which a calorie message is emitted.
pub const CALORIE_MARGIN_KCAL: f64 = 200.0;
/// Protein below `goal × PROTEIN_FLOOR_FACTOR` triggers a protein message.
pub const PROTEIN_FLOOR_FACTOR: f64 = 0.7;
/// Emitted when nothing needs attention.
pub const ENCOURAGEMENT: &str = "Keep following your goals!";

/// Compare today's totals with the daily goals.
///
/// Returns at most one calorie message followed by at most one protein
/// message, or the single [`ENCOURAGEMENT`] entry when neither fires. Goals
/// of zero or less disable their check.
#[must_use]
pub fn recommend(goals: &NutritionGoals, current: &NutritionTotals) -> Vec<String> {
    let mut out = Vec::with_capacity(2);

    if goals.daily_calories > 0.0 {
        let remaining = goals.daily_calories - current.calories;
        if remaining > CALORIE_MARGIN_KCAL {
            out.push(format!(
                "{remaining:.0} kcal remaining to reach your goal. Add a healthy snack."
            ));
        } else if remaining < -CALORIE_MARGIN_KCAL {
            out.push(format!(
                "Over your goal by {:.0} kcal. Make your next meal lighter.",
                remaining.abs()
            ));
        }
    }

    if goals.daily_protein > 0.0 && current.protein < goals.daily_protein * PROTEIN_FLOOR_FACTOR {
        let needed = goals.daily_protein - current.protein;
        out.push(format!(
            "{needed:.0}g of protein still needed. Add protein-rich foods."
        ));
    }

    if out.is_empty() {
        out.push(ENCOURAGEMENT.to_string());
    }
    out
}
