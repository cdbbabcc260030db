//! Baseline single-day meal plan.
//!
//! A fixed three-meal template served verbatim whenever no provider produced
//! a usable plan. It does not look at the requirements.

use serde::{Deserialize, Serialize};

/// A food in a planned meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedFood {
    /// Food name.
    pub name: String,
    /// Grams, or pieces for countable foods.
    pub quantity: f64,
}

/// One meal of the template with its nutrient totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    /// Foods in the meal.
    pub foods: Vec<PlannedFood>,
    /// kcal.
    pub calories: f64,
    /// Protein grams.
    pub protein: f64,
    /// Carbohydrate grams.
    pub carbs: f64,
    /// Fat grams.
    pub fat: f64,
}

/// Nutrient totals for the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanTotal {
    /// kcal.
    pub calories: f64,
    /// Protein grams.
    pub protein: f64,
    /// Carbohydrate grams.
    pub carbs: f64,
    /// Fat grams.
    pub fat: f64,
}

/// The network-free baseline plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemplate {
    /// Breakfast.
    pub breakfast: PlannedMeal,
    /// Lunch.
    pub lunch: PlannedMeal,
    /// Dinner.
    pub dinner: PlannedMeal,
    /// Day totals.
    pub total: PlanTotal,
}

fn food(name: &str, quantity: f64) -> PlannedFood {
    PlannedFood {
        name: name.to_string(),
        quantity,
    }
}

/// The fixed baseline plan (1200 kcal, 92g protein).
#[must_use]
pub fn baseline() -> DailyTemplate {
    DailyTemplate {
        breakfast: PlannedMeal {
            foods: vec![food("Oatmeal", 100.0), food("Banana", 1.0)],
            calories: 350.0,
            protein: 12.0,
            carbs: 65.0,
            fat: 8.0,
        },
        lunch: PlannedMeal {
            foods: vec![food("Chicken Breast", 150.0), food("Brown Rice", 100.0)],
            calories: 450.0,
            protein: 45.0,
            carbs: 50.0,
            fat: 8.0,
        },
        dinner: PlannedMeal {
            foods: vec![food("Salmon", 150.0), food("Broccoli", 200.0)],
            calories: 400.0,
            protein: 35.0,
            carbs: 20.0,
            fat: 20.0,
        },
        total: PlanTotal {
            calories: 1200.0,
            protein: 92.0,
            carbs: 135.0,
            fat: 36.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_match_meals() {
        let plan = baseline();
        let meals = [&plan.breakfast, &plan.lunch, &plan.dinner];
        let sum = |f: fn(&PlannedMeal) -> f64| meals.iter().map(|m| f(m)).sum::<f64>();
        assert!((sum(|m| m.calories) - plan.total.calories).abs() < f64::EPSILON);
        assert!((sum(|m| m.protein) - plan.total.protein).abs() < f64::EPSILON);
        assert!((sum(|m| m.carbs) - plan.total.carbs).abs() < f64::EPSILON);
        assert!((sum(|m| m.fat) - plan.total.fat).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_meal_keys() {
        let json = serde_json::to_value(baseline()).expect("serializes");
        for key in ["breakfast", "lunch", "dinner", "total"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["breakfast"]["foods"][0]["name"], "Oatmeal");
    }
}
