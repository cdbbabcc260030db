//! Energy and macronutrient targets.
//!
//! Harris-Benedict BMR scaled by an activity multiplier gives TDEE; the goal
//! shifts it by 500 kcal and a fixed percentage split turns calories into
//! grams. The result feeds `UserProfile::goal_calories` / `goal_protein`.
//!
//! Called by the storage layer when a profile is saved (`age_on` for the
//! birthdate, `NutritionGoals::for_profile` for the targets); the advisory
//! capabilities only read the stored targets.

use chrono::{Datelike, NaiveDate};

use crate::error::{NutriError, Result};
use crate::types::{ActivityLevel, Gender, Goal, NutritionGoals, UserProfile};

/// Lowest daily calorie target ever produced.
pub const MIN_DAILY_CALORIES: f64 = 1200.0;

/// Daily deficit / surplus applied for weight loss / gain.
pub const GOAL_CALORIE_SHIFT: f64 = 500.0;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn bmr_male(weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age
}

fn bmr_female(weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age
}

/// Basal metabolic rate (kcal/day), Harris-Benedict.
///
/// `Gender::Other` averages the male and female equations.
#[must_use]
pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let age = f64::from(age);
    let value = match gender {
        Gender::Male => bmr_male(weight_kg, height_cm, age),
        Gender::Female => bmr_female(weight_kg, height_cm, age),
        Gender::Other => {
            (bmr_male(weight_kg, height_cm, age) + bmr_female(weight_kg, height_cm, age)) / 2.0
        }
    };
    round2(value)
}

/// TDEE multiplier for an activity level.
#[must_use]
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::VeryActive => 1.9,
    }
}

/// Total daily energy expenditure.
#[must_use]
pub fn tdee(bmr: f64, level: ActivityLevel) -> f64 {
    round2(bmr * activity_multiplier(level))
}

/// Daily calorie target for a goal, never below [`MIN_DAILY_CALORIES`].
#[must_use]
pub fn daily_calories(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    level: ActivityLevel,
    goal: Goal,
) -> f64 {
    let tdee = tdee(bmr(weight_kg, height_cm, age, gender), level);
    let target = match goal {
        Goal::WeightLoss => tdee - GOAL_CALORIE_SHIFT,
        Goal::WeightGain => tdee + GOAL_CALORIE_SHIFT,
        Goal::Maintenance => tdee,
    };
    round2(target).max(MIN_DAILY_CALORIES)
}

/// Macro grams for a calorie target.
///
/// Returns `(protein, carbs, fat)`. Weight loss shifts 5% of energy from
/// carbs to protein; other goals use 25/45/30.
#[must_use]
pub fn macros(daily_calories: f64, goal: Goal) -> (f64, f64, f64) {
    let (protein_share, carbs_share, fat_share) = match goal {
        Goal::WeightLoss => (0.30, 0.40, 0.30),
        Goal::WeightGain | Goal::Maintenance => (0.25, 0.45, 0.30),
    };
    (
        round2(daily_calories * protein_share / KCAL_PER_G_PROTEIN),
        round2(daily_calories * carbs_share / KCAL_PER_G_CARBS),
        round2(daily_calories * fat_share / KCAL_PER_G_FAT),
    )
}

/// Whole years between `birthdate` and `today`, or `None` for future dates.
#[must_use]
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

impl NutritionGoals {
    /// Derive daily goals from body measurements.
    ///
    /// A missing gender uses the averaged equation; a missing activity
    /// level counts as moderate.
    ///
    /// # Errors
    /// Returns `NutriError::InvalidInput` when weight, height or age is
    /// missing or not positive.
    pub fn for_profile(profile: &UserProfile) -> Result<Self> {
        let weight = positive(profile.weight_kg, "weight_kg")?;
        let height = positive(profile.height_cm, "height_cm")?;
        let age = profile
            .age
            .filter(|a| *a > 0)
            .ok_or_else(|| NutriError::InvalidInput {
                field: "age",
                reason: "missing or zero".to_string(),
            })?;

        let calories = daily_calories(
            weight,
            height,
            age,
            profile.gender.unwrap_or(Gender::Other),
            profile.activity_level.unwrap_or_default(),
            profile.goal,
        );
        let (protein, carbs, fat) = macros(calories, profile.goal);
        Ok(Self {
            daily_calories: calories,
            daily_protein: protein,
            daily_carbs: carbs,
            daily_fat: fat,
        })
    }
}

fn positive(value: Option<f64>, field: &'static str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(NutriError::InvalidInput {
            field,
            reason: format!("must be positive, got {v}"),
        }),
        None => Err(NutriError::InvalidInput {
            field,
            reason: "missing".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn male_bmr_matches_formula() {
        // 88.362 + 13.397*80 + 4.799*180 - 5.677*30
        assert!(approx(bmr(80.0, 180.0, 30, Gender::Male), 1853.63));
    }

    #[test]
    fn other_gender_averages() {
        let m = bmr(70.0, 170.0, 40, Gender::Male);
        let f = bmr(70.0, 170.0, 40, Gender::Female);
        let o = bmr(70.0, 170.0, 40, Gender::Other);
        assert!(approx(o, (m + f) / 2.0));
    }

    #[test]
    fn calorie_floor_applies() {
        let c = daily_calories(35.0, 140.0, 80, Gender::Female, ActivityLevel::Sedentary, Goal::WeightLoss);
        assert!(approx(c, MIN_DAILY_CALORIES));
    }

    #[test]
    fn goal_shifts_by_500() {
        let keep = daily_calories(80.0, 180.0, 30, Gender::Male, ActivityLevel::Moderate, Goal::Maintenance);
        let gain = daily_calories(80.0, 180.0, 30, Gender::Male, ActivityLevel::Moderate, Goal::WeightGain);
        assert!(approx(gain - keep, GOAL_CALORIE_SHIFT));
    }

    #[test]
    fn macro_split_for_weight_loss() {
        let (p, c, f) = macros(2000.0, Goal::WeightLoss);
        assert!(approx(p, 150.0));
        assert!(approx(c, 200.0));
        assert!(approx(f, 66.67));
    }

    #[test]
    fn age_counts_birthday() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).expect("date");
        let before = NaiveDate::from_ymd_opt(2024, 6, 14).expect("date");
        let on = NaiveDate::from_ymd_opt(2024, 6, 15).expect("date");
        assert_eq!(age_on(birth, before), Some(33));
        assert_eq!(age_on(birth, on), Some(34));
        assert_eq!(age_on(on, birth), None);
    }

    #[test]
    fn goals_require_measurements() {
        let profile = UserProfile {
            weight_kg: Some(80.0),
            ..UserProfile::default()
        };
        let err = NutritionGoals::for_profile(&profile).unwrap_err();
        assert!(matches!(err, NutriError::InvalidInput { field: "height_cm", .. }));
    }

    #[test]
    fn goals_from_full_profile() {
        let profile = UserProfile {
            goal: Goal::WeightLoss,
            weight_kg: Some(80.0),
            height_cm: Some(180.0),
            age: Some(30),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Moderate),
            ..UserProfile::default()
        };
        let goals = NutritionGoals::for_profile(&profile).expect("complete profile");
        // 1853.63 * 1.55 - 500
        assert!(approx(goals.daily_calories, 2373.13));
        assert!(approx(goals.daily_protein, round2(2373.13 * 0.30 / 4.0)));
    }
}
