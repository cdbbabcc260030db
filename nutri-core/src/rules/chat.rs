//! Rule-based chat replies.
//!
//! The lowercased message is matched against a fixed topic table. Topics are
//! checked in [`Topic::ALL`] order and the first hit wins; a message that
//! matches nothing gets the generic suggestions reply. Replies are templates
//! filled with the user's targets and body weight when the profile has them.
//!
//! Keywords are English and Russian. A keyword is either a *stem*, which
//! must start at a word boundary ("calori" matches "calories"), or a *word*,
//! which must also end at one ("hi" does not match "this" or "high").

use std::fmt::Write as _;

use crate::types::{Goal, UserProfile};

/// Protein estimate per kg of body weight when no target is set.
const PROTEIN_G_PER_KG: f64 = 1.5;
/// Protein estimate when neither a target nor a weight is known.
const DEFAULT_PROTEIN_G: f64 = 150.0;
/// Water recommendation per kg of body weight.
const WATER_ML_PER_KG: f64 = 35.0;
/// Water recommendation when the weight is unknown.
const DEFAULT_WATER_ML: f64 = 2000.0;

/// Conversation topics recognised by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Hello / hi.
    Greeting,
    /// Calorie targets.
    Calories,
    /// Protein targets.
    Protein,
    /// Losing weight.
    WeightLoss,
    /// Gaining weight.
    WeightGain,
    /// What to eat.
    Foods,
    /// Meal planning.
    MealPlan,
    /// Macronutrient split.
    Macros,
    /// Breakfast ideas.
    Breakfast,
    /// Dinner ideas.
    Dinner,
    /// Hydration.
    Water,
    /// Filling in the profile.
    Profile,
    /// Meal timing.
    Timing,
    /// Snack ideas.
    Snacks,
}

struct Keywords {
    stems: &'static [&'static str],
    words: &'static [&'static str],
}

impl Topic {
    /// Every topic, in matching priority order.
    pub const ALL: [Topic; 14] = [
        Topic::Greeting,
        Topic::Calories,
        Topic::Protein,
        Topic::WeightLoss,
        Topic::WeightGain,
        Topic::Foods,
        Topic::MealPlan,
        Topic::Macros,
        Topic::Breakfast,
        Topic::Dinner,
        Topic::Water,
        Topic::Profile,
        Topic::Timing,
        Topic::Snacks,
    ];

    fn keywords(self) -> Keywords {
        match self {
            Self::Greeting => Keywords {
                stems: &["hello", "good morning", "good afternoon", "good evening", "здравствуй", "добрый", "привет"],
                words: &["hi", "hey", "здарова"],
            },
            Self::Calories => Keywords {
                stems: &["calori", "kcal", "energy", "калори", "ккал", "энерг"],
                words: &[],
            },
            Self::Protein => Keywords {
                stems: &["protein", "белок", "протеин"],
                words: &[],
            },
            Self::WeightLoss => Keywords {
                stems: &["weight loss", "lose weight", "losing weight", "slim", "fat loss", "похуд", "сброс", "снизить вес"],
                words: &[],
            },
            Self::WeightGain => Keywords {
                stems: &["weight gain", "gain weight", "gaining weight", "bulk", "набор", "набрать", "увеличить вес", "поправиться"],
                words: &[],
            },
            Self::Foods => Keywords {
                stems: &["food", "product", "what to eat", "what should i eat", "продукт", "еда", "что есть", "что кушать", "кушать", "питани"],
                words: &[],
            },
            Self::MealPlan => Keywords {
                stems: &["meal plan", "plan", "menu", "план", "меню", "рацион", "расписани"],
                words: &[],
            },
            Self::Macros => Keywords {
                stems: &["macro", "бжу", "макро", "белки жиры углеводы"],
                words: &[],
            },
            Self::Breakfast => Keywords {
                stems: &["breakfast", "morning", "завтрак", "утром"],
                words: &[],
            },
            Self::Dinner => Keywords {
                stems: &["dinner", "supper", "evening", "ужин", "вечер"],
                words: &[],
            },
            Self::Water => Keywords {
                stems: &["water", "hydrat", "drink", "вода", "воды", "пить"],
                words: &[],
            },
            Self::Profile => Keywords {
                stems: &["profile", "settings", "my data", "профил", "настройк", "данные"],
                words: &[],
            },
            Self::Timing => Keywords {
                stems: &["when", "time", "schedule", "когда", "время"],
                words: &[],
            },
            Self::Snacks => Keywords {
                stems: &["snack", "перекус"],
                words: &[],
            },
        }
    }

    /// First topic whose keywords occur in `message`.
    #[must_use]
    pub fn classify(message: &str) -> Option<Topic> {
        let lowered = message.to_lowercase();
        Self::ALL.into_iter().find(|topic| {
            let kw = topic.keywords();
            kw.stems.iter().any(|s| contains_at_word_start(&lowered, s, false))
                || kw.words.iter().any(|w| contains_at_word_start(&lowered, w, true))
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `needle` occurs in `haystack` starting at a word boundary,
/// and (for whole words) also ending at one.
fn contains_at_word_start(haystack: &str, needle: &str, whole_word: bool) -> bool {
    haystack.match_indices(needle).any(|(idx, _)| {
        let starts = haystack[..idx].chars().next_back().is_none_or(|c| !is_word_char(c));
        let ends = !whole_word
            || haystack[idx + needle.len()..]
                .chars()
                .next()
                .is_none_or(|c| !is_word_char(c));
        starts && ends
    })
}

/// Produce a rule-based reply to `message`.
///
/// Never returns an empty string.
#[must_use]
pub fn reply(message: &str, profile: &UserProfile) -> String {
    match Topic::classify(message) {
        Some(topic) => topic_reply(topic, profile),
        None => generic_reply(),
    }
}

fn topic_reply(topic: Topic, profile: &UserProfile) -> String {
    let calories = profile.calorie_target();
    let protein = profile.protein_target();

    match topic {
        Topic::Greeting => "Hi! I'm your personal nutrition assistant. I can answer questions about \
             food, help you plan your meals and give advice based on your goals."
            .to_string(),

        Topic::Calories => match calories {
            Some(kcal) => format!(
                "Your daily calorie target is {kcal:.0} kcal. It is calculated for {} from \
                 your profile. Try to stay close to it by logging your meals in the diary.",
                profile.goal.describe()
            ),
            None => "To calculate your calorie target, fill in your profile (height, weight, age, \
                     sex, goal and activity level). Then I can give you precise numbers."
                .to_string(),
        },

        Topic::Protein => match protein {
            Some(grams) => format!(
                "Your daily protein target is {grams:.0}g. Protein supports muscle, recovery and \
                 satiety. Good sources: chicken, fish, eggs, cottage cheese, legumes, nuts."
            ),
            None => {
                let estimate = profile
                    .weight_kg
                    .filter(|w| *w > 0.0)
                    .map_or(DEFAULT_PROTEIN_G, |w| (w * PROTEIN_G_PER_KG).trunc());
                format!(
                    "Fill in your profile to get a personal protein target. Active people usually \
                     need 1.5-2g of protein per kg of body weight, so you need roughly \
                     {estimate:.0}g of protein a day."
                )
            }
        },

        Topic::WeightLoss => {
            if profile.goal == Goal::WeightLoss {
                let mut advice = String::from(
                    "To lose weight:\n\n\
                     1. Keep a calorie deficit (eat less than you burn)\n\
                     2. Eat more protein (it protects muscle)\n\
                     3. Add physical activity\n\
                     4. Eat regularly, don't skip meals\n\
                     5. Drink enough water (30-35ml per kg of body weight)\n",
                );
                if let Some(kcal) = calories {
                    let _ = write!(advice, "\nYour target: {kcal:.0} kcal/day. Try not to exceed it.");
                }
                advice
            } else {
                "To lose weight you need a calorie deficit. Set your goal to 'weight loss' in your \
                 profile and I will calculate your calorie target."
                    .to_string()
            }
        }

        Topic::WeightGain => {
            if profile.goal == Goal::WeightGain {
                let mut advice = String::from(
                    "To gain weight:\n\n\
                     1. Keep a calorie surplus (eat more than you burn)\n\
                     2. Eat more protein for muscle growth (2g per kg of body weight)\n\
                     3. Do strength training\n\
                     4. Eat regularly and enough\n\
                     5. Add healthy calories (nuts, avocado, whole grains)\n",
                );
                if let Some(kcal) = calories {
                    let _ = write!(advice, "\nYour target: {kcal:.0} kcal/day. Try to reach it every day.");
                }
                advice
            } else {
                "To gain weight you need a calorie surplus. Set your goal to 'weight gain' in your \
                 profile and I will calculate your calorie target."
                    .to_string()
            }
        }

        Topic::Foods => {
            let purpose = match profile.goal {
                Goal::WeightLoss => "weight loss",
                Goal::WeightGain => "weight gain",
                Goal::Maintenance => "healthy eating",
            };
            format!(
                "For {purpose} I recommend:\n\n\
                 Protein: chicken, turkey, fish, eggs, cottage cheese, Greek yogurt, legumes\n\
                 Carbs: oatmeal, rice, buckwheat, potatoes, whole-grain bread, fruit\n\
                 Fats: avocado, nuts, olive oil, oily fish\n\
                 Vegetables: any (low in calories, rich in fibre)\n\n\
                 Aim for variety and balance!"
            )
        }

        Topic::MealPlan => "I can build a personal meal plan for you! Open the 'Meal Plan' tab and \
             press 'Generate Meal Plan'. The plan takes your goals and preferences into account."
            .to_string(),

        Topic::Macros => match (calories, protein) {
            (Some(kcal), Some(grams)) => format!(
                "Your macro targets:\n- Calories: {kcal:.0} kcal/day\n- Protein: {grams:.0}g/day\n\n\
                 These are calculated for you. Track them in your food diary."
            ),
            _ => "Macros are protein, fat and carbohydrates, the main nutrients in food. Fill in \
                  your profile and I will calculate your personal targets."
                .to_string(),
        },

        Topic::Breakfast => "Breakfast is an important meal! Try:\n\
             - Oatmeal with fruit and nuts\n\
             - Eggs with vegetables\n\
             - Cottage cheese with berries\n\
             - Greek yogurt with muesli\n\n\
             Breakfast gives you energy for the day and helps control appetite."
            .to_string(),

        Topic::Dinner => "For dinner choose:\n\
             - Light protein (chicken, fish, cottage cheese)\n\
             - Vegetables (salad, stewed vegetables)\n\
             - Avoid heavy carbs before bed\n\n\
             Have dinner 2-3 hours before sleep."
            .to_string(),

        Topic::Water => {
            let ml = profile
                .weight_kg
                .filter(|w| *w > 0.0)
                .map_or(DEFAULT_WATER_ML, |w| (w * WATER_ML_PER_KG).trunc());
            format!(
                "Water matters! Recommended:\n\
                 - {ml:.0}ml a day (30-35ml per kg of body weight)\n\
                 - Drink regularly through the day\n\
                 - More when you exercise\n\
                 - Water supports metabolism and appetite control"
            )
        }

        Topic::Profile => "Fill in your profile under Settings → Profile: height, weight, age, sex, \
             date of birth, goal and activity level. Then my advice can take your data into account."
            .to_string(),

        Topic::Timing => "Recommended meal times:\n\
             - Breakfast: 7-9 am\n\
             - Lunch: 12-2 pm\n\
             - Dinner: 6-8 pm\n\
             - Snacks: between main meals\n\n\
             Eating every 3-4 hours keeps your energy stable."
            .to_string(),

        Topic::Snacks => "Healthy snacks:\n\
             - Fruit with nuts\n\
             - Greek yogurt\n\
             - Vegetables with hummus\n\
             - Cottage cheese\n\
             - Apple with peanut butter\n\n\
             Snacks help control appetite and keep your metabolism going."
            .to_string(),
    }
}

const SUGGESTIONS: [&str; 5] = [
    "What is my calorie target?",
    "What foods should I eat?",
    "How do I lose weight?",
    "How much protein do I need?",
    "Make me a meal plan",
];

fn generic_reply() -> String {
    let mut text = String::from(
        "Good question! I can help with:\n\
         - Calorie and macro targets\n\
         - Food recommendations\n\
         - Meal planning\n\
         - General nutrition advice\n\n\
         Try asking:\n",
    );
    for suggestion in &SUGGESTIONS[..3] {
        let _ = writeln!(text, "- {suggestion}");
    }
    text.push_str("\nOr fill in your profile for personal recommendations.");
    text
}
