//! # Nutri Core Library
//!
//! Network-free half of the nutrition advisor. Everything here is a pure
//! function of plain values handed over by the storage layer:
//!
//! - **Types**: user profile, meal records, daily goals and totals
//! - **Targets**: Harris-Benedict BMR, TDEE and macro split
//! - **Rules**: the deterministic engine behind every advisory capability:
//!   chat replies, behavior analysis, recommendations and a baseline meal plan
//!
//! The rule engine is always available. The LLM layer (`nutri-llm`) only
//! ever augments or replaces its output, so a caller with zero configured
//! providers still gets a complete answer.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod rules;
pub mod targets;
pub mod types;

pub use config::NutriConfig;
pub use error::NutriError;
pub use rules::analysis::BehaviorAnalysis;
pub use rules::meal_plan::DailyTemplate;
pub use types::*;
