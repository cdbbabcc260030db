//! # nutri-advisor — Advisory Façade
//!
//! The single entry point handlers call. [`AdvisoryService`] wires the
//! provider chain from `nutri-llm` to the rule engine from `nutri-core` and
//! guarantees every capability answers:
//!
//! | Capability            | Provider use                 | Without a provider answer |
//! |-----------------------|------------------------------|---------------------------|
//! | `chat`                | replaces the rule reply      | keyword-matched reply     |
//! | `analyze_behavior`    | merged into the rule result  | rule analysis             |
//! | `get_recommendations` | none                         | rule recommendations      |
//! | `generate_meal_plan`  | replaces the baseline        | baseline template         |
//!
//! Build the service once with [`AdvisoryService::from_config`] and share it
//! behind an `Arc`. [`telemetry::init`] sets up logging from the same config.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod request;
pub mod service;
pub mod telemetry;

pub use error::AdvisorError;
pub use request::{AdvisoryRequest, PromptBuilder};
pub use service::{APOLOGY, AdvisoryService, ChatReply, MealPlan, Provenance};
