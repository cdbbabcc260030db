//! Deterministic rule engine.
//!
//! One pure function per advisory capability. None of them touch the
//! network, the clock or any shared state, so they are the unconditional
//! fallback when every provider fails and the baseline that AI analysis is
//! merged into.
//!
//! | Capability | Entry point                  |
//! |------------|------------------------------|
//! | chat       | [`chat::reply`]              |
//! | analyze    | [`analysis::analyze`]        |
//! | recommend  | [`recommend::recommend`]     |
//! | plan       | [`meal_plan::baseline`]      |

pub mod analysis;
pub mod chat;
pub mod meal_plan;
pub mod recommend;

pub use analysis::{BehaviorAnalysis, analyze};
pub use chat::{Topic, reply};
pub use meal_plan::{DailyTemplate, baseline};
pub use recommend::recommend;
