//! # nutri-llm — Provider Layer for the Nutrition Advisor
//!
//! Everything that talks to an external language model lives here:
//!   - **Adapters** for Anthropic, Gemini and `OpenAI`, one type each behind
//!     the [`ProviderAdapter`] trait
//!   - **Registry** holding the available adapters in fixed priority order
//!   - **Orchestrator** walking the registry with bounded retries
//!   - **Normalizer** turning raw model text into plain text or a JSON object
//!
//! Nothing in this crate ever surfaces a provider error to the end user.
//! When the whole chain comes up empty the orchestrator returns `None` and
//! the caller answers from the rule engine in `nutri-core`.
//!
//! # Flow
//!
//! ```text
//! CompletionRequest ─▶ Orchestrator ─▶ anthropic ─▶ gemini ─▶ openai
//!                          │            (≤ max_retries each, sequential)
//!                          ▼
//!                    Option<Completion> ─▶ Normalizer ─▶ text | JSON object
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod registry;
pub mod types;

pub use cache::ResponseCache;
pub use error::LlmError;
pub use normalize::{BraceSpanNormalizer, ExpectedShape, ExtractionError, Normalized, Normalizer};
pub use orchestrator::{Orchestrator, OrchestratorStats};
pub use provider::ProviderAdapter;
pub use registry::ProviderRegistry;
pub use types::{Capability, Completion, CompletionRequest, ProviderKind};
