//! Fallback Orchestrator: walks the provider chain with bounded retries.
//!
//! Per call the orchestrator runs a small state machine:
//!
//! ```text
//!  NEXT_PROVIDER ──▶ ATTEMPT ──ok──▶ SUCCESS ──▶ DONE(Some)
//!       ▲              │
//!       │            error
//!       │              ▼
//!       └── retries ── RETRY (attempt < max_retries) ──▶ ATTEMPT
//!           exhausted
//!
//!  no providers left ──▶ DONE(None)
//! ```
//!
//! Providers are tried strictly in registry order and never raced. The
//! first non-blank answer wins and no further provider is contacted.
//! Failures are logged and kept in an [`OrchestrationTrace`] for
//! diagnostics; they are never returned to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::LlmError;
use crate::registry::ProviderRegistry;
use crate::types::{Completion, CompletionRequest, ProviderKind, millis};

/// Default attempts per provider.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// One failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// Provider that failed.
    pub provider: ProviderKind,
    /// 1-based attempt number for this provider.
    pub attempt: u32,
    /// Error text.
    pub error: String,
}

/// Everything that happened during one orchestrated call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrchestrationTrace {
    /// Failed attempts in the order they happened.
    pub failures: Vec<AttemptFailure>,
    /// Provider that produced the answer, if any.
    pub succeeded_with: Option<ProviderKind>,
}

impl OrchestrationTrace {
    /// Total attempts made, including the successful one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        let failed = u32::try_from(self.failures.len()).unwrap_or(u32::MAX);
        failed.saturating_add(u32::from(self.succeeded_with.is_some()))
    }

    /// Providers contacted, in order, without duplicates.
    #[must_use]
    pub fn providers_tried(&self) -> Vec<ProviderKind> {
        let mut seen = Vec::new();
        let tried = self
            .failures
            .iter()
            .map(|f| f.provider)
            .chain(self.succeeded_with);
        for kind in tried {
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        seen
    }
}

/// Lifetime counters. Lock-free, read on demand.
#[derive(Debug, Default)]
pub struct OrchestratorStats {
    calls: AtomicU64,
    successes: AtomicU64,
    exhausted: AtomicU64,
    failed_attempts: AtomicU64,
}

/// Point-in-time copy of [`OrchestratorStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Orchestrated calls started.
    pub calls: u64,
    /// Calls that ended with an answer.
    pub successes: u64,
    /// Calls that ended with no answer.
    pub exhausted: u64,
    /// Individual attempts that failed.
    pub failed_attempts: u64,
}

impl OrchestratorStats {
    /// Snapshot the counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Sequential, priority-ordered provider fallback with bounded retries.
#[derive(Debug)]
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    max_retries: u32,
    stats: OrchestratorStats,
}

impl Orchestrator {
    /// Create an orchestrator over a registry.
    ///
    /// A `max_retries` of zero is treated as one attempt per provider.
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, max_retries: u32) -> Self {
        Self {
            registry,
            max_retries: max_retries.max(1),
            stats: OrchestratorStats::default(),
        }
    }

    /// The registry this orchestrator walks.
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Attempts per provider.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether any provider could be called at all.
    #[must_use]
    pub fn has_providers(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Run the chain and return the first usable answer, or `None`.
    pub async fn complete(&self, request: &CompletionRequest) -> Option<Completion> {
        self.complete_traced(request).await.0
    }

    /// Like [`complete`](Self::complete), also returning what happened.
    pub async fn complete_traced(
        &self,
        request: &CompletionRequest,
    ) -> (Option<Completion>, OrchestrationTrace) {
        self.stats.calls.fetch_add(1, Ordering::Relaxed);
        let mut trace = OrchestrationTrace::default();

        if request.prompt.trim().is_empty() {
            debug!("blank prompt, skipping provider chain");
            self.stats.exhausted.fetch_add(1, Ordering::Relaxed);
            return (None, trace);
        }

        let start = Instant::now();

        for adapter in self.registry.available_providers() {
            let kind = adapter.kind();
            for attempt in 1..=self.max_retries {
                if attempt > 1 {
                    debug!(provider = %kind, attempt, max = self.max_retries, "retrying provider");
                }

                let budget = adapter.attempt_budget(request.timeout);
                let outcome = match tokio::time::timeout(budget, adapter.call(request)).await {
                    Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
                    Ok(Ok(_)) => Err(LlmError::EmptyResponse),
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(LlmError::Timeout(millis(budget))),
                };

                match outcome {
                    Ok(text) => {
                        trace.succeeded_with = Some(kind);
                        self.stats.successes.fetch_add(1, Ordering::Relaxed);
                        let latency_ms = millis(start.elapsed());
                        debug!(provider = %kind, attempts = trace.attempts(), latency_ms, "provider answered");
                        let completion = Completion {
                            text,
                            provider: kind,
                            attempts: trace.attempts(),
                            latency_ms,
                        };
                        return (Some(completion), trace);
                    }
                    Err(e) => {
                        warn!(provider = %kind, attempt, error = %e, "provider attempt failed");
                        self.stats.failed_attempts.fetch_add(1, Ordering::Relaxed);
                        trace.failures.push(AttemptFailure {
                            provider: kind,
                            attempt,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        if !self.registry.is_empty() {
            warn!(attempts = trace.attempts(), "all providers exhausted");
        }
        self.stats.exhausted.fetch_add(1, Ordering::Relaxed);
        (None, trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_registry_returns_none_immediately() {
        let orchestrator = Orchestrator::new(Arc::new(ProviderRegistry::empty()), 2);
        let (result, trace) = orchestrator.complete_traced(&CompletionRequest::new("hi")).await;
        assert!(result.is_none());
        assert_eq!(trace.attempts(), 0);
        assert_eq!(orchestrator.stats().exhausted, 1);
    }

    #[test]
    fn zero_retries_still_tries_once() {
        let orchestrator = Orchestrator::new(Arc::new(ProviderRegistry::empty()), 0);
        assert_eq!(orchestrator.max_retries(), 1);
    }

    #[test]
    fn trace_dedups_providers() {
        let trace = OrchestrationTrace {
            failures: vec![
                AttemptFailure { provider: ProviderKind::Anthropic, attempt: 1, error: "x".into() },
                AttemptFailure { provider: ProviderKind::Anthropic, attempt: 2, error: "x".into() },
            ],
            succeeded_with: Some(ProviderKind::Gemini),
        };
        assert_eq!(trace.attempts(), 3);
        assert_eq!(trace.providers_tried(), vec![ProviderKind::Anthropic, ProviderKind::Gemini]);
    }
}
