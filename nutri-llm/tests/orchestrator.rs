//! Fallback orchestration tests with scripted in-process adapters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use nutri_llm::{CompletionRequest, LlmError, Orchestrator, ProviderAdapter, ProviderKind, ProviderRegistry};

/// Replays a fixed list of outcomes, then fails.
struct Scripted {
    kind: ProviderKind,
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: AtomicU32,
}

impl Scripted {
    fn new(kind: ProviderKind, script: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        })
    }

    fn always_ok(kind: ProviderKind, text: &str) -> Arc<Self> {
        Self::new(kind, (0..10).map(|_| Ok(text.to_string())).collect())
    }

    fn always_fail(kind: ProviderKind) -> Arc<Self> {
        Self::new(kind, Vec::new())
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for Scripted {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn call(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::RequestFailed("script exhausted".into())))
    }
}

/// Never answers within any reasonable timeout.
struct Hanging;

#[async_trait]
impl ProviderAdapter for Hanging {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn call(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".into())
    }
}

/// Answers after `delay`; `budget_factor` widens its per-call allowance.
struct Slow {
    delay: Duration,
    budget_factor: u32,
}

#[async_trait]
impl ProviderAdapter for Slow {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn attempt_budget(&self, timeout: Duration) -> Duration {
        timeout * self.budget_factor
    }

    async fn call(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        tokio::time::sleep(self.delay).await;
        Ok("slow answer".into())
    }
}

fn orchestrator(adapters: Vec<Arc<dyn ProviderAdapter>>, retries: u32) -> Orchestrator {
    Orchestrator::new(Arc::new(ProviderRegistry::from_adapters(adapters)), retries)
}

fn req() -> CompletionRequest {
    CompletionRequest::new("what should I eat?")
}

#[tokio::test]
async fn first_success_stops_the_chain() {
    let a = Scripted::always_ok(ProviderKind::Anthropic, "first answer");
    let g = Scripted::always_ok(ProviderKind::Gemini, "second answer");
    let o = orchestrator(vec![a.clone(), g.clone()], 2);

    let completion = o.complete(&req()).await.expect("answered");
    assert_eq!(completion.text, "first answer");
    assert_eq!(completion.provider, ProviderKind::Anthropic);
    assert_eq!(completion.attempts, 1);
    assert_eq!(a.calls(), 1);
    assert_eq!(g.calls(), 0);
}

#[tokio::test]
async fn every_provider_failing_yields_none() {
    let a = Scripted::always_fail(ProviderKind::Anthropic);
    let g = Scripted::always_fail(ProviderKind::Gemini);
    let oa = Scripted::always_fail(ProviderKind::OpenAi);
    let o = orchestrator(vec![a.clone(), g.clone(), oa.clone()], 2);

    let (result, trace) = o.complete_traced(&req()).await;
    assert!(result.is_none());
    assert_eq!(trace.failures.len(), 6);
    assert_eq!(trace.providers_tried(), ProviderKind::PRIORITY.to_vec());
    assert_eq!((a.calls(), g.calls(), oa.calls()), (2, 2, 2));

    let stats = o.stats();
    assert_eq!(stats.exhausted, 1);
    assert_eq!(stats.failed_attempts, 6);
}

#[tokio::test]
async fn retry_then_success_on_same_provider() {
    let a = Scripted::new(
        ProviderKind::Anthropic,
        vec![Err(LlmError::RateLimited), Ok("after retry".into())],
    );
    let g = Scripted::always_ok(ProviderKind::Gemini, "unused");
    let o = orchestrator(vec![a.clone(), g.clone()], 2);

    let completion = o.complete(&req()).await.expect("answered");
    assert_eq!(completion.text, "after retry");
    assert_eq!(completion.attempts, 2);
    assert_eq!(g.calls(), 0);
}

#[tokio::test]
async fn retry_bound_is_respected_per_provider() {
    let a = Scripted::always_fail(ProviderKind::Anthropic);
    let g = Scripted::always_ok(ProviderKind::Gemini, "gemini");
    let o = orchestrator(vec![a.clone(), g.clone()], 3);

    let completion = o.complete(&req()).await.expect("answered");
    assert_eq!(a.calls(), 3);
    assert_eq!(completion.provider, ProviderKind::Gemini);
    assert_eq!(completion.attempts, 4);
}

#[tokio::test]
async fn blank_text_counts_as_failure() {
    let a = Scripted::new(
        ProviderKind::Anthropic,
        vec![Ok("   ".into()), Ok(String::new())],
    );
    let oa = Scripted::always_ok(ProviderKind::OpenAi, "real text");
    let o = orchestrator(vec![a.clone(), oa.clone()], 2);

    let (completion, trace) = o.complete_traced(&req()).await;
    assert_eq!(completion.map(|c| c.text).as_deref(), Some("real text"));
    assert!(trace.failures.iter().all(|f| f.provider == ProviderKind::Anthropic));
    assert_eq!(trace.failures.len(), 2);
}

#[tokio::test]
async fn order_follows_registry() {
    let g = Scripted::always_fail(ProviderKind::Gemini);
    let oa = Scripted::always_ok(ProviderKind::OpenAi, "openai");
    let o = orchestrator(vec![g.clone(), oa.clone()], 1);

    let (completion, trace) = o.complete_traced(&req()).await;
    assert_eq!(completion.map(|c| c.provider), Some(ProviderKind::OpenAi));
    assert_eq!(trace.providers_tried(), vec![ProviderKind::Gemini, ProviderKind::OpenAi]);
}

#[tokio::test]
async fn hanging_provider_is_bounded_by_timeout() {
    let oa = Scripted::always_ok(ProviderKind::OpenAi, "fallback");
    let o = orchestrator(vec![Arc::new(Hanging), oa.clone()], 1);

    let request = req().with_timeout(Duration::from_millis(20));
    let (completion, trace) = o.complete_traced(&request).await;
    assert_eq!(completion.map(|c| c.text).as_deref(), Some("fallback"));
    assert!(trace.failures[0].error.contains("timed out"));
}

#[tokio::test]
async fn adapter_budget_widens_the_attempt_deadline() {
    let request = req().with_timeout(Duration::from_millis(100));

    let widened = orchestrator(
        vec![Arc::new(Slow { delay: Duration::from_millis(150), budget_factor: 2 })],
        1,
    );
    let completion = widened.complete(&request).await.expect("answers inside its budget");
    assert_eq!(completion.text, "slow answer");

    let plain = orchestrator(
        vec![Arc::new(Slow { delay: Duration::from_millis(150), budget_factor: 1 })],
        1,
    );
    let (completion, trace) = plain.complete_traced(&request).await;
    assert!(completion.is_none());
    assert!(trace.failures[0].error.contains("timed out"), "{:?}", trace.failures);
}

#[tokio::test]
async fn blank_prompt_skips_every_provider() {
    let a = Scripted::always_ok(ProviderKind::Anthropic, "x");
    let o = orchestrator(vec![a.clone()], 2);
    assert!(o.complete(&CompletionRequest::new("  ")).await.is_none());
    assert_eq!(a.calls(), 0);
}
