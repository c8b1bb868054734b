//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use contractguard::{
    AnalysisRequestMessages, Analyzer, AnalyzerConfig, CompletionClient, PipelineError,
    PromptVariant, RawCompletion,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the stub answers with.
pub enum StubReply {
    Text(String),
    Fail(fn() -> PipelineError),
    Panic,
}

/// Completion client that records calls and returns a canned reply.
pub struct StubClient {
    reply: StubReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_user_message: Mutex<Option<String>>,
}

impl StubClient {
    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(StubReply::Text(text.into()), None))
    }

    pub fn failing(make: fn() -> PipelineError) -> Arc<Self> {
        Arc::new(Self::new(StubReply::Fail(make), None))
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Self::new(StubReply::Panic, None))
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self::new(
            StubReply::Text(sample_output(PromptVariant::ACTIVE).to_string()),
            Some(delay),
        ))
    }

    fn new(reply: StubReply, delay: Option<Duration>) -> Self {
        Self {
            reply,
            delay,
            calls: AtomicUsize::new(0),
            last_user_message: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user_message(&self) -> Option<String> {
        self.last_user_message.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(
        &self,
        _credential: &str,
        messages: &AnalysisRequestMessages,
    ) -> Result<RawCompletion, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_message.lock().unwrap() = Some(messages.user().to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            StubReply::Text(text) => Ok(RawCompletion(text.clone())),
            StubReply::Fail(make) => Err(make()),
            StubReply::Panic => panic!("completion client blew up"),
        }
    }
}

/// Config with a credential and a short timeout.
pub fn test_config() -> AnalyzerConfig {
    AnalyzerConfig::builder()
        .api_key("sk-test")
        .api_timeout_secs(5)
        .build()
        .unwrap()
}

pub fn analyzer_with(client: Arc<StubClient>) -> Analyzer {
    Analyzer::with_client(test_config(), client)
}

/// A 120-character contract excerpt.
pub fn contract_text() -> String {
    let text = format!(
        "{:<120}",
        "Contractor shall be paid within 30 days of invoice. Retention of 10% applies until final completion."
    );
    assert_eq!(text.len(), 120);
    text
}

/// Well-formed model output satisfying `variant`'s schema.
pub fn sample_output(variant: PromptVariant) -> Value {
    match variant {
        PromptVariant::ConstructionReview => json!({
            "contractor_protection_score": 64,
            "overall_risk": "Medium",
            "contract_type": "Subcontract Agreement",
            "risk_breakdown": {
                "payment_risk": "Low",
                "liability_risk": "Medium",
                "scope_risk": "Medium",
                "timeline_risk": "Low"
            },
            "critical_findings": [{
                "category": "Retention",
                "risk_level": "Medium",
                "finding": "10% retention held until final completion",
                "impact": "Working capital tied up for the project duration",
                "action": "Request release at substantial completion"
            }],
            "field_team_alerts": ["Submit invoices promptly to start the 30-day clock"],
            "industry_benchmarks": { "payment_terms": "Net 30 matches industry norm" },
            "recommendations": ["Negotiate retention reduction to 5% after 50% completion"]
        }),
        PromptVariant::GeneralReview => json!({
            "overall_risk": "Low",
            "risk_score": 25,
            "contract_type": "Services Agreement",
            "payment_terms": "Payment within 30 days of invoice.",
            "liability": "Not specified.",
            "termination": "Not specified.",
            "insurance": "Not specified",
            "key_risks": ["Retention withheld until completion"],
            "recommendations": ["Define a retention release date"]
        }),
    }
}
