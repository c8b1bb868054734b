//! Pipeline entry point.
//!
//! [`Analyzer`] owns the read-only configuration and the completion client
//! and runs one upload through the four stages. Every request is
//! independent; the analyzer holds no per-request state, so one instance is
//! shared across concurrent requests behind an `Arc`.

use crate::config::AnalyzerConfig;
use crate::error::{PipelineError, UnavailableReason};
use crate::output::AnalysisResult;
use crate::pipeline::input::{self, UploadedArtifact};
use crate::pipeline::llm::{CompletionClient, OpenAiClient};
use crate::pipeline::normalize::{self, SourceInfo};
use crate::pipeline::prompt;
use crate::prompts::PromptVariant;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Runs uploads through validate → prompt → complete → normalize.
#[derive(Clone)]
pub struct Analyzer {
    config: Arc<AnalyzerConfig>,
    client: Arc<dyn CompletionClient>,
}

impl Analyzer {
    /// Analyzer backed by an [`OpenAiClient`] for `config`'s endpoint.
    pub fn new(config: AnalyzerConfig) -> Result<Self, PipelineError> {
        let client = OpenAiClient::from_config(&config)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Analyzer with a caller-supplied completion client.
    pub fn with_client(config: AnalyzerConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyse one upload. `None` means the caller sent no file.
    ///
    /// The credential is checked first, so a misconfigured service fails
    /// before looking at the upload and without any network call.
    pub async fn analyze(
        &self,
        artifact: Option<UploadedArtifact>,
    ) -> Result<AnalysisResult, PipelineError> {
        let start = Instant::now();
        let result = self.run(artifact.as_ref()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(elapsed_ms, "analysis complete"),
            Err(e) => warn!(kind = ?e.kind(), status = e.status(), elapsed_ms, error = %e, "analysis failed"),
        }
        result
    }

    async fn run(&self, artifact: Option<&UploadedArtifact>) -> Result<AnalysisResult, PipelineError> {
        let variant = PromptVariant::ACTIVE;
        let credential = self.config.credential()?;

        // ── Step 1: Validate input ───────────────────────────────────────
        let text = input::validate_artifact(artifact)?;
        let artifact = artifact.ok_or(PipelineError::MissingFile)?;
        info!(
            file = %artifact.filename,
            bytes = artifact.size,
            chars = text.char_count(),
            "analysing contract"
        );

        // ── Step 2: Build prompt ─────────────────────────────────────────
        let messages = prompt::build_messages(&text, variant);

        // ── Step 3: Call completion service ──────────────────────────────
        let timeout = Duration::from_secs(self.config.api_timeout_secs);
        let raw = match tokio::time::timeout(timeout, self.client.complete(credential, &messages)).await
        {
            Ok(outcome) => outcome?,
            Err(_) => {
                return Err(PipelineError::UpstreamUnavailable {
                    reason: UnavailableReason::Timeout,
                    detail: format!("no response within {}s", self.config.api_timeout_secs),
                })
            }
        };

        // ── Step 4: Normalise ────────────────────────────────────────────
        let source = SourceInfo {
            filename: artifact.filename.clone(),
            size: artifact.size,
            text_chars: text.char_count(),
        };
        normalize::normalize(&raw, variant, &source)
    }
}
