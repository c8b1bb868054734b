//! Completion service call.
//!
//! [`CompletionClient`] is the seam between the pipeline and the model
//! provider. [`OpenAiClient`] speaks the OpenAI-compatible
//! `/chat/completions` API: one POST per analysis, forced `json_object`
//! output, fixed temperature, no retry and no streaming.
//!
//! Failures are typed from the HTTP status and the transport error, never
//! from the wording of an error message:
//!
//! | Upstream outcome | Error |
//! |------------------|-------|
//! | 401 / 403 | `UpstreamUnavailable(Auth)` |
//! | 429 | `UpstreamRateLimited` |
//! | 5xx, connection failure | `UpstreamUnavailable(Service)` |
//! | transport timeout | `UpstreamUnavailable(Timeout)` |
//! | anything else | `Upstream` |

use crate::config::{AnalyzerConfig, TEMPERATURE};
use crate::error::{PipelineError, UnavailableReason};
use crate::pipeline::prompt::{AnalysisRequestMessages, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Text returned by the model. No structure is assumed until normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion(pub String);

impl RawCompletion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A model provider able to answer one analysis request.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `messages` and return the model's raw text.
    ///
    /// `credential` has already been checked for presence by the caller.
    async fn complete(
        &self,
        credential: &str,
        messages: &AnalysisRequestMessages,
    ) -> Result<RawCompletion, PipelineError>;
}

/// OpenAI-compatible chat completion client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Build a client for the model and endpoint named in `config`.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| PipelineError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.api_base.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        credential: &str,
        messages: &AnalysisRequestMessages,
    ) -> Result<RawCompletion, PipelineError> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: messages.as_slice(),
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion service returned an error status");
            return Err(classify_status(status.as_u16(), body));
        }

        let raw: ChatResponseRaw = response.json().await.map_err(|e| PipelineError::Upstream {
            detail: format!("unreadable completion response: {e}"),
        })?;

        if let Some(usage) = &raw.usage {
            debug!(
                model = %self.model,
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "completion received"
            );
        }

        first_choice_content(raw).map(RawCompletion)
    }
}

/// Map an HTTP error status from the completion service to a typed failure.
pub fn classify_status(status: u16, body: String) -> PipelineError {
    match status {
        401 | 403 => PipelineError::UpstreamUnavailable {
            reason: UnavailableReason::Auth,
            detail: format!("HTTP {status}: {body}"),
        },
        429 => PipelineError::UpstreamRateLimited {
            detail: format!("HTTP {status}: {body}"),
        },
        500..=599 => PipelineError::UpstreamUnavailable {
            reason: UnavailableReason::Service,
            detail: format!("HTTP {status}: {body}"),
        },
        _ => PipelineError::Upstream {
            detail: format!("HTTP {status}: {body}"),
        },
    }
}

fn classify_transport_error(e: reqwest::Error) -> PipelineError {
    warn!(error = %e, "completion request failed");
    if e.is_timeout() {
        PipelineError::UpstreamUnavailable {
            reason: UnavailableReason::Timeout,
            detail: e.to_string(),
        }
    } else if e.is_connect() {
        PipelineError::UpstreamUnavailable {
            reason: UnavailableReason::Service,
            detail: e.to_string(),
        }
    } else {
        PipelineError::Upstream {
            detail: e.to_string(),
        }
    }
}

/// Extract `choices[0].message.content`.
fn first_choice_content(raw: ChatResponseRaw) -> Result<String, PipelineError> {
    raw.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| PipelineError::Upstream {
            detail: "completion response had no message content".into(),
        })
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [&'a Message; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<ChoiceRaw>,
    #[serde(default)]
    usage: Option<UsageRaw>,
}

#[derive(Debug, Deserialize)]
struct ChoiceRaw {
    message: ChoiceMessageRaw,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessageRaw {
    #[serde(default)]
    content: Option<String>,
}

/// Token counts are logged only; partial usage never fails a completion.
#[derive(Debug, Default, Deserialize)]
struct UsageRaw {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}
