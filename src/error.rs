//! Error types for the contract analysis pipeline.
//!
//! Every stage returns `Result<_, PipelineError>`. The enum carries enough
//! internal detail to make a log line useful (upstream status codes, parse
//! errors, the names of missing fields), while the caller only ever sees the
//! templated text from [`PipelineError::user_message`] and the status from
//! [`PipelineError::status`].
//!
//! The mapping is a closed table:
//!
//! | Kind | Status |
//! |------|--------|
//! | `CredentialMissing` | 500 |
//! | `MissingFile`, `FileTooLarge`, `UnsupportedType`, `TextTooShort`, `TextTooLong` | 400 |
//! | `UpstreamRateLimited` | 429 |
//! | `UpstreamUnavailable` | 500 (auth) / 503 (service, timeout) |
//! | `MalformedOutput`, `IncompleteOutput`, `Unclassified` | 500 |

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// All failures the pipeline can produce.
///
/// Variants are grouped by the stage that raises them. Use [`Self::kind`] to
/// get the closed taxonomy value without the attached detail.
#[derive(Debug, Error)]
pub enum PipelineError {
    // ── Configuration ─────────────────────────────────────────────────────
    /// No API credential was configured when the request arrived.
    #[error("Completion service credential is not configured (set OPENAI_API_KEY)")]
    CredentialMissing,

    // ── Input validation ──────────────────────────────────────────────────
    /// The upload had no file in the expected form field.
    #[error("No file in the upload")]
    MissingFile,

    /// The artifact is larger than the byte ceiling.
    #[error("File is {size} bytes, ceiling is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// Declared media type is not `text/plain`.
    #[error("Unsupported media type '{media_type}'")]
    UnsupportedType { media_type: String },

    /// Trimmed text is below the minimum length.
    #[error("Text has {chars} non-blank characters, minimum is {min}")]
    TextTooShort { chars: usize, min: usize },

    /// Raw text is above the maximum length.
    #[error("Text has {chars} characters, maximum is {max}")]
    TextTooLong { chars: usize, max: usize },

    // ── Completion service ────────────────────────────────────────────────
    /// Upstream answered 429.
    #[error("Completion service rate limited the request: {detail}")]
    UpstreamRateLimited { detail: String },

    /// Upstream could not serve the request (bad credential, outage, timeout).
    #[error("Completion service unavailable ({reason}): {detail}")]
    UpstreamUnavailable {
        reason: UnavailableReason,
        detail: String,
    },

    /// Upstream failed in a way none of the above describes.
    #[error("Completion service error: {detail}")]
    Upstream { detail: String },

    // ── Response normalisation ────────────────────────────────────────────
    /// Model output is not a single JSON object.
    #[error("Model output is not a JSON object: {detail}")]
    MalformedOutput { detail: String },

    /// Model output is a JSON object but lacks required fields.
    #[error("Model output is missing required fields: {}", .missing.join(", "))]
    IncompleteOutput { missing: Vec<String> },

    // ── Config / catch-all ────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why the completion service was considered unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Upstream rejected the credential (401/403).
    Auth,
    /// Upstream returned 5xx or the connection failed.
    Service,
    /// The call did not finish within the configured timeout.
    Timeout,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnavailableReason::Auth => "auth",
            UnavailableReason::Service => "service",
            UnavailableReason::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

/// The closed, caller-visible failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    CredentialMissing,
    MissingFile,
    FileTooLarge,
    UnsupportedType,
    TextTooShort,
    TextTooLong,
    UpstreamRateLimited,
    UpstreamUnavailable,
    MalformedOutput,
    IncompleteOutput,
    Unclassified,
}

impl PipelineError {
    /// Taxonomy value for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::CredentialMissing => ErrorKind::CredentialMissing,
            PipelineError::MissingFile => ErrorKind::MissingFile,
            PipelineError::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            PipelineError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            PipelineError::TextTooShort { .. } => ErrorKind::TextTooShort,
            PipelineError::TextTooLong { .. } => ErrorKind::TextTooLong,
            PipelineError::UpstreamRateLimited { .. } => ErrorKind::UpstreamRateLimited,
            PipelineError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            PipelineError::MalformedOutput { .. } => ErrorKind::MalformedOutput,
            PipelineError::IncompleteOutput { .. } => ErrorKind::IncompleteOutput,
            PipelineError::Upstream { .. }
            | PipelineError::InvalidConfig(_)
            | PipelineError::Internal(_) => ErrorKind::Unclassified,
        }
    }

    /// HTTP status code for this failure.
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::MissingFile
            | PipelineError::FileTooLarge { .. }
            | PipelineError::UnsupportedType { .. }
            | PipelineError::TextTooShort { .. }
            | PipelineError::TextTooLong { .. } => 400,
            PipelineError::UpstreamRateLimited { .. } => 429,
            PipelineError::UpstreamUnavailable { reason, .. } => match reason {
                UnavailableReason::Auth => 500,
                UnavailableReason::Service | UnavailableReason::Timeout => 503,
            },
            PipelineError::CredentialMissing
            | PipelineError::Upstream { .. }
            | PipelineError::MalformedOutput { .. }
            | PipelineError::IncompleteOutput { .. }
            | PipelineError::InvalidConfig(_)
            | PipelineError::Internal(_) => 500,
        }
    }

    /// Templated message safe to show the caller.
    ///
    /// Never includes upstream response text. The only variable content is
    /// the list of missing field names, which comes from the local schema.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::CredentialMissing => "OpenAI API key not configured".into(),
            PipelineError::MissingFile => "No file uploaded".into(),
            PipelineError::FileTooLarge { .. } => "File too large. Maximum size is 10MB.".into(),
            PipelineError::UnsupportedType { .. } => {
                "Only .txt files are supported currently. PDF and DOC support coming soon!".into()
            }
            PipelineError::TextTooShort { .. } => {
                "Contract text is too short or empty. Please upload a valid contract.".into()
            }
            PipelineError::TextTooLong { .. } => {
                "Contract is too long. Please upload a contract under 50,000 characters.".into()
            }
            PipelineError::UpstreamRateLimited { .. } => {
                "Service temporarily busy. Please try again in a moment.".into()
            }
            PipelineError::UpstreamUnavailable { reason, .. } => match reason {
                UnavailableReason::Auth => "Invalid API key configuration".into(),
                UnavailableReason::Service | UnavailableReason::Timeout => {
                    "Analysis service is temporarily unavailable. Please try again later.".into()
                }
            },
            PipelineError::MalformedOutput { .. } => {
                "Analysis formatting error. Please try again.".into()
            }
            PipelineError::IncompleteOutput { missing } => format!(
                "Analysis was incomplete (missing: {}). Please try again.",
                missing.join(", ")
            ),
            PipelineError::Upstream { .. }
            | PipelineError::InvalidConfig(_)
            | PipelineError::Internal(_) => {
                "Analysis failed. Please try again or contact support.".into()
            }
        }
    }

    /// Wire payload `{ "error": ... }` for this failure.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.user_message(),
        }
    }
}

/// Caller-facing error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_400() {
        let errors = [
            PipelineError::MissingFile,
            PipelineError::FileTooLarge { size: 11, max: 10 },
            PipelineError::UnsupportedType {
                media_type: "application/pdf".into(),
            },
            PipelineError::TextTooShort { chars: 3, min: 50 },
            PipelineError::TextTooLong {
                chars: 50_001,
                max: 50_000,
            },
        ];
        for e in errors {
            assert_eq!(e.status(), 400, "{e}");
        }
    }

    #[test]
    fn missing_credential_names_the_openai_key() {
        let e = PipelineError::CredentialMissing;
        assert_eq!(e.status(), 500);
        assert_eq!(e.user_message(), "OpenAI API key not configured");
    }

    #[test]
    fn rate_limit_is_429() {
        let e = PipelineError::UpstreamRateLimited {
            detail: "slow down".into(),
        };
        assert_eq!(e.status(), 429);
        assert_eq!(e.kind(), ErrorKind::UpstreamRateLimited);
    }

    #[test]
    fn unavailable_status_depends_on_reason() {
        let auth = PipelineError::UpstreamUnavailable {
            reason: UnavailableReason::Auth,
            detail: "401".into(),
        };
        let timeout = PipelineError::UpstreamUnavailable {
            reason: UnavailableReason::Timeout,
            detail: "60s".into(),
        };
        assert_eq!(auth.status(), 500);
        assert_eq!(timeout.status(), 503);
        assert_eq!(auth.kind(), timeout.kind());
    }

    #[test]
    fn upstream_detail_never_reaches_user() {
        let e = PipelineError::Upstream {
            detail: "secret-internal-trace".into(),
        };
        assert!(e.to_string().contains("secret-internal-trace"));
        assert!(!e.user_message().contains("secret-internal-trace"));
        assert_eq!(e.kind(), ErrorKind::Unclassified);
    }

    #[test]
    fn incomplete_output_names_every_field() {
        let e = PipelineError::IncompleteOutput {
            missing: vec!["contract_type".into(), "recommendations".into()],
        };
        let msg = e.user_message();
        assert!(msg.contains("contract_type"), "got: {msg}");
        assert!(msg.contains("recommendations"), "got: {msg}");
        assert_eq!(e.status(), 500);
    }

    #[test]
    fn body_serialises_as_error_object() {
        let body = PipelineError::MissingFile.to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "No file uploaded" }));
    }
}
