//! # contractguard
//!
//! Contract risk analysis over HTTP: accept a plain-text contract, ask a
//! large language model for a structured review, and return a JSON object
//! whose required fields have been checked against a schema.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload
//!  │
//!  ├─ 1. Validate   presence, ≤ 10 MiB, text/plain, 50..=50 000 chars
//!  ├─ 2. Prompt     system instructions + preamble + contract text
//!  ├─ 3. Complete   one call to an OpenAI-compatible API (json_object, T=0.3)
//!  ├─ 4. Normalize  strict JSON parse, required fields, metadata
//!  └─ 5. Map errors closed taxonomy → { "error": ... } + status
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contractguard::{Analyzer, AnalyzerConfig, UploadedArtifact};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalyzerConfig::from_env()?;
//!     let analyzer = Analyzer::new(config)?;
//!     let text = std::fs::read("contract.txt")?;
//!     let upload = UploadedArtifact::new("contract.txt", "text/plain", text);
//!     let result = analyzer.analyze(Some(upload)).await?;
//!     println!("{}", result.to_json_string());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `contractguard` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `general-review` | off | Build the general legal review prompt instead of the construction review |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod schema;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::Analyzer;
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::{ErrorBody, ErrorKind, PipelineError, UnavailableReason};
pub use output::AnalysisResult;
pub use pipeline::input::{ExtractedText, UploadedArtifact};
pub use pipeline::llm::{CompletionClient, OpenAiClient, RawCompletion};
pub use pipeline::prompt::AnalysisRequestMessages;
pub use prompts::PromptVariant;
pub use report::render_text_report;
pub use schema::{FieldShape, RequiredField, SchemaDescriptor};
pub use server::{router, serve};
