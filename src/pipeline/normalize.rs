//! Response normalisation: strict JSON parse, required-field check, metadata.
//!
//! The model's text must be exactly one JSON object. There is no lenient
//! recovery (no fence stripping, no brace hunting): a model that ignores the
//! `json_object` modality produces `MalformedOutput`, and a model that drops
//! fields produces `IncompleteOutput` listing every field it dropped.
//!
//! Metadata is added with insert-if-absent semantics, so a model field that
//! happens to share a metadata key is kept as the model wrote it.

use crate::error::PipelineError;
use crate::output::{AnalysisResult, ANALYSIS_TIMESTAMP, FILE_NAME, FILE_SIZE, TEXT_LENGTH};
use crate::pipeline::llm::RawCompletion;
use crate::prompts::PromptVariant;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::warn;

/// What the pipeline knows about the upload, for result metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub filename: String,
    pub size: u64,
    pub text_chars: usize,
}

/// Normalise a completion, stamping it with the current time.
pub fn normalize(
    raw: &RawCompletion,
    variant: PromptVariant,
    source: &SourceInfo,
) -> Result<AnalysisResult, PipelineError> {
    normalize_at(raw, variant, source, Utc::now())
}

/// Normalise a completion with an explicit generation time.
pub fn normalize_at(
    raw: &RawCompletion,
    variant: PromptVariant,
    source: &SourceInfo,
    generated_at: DateTime<Utc>,
) -> Result<AnalysisResult, PipelineError> {
    let mut object = parse_object(raw.as_str())?;

    let missing = variant.schema().missing_fields(&object);
    if !missing.is_empty() {
        warn!(schema = variant.schema().name, missing = ?missing, "model output incomplete");
        return Err(PipelineError::IncompleteOutput {
            missing: missing.into_iter().map(String::from).collect(),
        });
    }

    attach(
        &mut object,
        ANALYSIS_TIMESTAMP,
        Value::String(generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    attach(&mut object, FILE_NAME, Value::String(source.filename.clone()));
    attach(&mut object, FILE_SIZE, Value::from(source.size));
    if variant.records_text_length() {
        attach(&mut object, TEXT_LENGTH, Value::from(source.text_chars));
    }

    Ok(AnalysisResult::from_map(object))
}

fn parse_object(text: &str) -> Result<Map<String, Value>, PipelineError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PipelineError::MalformedOutput {
            detail: format!("expected a JSON object, got {}", json_type_name(&other)),
        }),
        Err(e) => Err(PipelineError::MalformedOutput {
            detail: e.to_string(),
        }),
    }
}

fn attach(object: &mut Map<String, Value>, key: &str, value: Value) {
    object.entry(key.to_string()).or_insert(value);
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
