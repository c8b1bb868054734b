//! Result type returned to callers on success.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key: generation time, ISO-8601 UTC with millisecond precision.
pub const ANALYSIS_TIMESTAMP: &str = "analysis_timestamp";
/// Metadata key: filename declared by the uploader.
pub const FILE_NAME: &str = "file_name";
/// Metadata key: uploaded size in bytes.
pub const FILE_SIZE: &str = "file_size";
/// Metadata key: character count of the decoded text (general review only).
pub const TEXT_LENGTH: &str = "text_length";

/// A validated analysis: the model's fields plus pipeline metadata.
///
/// Serialises as a flat JSON object, the same shape the model produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl AnalysisResult {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String field, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn file_size(&self) -> Option<u64> {
        self.0.get(FILE_SIZE).and_then(Value::as_u64)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.str_field(FILE_NAME)
    }

    pub fn analysis_timestamp(&self) -> Option<&str> {
        self.str_field(ANALYSIS_TIMESTAMP)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Compact JSON text.
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}
