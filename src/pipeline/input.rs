//! Input validation: turn an uploaded artifact into contract text.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. artifact present
//! 2. byte size ≤ [`MAX_FILE_SIZE`]
//! 3. declared media type is exactly `text/plain`
//! 4. trimmed text has ≥ [`MIN_TEXT_CHARS`] characters
//! 5. raw text has ≤ [`MAX_TEXT_CHARS`] characters
//!
//! Lengths are counted in Unicode scalar values (`char`s), not bytes.

use crate::config::{ACCEPTED_MEDIA_TYPE, MAX_FILE_SIZE, MAX_TEXT_CHARS, MIN_TEXT_CHARS};
use crate::error::PipelineError;
use bytes::Bytes;
use tracing::debug;

/// A file as received from the caller, before any decoding.
///
/// `size` is the number of bytes observed. When the upload was cut short
/// because it crossed the size ceiling, `size` is larger than
/// `content.len()` and validation stops at the size check, so the partial
/// content is never decoded.
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    pub filename: String,
    pub media_type: String,
    pub size: u64,
    pub content: Bytes,
}

impl UploadedArtifact {
    /// Wrap a fully received file.
    pub fn new(
        filename: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            size: content.len() as u64,
            content,
        }
    }
}

/// Contract text that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    char_count: usize,
}

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Character count of the raw (untrimmed) text.
    pub fn char_count(&self) -> usize {
        self.char_count
    }
}

/// Validate an optional artifact and decode its text.
pub fn validate_artifact(artifact: Option<&UploadedArtifact>) -> Result<ExtractedText, PipelineError> {
    let artifact = artifact.ok_or(PipelineError::MissingFile)?;

    if artifact.size > MAX_FILE_SIZE {
        return Err(PipelineError::FileTooLarge {
            size: artifact.size,
            max: MAX_FILE_SIZE,
        });
    }

    if artifact.media_type != ACCEPTED_MEDIA_TYPE {
        return Err(PipelineError::UnsupportedType {
            media_type: artifact.media_type.clone(),
        });
    }

    let text = String::from_utf8_lossy(&artifact.content).into_owned();
    validate_text(text)
}

/// Length checks on already-decoded text.
pub fn validate_text(text: String) -> Result<ExtractedText, PipelineError> {
    let trimmed_chars = text.trim().chars().count();
    if trimmed_chars < MIN_TEXT_CHARS {
        return Err(PipelineError::TextTooShort {
            chars: trimmed_chars,
            min: MIN_TEXT_CHARS,
        });
    }

    let char_count = text.chars().count();
    if char_count > MAX_TEXT_CHARS {
        return Err(PipelineError::TextTooLong {
            chars: char_count,
            max: MAX_TEXT_CHARS,
        });
    }

    debug!(chars = char_count, "contract text accepted");
    Ok(ExtractedText { text, char_count })
}
