//! Pipeline stages for contract analysis.
//!
//! Each submodule implements exactly one transformation step and returns
//! `Result<_, PipelineError>`; [`crate::analyze`] wires them together.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ prompt ──▶ llm ──▶ normalize
//! (validate) (render)  (call)  (parse + check + metadata)
//! ```
//!
//! 1. [`input`]     — size, media type and length checks; UTF-8 decode
//! 2. [`prompt`]    — system + user messages for the active variant
//! 3. [`llm`]       — the single completion call; the only stage with I/O
//! 4. [`normalize`] — strict JSON parse, required-field check, metadata

pub mod input;
pub mod llm;
pub mod normalize;
pub mod prompt;
