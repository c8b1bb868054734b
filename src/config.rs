//! Process-wide configuration for the analysis service.
//!
//! [`AnalyzerConfig`] is built once at startup, either through
//! [`AnalyzerConfig::builder()`] or [`AnalyzerConfig::from_env()`], then
//! shared read-only (behind an `Arc`) by every request. Nothing in the
//! pipeline mutates it.
//!
//! The validation limits and decoding parameters are constants rather than
//! fields: changing them changes the caller-visible contract (the error
//! messages quote them), so they are not tunable at runtime.

use crate::error::PipelineError;
use std::fmt;
use std::net::SocketAddr;

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Minimum number of characters after trimming surrounding whitespace.
pub const MIN_TEXT_CHARS: usize = 50;

/// Maximum number of characters in the decoded text, before trimming.
pub const MAX_TEXT_CHARS: usize = 50_000;

/// The only media type accepted for uploads.
pub const ACCEPTED_MEDIA_TYPE: &str = "text/plain";

/// Sampling temperature sent with every completion request.
pub const TEMPERATURE: f32 = 0.3;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default completion API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for the analysis pipeline and its HTTP surface.
///
/// # Example
/// ```rust
/// use contractguard::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .api_key("sk-test")
///     .model("gpt-4o-mini")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert!(config.api_key.is_some());
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Completion service credential. `None` is allowed at startup; every
    /// request then fails with [`PipelineError::CredentialMissing`] before
    /// any network call.
    pub api_key: Option<String>,

    /// Model identifier sent to the completion service. Default: `gpt-4o-mini`.
    pub model: String,

    /// Base URL of an OpenAI-compatible API. Default: `https://api.openai.com/v1`.
    pub api_base: String,

    /// Upper bound on one completion call, in seconds. Default: 60.
    ///
    /// Expiry surfaces as `UpstreamUnavailable` (503).
    pub api_timeout_secs: u64,

    /// Address the HTTP server binds to. Default: `0.0.0.0:3000`.
    pub bind_addr: SocketAddr,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_timeout_secs: 60,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `OPENAI_API_KEY` | `api_key` |
    /// | `CONTRACTGUARD_MODEL` | `model` |
    /// | `CONTRACTGUARD_API_BASE` | `api_base` |
    /// | `CONTRACTGUARD_API_TIMEOUT` | `api_timeout_secs` |
    /// | `CONTRACTGUARD_BIND` | `bind_addr` |
    pub fn from_env() -> Result<Self, PipelineError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(key) = get("OPENAI_API_KEY") {
            builder = builder.api_key(key);
        }
        if let Some(model) = get("CONTRACTGUARD_MODEL") {
            builder = builder.model(model);
        }
        if let Some(base) = get("CONTRACTGUARD_API_BASE") {
            builder = builder.api_base(base);
        }
        if let Some(raw) = get("CONTRACTGUARD_API_TIMEOUT") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                PipelineError::InvalidConfig(format!(
                    "CONTRACTGUARD_API_TIMEOUT must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            builder = builder.api_timeout_secs(secs);
        }
        if let Some(raw) = get("CONTRACTGUARD_BIND") {
            let addr = raw.trim().parse::<SocketAddr>().map_err(|_| {
                PipelineError::InvalidConfig(format!(
                    "CONTRACTGUARD_BIND must be host:port, got '{raw}'"
                ))
            })?;
            builder = builder.bind_addr(addr);
        }

        builder.build()
    }

    /// The credential, or `CredentialMissing` when none is configured.
    pub fn credential(&self) -> Result<&str, PipelineError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(PipelineError::CredentialMissing)
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, PipelineError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("model must not be empty".into()));
        }
        if !(c.api_base.starts_with("http://") || c.api_base.starts_with("https://")) {
            return Err(PipelineError::InvalidConfig(format!(
                "api_base must be an http(s) URL, got '{}'",
                c.api_base
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(PipelineError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
