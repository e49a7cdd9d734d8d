//! Error types for the solve pipeline.
//!
//! One unified error covers the failure modes that halt a run: empty input,
//! transport failures, service-reported errors, and cache misses on
//! re-application. Per-item parse failures are deliberately *not* errors —
//! they degrade to default questions and a log line.

use thiserror::Error;

/// Errors that can halt a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The capture contained no items to parse; nothing was submitted.
    #[error("no questions found in capture")]
    NoQuestions,

    /// Transport-level failure: connectivity, timeout, or malformed body.
    #[error("answer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, with the payload's error message when present.
    #[error("answer service returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code of the failed response.
        status: u16,
        /// Error message extracted from the payload, or the raw status text.
        message: String,
    },

    /// The service answered 2xx but reported an application-level error.
    #[error("answer service error: {0}")]
    Api(String),

    /// JSON serialization or deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Re-application requested with no cached run to apply from.
    #[error("no cached answers to reapply")]
    NoCache,

    /// File I/O failure (session store, capture files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;
