//! The failure shape delivered to the host.

use quilt_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

/// A failed compile, normalized from the engine's error object into a
/// plain structured form for the failure continuation.
///
/// Compiles are never retried by this layer; a failure is reported
/// once and the host decides whether to call again.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct CompileFailure {
    pub message: String,
    /// Engine-specific payload, passed through untouched.
    pub data: serde_json::Value,
    /// Rendered underlying error, when the engine reported one.
    pub cause: Option<String>,
}

impl From<EngineError> for CompileFailure {
    fn from(err: EngineError) -> Self {
        Self {
            message: err.message,
            data: err.data,
            cause: err.cause.map(|cause| cause.to_string()),
        }
    }
}
