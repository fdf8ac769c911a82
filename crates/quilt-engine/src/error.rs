//! Structured engine errors.

use thiserror::Error;

use crate::namespace::NamespaceIdentity;

/// Error reported by the compiler engine for one failed compile.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
    /// Engine-specific payload: failing form, source location, and
    /// whatever else the engine attaches.
    pub data: serde_json::Value,
    /// Underlying error, when the failure wraps another.
    #[source]
    pub cause: Option<Box<EngineError>>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: serde_json::Value::Null,
            cause: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_cause(mut self, cause: EngineError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The error an engine reports when a dependency stayed unresolved
    /// after its load hook answered with nothing.
    pub fn unresolved(identity: &NamespaceIdentity) -> Self {
        Self::new(format!("No such namespace: {}", identity.name))
            .with_data(serde_json::json!({ "namespace": identity.cache_key() }))
    }
}
