//! Compiled-output artifacts exchanged across the engine boundary.

use serde::Serialize;

use crate::namespace::NamespaceIdentity;

/// Opaque snapshot of the engine's analysis metadata for one
/// namespace, copied at cache-write time.
///
/// The snapshot is not kept in sync: if the engine later re-analyzes
/// the same namespace under different conditions, cached copies go
/// stale.
pub type AnalysisSnapshot = serde_json::Value;

/// Whether an artifact carries raw source or compiled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Source,
    Compiled,
}

/// One namespace's cached form, and equally the shape the engine
/// expects back from dependency resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceArtifact {
    pub lang: Lang,
    /// Present only on [`Lang::Compiled`] records.
    pub identity: Option<NamespaceIdentity>,
    /// Derived from the namespace name; present only on
    /// [`Lang::Compiled`] records.
    pub path: Option<String>,
    /// Raw source, or the full emitted output defining this namespace.
    pub source: String,
    /// Present only on [`Lang::Compiled`] records produced by the
    /// engine; loaded source has no analysis yet.
    pub analysis: Option<AnalysisSnapshot>,
}

impl NamespaceArtifact {
    /// Wrap raw source obtained from an external source loader.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            lang: Lang::Source,
            identity: None,
            path: None,
            source: source.into(),
            analysis: None,
        }
    }

    /// Record for a namespace the engine compiled. The path derives
    /// from the identity's name.
    pub fn compiled(
        identity: NamespaceIdentity,
        source: impl Into<String>,
        analysis: Option<AnalysisSnapshot>,
    ) -> Self {
        let path = identity.as_path();
        Self {
            lang: Lang::Compiled,
            identity: Some(identity),
            path: Some(path),
            source: source.into(),
            analysis,
        }
    }
}

/// A compiled macro namespace the engine is about to evaluate, handed
/// to the cache-update hook so later compiles reuse it instead of
/// recompiling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroArtifact {
    /// Bare namespace name, without any macro marker.
    pub name: String,
    /// Emitted code of the macro namespace.
    pub source: String,
    /// Engine analysis metadata for the namespace.
    pub analysis: AnalysisSnapshot,
}
