//! Interface boundary to the Quilt compiler engine.
//!
//! The engine itself (parsing, analysis, code generation, macro
//! expansion) is an external collaborator. This crate defines the
//! vocabulary that crosses its boundary: namespace identities, the
//! artifact shapes exchanged over dependency resolution and macro
//! caching, the hooks an embedding wires into a compile call, and the
//! traits an engine implements.

mod artifact;
mod engine;
mod error;
mod namespace;

pub use artifact::{AnalysisSnapshot, Lang, MacroArtifact, NamespaceArtifact};
pub use engine::{
    Ack, CacheHook, Completion, Console, Engine, EngineIntrospect, EngineOptions, EngineOutput,
    EvalHook, LoadContinuation, LoadHook, StdConsole,
};
pub use error::EngineError;
pub use namespace::{NamespaceIdentity, MACRO_SUFFIX};
