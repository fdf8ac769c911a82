//! The engine contract: hooks, options, and the traits an embeddable
//! Quilt compiler engine implements.

use std::sync::Arc;

use crate::artifact::{AnalysisSnapshot, MacroArtifact, NamespaceArtifact};
use crate::error::EngineError;
use crate::namespace::NamespaceIdentity;

/// Destination for the engine's print and error output while a
/// console is redirected into it.
pub trait Console {
    fn print(&self, message: &str);
    fn error(&self, message: &str);
}

/// The platform console: stdout and stderr.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Executes emitted or macro code. Whatever the execution produces is
/// meaningless to the engine.
pub type EvalHook = Box<dyn FnMut(&str)>;

/// Receives the resolution of one dependency request: a cached or
/// loaded artifact, or `None` when no source is known. Invoked exactly
/// once per request.
pub type LoadContinuation = Box<dyn FnOnce(Option<NamespaceArtifact>)>;

/// Resolves one unresolved namespace reference for the engine.
/// Invoked zero or more times per compile.
pub type LoadHook = Box<dyn FnMut(&NamespaceIdentity, LoadContinuation)>;

/// Acknowledges a cache update. The engine waits for the ack before
/// evaluating the macro namespace and ignores any payload.
pub type Ack = Box<dyn FnOnce()>;

/// Invoked when the engine has compiled, and is about to evaluate, a
/// macro-only namespace whose output should be durably cached.
/// Invoked zero or more times per compile.
pub type CacheHook = Box<dyn FnMut(&MacroArtifact, Ack)>;

/// Delivers the terminal outcome of one compile call, exactly once.
///
/// The introspection handle reflects the engine's state at completion
/// time, so analysis metadata can be snapshotted while it is current.
pub type Completion = Box<dyn FnOnce(&dyn EngineIntrospect, Result<EngineOutput, EngineError>)>;

/// Hook wiring and switches for one engine invocation.
pub struct EngineOptions {
    pub eval: EvalHook,
    pub load: LoadHook,
    pub cache_macro: CacheHook,
    /// Emit source maps alongside the compiled output.
    pub source_map: bool,
    /// Engine-internal verbose logging.
    pub verbose: bool,
}

/// Successful compile result.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    /// Full emitted output text of the compile unit.
    pub emitted: String,
    /// Source map, when requested and produced.
    pub source_map: Option<String>,
}

/// Read-only view of the engine's internal analysis state.
pub trait EngineIntrospect {
    /// Analysis metadata the engine currently holds for `name`.
    fn analysis(&self, name: &str) -> Option<AnalysisSnapshot>;

    /// Whether `name` denotes a macro-only namespace.
    fn is_macro_namespace(&self, name: &str) -> bool;

    /// Diagnostic dump of the engine's internal state.
    fn dump(&self) -> serde_json::Value;
}

/// An embeddable Quilt compiler engine.
///
/// The engine value is the process-wide compiler state: constructed
/// once by the host, advanced by successive compile calls, never
/// reset.
pub trait Engine: EngineIntrospect {
    /// Compile `source` as the compile unit named `name`.
    ///
    /// The engine invokes the hooks in `options` as needed during the
    /// call, then invokes `done` exactly once with the outcome. A
    /// dependency whose load hook answered `None` is unresolved and is
    /// reported through `done` as an [`EngineError`].
    fn compile_str(&mut self, source: &str, name: &str, options: EngineOptions, done: Completion);

    /// Send subsequent print and error output to `console`, or back to
    /// the platform default when `None`.
    fn redirect_console(&mut self, console: Option<Arc<dyn Console>>);
}
