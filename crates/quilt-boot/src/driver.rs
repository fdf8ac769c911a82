//! Compile driver: wires cache, loader, and evaluator hooks into one
//! engine invocation and delivers the outcome through continuations.

use std::sync::Arc;

use quilt_engine::{
    CacheHook, Completion, Console, Engine, EngineOptions, EvalHook, LoadHook, NamespaceIdentity,
    StdConsole,
};
use tracing::debug;

use crate::cache::OutputCache;
use crate::error::CompileFailure;
use crate::loader::{self, SourceLoader};
use crate::scan;

/// Configuration for one compile call.
///
/// All outcomes are delivered through `on_success`/`on_failure`; the
/// compile entry point itself returns nothing.
pub struct CompileConfig {
    /// Target namespace name for this compile.
    pub name: String,
    /// Receives the engine's redirected print and error output.
    pub console: Arc<dyn Console>,
    /// Supplies source for namespaces without a cache hit.
    pub loader: Box<dyn SourceLoader>,
    /// Executes emitted and macro code. Hosts that need execution
    /// supply one; the default does nothing.
    pub eval: Box<dyn FnMut(&str)>,
    /// Invoked with the full emitted text on success.
    pub on_success: Box<dyn FnOnce(String)>,
    /// Invoked with the normalized failure on error.
    pub on_failure: Box<dyn FnOnce(CompileFailure)>,
}

impl CompileConfig {
    pub fn new() -> Self {
        Self {
            name: "unknown".to_string(),
            console: Arc::new(StdConsole),
            loader: Box::new(|_: &NamespaceIdentity| -> Option<String> { None }),
            eval: Box::new(|_| {}),
            on_success: Box::new(|_| {}),
            on_failure: Box::new(|_| {}),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn eval(mut self, eval: impl FnMut(&str) + 'static) -> Self {
        self.eval = Box::new(eval);
        self
    }

    pub fn on_success(mut self, on_success: impl FnOnce(String) + 'static) -> Self {
        self.on_success = Box::new(on_success);
        self
    }

    pub fn on_failure(mut self, on_failure: impl FnOnce(CompileFailure) + 'static) -> Self {
        self.on_failure = Box::new(on_failure);
        self
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Caching compile driver around an [`Engine`].
///
/// Owns the engine state and the output cache for the lifetime of the
/// process; both only ever advance, neither is reset. Taking `&mut
/// self` in [`compile_str`](Self::compile_str) keeps at most one
/// compile in flight per driver.
pub struct Compiler<E: Engine> {
    engine: E,
    cache: Arc<OutputCache>,
}

impl<E: Engine> Compiler<E> {
    /// Wrap an engine constructed by the host.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            cache: Arc::new(OutputCache::new()),
        }
    }

    /// The shared output cache.
    pub fn cache(&self) -> &Arc<OutputCache> {
        &self.cache
    }

    /// Read-only view of the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Whether the runtime flavor of `name` has been compiled.
    pub fn has_compiled_namespace(&self, name: &str) -> bool {
        self.cache.has_compiled_namespace(name)
    }

    /// Diagnostic dump of the full output cache.
    pub fn dump_cache(&self) -> serde_json::Value {
        self.cache.dump()
    }

    /// Diagnostic dump of the engine's internal state.
    pub fn dump_engine(&self) -> serde_json::Value {
        self.engine.dump()
    }

    /// Compile `source` with the wiring described by `config`.
    ///
    /// The engine resolves dependencies through the output cache with
    /// the config's loader as fallback; macro namespaces the engine
    /// evaluates mid-compile are cached before their evaluation; and
    /// on success every namespace the emitted output declares is
    /// cached before `on_success` runs. The config's console receives
    /// the engine's output for the duration of the call and is
    /// restored afterwards on every exit path. Panics from the loader
    /// or evaluator are not caught here.
    pub fn compile_str(&mut self, source: &str, config: CompileConfig) {
        let CompileConfig {
            name,
            console,
            loader,
            mut eval,
            on_success,
            on_failure,
        } = config;

        debug!(name = %name, "starting compile");

        let eval: EvalHook = Box::new(move |code| {
            debug!(bytes = code.len(), "evaluating emitted code");
            eval(code);
        });

        let load_cache = Arc::clone(&self.cache);
        let load: LoadHook = Box::new(move |identity, done| {
            loader::resolve(&load_cache, loader.as_ref(), identity, done);
        });

        let macro_cache = Arc::clone(&self.cache);
        let cache_macro: CacheHook = Box::new(move |artifact, ack| {
            loader::cache_macro(&macro_cache, artifact, ack);
        });

        let options = EngineOptions {
            eval,
            load,
            cache_macro,
            source_map: true,
            verbose: false,
        };

        let done_cache = Arc::clone(&self.cache);
        let done: Completion = Box::new(move |engine, result| match result {
            Ok(output) => {
                let entries = scan::collect_provided(engine, &output.emitted);
                debug!(namespaces = entries.len(), "compile succeeded");
                done_cache.merge(entries);
                on_success(output.emitted);
            }
            Err(err) => {
                debug!(error = %err, "compile failed");
                on_failure(CompileFailure::from(err));
            }
        });

        let mut redirected = ConsoleGuard::install(&mut self.engine, console);
        redirected.engine().compile_str(source, &name, options, done);
    }
}

/// Routes engine output to a console for the duration of one compile.
/// Restores the platform default when dropped, including on unwind.
struct ConsoleGuard<'e, E: Engine> {
    engine: &'e mut E,
}

impl<'e, E: Engine> ConsoleGuard<'e, E> {
    fn install(engine: &'e mut E, console: Arc<dyn Console>) -> Self {
        engine.redirect_console(Some(console));
        Self { engine }
    }

    fn engine(&mut self) -> &mut E {
        self.engine
    }
}

impl<E: Engine> Drop for ConsoleGuard<'_, E> {
    fn drop(&mut self) {
        self.engine.redirect_console(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_the_documented_ones() {
        let config = CompileConfig::default();
        assert_eq!(config.name, "unknown");
        assert_eq!(config.loader.load(&NamespaceIdentity::new("any.ns")), None);
    }

    #[test]
    fn config_builder_chains() {
        let config = CompileConfig::new()
            .name("app.core")
            .loader(|id: &NamespaceIdentity| Some(format!("(ns {})", id.name)));
        assert_eq!(config.name, "app.core");
        assert_eq!(
            config.loader.load(&NamespaceIdentity::new("lib.util")),
            Some("(ns lib.util)".to_string())
        );
    }
}
