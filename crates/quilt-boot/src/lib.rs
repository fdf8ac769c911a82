//! Caching and dependency-resolution layer for embedding the
//! self-hosted Quilt compiler engine.
//!
//! A host hands [`Compiler`] an engine plus per-call [`CompileConfig`]
//! wiring: a source loader, an evaluator, and success/failure
//! continuations. During a compile the driver answers the engine's
//! dependency requests from a process-lifetime [`OutputCache`] with
//! the loader as fallback, caches macro namespaces the engine
//! evaluates mid-compile, and on success scans the emitted output for
//! the namespaces it declares and caches those as well.

pub mod cache;
pub mod driver;
pub mod error;
pub mod loader;
pub mod scan;

pub use cache::OutputCache;
pub use driver::{CompileConfig, Compiler};
pub use error::CompileFailure;
pub use loader::SourceLoader;
pub use scan::{collect_provided, scan_provides};
