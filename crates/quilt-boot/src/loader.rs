//! Dependency resolution and macro-cache hooks wired into the engine.

use quilt_engine::{Ack, LoadContinuation, MacroArtifact, NamespaceArtifact, NamespaceIdentity};
use tracing::{debug, trace};

use crate::cache::OutputCache;

/// Supplies source text for namespaces that miss the cache.
pub trait SourceLoader {
    /// Source for `identity`, or `None` when no source is known.
    fn load(&self, identity: &NamespaceIdentity) -> Option<String>;
}

impl<F> SourceLoader for F
where
    F: Fn(&NamespaceIdentity) -> Option<String>,
{
    fn load(&self, identity: &NamespaceIdentity) -> Option<String> {
        self(identity)
    }
}

/// Answer one engine dependency request from the cache, falling back
/// to `loader`.
///
/// The continuation is honored on every path, so a synchronous cache
/// hit looks no different to the engine than a loaded result. `None`
/// tells the engine the dependency is unresolved; what that means is
/// the engine's business, not this layer's. Never fails.
pub fn resolve(
    cache: &OutputCache,
    loader: &dyn SourceLoader,
    identity: &NamespaceIdentity,
    done: LoadContinuation,
) {
    let key = identity.cache_key();
    if let Some(hit) = cache.get(&key) {
        trace!(namespace = %identity, "dependency served from cache");
        done(Some(hit));
        return;
    }
    match loader.load(identity) {
        Some(source) => {
            trace!(namespace = %identity, "dependency served by source loader");
            done(Some(NamespaceArtifact::from_source(source)));
        }
        None => {
            debug!(namespace = %identity, "dependency unresolved");
            done(None);
        }
    }
}

/// Cache a compiled macro namespace before the engine evaluates it, so
/// the same process never recompiles it.
///
/// This hook is only ever invoked for macro namespaces, so the macro
/// flavor of the artifact's name is taken as given. The engine
/// requires the ack to proceed and ignores its payload.
pub fn cache_macro(cache: &OutputCache, artifact: &MacroArtifact, ack: Ack) {
    let identity = NamespaceIdentity::macros(artifact.name.as_str());
    debug!(namespace = %identity, "caching macro namespace before evaluation");
    let key = identity.cache_key();
    let record = NamespaceArtifact::compiled(
        identity,
        artifact.source.clone(),
        Some(artifact.analysis.clone()),
    );
    cache.merge([(key, record)]);
    ack();
}
