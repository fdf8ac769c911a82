//! Process-lifetime cache of compiled namespace output.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use quilt_engine::NamespaceArtifact;
use tracing::debug;

/// Mapping from composite cache key to compiled-namespace artifact;
/// the single source of truth for "do we already have this namespace
/// compiled".
///
/// Entries are inserted or overwritten through [`merge`](Self::merge),
/// never removed, and the cache lives as long as the process. Each
/// merge holds the write lock for the whole batch, so a read never
/// observes a partially applied merge. Recompiling a namespace
/// overwrites its entry: last writer wins.
#[derive(Debug, Default)]
pub struct OutputCache {
    entries: RwLock<HashMap<String, NamespaceArtifact>>,
}

impl OutputCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached artifact under `key`, if any. Pure read.
    pub fn get(&self, key: &str) -> Option<NamespaceArtifact> {
        self.read().get(key).cloned()
    }

    /// Insert or overwrite every entry in one atomic batch.
    ///
    /// Safe to call from inside an engine hook while the enclosing
    /// compile is still in flight.
    pub fn merge<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, NamespaceArtifact)>,
    {
        let mut map = self.write();
        for (key, artifact) in entries {
            debug!(key = %key, lang = ?artifact.lang, "caching namespace output");
            map.insert(key, artifact);
        }
    }

    /// Whether the runtime flavor of `name` is cached. The runtime
    /// cache key is the bare name; macro entries are not consulted.
    pub fn has_compiled_namespace(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Diagnostic dump of the full cache, keys in sorted order.
    pub fn dump(&self) -> serde_json::Value {
        let entries = self.read();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        let mut map = serde_json::Map::with_capacity(keys.len());
        for key in keys {
            let value = serde_json::to_value(&entries[key]).unwrap_or(serde_json::Value::Null);
            map.insert(key.clone(), value);
        }
        serde_json::Value::Object(map)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, NamespaceArtifact>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, NamespaceArtifact>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use quilt_engine::NamespaceIdentity;

    use super::*;

    fn compiled(name: &str) -> (String, NamespaceArtifact) {
        let identity = NamespaceIdentity::new(name);
        let key = identity.cache_key();
        (key, NamespaceArtifact::compiled(identity, format!("{name};"), None))
    }

    #[test]
    fn get_returns_merged_entry() {
        let cache = OutputCache::new();
        let (key, artifact) = compiled("app.core");
        cache.merge([(key.clone(), artifact.clone())]);
        assert_eq!(cache.get(&key), Some(artifact));
        assert_eq!(cache.get("app.other"), None);
    }

    #[test]
    fn merge_is_idempotent() {
        let cache = OutputCache::new();
        let entries = vec![compiled("app.core"), compiled("lib.util")];
        cache.merge(entries.clone());
        let once = cache.dump();
        cache.merge(entries);
        assert_eq!(cache.dump(), once);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn remerge_overwrites_entry() {
        let cache = OutputCache::new();
        let (key, artifact) = compiled("app.core");
        cache.merge([(key.clone(), artifact)]);

        let replacement = NamespaceArtifact::compiled(
            NamespaceIdentity::new("app.core"),
            "app.core.v2;",
            None,
        );
        cache.merge([(key.clone(), replacement.clone())]);
        assert_eq!(cache.get(&key), Some(replacement));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn has_compiled_namespace_ignores_macro_entries() {
        let cache = OutputCache::new();
        let identity = NamespaceIdentity::macros("app.macros");
        let key = identity.cache_key();
        cache.merge([(key, NamespaceArtifact::compiled(identity, "code;", None))]);

        assert!(!cache.has_compiled_namespace("app.macros"));
        assert!(cache.get("app.macros$macros").is_some());
    }

    #[test]
    fn dump_orders_keys() {
        let cache = OutputCache::new();
        cache.merge(vec![compiled("b.ns"), compiled("a.ns"), compiled("c.ns")]);
        let dump = cache.dump();
        let keys: Vec<&String> = dump.as_object().expect("object dump").keys().collect();
        assert_eq!(keys, ["a.ns", "b.ns", "c.ns"]);
        assert_eq!(dump["a.ns"]["lang"], "compiled");
        assert_eq!(dump["a.ns"]["path"], "a/ns");
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = OutputCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }
}
