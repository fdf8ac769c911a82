//! Namespace identity and cache-key derivation.

use std::fmt;

use serde::Serialize;

/// Suffix appended to a namespace name to form the cache key of its
/// macro variant.
pub const MACRO_SUFFIX: &str = "$macros";

/// One namespace in one of its two flavors: ordinary runtime code, or
/// macro code evaluated during compilation.
///
/// Two identities are equal iff both the name and the flavor match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamespaceIdentity {
    /// Dotted namespace name, e.g. `app.core`.
    pub name: String,
    /// Whether this is the macro flavor of the namespace.
    pub is_macro: bool,
}

impl NamespaceIdentity {
    /// Identity of the runtime flavor of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_macro: false,
        }
    }

    /// Identity of the macro flavor of `name`.
    pub fn macros(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_macro: true,
        }
    }

    /// Composite cache key: the name, with [`MACRO_SUFFIX`] appended
    /// for the macro flavor.
    ///
    /// The key is a plain string. A name that already ends in the
    /// suffix is therefore indistinguishable from the macro flavor of
    /// the unsuffixed name; an accepted limitation.
    pub fn cache_key(&self) -> String {
        if self.is_macro {
            format!("{}{}", self.name, MACRO_SUFFIX)
        } else {
            self.name.clone()
        }
    }

    /// File-style path for this namespace: every `.` becomes a `/`.
    pub fn as_path(&self) -> String {
        self.name.replace('.', "/")
    }
}

impl fmt::Display for NamespaceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_and_runtime_keys_never_collide() {
        for name in ["app.core", "a", "deeply.nested.ns"] {
            let runtime = NamespaceIdentity::new(name);
            let macros = NamespaceIdentity::macros(name);
            assert_ne!(runtime.cache_key(), macros.cache_key());
        }
    }

    #[test]
    fn macro_key_is_suffixed_name() {
        assert_eq!(NamespaceIdentity::macros("app.core").cache_key(), "app.core$macros");
        assert_eq!(NamespaceIdentity::new("app.core").cache_key(), "app.core");
    }

    #[test]
    fn suffixed_name_collides_with_macro_flavor() {
        // Known edge case: string keys cannot tell these apart.
        let literal = NamespaceIdentity::new("app.core$macros");
        let derived = NamespaceIdentity::macros("app.core");
        assert_ne!(literal, derived);
        assert_eq!(literal.cache_key(), derived.cache_key());
    }

    #[test]
    fn path_replaces_every_separator() {
        assert_eq!(NamespaceIdentity::new("app.core.util").as_path(), "app/core/util");
        assert_eq!(NamespaceIdentity::new("single").as_path(), "single");
    }

    #[test]
    fn display_matches_cache_key() {
        let identity = NamespaceIdentity::macros("app.core");
        assert_eq!(identity.to_string(), identity.cache_key());
    }
}
