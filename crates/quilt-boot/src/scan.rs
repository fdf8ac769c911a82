//! Discovery of the namespaces declared by emitted compiler output.

use std::collections::HashMap;

use quilt_engine::{EngineIntrospect, NamespaceArtifact, NamespaceIdentity};

/// Opening of a provide-declaration line in emitted output.
const PROVIDE_OPEN: &str = "quilt.provide(\"";
/// Closing of a provide-declaration line.
const PROVIDE_CLOSE: &str = "\");";

/// Namespace names declared by `emitted`, in file order.
///
/// A declaration is a line of the exact form `quilt.provide("a.b.c");`
/// (surrounding whitespace ignored) naming one quoted dotted
/// identifier. Lines that do not match are skipped silently; text with
/// no declarations yields an empty vector. Scanning never fails.
///
/// Only names are recovered here. Whether a name denotes a macro
/// namespace is analysis metadata, resolved when the cache record is
/// constructed.
pub fn scan_provides(emitted: &str) -> Vec<String> {
    emitted.lines().filter_map(parse_provide_line).collect()
}

fn parse_provide_line(line: &str) -> Option<String> {
    let name = line
        .trim()
        .strip_prefix(PROVIDE_OPEN)?
        .strip_suffix(PROVIDE_CLOSE)?;
    is_dotted_identifier(name).then(|| name.to_string())
}

/// One or more non-empty identifier segments joined by single dots.
fn is_dotted_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$'))
        })
}

/// Cache entries for every namespace `emitted` declares.
///
/// Each discovered name is classified as macro or runtime through the
/// engine's analysis metadata, paired with its derived path and a
/// snapshot of the engine's current analysis for it, and associated
/// with the full emitted text. One compile unit's output may define
/// several namespaces jointly, so all of them share that text.
pub fn collect_provided(
    engine: &dyn EngineIntrospect,
    emitted: &str,
) -> HashMap<String, NamespaceArtifact> {
    scan_provides(emitted)
        .into_iter()
        .map(|name| {
            let identity = if engine.is_macro_namespace(&name) {
                NamespaceIdentity::macros(name)
            } else {
                NamespaceIdentity::new(name)
            };
            let analysis = engine.analysis(&identity.name);
            let key = identity.cache_key();
            (key, NamespaceArtifact::compiled(identity, emitted, analysis))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use quilt_engine::{AnalysisSnapshot, Lang};

    use super::*;

    #[test]
    fn no_declarations_yield_empty() {
        assert!(scan_provides("").is_empty());
        assert!(scan_provides("var x = 1;\nfoo.bar.baz();\n").is_empty());
    }

    #[test]
    fn declarations_are_recovered_in_file_order() {
        let emitted = "\
quilt.provide(\"app.core\");
var a = 1;
  quilt.provide(\"lib.util\");
app.core.main = function() {};
quilt.provide(\"lib.util.inner\");
";
        assert_eq!(
            scan_provides(emitted),
            ["app.core", "lib.util", "lib.util.inner"]
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let emitted = "\
quilt.provide(app.core);
quilt.provide(\"app.core\")
quilt.provide(\"app..core\");
quilt.provide(\"\");
quilt.provide(\"app.core\"); // trailing
quilt.provide(\"app core\");
";
        assert!(scan_provides(emitted).is_empty());
    }

    #[test]
    fn names_may_carry_munged_characters() {
        let emitted = "quilt.provide(\"my-app.core_v2$impl\");\n";
        assert_eq!(scan_provides(emitted), ["my-app.core_v2$impl"]);
    }

    struct FixedIntrospect {
        macro_names: Vec<&'static str>,
    }

    impl EngineIntrospect for FixedIntrospect {
        fn analysis(&self, name: &str) -> Option<AnalysisSnapshot> {
            Some(serde_json::json!({ "name": name, "defs": 1 }))
        }

        fn is_macro_namespace(&self, name: &str) -> bool {
            self.macro_names.contains(&name)
        }

        fn dump(&self) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    #[test]
    fn records_classify_macro_namespaces_and_share_emitted_text() {
        let engine = FixedIntrospect {
            macro_names: vec!["app.macros"],
        };
        let emitted = "quilt.provide(\"app.core\");\nquilt.provide(\"app.macros\");\n";
        let entries = collect_provided(&engine, emitted);

        assert_eq!(entries.len(), 2);
        let core = &entries["app.core"];
        let macros = &entries["app.macros$macros"];

        assert_eq!(core.lang, Lang::Compiled);
        assert_eq!(core.source, emitted);
        assert_eq!(macros.source, emitted);
        assert_eq!(core.path.as_deref(), Some("app/core"));
        assert_eq!(macros.path.as_deref(), Some("app/macros"));
        assert!(macros.identity.as_ref().is_some_and(|id| id.is_macro));
        assert_eq!(core.analysis.as_ref().map(|a| a["defs"].clone()), Some(1.into()));
    }
}
