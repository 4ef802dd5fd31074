//! Schema-driven document migration.
//!
//! Reconciles a user document against the latest shipped shape: the shipped
//! tree dictates structure and key order, the user's values survive wherever
//! they are compatible, and keys the shipped shape no longer carries are
//! dropped. Sequences are replaced whole, never element-merged.

use crate::document::Document;
use crate::error::Result;
use crate::resources::ResourceProvider;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

/// What a migration changed, as dotted paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    /// Paths taken from the shipped shape because the user document had no
    /// compatible value there.
    pub added: Vec<String>,
    /// User paths dropped because the shipped shape no longer carries them.
    pub pruned: Vec<String>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.pruned.is_empty()
    }
}

/// Migrates user documents to the latest shipped shape.
pub struct Updater<'r, R: ResourceProvider + ?Sized> {
    resources: &'r R,
}

impl<'r, R: ResourceProvider + ?Sized> Updater<'r, R> {
    pub fn new(resources: &'r R) -> Self {
        Self { resources }
    }

    /// Merge `document` into the shape of the bundled document named
    /// `schema_name` and rewrite its backing file.
    ///
    /// The rewrite goes through a temp sibling and a rename, so the original
    /// file is untouched until the replacement is complete. Idempotent: a
    /// second run reports no changes and rewrites identical content.
    pub fn update(&self, schema_name: &str, document: &mut Document) -> Result<MigrationReport> {
        let schema_bytes = self.resources.open(schema_name)?;
        let schema = Document::from_slice(schema_name, &schema_bytes)?;

        let mut report = MigrationReport::default();
        let merged = merge_value(schema.root(), document.root(), &mut String::new(), &mut report);
        document.replace_root(merged);
        document.save()?;

        if report.is_empty() {
            debug!(file = %document.name(), "document already matches the latest shape");
        } else {
            info!(
                file = %document.name(),
                added = report.added.len(),
                pruned = report.pruned.len(),
                "migrated document to the latest shape"
            );
        }
        Ok(report)
    }
}

/// Merge one node. The shipped value decides the shape:
/// - shipped mapping × user mapping: recurse key by key, in shipped order
/// - shipped mapping × user non-mapping: the shipped subtree wins
/// - shipped scalar or sequence: the user's value wins whole, if present
fn merge_value(
    schema: &Value,
    user: &Value,
    path: &mut String,
    report: &mut MigrationReport,
) -> Value {
    match (schema, user) {
        (Value::Mapping(schema_map), Value::Mapping(user_map)) => {
            let mut merged = Mapping::new();
            for (key, schema_value) in schema_map {
                let label = key_label(key);
                let mark = push_segment(path, &label);
                let merged_value = match user_map.get(key) {
                    Some(user_value) => merge_value(schema_value, user_value, path, report),
                    None => {
                        report.added.push(path.clone());
                        schema_value.clone()
                    }
                };
                pop_segment(path, mark);
                merged.insert(key.clone(), merged_value);
            }
            for (key, _) in user_map {
                if !schema_map.contains_key(key) {
                    report.pruned.push(join_path(path, &key_label(key)));
                }
            }
            Value::Mapping(merged)
        }
        (Value::Mapping(_), _) => {
            report.added.push(path.clone());
            schema.clone()
        }
        (_, user_value) => user_value.clone(),
    }
}

fn key_label(key: &Value) -> String {
    key.as_str()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| format!("{key:?}"))
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn push_segment(path: &mut String, segment: &str) -> usize {
    let mark = path.len();
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(segment);
    mark
}

fn pop_segment(path: &mut String, mark: usize) {
    path.truncate(mark);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(schema: &str, user: &str) -> (Document, MigrationReport) {
        let schema = Document::from_str("schema.yml", schema).unwrap();
        let mut user = Document::from_str("user.yml", user).unwrap();
        let mut report = MigrationReport::default();
        let merged = merge_value(schema.root(), user.root(), &mut String::new(), &mut report);
        user.replace_root(merged);
        (user, report)
    }

    #[test]
    fn test_user_values_survive() {
        let (doc, report) = merge("Foo: 0\nBar: x\n", "Foo: 7\nBar: x\n");
        assert_eq!(doc.get_i64("Foo"), Some(7));
        assert!(report.is_empty());
    }

    #[test]
    fn test_new_keys_get_shipped_defaults() {
        let (doc, report) = merge("Foo: 0\nBar: true\n", "Foo: 1\n");
        assert_eq!(doc.get_bool("Bar"), Some(true));
        assert_eq!(report.added, vec!["Bar"]);
    }

    #[test]
    fn test_stale_keys_are_pruned() {
        let (doc, report) = merge("Foo: 0\n", "Foo: 1\nOld: gone\n");
        assert!(!doc.contains("Old"));
        assert_eq!(report.pruned, vec!["Old"]);
    }

    #[test]
    fn test_worked_scenario() {
        let (doc, report) = merge(
            "LanguageFileName: lang.yml\nFoo: 0\nBar: true\n",
            "LanguageFileName: lang.yml\nFoo: 1\n",
        );
        assert_eq!(doc.get_str("LanguageFileName"), Some("lang.yml"));
        assert_eq!(doc.get_i64("Foo"), Some(1));
        assert_eq!(doc.get_bool("Bar"), Some(true));
        assert_eq!(report.added, vec!["Bar"]);
        assert!(report.pruned.is_empty());
    }

    #[test]
    fn test_nested_sections_merge_recursively() {
        let (doc, report) = merge(
            "Storage:\n  Type: sqlite\n  File: data.db\n  PoolSize: 4\n",
            "Storage:\n  Type: external\n  File: mine.db\n  Legacy: true\n",
        );
        assert_eq!(doc.get_str("Storage.Type"), Some("external"));
        assert_eq!(doc.get_str("Storage.File"), Some("mine.db"));
        assert_eq!(doc.get_i64("Storage.PoolSize"), Some(4));
        assert_eq!(report.added, vec!["Storage.PoolSize"]);
        assert_eq!(report.pruned, vec!["Storage.Legacy"]);
    }

    #[test]
    fn test_output_follows_shipped_key_order() {
        let (doc, _) = merge("A: 1\nB: 2\nC: 3\n", "C: 30\nA: 10\n");
        assert_eq!(doc.keys(false), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sequences_replace_whole() {
        let (doc, report) = merge("Items: [a, b, c]\n", "Items: [z]\n");
        let items = doc.get("Items").unwrap().as_sequence().unwrap();
        assert_eq!(items.len(), 1);
        assert!(report.is_empty());
    }

    #[test]
    fn test_scalar_under_shipped_section_yields_shipped_subtree() {
        let (doc, report) = merge("Storage:\n  Type: sqlite\n", "Storage: off\n");
        assert_eq!(doc.get_str("Storage.Type"), Some("sqlite"));
        assert_eq!(report.added, vec!["Storage"]);
    }

    #[test]
    fn test_empty_user_document_becomes_shipped_defaults() {
        let (doc, report) = merge("A: 1\nB:\n  C: 2\n", "");
        assert_eq!(doc.get_i64("A"), Some(1));
        assert_eq!(doc.get_i64("B.C"), Some(2));
        assert_eq!(report.added, vec!["A", "B"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let schema = "A: 1\nB:\n  C: 2\n  D: [x, y]\n";
        let (once, _) = merge(schema, "A: 9\nB:\n  C: 8\nStale: 1\n");
        let serialized = once.serialize().unwrap();
        let (twice, report) = merge(schema, &serialized);
        assert_eq!(twice.serialize().unwrap(), serialized);
        assert!(report.is_empty());
    }
}
