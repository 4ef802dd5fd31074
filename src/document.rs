//! In-memory YAML document with dotted-path access.
//!
//! A [`Document`] is a pure structural container: it loads, navigates, and
//! rewrites a hierarchical key-value tree without attaching meaning to any
//! key. Mapping order is preserved end to end, so a rewritten file keeps the
//! key order of the tree it was serialized from.

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// A hierarchical key-value configuration document.
///
/// Nested keys are addressed with dotted paths (`"Storage.Type"`). Keys are
/// unique within a level; setting through a non-mapping intermediate replaces
/// it with a mapping.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name used in diagnostics (`config.yml`), not the full path.
    name: String,
    /// Backing file, when the document was loaded from disk.
    path: Option<PathBuf>,
    root: Value,
}

impl Document {
    /// Create an empty document with no backing file.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            root: Value::Mapping(Mapping::new()),
        }
    }

    /// Parse a document from YAML text. `name` is used in diagnostics.
    pub fn from_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let root: Value =
            serde_yaml::from_str(text).map_err(|e| Error::yaml(name.clone(), e))?;
        Ok(Self {
            name,
            path: None,
            root: normalize_root(root),
        })
    }

    /// Parse a document from raw bytes.
    pub fn from_slice(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let root: Value =
            serde_yaml::from_slice(bytes).map_err(|e| Error::yaml(name.clone(), e))?;
        Ok(Self {
            name,
            path: None,
            root: normalize_root(root),
        })
    }

    /// Load a document from a file on disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let name = file_name_of(&path);
        let text = fs::read_to_string(&path).map_err(|e| Error::io("read", &path, e))?;
        let root: Value =
            serde_yaml::from_str(&text).map_err(|e| Error::yaml(name.clone(), e))?;
        Ok(Self {
            name,
            path: Some(path),
            root: normalize_root(root),
        })
    }

    /// File name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing file path, when loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The underlying value tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn replace_root(&mut self, root: Value) {
        self.root = normalize_root(root);
    }

    /// Serialize the document to YAML text.
    pub fn serialize(&self) -> Result<String> {
        serde_yaml::to_string(&self.root).map_err(|e| Error::yaml(self.name.clone(), e))
    }

    /// Rewrite the backing file with the current tree.
    ///
    /// Write-then-replace: the serialized text goes to a temp sibling which is
    /// renamed over the original, so the original survives an interrupted
    /// write.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or_else(|| {
            Error::io(
                "write",
                PathBuf::from(&self.name),
                std::io::Error::other("document has no backing file"),
            )
        })?;
        let text = self.serialize()?;
        write_atomic(path, text.as_bytes())
    }

    /// Value at a dotted path, or `None`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// String value at a dotted path.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Boolean value at a dotted path.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    /// Integer value at a dotted path.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path)?.as_i64()
    }

    /// Float value at a dotted path.
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path)?.as_f64()
    }

    /// Whether any value exists at a dotted path.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Set the value at a dotted path, creating intermediate mappings.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        if !self.root.is_mapping() {
            self.root = Value::Mapping(Mapping::new());
        }
        let segments: Vec<&str> = path.split('.').collect();
        if let Value::Mapping(map) = &mut self.root {
            set_path(map, &segments, value.into());
        }
    }

    /// Remove the value at a dotted path, returning it if present.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let segments: Vec<&str> = path.split('.').collect();
        match &mut self.root {
            Value::Mapping(map) => remove_path(map, &segments),
            _ => None,
        }
    }

    /// Dotted paths of all keys, in document order. With `deep`, nested
    /// section keys are included after their section.
    pub fn keys(&self, deep: bool) -> Vec<String> {
        let mut out = Vec::new();
        if let Value::Mapping(map) = &self.root {
            collect_keys(map, "", deep, &mut out);
        }
        out
    }
}

/// An empty or null file parses as `Null`; treat it as an empty mapping so
/// path operations behave uniformly.
fn normalize_root(root: Value) -> Value {
    match root {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn set_path(map: &mut Mapping, segments: &[&str], value: Value) {
    let key = Value::String(segments[0].to_string());
    if segments.len() == 1 {
        map.insert(key, value);
        return;
    }
    let child = map
        .entry(key)
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !child.is_mapping() {
        *child = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(child_map) = child {
        set_path(child_map, &segments[1..], value);
    }
}

fn remove_path(map: &mut Mapping, segments: &[&str]) -> Option<Value> {
    if segments.len() == 1 {
        return map.remove(segments[0]);
    }
    match map.get_mut(segments[0])? {
        Value::Mapping(child) => remove_path(child, &segments[1..]),
        _ => None,
    }
}

fn collect_keys(map: &Mapping, prefix: &str, deep: bool, out: &mut Vec<String>) {
    for (key, value) in map {
        let Some(name) = key.as_str() else { continue };
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        out.push(path.clone());
        if deep && let Value::Mapping(child) = value {
            collect_keys(child, &path, deep, out);
        }
    }
}

/// Write `contents` to `path` through a temp sibling plus rename.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = tmp_sibling(path);
    fs::write(&tmp, contents).map_err(|e| Error::io("write", &tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io("replace", path, e))?;
    Ok(())
}

pub(crate) fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "document".into());
    name.push(".tmp");
    path.with_file_name(name)
}
