//! Load-sequence orchestration for the managed documents.
//!
//! For each managed document, in declared order: resolve the user file name,
//! materialize the bundled default if the file is absent, refresh the backup,
//! load the file, migrate it to the latest shipped shape. Any failure aborts
//! the remainder of the sequence; documents loaded before the failure stay in
//! memory, but the call reports failure and the host must not finish
//! starting.

use crate::backup;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::materialize;
use crate::resources::ResourceProvider;
use crate::updater::Updater;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Key of the main document naming the language file.
pub const LANGUAGE_FILE_KEY: &str = "LanguageFileName";

/// How a managed document's user file name is determined.
///
/// The language file's name lives inside the main document, so it can only be
/// resolved after the main document is loaded. Spelling that out as a variant
/// keeps the ordering dependency visible in the document list instead of
/// burying it in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileName {
    /// A fixed file name.
    Fixed(String),
    /// Read from a key of an earlier-loaded document, with a fallback when
    /// the key is absent.
    FromDocument {
        /// Schema name of the document carrying the key.
        document: String,
        key: String,
        fallback: String,
    },
}

/// One managed document: the bundled schema it migrates against, and how its
/// user file is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    /// Name of the bundled latest-shape document; also the handle the loaded
    /// document is retrieved by.
    pub schema: String,
    pub file: FileName,
}

impl DocumentSpec {
    /// A document whose user file shares the schema's name.
    pub fn fixed(schema: impl Into<String>) -> Self {
        let schema = schema.into();
        Self {
            file: FileName::Fixed(schema.clone()),
            schema,
        }
    }

    /// A document whose user file name is read from an earlier document.
    pub fn named_by(
        schema: impl Into<String>,
        document: impl Into<String>,
        key: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            file: FileName::FromDocument {
                document: document.into(),
                key: key.into(),
                fallback: fallback.into(),
            },
        }
    }
}

/// The default managed set: the main document, the language document named by
/// the main document's `LanguageFileName` key, and the GUI document.
pub fn default_documents() -> Vec<DocumentSpec> {
    vec![
        DocumentSpec::fixed("config.yml"),
        DocumentSpec::named_by("lang.yml", "config.yml", LANGUAGE_FILE_KEY, "lang.yml"),
        DocumentSpec::fixed("gui.yml"),
    ]
}

/// Owns the load sequence and the loaded documents.
///
/// Construct once with the host's data directory and resource source, call
/// [`load_all`](Self::load_all) during startup, then hand out documents by
/// schema name for the rest of the run.
pub struct ConfigurationManager<R: ResourceProvider> {
    data_dir: PathBuf,
    resources: R,
    specs: Vec<DocumentSpec>,
    documents: Vec<(String, Document)>,
}

impl<R: ResourceProvider> ConfigurationManager<R> {
    /// Manage the default document set under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>, resources: R) -> Self {
        Self::with_documents(data_dir, resources, default_documents())
    }

    /// Manage an explicit, ordered document set.
    pub fn with_documents(
        data_dir: impl Into<PathBuf>,
        resources: R,
        specs: Vec<DocumentSpec>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            resources,
            specs,
            documents: Vec::new(),
        }
    }

    /// The data directory the managed files live in.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Run the full load sequence over every managed document, in order.
    ///
    /// On failure the error names the document that failed; documents loaded
    /// before it remain accessible, but the host must treat startup as
    /// failed.
    pub fn load_all(&mut self) -> Result<()> {
        info!("backing up and loading configuration files");
        self.documents.clear();

        let specs = self.specs.clone();
        for spec in &specs {
            let file_name = self.resolve_file_name(spec)?;
            match self.load_one(spec, &file_name) {
                Ok(document) => self.documents.push((spec.schema.clone(), document)),
                Err(err) => return Err(Error::load_failed(file_name, err)),
            }
        }
        Ok(())
    }

    /// Re-run the load sequence, replacing the in-memory documents.
    pub fn reload(&mut self) -> Result<()> {
        self.load_all()
    }

    /// A loaded document, by schema name.
    pub fn document(&self, schema: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|(name, _)| name == schema)
            .map(|(_, doc)| doc)
    }

    /// Mutable access to a loaded document, by schema name.
    pub fn document_mut(&mut self, schema: &str) -> Option<&mut Document> {
        self.documents
            .iter_mut()
            .find(|(name, _)| name == schema)
            .map(|(_, doc)| doc)
    }

    /// Schema names of the documents loaded so far, in load order.
    pub fn loaded(&self) -> Vec<&str> {
        self.documents.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn resolve_file_name(&self, spec: &DocumentSpec) -> Result<String> {
        match &spec.file {
            FileName::Fixed(name) => Ok(name.clone()),
            FileName::FromDocument {
                document,
                key,
                fallback,
            } => {
                let source = self.document(document).ok_or_else(|| {
                    Error::UnresolvedReference {
                        document: spec.schema.clone(),
                        referenced: document.clone(),
                    }
                })?;
                Ok(source
                    .get_str(key)
                    .unwrap_or(fallback.as_str())
                    .to_string())
            }
        }
    }

    fn load_one(&self, spec: &DocumentSpec, file_name: &str) -> Result<Document> {
        let target = self.data_dir.join(file_name);
        materialize::ensure_exists(&target, file_name, &self.resources)?;
        backup::backup(&target)?;
        let mut document = Document::load(&target)?;
        Updater::new(&self.resources).update(&spec.schema, &mut document)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::DirResources;
    use tempfile::TempDir;

    fn bundle(files: &[(&str, &str)]) -> (TempDir, DirResources) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        let provider = DirResources::new(dir.path());
        (dir, provider)
    }

    #[test]
    fn test_resolve_fixed_name() {
        let (_bundle, provider) = bundle(&[]);
        let manager = ConfigurationManager::new("/tmp/none", provider);
        let spec = DocumentSpec::fixed("config.yml");
        assert_eq!(manager.resolve_file_name(&spec).unwrap(), "config.yml");
    }

    #[test]
    fn test_reference_before_load_is_an_error() {
        let (_bundle, provider) = bundle(&[]);
        let manager = ConfigurationManager::new("/tmp/none", provider);
        let spec = DocumentSpec::named_by("lang.yml", "config.yml", LANGUAGE_FILE_KEY, "lang.yml");
        assert!(matches!(
            manager.resolve_file_name(&spec),
            Err(Error::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_default_documents_order() {
        let specs = default_documents();
        assert_eq!(specs[0].schema, "config.yml");
        assert_eq!(specs[1].schema, "lang.yml");
        assert_eq!(specs[2].schema, "gui.yml");
        assert!(matches!(specs[1].file, FileName::FromDocument { .. }));
    }

    #[test]
    fn test_document_spec_round_trips_through_yaml() {
        let spec = DocumentSpec::named_by("lang.yml", "config.yml", LANGUAGE_FILE_KEY, "lang.yml");
        let text = serde_yaml::to_string(&spec).unwrap();
        let back: DocumentSpec = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, spec);
    }
}
