//! Error types for the configuration load sequence.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while materializing, backing up, loading, or migrating
/// configuration documents.
#[derive(Debug, Error)]
pub enum Error {
    /// A bundled default document is absent from the application package.
    /// This is a packaging defect, not a user error.
    #[error("bundled resource '{name}' not found in the application package")]
    ResourceMissing { name: String },

    /// Filesystem failure while creating directories, copying, or writing.
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be parsed or serialized as YAML. The underlying
    /// diagnostic includes line/column when the parser provides one.
    #[error("invalid YAML in {file}: {source}")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document's file name references a key of another managed document
    /// that has not been loaded yet. Document order must place the referenced
    /// document first.
    #[error("file name of '{document}' is read from '{referenced}', which is not loaded yet")]
    UnresolvedReference { document: String, referenced: String },

    /// Aggregate failure for one managed document. Carries the user file name
    /// so the host can report which file needs attention.
    #[error("failed to load {file}; verify its syntax with a YAML validator and check the logs")]
    LoadFailed {
        file: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn yaml(file: impl Into<String>, source: serde_yaml::Error) -> Self {
        Error::Yaml {
            file: file.into(),
            source,
        }
    }

    pub fn resource_missing(name: impl Into<String>) -> Self {
        Error::ResourceMissing { name: name.into() }
    }

    pub fn load_failed(file: impl Into<String>, source: Error) -> Self {
        Error::LoadFailed {
            file: file.into(),
            source: Box::new(source),
        }
    }

    /// Line/column of the syntax error, when this is a parse failure and the
    /// parser reported a location. 1-indexed.
    pub fn parse_location(&self) -> Option<(usize, usize)> {
        match self {
            Error::Yaml { source, .. } => source.location().map(|l| (l.line(), l.column())),
            Error::LoadFailed { source, .. } => source.parse_location(),
            _ => None,
        }
    }

    /// The user file this error is about, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            Error::Yaml { file, .. } | Error::LoadFailed { file, .. } => Some(file),
            Error::Io { path, .. } => path.to_str(),
            _ => None,
        }
    }
}
