//! Bundled resource access.
//!
//! The load sequence reads two kinds of bundled bytes by name: default
//! documents to materialize on first run, and the latest shipped document
//! shape driving migration. [`ResourceProvider`] abstracts where those bytes
//! come from: compiled into the binary ([`EmbeddedResources`]) or a packaged
//! directory on disk ([`DirResources`]).

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default documents embedded at compile time.
pub mod defaults {
    pub const MAIN: &str = include_str!("defaults/config.yml");
    pub const LANG: &str = include_str!("defaults/lang.yml");
    pub const GUI: &str = include_str!("defaults/gui.yml");
}

/// Source of bundled resource bytes, addressed by name.
pub trait ResourceProvider {
    /// Read the bundled resource `name`.
    ///
    /// Fails with [`Error::ResourceMissing`] when the package does not carry
    /// a resource under that name.
    fn open(&self, name: &str) -> Result<Vec<u8>>;
}

/// Resources compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResources;

impl ResourceProvider for EmbeddedResources {
    fn open(&self, name: &str) -> Result<Vec<u8>> {
        let text = match name {
            "config.yml" => defaults::MAIN,
            "lang.yml" => defaults::LANG,
            "gui.yml" => defaults::GUI,
            _ => return Err(Error::resource_missing(name)),
        };
        Ok(text.as_bytes().to_vec())
    }
}

/// Resources packaged as plain files under a directory.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceProvider for DirResources {
    fn open(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::resource_missing(name))
            }
            Err(e) => Err(Error::io("read", path, e)),
        }
    }
}
