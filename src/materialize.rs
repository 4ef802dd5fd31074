//! First-run materialization of bundled default documents.

use crate::error::{Error, Result};
use crate::resources::ResourceProvider;
use std::fs;
use std::path::Path;
use tracing::info;

/// Ensure a regular file exists at `target`, copying the bundled resource
/// `resource_name` into place if it does not.
///
/// Parent directories are created as needed. Idempotent: when the file
/// already exists the call is a no-op regardless of its content. Returns
/// whether the default was materialized.
pub fn ensure_exists<R: ResourceProvider + ?Sized>(
    target: &Path,
    resource_name: &str,
    resources: &R,
) -> Result<bool> {
    if target.is_file() {
        return Ok(false);
    }

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
    }

    let bytes = resources.open(resource_name)?;
    fs::write(target, bytes).map_err(|e| Error::io("write", target, e))?;
    info!(file = %target.display(), "materialized default document");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::DirResources;
    use tempfile::TempDir;

    fn provider_with(name: &str, content: &str) -> (TempDir, DirResources) {
        let bundle = TempDir::new().unwrap();
        fs::write(bundle.path().join(name), content).unwrap();
        let provider = DirResources::new(bundle.path());
        (bundle, provider)
    }

    #[test]
    fn test_materializes_default_when_absent() {
        let (_bundle, provider) = provider_with("config.yml", "a: 1\n");
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("data").join("config.yml");

        let created = ensure_exists(&target, "config.yml", &provider).unwrap();
        assert!(created);
        assert_eq!(fs::read_to_string(&target).unwrap(), "a: 1\n");
    }

    #[test]
    fn test_existing_file_is_left_alone() {
        let (_bundle, provider) = provider_with("config.yml", "a: 1\n");
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("config.yml");
        fs::write(&target, "user: edited\n").unwrap();

        let created = ensure_exists(&target, "config.yml", &provider).unwrap();
        assert!(!created);
        assert_eq!(fs::read_to_string(&target).unwrap(), "user: edited\n");
    }

    #[test]
    fn test_missing_resource_is_a_packaging_error() {
        let bundle = TempDir::new().unwrap();
        let provider = DirResources::new(bundle.path());
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("config.yml");

        let err = ensure_exists(&target, "config.yml", &provider).unwrap_err();
        assert!(matches!(err, Error::ResourceMissing { .. }));
        assert!(!target.exists());
    }
}
