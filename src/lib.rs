//! Startup configuration lifecycle for host applications.
//!
//! `config-steward` owns the on-disk lifecycle of a small set of YAML
//! configuration documents: it materializes bundled defaults on first run,
//! keeps a stale-aware `.bak` of every managed file, loads the user's
//! documents into memory, and migrates each one to the latest shipped shape:
//! new keys get their shipped defaults, user-set values survive, and keys the
//! shipped shape dropped are pruned.
//!
//! The whole sequence is synchronous and runs once during host startup:
//!
//! ```no_run
//! use config_steward::{ConfigurationManager, EmbeddedResources};
//!
//! # fn main() -> config_steward::Result<()> {
//! let mut manager = ConfigurationManager::new("/var/lib/my-app", EmbeddedResources);
//! manager.load_all()?;
//! let main = manager.document("config.yml").expect("loaded");
//! println!("language file: {:?}", main.get_str("LanguageFileName"));
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod document;
pub mod error;
pub mod logging;
pub mod manager;
pub mod materialize;
pub mod paths;
pub mod resources;
pub mod updater;

pub use document::Document;
pub use error::{Error, Result};
pub use manager::{ConfigurationManager, DocumentSpec, FileName, default_documents};
pub use resources::{DirResources, EmbeddedResources, ResourceProvider};
pub use updater::{MigrationReport, Updater};
