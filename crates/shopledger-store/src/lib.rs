//! JSON persistence for the shopledger store.
//!
//! The whole ledger lives in one JSON file: `{products, purchases, sales,
//! nextId}` with camelCase field names. This crate reads and writes that
//! file wholesale and handles backup export/import. A missing ledger file
//! reads back as an empty store; saves go through a temp file in the same
//! directory followed by a rename, so a crash mid-write never leaves a
//! half-written ledger behind.
//!
//! # Example
//!
//! ```
//! use shopledger_store::JsonStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let file = JsonStore::new(dir.path().join("ledger.json"));
//!
//! // A ledger that does not exist yet reads back empty.
//! let mut store = file.load().unwrap();
//! assert!(store.products.is_empty());
//!
//! store.take_product_id();
//! file.save(&store).unwrap();
//! assert_eq!(file.load().unwrap().next_id.product, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use shopledger_core::store::LedgerStore;

/// Top-level fields a backup file must carry to be accepted by [`import`].
const REQUIRED_FIELDS: [&str; 4] = ["products", "purchases", "sales", "nextId"];

/// Errors that can occur while reading or writing the ledger file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error reading or writing a file.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The ledger file exists but does not hold a valid store.
    #[error("failed to parse ledger file {path}: {source}")]
    Parse {
        /// The ledger file path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A backup file offered for import is unusable.
    #[error("invalid backup {path}: {reason}")]
    InvalidBackup {
        /// The backup file path.
        path: PathBuf,
        /// What made it unusable.
        reason: String,
    },

    /// Export was asked for an empty ledger.
    #[error("nothing to export: the ledger has no products")]
    NothingToExport,
}

/// Handle on a ledger file path.
///
/// Construction does not touch the disk; [`load`](JsonStore::load) and
/// [`save`](JsonStore::save) do.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Create a handle for the ledger file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The ledger file path this handle reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger file.
    ///
    /// A file that does not exist yet yields an empty store with counters
    /// at 1; that is the one IO failure treated as normal.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file exists but cannot be read,
    /// and [`StoreError::Parse`] when its contents are not a valid store.
    pub fn load(&self) -> Result<LedgerStore, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "ledger file missing, starting empty");
                return Ok(LedgerStore::new());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let store: LedgerStore =
            serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
                path: self.path.clone(),
                source: e,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            products = store.products.len(),
            purchases = store.purchases.len(),
            sales = store.sales.len(),
            "loaded ledger"
        );
        Ok(store)
    }

    /// Write the ledger file, creating parent directories as needed.
    ///
    /// The store is serialized to pretty-printed JSON, written to a temp
    /// file next to the target, and renamed into place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when directories cannot be created or
    /// the write/rename fails.
    pub fn save(&self, store: &LedgerStore) -> Result<(), StoreError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;

        let contents = to_pretty_json(store);

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        tmp.write_all(contents.as_bytes()).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = contents.len(),
            "saved ledger"
        );
        Ok(())
    }
}

/// Read the ledger file at `path`.
///
/// Convenience wrapper over [`JsonStore::load`].
///
/// # Errors
///
/// Same as [`JsonStore::load`].
pub fn load(path: impl Into<PathBuf>) -> Result<LedgerStore, StoreError> {
    JsonStore::new(path).load()
}

/// Write the ledger file at `path`.
///
/// Convenience wrapper over [`JsonStore::save`].
///
/// # Errors
///
/// Same as [`JsonStore::save`].
pub fn save(path: impl Into<PathBuf>, store: &LedgerStore) -> Result<(), StoreError> {
    JsonStore::new(path).save(store)
}

/// Write the whole store to `path` as a pretty-printed backup.
///
/// # Errors
///
/// Returns [`StoreError::NothingToExport`] when the store has no products,
/// and [`StoreError::Io`] when the file cannot be written.
pub fn export(store: &LedgerStore, path: &Path) -> Result<(), StoreError> {
    if store.products.is_empty() {
        return Err(StoreError::NothingToExport);
    }

    let contents = to_pretty_json(store);
    fs::write(path, contents).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "exported backup");
    Ok(())
}

/// Read and check a backup file, returning the store it holds.
///
/// The file must parse as JSON and carry all four top-level fields
/// (`products`, `purchases`, `sales`, `nextId`). The caller decides
/// whether to replace the live ledger with the result.
///
/// # Errors
///
/// Returns [`StoreError::Io`] when the file cannot be read and
/// [`StoreError::InvalidBackup`] when it is not a usable backup.
pub fn import(path: &Path) -> Result<LedgerStore, StoreError> {
    let contents = fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| StoreError::InvalidBackup {
            path: path.to_path_buf(),
            reason: format!("not valid JSON: {e}"),
        })?;

    let Some(object) = value.as_object() else {
        return Err(StoreError::InvalidBackup {
            path: path.to_path_buf(),
            reason: "top level is not a JSON object".to_string(),
        });
    };
    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(StoreError::InvalidBackup {
                path: path.to_path_buf(),
                reason: format!("missing required field \"{field}\""),
            });
        }
    }

    let store: LedgerStore =
        serde_json::from_value(value).map_err(|e| StoreError::InvalidBackup {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::debug!(
        path = %path.display(),
        products = store.products.len(),
        "read backup"
    );
    Ok(store)
}

/// Serialize a store to pretty JSON with a trailing newline.
fn to_pretty_json(store: &LedgerStore) -> String {
    // LedgerStore serialization cannot fail: no maps with non-string keys,
    // no custom Serialize impls.
    let mut contents =
        serde_json::to_string_pretty(store).unwrap_or_else(|_| String::from("{}"));
    contents.push('\n');
    contents
}
