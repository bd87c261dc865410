//! Service catalog: the set of services the dashboard renders and controls.

use crate::api::{ServiceDescriptor, StatusKey};

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate status key in catalog: {0}")]
    DuplicateKey(StatusKey),
}

/// One rendered service: its indicator anchor and restart target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub status_key: StatusKey,
    pub descriptor: ServiceDescriptor,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    entries: Vec<CatalogEntry>,
}

impl ServiceCatalog {
    /// Load a JSON array of entries from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.status_key.as_str()) {
                return Err(CatalogError::DuplicateKey(entry.status_key.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.status_key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StatusKey> {
        self.entries.iter().map(|e| &e.status_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
