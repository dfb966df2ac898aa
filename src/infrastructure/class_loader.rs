//! JSON inputs produced outside this crate: the class symbol table, segue
//! identifiers found in source, and an optional framework table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::class::{ClassMap, ClassRecord};
use crate::domain::declaration::SegueIdentifier;
use crate::domain::framework::FrameworkClasses;
use crate::ports::ClassSource;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub(crate) fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let contents = read(path)?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// `className -> ClassRecord`, as written by the source symbol extractor.
pub fn load_classes(path: &Path) -> Result<ClassMap, LoadError> {
    let classes: ClassMap = read_json(path)?;
    debug!(path = %path.display(), classes = classes.len(), "loaded class symbol table");
    Ok(classes)
}

pub fn load_framework_classes(path: &Path) -> Result<FrameworkClasses, LoadError> {
    let records: HashMap<String, ClassRecord> = read_json(path)?;
    Ok(FrameworkClasses::from_records(records))
}

/// `className -> [SegueIdentifier]`. Undecodable data is logged and treated
/// as empty.
pub fn decode_segue_identifiers(data: &[u8]) -> HashMap<String, Vec<SegueIdentifier>> {
    match serde_json::from_slice(data) {
        Ok(identifiers) => identifiers,
        Err(err) => {
            warn!(%err, "ignoring undecodable segue identifier data");
            HashMap::new()
        }
    }
}

pub fn load_segue_identifiers(path: &Path) -> Result<HashMap<String, Vec<SegueIdentifier>>, LoadError> {
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_segue_identifiers(&data))
}

/// Reads the symbol table from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonClassSource {
    path: PathBuf,
}

impl JsonClassSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClassSource for JsonClassSource {
    fn classes(&self) -> anyhow::Result<ClassMap> {
        Ok(load_classes(&self.path)?)
    }
}
