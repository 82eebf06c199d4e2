//! Local cache of place files
//!
//! Each cached place is one JSON object holding the place record fields and,
//! optionally, the backend `id` last known locally. The id is advisory and
//! may be stale; the backend is the source of truth.

use crate::model::PlaceRecord;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key holding the locally known backend id
pub const ID_KEY: &str = "id";

/// Suffix appended to the stem of an enriched place file
pub const ENRICHED_SUFFIX: &str = "_ai_cleaned";

/// Cache file errors, always naming the file involved
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{path} does not hold a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("{path} has a non-integer id: {value}")]
    InvalidId { path: PathBuf, value: String },

    #[error("{path} is not a valid place record: {source}")]
    Record {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A place record plus its locally held id
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCacheEntry {
    pub id: Option<i64>,
    pub place: PlaceRecord,
}

impl LocalCacheEntry {
    pub fn new(place: PlaceRecord) -> Self {
        Self { id: None, place }
    }

    /// Serializes the entry as one JSON object, `id` last
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(&self.place)?;
        if let (Some(id), Value::Object(map)) = (self.id, &mut value) {
            map.insert(ID_KEY.to_string(), Value::from(id));
        }
        Ok(value)
    }
}

/// Outcome of stripping the id from one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripOutcome {
    /// The id was removed and the file rewritten
    Removed,
    /// The file had no id and was left untouched
    NoIdField,
}

fn read_object(path: &Path) -> Result<Map<String, Value>, CacheError> {
    let content = fs::read_to_string(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CacheError::NotAnObject {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CacheError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_value(path: &Path, value: &Value) -> Result<(), CacheError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CacheError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut content = serde_json::to_string_pretty(value).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    content.push('\n');

    fs::write(path, content).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Splits the id off a cache object
///
/// A `null` id counts as absent. Numeric strings are accepted.
fn take_id(path: &Path, map: &mut Map<String, Value>) -> Result<Option<i64>, CacheError> {
    let Some(raw) = map.remove(ID_KEY) else {
        return Ok(None);
    };

    let id = match &raw {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    id.map(Some).ok_or_else(|| CacheError::InvalidId {
        path: path.to_path_buf(),
        value: raw.to_string(),
    })
}

/// Reads one cache file
pub fn read_entry(path: &Path) -> Result<LocalCacheEntry, CacheError> {
    let mut map = read_object(path)?;
    let id = take_id(path, &mut map)?;

    let place = serde_json::from_value(Value::Object(map)).map_err(|source| CacheError::Record {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(LocalCacheEntry { id, place })
}

/// Writes one cache file as pretty JSON followed by a newline
///
/// Parent directories are created as needed.
pub fn write_entry(path: &Path, entry: &LocalCacheEntry) -> Result<(), CacheError> {
    let value = entry.to_value().map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_value(path, &value)
}

/// Lists every `.json` file under `dir`, recursively, in sorted order
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>, CacheError> {
    let mut files = Vec::new();
    collect_json_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CacheError> {
    let entries = fs::read_dir(dir).map_err(|source| CacheError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let path = entry
            .map_err(|source| CacheError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();

        if path.is_dir() {
            collect_json_files(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }

    Ok(())
}

/// Removes the `id` key from one file, leaving every other key as it was
///
/// A file without an id is not rewritten.
pub fn strip_id(path: &Path) -> Result<StripOutcome, CacheError> {
    let map = read_object(path)?;
    if !map.contains_key(ID_KEY) {
        return Ok(StripOutcome::NoIdField);
    }

    let stripped: Map<String, Value> = map.into_iter().filter(|(k, _)| k != ID_KEY).collect();
    write_value(path, &Value::Object(stripped))?;
    Ok(StripOutcome::Removed)
}

/// Strips ids from every JSON file under `dir`
///
/// Failures on single files are logged and reported; the sweep continues.
pub fn strip_ids(
    dir: &Path,
) -> Result<Vec<(PathBuf, Result<StripOutcome, CacheError>)>, CacheError> {
    let files = json_files(dir)?;
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let outcome = strip_id(&path);
        match &outcome {
            Ok(StripOutcome::Removed) => tracing::info!("Removed 'id' from {}", path.display()),
            Ok(StripOutcome::NoIdField) => {
                tracing::info!("No 'id' field found in {}", path.display())
            }
            Err(e) => tracing::warn!("Error processing {}: {}", path.display(), e),
        }
        results.push((path, outcome));
    }

    Ok(results)
}

/// Name of the enriched file produced from `source`: `<stem>_ai_cleaned.json`
pub fn enriched_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "place".to_string());
    format!("{}{}.json", stem, ENRICHED_SUFFIX)
}
