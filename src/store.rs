// Persistence of the latest result. The primary JSON document and the
// script-loadable mirror are always written from the same serialization;
// each write succeeds or fails on its own.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::StoredResult;

/// Global the browser viewer reads the latest document from.
pub const VIEWER_GLOBAL: &str = "window.KAMOS_LATEST_DATA";

/// Locations of the persisted document pair.
#[derive(Debug, Clone)]
pub struct Store {
    json_path: PathBuf,
    js_path: PathBuf,
}

/// Outcome of a dual write. Both halves are attempted regardless of the other.
#[derive(Debug)]
pub struct PersistReport {
    pub json: StoreResult<()>,
    pub mirror: StoreResult<()>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.json.is_ok() && self.mirror.is_ok()
    }
}

impl Store {
    pub fn new(json_path: impl Into<PathBuf>, js_path: impl Into<PathBuf>) -> Self {
        Self {
            json_path: json_path.into(),
            js_path: js_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.latest_json_path(), config.viewer_js_path())
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn js_path(&self) -> &Path {
        &self.js_path
    }

    /// Read the primary document.
    pub fn load(&self) -> StoreResult<StoredResult> {
        let text = read_file(&self.json_path)?;
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            path: self.json_path.clone(),
            source,
        })
    }

    /// Read the document embedded in the viewer mirror.
    pub fn load_mirror(&self) -> StoreResult<StoredResult> {
        let text = read_file(&self.js_path)?;
        let payload = unwrap_mirror(&text);
        serde_json::from_str(payload).map_err(|source| StoreError::Corrupt {
            path: self.js_path.clone(),
            source,
        })
    }

    /// Write `document` to both files. Failures are logged as warnings and
    /// returned in the report; they never stop the other write.
    pub fn persist(&self, document: &StoredResult) -> PersistReport {
        let json = match serde_json::to_string_pretty(document) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize document");
                let mirror_err = <serde_json::Error as serde::ser::Error>::custom(e.to_string());
                return PersistReport {
                    json: Err(StoreError::Serialize(e)),
                    mirror: Err(StoreError::Serialize(mirror_err)),
                };
            }
        };

        let json_result = write_file(&self.json_path, &json);
        if let Err(e) = &json_result {
            warn!(error = %e, "Failed to save temp JSON");
        }

        let mirror_result = write_file(&self.js_path, &wrap_mirror(&json));
        if let Err(e) = &mirror_result {
            warn!(error = %e, "Failed to save dashboard JS");
        }

        debug!(
            json = %self.json_path.display(),
            mirror = %self.js_path.display(),
            "Persisted latest result"
        );

        PersistReport {
            json: json_result,
            mirror: mirror_result,
        }
    }
}

/// Wrap serialized JSON as a single assignment statement.
pub fn wrap_mirror(json: &str) -> String {
    format!("{} = {};", VIEWER_GLOBAL, json)
}

/// Strip the assignment wrapper, leaving the JSON payload.
pub fn unwrap_mirror(text: &str) -> &str {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix(VIEWER_GLOBAL)
        .map(|rest| rest.trim_start().trim_start_matches('=').trim_start())
        .unwrap_or(trimmed);
    body.strip_suffix(';').unwrap_or(body)
}

fn read_file(path: &Path) -> StoreResult<String> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn write_file(path: &Path, contents: &str) -> StoreResult<()> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}
