use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MuyuError;

/// The two durable counters, rewritten wholesale on every save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub total_hits: u64,
    /// Seconds, excluding the session that is currently open.
    pub total_duration: f64,
}

impl PersistedRecord {
    /// Lenient field-by-field read: anything missing or out of range counts as zero.
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let total_hits = match object.get("total_hits") {
            Some(v) => v
                .as_u64()
                .or_else(|| {
                    v.as_f64()
                        .filter(|f| f.is_finite() && *f >= 0.0)
                        .map(|f| f as u64)
                })
                .unwrap_or(0),
            None => 0,
        };

        let total_duration = object
            .get("total_duration")
            .and_then(Value::as_f64)
            .filter(|f| f.is_finite() && *f >= 0.0)
            .unwrap_or(0.0);

        Some(Self {
            total_hits,
            total_duration,
        })
    }
}

pub struct MeritStore {
    path: Option<PathBuf>,
}

impl MeritStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store with no backing file: loads zeros, every save fails.
    pub fn detached() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the record; a missing or corrupt file yields zeros. Never writes.
    pub fn load(&self) -> PersistedRecord {
        let Some(path) = self.path.as_deref() else {
            log::info!("no merit cache location, starting from zero");
            return PersistedRecord::default();
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no merit cache at {}, starting from zero", path.display());
                return PersistedRecord::default();
            }
            Err(err) => {
                log::warn!("merit cache {} unreadable: {err}", path.display());
                return PersistedRecord::default();
            }
        };

        let parsed = serde_json::from_str::<Value>(&contents)
            .ok()
            .and_then(|value| PersistedRecord::from_value(&value));

        match parsed {
            Some(record) => {
                log::info!(
                    "loaded merit cache: hits={}, duration={:.1}s",
                    record.total_hits,
                    record.total_duration
                );
                record
            }
            None => {
                log::warn!(
                    "merit cache {} is corrupt, starting from zero",
                    path.display()
                );
                PersistedRecord::default()
            }
        }
    }

    /// Write to a sibling temp file, then rename it over the cache.
    pub fn save(&self, record: &PersistedRecord) -> Result<(), MuyuError> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| MuyuError::storage("no writable data directory"))?;
        let serialized = serde_json::to_string_pretty(record)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)?;
        if let Err(err) = fs::rename(&tmp_path, path) {
            // Some platforms refuse to rename over an existing file.
            if path.exists() {
                fs::remove_file(path)?;
                fs::rename(&tmp_path, path)?;
            } else {
                return Err(err.into());
            }
        }

        log::debug!(
            "saved merit cache: hits={}, duration={:.1}s",
            record.total_hits,
            record.total_duration
        );
        Ok(())
    }
}
