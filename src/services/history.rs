//! Per-symbol signal history persistence.

use crate::error::{AppError, Result};
use crate::types::SignalHistoryEntry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Default number of entries kept per symbol.
pub const HISTORY_LIMIT: usize = 10;

const HISTORY_FILE: &str = "signal_history.json";

/// Storage for recorded signals, oldest first.
pub trait SignalHistoryStore: Send + Sync {
    fn load(&self, symbol: &str) -> Result<Vec<SignalHistoryEntry>>;

    fn save(&self, symbol: &str, entries: &[SignalHistoryEntry]) -> Result<()>;

    /// Most recent entry, if any.
    fn latest(&self, symbol: &str) -> Result<Option<SignalHistoryEntry>> {
        Ok(self.load(symbol)?.pop())
    }

    /// Append an entry and drop the oldest ones beyond `limit`.
    fn append(
        &self,
        symbol: &str,
        entry: SignalHistoryEntry,
        limit: usize,
    ) -> Result<Vec<SignalHistoryEntry>> {
        let mut entries = self.load(symbol)?;
        entries.push(entry);
        if entries.len() > limit {
            let excess = entries.len() - limit;
            entries.drain(..excess);
        }
        self.save(symbol, &entries)?;
        Ok(entries)
    }
}

type HistoryMap = BTreeMap<String, Vec<SignalHistoryEntry>>;

/// History kept as one JSON object keyed by symbol.
pub struct JsonHistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonHistoryStore {
    /// Store backed by `<data_dir>/signal_history.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::at_path(data_dir.as_ref().join(HISTORY_FILE))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HistoryMap> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HistoryMap::new()),
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(HistoryMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            warn!("Signal history at {} is corrupt: {}", self.path.display(), e);
            AppError::Persistence(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, map: &HistoryMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Persistence(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                AppError::Persistence(format!("Failed to write {}: {}", self.path.display(), e))
            })
    }
}

impl SignalHistoryStore for JsonHistoryStore {
    fn load(&self, symbol: &str) -> Result<Vec<SignalHistoryEntry>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_all()?;
        Ok(map.remove(&symbol.to_uppercase()).unwrap_or_default())
    }

    fn save(&self, symbol: &str, entries: &[SignalHistoryEntry]) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_all()?;
        map.insert(symbol.to_uppercase(), entries.to_vec());
        self.write_all(&map)?;
        debug!(
            "Saved {} history entries for {}",
            entries.len(),
            symbol.to_uppercase()
        );
        Ok(())
    }
}
