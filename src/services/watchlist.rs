//! Watchlist persistence.

use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const WATCHLIST_FILE: &str = "watchlist.json";

/// Symbols tracked between runs, stored as a JSON array.
pub struct WatchlistStore {
    path: PathBuf,
}

impl WatchlistStore {
    /// Store backed by `<data_dir>/watchlist.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(WATCHLIST_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            AppError::Persistence(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Add a symbol. Returns false if it was already present.
    pub fn add(&self, symbol: &str) -> Result<bool> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AppError::Persistence("Cannot add an empty symbol".to_string()));
        }

        let mut symbols = self.list()?;
        if symbols.contains(&symbol) {
            return Ok(false);
        }

        symbols.push(symbol.clone());
        self.write(&symbols)?;
        info!("Added {} to watchlist", symbol);
        Ok(true)
    }

    /// Remove a symbol. Returns false if it was not present.
    pub fn remove(&self, symbol: &str) -> Result<bool> {
        let symbol = symbol.trim().to_uppercase();
        let mut symbols = self.list()?;
        let before = symbols.len();
        symbols.retain(|s| s != &symbol);

        if symbols.len() == before {
            return Ok(false);
        }

        self.write(&symbols)?;
        info!("Removed {} from watchlist", symbol);
        Ok(true)
    }

    fn write(&self, symbols: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Persistence(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(symbols)?;
        fs::write(&self.path, json).map_err(|e| {
            AppError::Persistence(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
