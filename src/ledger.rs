// src/ledger.rs
//! Bounded, persisted ledger of previously alerted announcement URLs.
//!
//! One JSON file per source. Capacity is deliberately small: the watcher is a
//! low-volume poller, not an archive, so the ledger stays O(N) forever. The
//! accepted tradeoff is that a post resurfacing after more than N newer ones
//! may alert again.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default number of URLs remembered per source.
pub const DEFAULT_CAPACITY: usize = 3;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("reading ledger {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("writing ledger {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// FIFO ledger for one source, backed by a single JSON file.
///
/// The file is read fresh for every operation and never cached across check
/// cycles, so an interruption between cycles cannot corrupt it.
#[derive(Debug, Clone)]
pub struct AlertLedger {
    path: PathBuf,
    capacity: usize,
}

impl AlertLedger {
    pub fn new(dir: impl AsRef<Path>, source_name: &str) -> Self {
        Self::with_capacity(dir, source_name, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(dir: impl AsRef<Path>, source_name: &str, capacity: usize) -> Self {
        Self {
            path: dir.as_ref().join(format!("{source_name}.json")),
            capacity: capacity.max(1),
        }
    }

    /// Has this URL already been alerted on? A missing ledger file is an
    /// empty ledger, not an error.
    pub fn exists(&self, url: &str) -> Result<bool, LedgerError> {
        Ok(self.load()?.iter().any(|u| u == url))
    }

    /// Append `url` unless it is already present, evicting the oldest entry
    /// beyond capacity. Returns `true` when the URL was newly recorded.
    ///
    /// Idempotent: repeating the call with an already-seen URL is a no-op.
    pub fn record_if_absent(&self, url: &str) -> Result<bool, LedgerError> {
        let mut urls = self.load()?;
        if urls.iter().any(|u| u == url) {
            return Ok(false);
        }
        urls.push(url.to_string());
        if urls.len() > self.capacity {
            let excess = urls.len() - self.capacity;
            urls.drain(0..excess);
        }
        self.store(&urls)?;
        Ok(true)
    }

    /// Ordered snapshot of the persisted entries, oldest first.
    pub fn entries(&self) -> Result<Vec<String>, LedgerError> {
        self.load()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<String>, LedgerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LedgerError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|e| LedgerError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Single atomic write of the full record: temp file then rename, so a
    /// crash mid-write leaves the previous ledger intact.
    fn store(&self, urls: &[String]) -> Result<(), LedgerError> {
        let write_err = |e: std::io::Error| LedgerError::Write {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string(urls).map_err(|e| LedgerError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}
