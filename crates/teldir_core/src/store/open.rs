//! Store bootstrap entry points.
//!
//! # Responsibility
//! - Open the directory file in the configured mode.
//! - Emit `store_open` events with duration and status.

use super::{DirectoryStore, FileDirectoryStore, OpenMode, StoreResult};
use crate::config::DirectoryConfig;
use log::{error, info};
use std::path::Path;
use std::time::Instant;

/// Opens the directory store described by `config`.
pub fn open_store(config: &DirectoryConfig) -> StoreResult<FileDirectoryStore> {
    open_store_at(&config.path, config.open_mode)
}

/// Opens the directory file at `path` in `mode`.
///
/// # Side effects
/// - `OpenMode::Truncate` discards any existing file content.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store_at(path: impl AsRef<Path>, mode: OpenMode) -> StoreResult<FileDirectoryStore> {
    let started_at = Instant::now();
    info!(
        "event=store_open module=store status=start mode={}",
        mode.as_str()
    );

    match FileDirectoryStore::open(path, mode) {
        Ok(store) => {
            info!(
                "event=store_open module=store status=ok mode={} duration_ms={} entries={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                store.len()
            );
            Ok(store)
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode={} duration_ms={} error={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
