use std::fs;
use std::io;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::BulkDataEntry;
use crate::error::SyncError;
use crate::layout::{self, cache_file_name};
use crate::scryfall::ScryfallClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheAction {
    Reused,
    Downloaded,
}

#[derive(Debug, Clone)]
pub struct CacheOutcome {
    pub path: Utf8PathBuf,
    pub action: CacheAction,
    pub removed: Vec<String>,
    pub cleanup_failures: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SweepResult {
    pub removed: Vec<String>,
    pub failures: Vec<SyncError>,
}

/// Makes sure `dir` holds exactly one snapshot: the one for `entry`.
///
/// An existing file is trusted as complete; it is only ever produced by an
/// atomic rename. The payload is fetched when missing, then every other file
/// in `dir` is swept.
pub fn ensure_cached<C: ScryfallClient + ?Sized>(
    client: &C,
    entry: BulkDataEntry,
    dir: &Utf8Path,
) -> Result<CacheOutcome, SyncError> {
    layout::ensure_dir(dir)?;

    let file_name = cache_file_name(&entry.id);
    let path = dir.join(&file_name);

    let action = if path.as_std_path().exists() {
        info!(%path, "dataset already cached");
        CacheAction::Reused
    } else {
        info!(url = %entry.download_uri, "downloading bulk dataset");
        let payload = client.fetch_json(&entry.download_uri)?;
        info!(%path, "saving dataset");
        layout::write_json_atomic(&path, &payload)?;
        CacheAction::Downloaded
    };

    let sweep = sweep_stale(dir, &file_name);
    Ok(CacheOutcome {
        path,
        action,
        removed: sweep.removed,
        cleanup_failures: sweep.failures.iter().map(ToString::to_string).collect(),
    })
}

/// Best-effort removal of every top-level file in `dir` except `keep`.
/// Directories are left alone and one failure never stops the scan.
pub fn sweep_stale(dir: &Utf8Path, keep: &str) -> SweepResult {
    sweep_stale_with(dir, keep, |path| fs::remove_file(path))
}

/// Same as [`sweep_stale`] with the per-file removal supplied by the caller.
pub fn sweep_stale_with<F>(dir: &Utf8Path, keep: &str, mut remove: F) -> SweepResult
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut result = SweepResult::default();

    let entries = match fs::read_dir(dir.as_std_path()) {
        Ok(entries) => entries,
        Err(err) => {
            let failure = SyncError::CacheCleanup {
                path: dir.to_string(),
                message: err.to_string(),
            };
            warn!("{failure}");
            result.failures.push(failure);
            return result;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let failure = SyncError::CacheCleanup {
                    path: dir.to_string(),
                    message: err.to_string(),
                };
                warn!("{failure}");
                result.failures.push(failure);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if name == keep {
            continue;
        }
        let is_file = entry
            .file_type()
            .map(|file_type| file_type.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        info!(file = %name, "removing stale file");
        match remove(&entry.path()) {
            Ok(()) => result.removed.push(name),
            Err(err) => {
                let failure = SyncError::CacheCleanup {
                    path: name,
                    message: err.to_string(),
                };
                warn!("{failure}");
                result.failures.push(failure);
            }
        }
    }

    result.removed.sort();
    result
}
