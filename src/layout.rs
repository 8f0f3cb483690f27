use std::fs;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::{Builder, NamedTempFile};

use crate::config::SyncConfig;
use crate::domain::CardId;
use crate::error::SyncError;

pub const CACHE_FILE_PREFIX: &str = "default-cards-";
pub const IMAGE_EXT: &str = "jpg";

/// Where the dataset snapshot and the card images live.
#[derive(Debug, Clone)]
pub struct DataLayout {
    data_dir: Utf8PathBuf,
    images_dir: Utf8PathBuf,
}

impl DataLayout {
    pub fn new(config: &SyncConfig) -> Self {
        let images_dir = config.data_dir.join(&config.images_dir_name);
        Self {
            data_dir: config.data_dir.clone(),
            images_dir,
        }
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn images_dir(&self) -> &Utf8Path {
        &self.images_dir
    }

    pub fn cache_file_path(&self, dataset_id: &str) -> Utf8PathBuf {
        self.data_dir.join(cache_file_name(dataset_id))
    }

    pub fn ensure_data_dir(&self) -> Result<(), SyncError> {
        ensure_dir(&self.data_dir)
    }
}

pub fn cache_file_name(dataset_id: &str) -> String {
    format!("{CACHE_FILE_PREFIX}{dataset_id}.json")
}

pub fn image_path_in(dir: &Utf8Path, id: &CardId) -> Utf8PathBuf {
    dir.join(format!("{id}.{IMAGE_EXT}"))
}

pub fn ensure_dir(dir: &Utf8Path) -> Result<(), SyncError> {
    fs::create_dir_all(dir.as_std_path())
        .map_err(|err| SyncError::Filesystem(format!("create {dir}: {err}")))
}

/// Temp file next to `dest` so the final rename stays on one filesystem.
pub fn temp_file_for(dest: &Utf8Path) -> Result<NamedTempFile, SyncError> {
    let parent = dest
        .parent()
        .ok_or_else(|| SyncError::Filesystem(format!("invalid destination path {dest}")))?;
    Builder::new()
        .prefix(".mtg-sync")
        .suffix(".tmp")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| SyncError::Filesystem(format!("create temp file in {parent}: {err}")))
}

/// Writes pretty-printed JSON (four-space indent) and renames it into place.
pub fn write_json_atomic<T: Serialize>(path: &Utf8Path, value: &T) -> Result<(), SyncError> {
    let cache_err = |message: String| SyncError::CacheWrite {
        path: path.to_string(),
        message,
    };

    let temp = temp_file_for(path).map_err(|err| cache_err(err.to_string()))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|err| cache_err(err.to_string()))?;
        writer.flush().map_err(|err| cache_err(err.to_string()))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|err| cache_err(err.to_string()))?;
    temp.persist(path.as_std_path())
        .map_err(|err| cache_err(err.error.to_string()))?;
    Ok(())
}
