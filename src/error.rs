use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SyncError {
    #[error("cannot find a bulk data entry of type {kind}")]
    #[diagnostic(help("check the bulk-data listing or the configured dataset_type"))]
    Resolution { kind: String },

    #[error("failed to write dataset cache {path}: {message}")]
    CacheWrite { path: String, message: String },

    #[error("failed to remove stale file {path}: {message}")]
    CacheCleanup { path: String, message: String },

    #[error("failed to read dataset {path}: {message}")]
    SanitizeRead { path: String, message: String },

    #[error("failed to download image {url}: {message}")]
    ImageDownload { url: String, message: String },

    #[error("invalid card id: {0}")]
    InvalidCardId(String),

    #[error("Scryfall request failed: {0}")]
    Http(String),

    #[error("Scryfall returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("failed to read config file at {path}: {message}")]
    ConfigRead { path: PathBuf, message: String },

    #[error("failed to parse JSON config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
