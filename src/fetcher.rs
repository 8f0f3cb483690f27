use std::thread;
use std::time::Duration;

use camino::Utf8Path;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{CardId, FailurePolicy, SanitizedCard};
use crate::error::SyncError;
use crate::layout::{self, image_path_in};
use crate::scryfall::ScryfallClient;

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub request_interval: Duration,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImage {
    pub id: String,
    pub url: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: Vec<FailedImage>,
}

/// Fixed pause after every request that reaches the image host.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval: Duration,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn pause(&self) {
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
    }
}

/// Downloads each card image into `dataset_dir/<id>.jpg`, skipping files that
/// already exist. Images land through a temp file so a present file is always
/// a complete one.
///
/// With [`FailurePolicy::Continue`] failures are tallied in the summary; with
/// [`FailurePolicy::Abort`] the first failure ends the batch.
pub fn download_all<C: ScryfallClient + ?Sized>(
    client: &C,
    cards: Vec<SanitizedCard>,
    dataset_dir: &Utf8Path,
    options: FetchOptions,
) -> Result<DownloadSummary, SyncError> {
    layout::ensure_dir(dataset_dir)?;

    let throttle = Throttle::new(options.request_interval);
    let mut summary = DownloadSummary::default();
    let total = cards.len();

    for (index, card) in cards.into_iter().enumerate() {
        let id = match card.id.parse::<CardId>() {
            Ok(id) => id,
            Err(err) => {
                record_failure(&mut summary, &card, err, options.failure_policy)?;
                continue;
            }
        };

        let path = image_path_in(dataset_dir, &id);
        if path.as_std_path().exists() {
            debug!(%id, "image already present");
            summary.skipped += 1;
            continue;
        }

        debug!(%id, url = %card.image_uri, progress = index + 1, total, "downloading image");
        let result = download_one(client, &card.image_uri, &path);
        throttle.pause();

        match result {
            Ok(()) => summary.downloaded += 1,
            Err(err) => record_failure(&mut summary, &card, err, options.failure_policy)?,
        }
    }

    info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed.len(),
        "image download finished"
    );
    Ok(summary)
}

fn download_one<C: ScryfallClient + ?Sized>(
    client: &C,
    url: &str,
    path: &Utf8Path,
) -> Result<(), SyncError> {
    let mut temp = layout::temp_file_for(path)?;
    client.download(url, temp.as_file_mut())?;
    temp.persist(path.as_std_path())
        .map_err(|err| SyncError::Filesystem(format!("persist {path}: {}", err.error)))?;
    Ok(())
}

fn record_failure(
    summary: &mut DownloadSummary,
    card: &SanitizedCard,
    err: SyncError,
    policy: FailurePolicy,
) -> Result<(), SyncError> {
    let failure = SyncError::ImageDownload {
        url: card.image_uri.clone(),
        message: err.to_string(),
    };
    warn!(id = %card.id, "{failure}");
    summary.failed.push(FailedImage {
        id: card.id.clone(),
        url: card.image_uri.clone(),
        message: err.to_string(),
    });

    match policy {
        FailurePolicy::Continue => Ok(()),
        FailurePolicy::Abort => {
            warn!(
                downloaded = summary.downloaded,
                skipped = summary.skipped,
                failed = summary.failed.len(),
                "image download aborted"
            );
            Err(failure)
        }
    }
}
