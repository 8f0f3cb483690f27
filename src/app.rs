use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cache::{self, CacheAction};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::fetcher::{self, DownloadSummary, FetchOptions};
use crate::layout::DataLayout;
use crate::resolver;
use crate::sanitize;
use crate::scryfall::ScryfallClient;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub skip_images: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub dataset_id: String,
    pub cache_path: String,
    pub cache_action: CacheAction,
    pub removed_files: Vec<String>,
    pub cleanup_failures: Vec<String>,
    pub records_total: usize,
    pub cards_usable: usize,
    pub sanitize_error: Option<String>,
    pub images_dir: String,
    pub images: Option<DownloadSummary>,
    pub finished_at: String,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<C: ScryfallClient> {
    config: SyncConfig,
    layout: DataLayout,
    client: C,
}

impl<C: ScryfallClient> App<C> {
    pub fn new(config: SyncConfig, client: C) -> Self {
        let layout = DataLayout::new(&config);
        Self {
            config,
            layout,
            client,
        }
    }

    /// Resolve, cache, sanitize, then fetch images; strictly in that order.
    pub fn run(
        &self,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<SyncReport, SyncError> {
        self.layout.ensure_data_dir()?;

        sink.event(ProgressEvent {
            message: format!("phase=Resolve; querying {}", self.config.bulk_data_url),
            elapsed: None,
        });
        let start = Instant::now();
        let entry = resolver::resolve_dataset(
            &self.client,
            &self.config.bulk_data_url,
            &self.config.dataset_type,
        )?;
        let dataset_id = entry.id.clone();
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; selected {} {dataset_id}", entry.kind),
            elapsed: Some(start.elapsed()),
        });

        let start = Instant::now();
        let outcome = cache::ensure_cached(&self.client, entry, self.layout.data_dir())?;
        let message = match outcome.action {
            CacheAction::Reused => "phase=Cache; dataset already cached".to_string(),
            CacheAction::Downloaded => format!("phase=Cache; saved {}", outcome.path),
        };
        sink.event(ProgressEvent {
            message,
            elapsed: Some(start.elapsed()),
        });
        for name in &outcome.removed {
            sink.event(ProgressEvent {
                message: format!("phase=Cache; removed stale file {name}"),
                elapsed: None,
            });
        }

        let sanitized = sanitize::sanitize_file(&outcome.path);
        sink.event(ProgressEvent {
            message: format!(
                "phase=Sanitize; {} of {} cards usable",
                sanitized.cards.len(),
                sanitized.records_total
            ),
            elapsed: None,
        });
        let cards_usable = sanitized.cards.len();

        let images = if options.skip_images {
            None
        } else {
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Fetch; downloading into {} (on error: {})",
                    self.layout.images_dir(),
                    self.config.failure_policy
                ),
                elapsed: None,
            });
            let start = Instant::now();
            let summary = fetcher::download_all(
                &self.client,
                sanitized.cards,
                self.layout.images_dir(),
                FetchOptions {
                    request_interval: self.config.request_interval,
                    failure_policy: self.config.failure_policy,
                },
            )?;
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Fetch; downloaded={} skipped={} failed={}",
                    summary.downloaded,
                    summary.skipped,
                    summary.failed.len()
                ),
                elapsed: Some(start.elapsed()),
            });
            Some(summary)
        };

        Ok(SyncReport {
            dataset_id,
            cache_path: outcome.path.to_string(),
            cache_action: outcome.action,
            removed_files: outcome.removed,
            cleanup_failures: outcome.cleanup_failures,
            records_total: sanitized.records_total,
            cards_usable,
            sanitize_error: sanitized.read_error,
            images_dir: self.layout.images_dir().to_string(),
            images,
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
