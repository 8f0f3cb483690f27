use std::io::{self, Write};

use tracing::info;

use crate::app::{ProgressEvent, ProgressSink, SyncReport};

/// Machine-readable output: progress is silent, the final report goes out as JSON.
pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &SyncReport) -> io::Result<()> {
        Self::write_report(report, &mut io::stdout().lock())
    }

    pub fn write_report<W: Write>(report: &SyncReport, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, report).map_err(io::Error::other)?;
        writer.write_all(b"\n")
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Forwards progress events to the tracing subscriber.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => info!(elapsed_ms = elapsed.as_millis() as u64, "{}", event.message),
            None => info!("{}", event.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::cache::CacheAction;
    use crate::fetcher::{DownloadSummary, FailedImage};

    #[test]
    fn report_is_written_as_json() {
        let report = SyncReport {
            dataset_id: "NEW".to_string(),
            cache_path: "data/default-cards-NEW.json".to_string(),
            cache_action: CacheAction::Reused,
            removed_files: vec!["default-cards-OLD.json".to_string()],
            cleanup_failures: Vec::new(),
            records_total: 3,
            cards_usable: 2,
            sanitize_error: None,
            images_dir: "data/magic-the-gathering-cards".to_string(),
            images: Some(DownloadSummary {
                downloaded: 1,
                skipped: 0,
                failed: vec![FailedImage {
                    id: "b".to_string(),
                    url: "https://img.test/b.jpg".to_string(),
                    message: "404".to_string(),
                }],
            }),
            finished_at: "2026-01-01T00:00:00+00:00".to_string(),
        };

        let mut buffer = Vec::new();
        JsonOutput::write_report(&report, &mut buffer).unwrap();

        assert!(buffer.ends_with(b"\n"));
        let parsed: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["cache_action"], "reused");
        assert_eq!(parsed["cards_usable"], 2);
        assert_eq!(parsed["images"]["failed"][0]["id"], "b");
    }
}
