use std::fs::File;
use std::io::BufReader;

use camino::Utf8Path;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::SanitizedCard;
use crate::error::SyncError;

#[derive(Debug, Clone, Default)]
pub struct SanitizeOutcome {
    pub records_total: usize,
    pub cards: Vec<SanitizedCard>,
    pub read_error: Option<String>,
}

pub fn sanitize(path: &Utf8Path) -> Vec<SanitizedCard> {
    sanitize_file(path).cards
}

/// Unreadable or malformed datasets degrade to an empty result.
pub fn sanitize_file(path: &Utf8Path) -> SanitizeOutcome {
    let records = match load_records(path) {
        Ok(records) => records,
        Err(err) => {
            warn!("{err}");
            return SanitizeOutcome {
                read_error: Some(err.to_string()),
                ..SanitizeOutcome::default()
            };
        }
    };

    info!(count = records.len(), "cards before sanitizing");
    let cards = sanitize_records(&records);
    info!(count = cards.len(), "cards after sanitizing");

    SanitizeOutcome {
        records_total: records.len(),
        cards,
        read_error: None,
    }
}

pub fn load_records(path: &Utf8Path) -> Result<Vec<Value>, SyncError> {
    let read_err = |message: String| SyncError::SanitizeRead {
        path: path.to_string(),
        message,
    };
    let file = File::open(path.as_std_path()).map_err(|err| read_err(err.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| read_err(err.to_string()))
}

pub fn sanitize_records(records: &[Value]) -> Vec<SanitizedCard> {
    records.iter().filter_map(project).collect()
}

// Multi-faced cards keep their images under `card_faces` and are skipped here.
fn project(record: &Value) -> Option<SanitizedCard> {
    let id = record
        .get("id")
        .and_then(|value| value.as_str())
        .filter(|value| !value.is_empty())?;
    let image_uri = record
        .get("image_uris")
        .and_then(|value| value.get("normal"))
        .and_then(|value| value.as_str())
        .filter(|value| !value.is_empty())?;
    Some(SanitizedCard {
        id: id.to_string(),
        image_uri: image_uri.to_string(),
    })
}
