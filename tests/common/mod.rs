#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use camino::Utf8PathBuf;
use serde_json::{Value, json};

use mtg_card_sync::domain::{BulkDataEntry, BulkDataListing, DEFAULT_CARDS, SanitizedCard};
use mtg_card_sync::error::SyncError;
use mtg_card_sync::scryfall::ScryfallClient;

pub const LISTING_URL: &str = "https://api.test/bulk-data";

#[derive(Default)]
pub struct MockScryfall {
    pub listing: Vec<BulkDataEntry>,
    pub payloads: HashMap<String, Value>,
    pub images: HashMap<String, Vec<u8>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockScryfall {
    pub fn with_dataset(id: &str, payload: Value) -> Self {
        let entry = entry(DEFAULT_CARDS, id);
        let mut payloads = HashMap::new();
        payloads.insert(entry.download_uri.clone(), payload);
        Self {
            listing: vec![entry],
            payloads,
            ..Self::default()
        }
    }

    pub fn image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.calls.lock().unwrap().push(url.to_string());
    }
}

impl ScryfallClient for MockScryfall {
    fn fetch_listing(&self, url: &str) -> Result<BulkDataListing, SyncError> {
        self.record(url);
        Ok(BulkDataListing {
            data: self.listing.clone(),
        })
    }

    fn fetch_json(&self, url: &str) -> Result<Value, SyncError> {
        self.record(url);
        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| SyncError::HttpStatus {
                status: 404,
                message: url.to_string(),
            })
    }

    fn download(&self, url: &str, writer: &mut dyn Write) -> Result<u64, SyncError> {
        self.record(url);
        let bytes = self.images.get(url).ok_or_else(|| SyncError::HttpStatus {
            status: 404,
            message: url.to_string(),
        })?;
        writer
            .write_all(bytes)
            .map_err(|err| SyncError::Http(err.to_string()))?;
        Ok(bytes.len() as u64)
    }
}

pub fn entry(kind: &str, id: &str) -> BulkDataEntry {
    BulkDataEntry {
        kind: kind.to_string(),
        id: id.to_string(),
        download_uri: format!("https://data.test/{id}.json"),
    }
}

pub fn card(id: &str) -> SanitizedCard {
    SanitizedCard {
        id: id.to_string(),
        image_uri: image_url(id),
    }
}

pub fn image_url(id: &str) -> String {
    format!("https://img.test/{id}.jpg")
}

pub fn raw_card(id: &str) -> Value {
    json!({
        "object": "card",
        "id": id,
        "name": format!("Card {id}"),
        "image_uris": { "small": format!("https://img.test/{id}-small.jpg"), "normal": image_url(id) }
    })
}

pub fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, path)
}
