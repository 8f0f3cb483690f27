use std::io::Write;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::domain::BulkDataListing;
use crate::error::SyncError;

pub const ACCEPT_HEADER: &str = "application/json;q=0.9,*/*;q=0.8";

pub trait ScryfallClient: Send + Sync {
    fn fetch_listing(&self, url: &str) -> Result<BulkDataListing, SyncError>;
    fn fetch_json(&self, url: &str) -> Result<Value, SyncError>;
    /// Streams the body of `url` into `writer`, returning the number of bytes written.
    fn download(&self, url: &str, writer: &mut dyn Write) -> Result<u64, SyncError>;
}

#[derive(Clone)]
pub struct ScryfallHttpClient {
    client: Client,
}

impl ScryfallHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("mtg-card-sync/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| SyncError::Http(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| SyncError::Http(err.to_string()))?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Response, SyncError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| SyncError::Http(format!("GET {url}: {err}")))?;
        Self::handle_status(url, response)
    }

    fn handle_status(url: &str, response: Response) -> Result<Response, SyncError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .map(|body| format!("GET {url}: {body}"))
            .unwrap_or_else(|_| format!("GET {url} failed"));
        Err(SyncError::HttpStatus { status, message })
    }
}

impl ScryfallClient for ScryfallHttpClient {
    fn fetch_listing(&self, url: &str) -> Result<BulkDataListing, SyncError> {
        self.get(url)?
            .json()
            .map_err(|err| SyncError::Http(format!("decode bulk-data listing from {url}: {err}")))
    }

    fn fetch_json(&self, url: &str) -> Result<Value, SyncError> {
        self.get(url)?
            .json()
            .map_err(|err| SyncError::Http(format!("decode JSON from {url}: {err}")))
    }

    fn download(&self, url: &str, writer: &mut dyn Write) -> Result<u64, SyncError> {
        let mut response = self.get(url)?;
        std::io::copy(&mut response, writer)
            .map_err(|err| SyncError::Http(format!("read body of {url}: {err}")))
    }
}
