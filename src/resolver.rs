use tracing::info;

use crate::domain::{BulkDataEntry, BulkDataListing};
use crate::error::SyncError;
use crate::scryfall::ScryfallClient;

/// Queries the bulk-data listing and picks the `kind` entry.
pub fn resolve_dataset<C: ScryfallClient + ?Sized>(
    client: &C,
    listing_url: &str,
    kind: &str,
) -> Result<BulkDataEntry, SyncError> {
    info!(url = listing_url, "querying bulk-data listing");
    let listing = client.fetch_listing(listing_url)?;
    let entry = select_entry(listing, kind)?;
    info!(id = %entry.id, kind, "resolved bulk dataset");
    Ok(entry)
}

/// Last matching entry wins when the listing carries duplicates.
pub fn select_entry(listing: BulkDataListing, kind: &str) -> Result<BulkDataEntry, SyncError> {
    listing
        .data
        .into_iter()
        .rev()
        .find(|entry| entry.kind == kind)
        .ok_or_else(|| SyncError::Resolution {
            kind: kind.to_string(),
        })
}
