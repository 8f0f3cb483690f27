use std::time::Duration;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use mtg_card_sync::config::{Config, ConfigLoader, ConfigOverrides};
use mtg_card_sync::domain::FailurePolicy;
use mtg_card_sync::error::SyncError;

#[test]
fn file_values_apply_and_flags_win() {
    let config: Config = serde_json::from_str(
        r#"{
            "data_dir": "/var/mtg",
            "images_dir": "imgs",
            "request_interval_ms": 250,
            "failure_policy": "abort"
        }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve_config(
        config,
        ConfigOverrides {
            data_dir: None,
            request_interval_ms: Some(500),
            failure_policy: None,
        },
        Utf8PathBuf::from("/cwd/data"),
    );

    assert_eq!(resolved.data_dir, Utf8PathBuf::from("/var/mtg"));
    assert_eq!(resolved.images_dir_name, "imgs");
    assert_eq!(resolved.request_interval, Duration::from_millis(500));
    assert_eq!(resolved.failure_policy, FailurePolicy::Abort);
    assert_eq!(resolved.bulk_data_url, "https://api.scryfall.com/bulk-data");
}

#[test]
fn explicit_missing_config_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("nope.json");

    let result = ConfigLoader::resolve(path.to_str(), ConfigOverrides::default());

    assert_matches!(
        result,
        Err(SyncError::ConfigRead { path: failed, message }) if failed == path && !message.is_empty()
    );
}

#[test]
fn malformed_config_names_file_and_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("broken.json");
    std::fs::write(&path, r#"{"request_interval_ms": "fast"}"#).unwrap();

    let err = ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap_err();

    assert_matches!(&err, SyncError::ConfigParse { path: failed, .. } if *failed == path);
    let message = err.to_string();
    assert!(message.contains("broken.json"));
    assert!(message.contains("invalid type"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("mtg-sync.json");
    std::fs::write(&path, r#"{"dataset_type": "all_cards", "timeout_secs": 5}"#).unwrap();

    let resolved = ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap();

    assert_eq!(resolved.dataset_type, "all_cards");
    assert_eq!(resolved.timeout, Duration::from_secs(5));
}
