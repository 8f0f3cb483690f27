mod common;

use std::fs;

use common::utf8_tempdir;
use mtg_card_sync::domain::SanitizedCard;
use mtg_card_sync::sanitize::{sanitize, sanitize_file};

#[test]
fn keeps_only_cards_with_id_and_normal_image() {
    let (_temp, dir) = utf8_tempdir();
    let path = dir.join("default-cards-X.json");
    fs::write(
        path.as_std_path(),
        r#"[{"id":"a","image_uris":{"normal":"http://x/a.jpg"}}, {"id":"b"}, {"id":"","image_uris":{"normal":"http://x/c.jpg"}}]"#,
    )
    .unwrap();

    assert_eq!(
        sanitize(&path),
        vec![SanitizedCard {
            id: "a".to_string(),
            image_uri: "http://x/a.jpg".to_string(),
        }]
    );
}

#[test]
fn counts_records_before_filtering() {
    let (_temp, dir) = utf8_tempdir();
    let path = dir.join("default-cards-X.json");
    fs::write(
        path.as_std_path(),
        r#"[{"id":"a","image_uris":{"normal":"http://x/a.jpg"}},{"id":"b","card_faces":[]}]"#,
    )
    .unwrap();

    let outcome = sanitize_file(&path);

    assert_eq!(outcome.records_total, 2);
    assert_eq!(outcome.cards.len(), 1);
    assert!(outcome.read_error.is_none());
}

#[test]
fn missing_file_yields_empty_result() {
    let (_temp, dir) = utf8_tempdir();
    let path = dir.join("absent.json");

    let outcome = sanitize_file(&path);

    assert!(outcome.cards.is_empty());
    let message = outcome.read_error.unwrap();
    assert!(message.contains("absent.json"));
}

#[test]
fn malformed_file_yields_empty_result() {
    let (_temp, dir) = utf8_tempdir();
    let path = dir.join("default-cards-X.json");
    fs::write(path.as_std_path(), r#"{"data": "not an array"}"#).unwrap();

    assert!(sanitize(&path).is_empty());
}
