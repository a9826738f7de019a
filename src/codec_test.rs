use super::*;
use crate::model::Background;

fn sample_model() -> ArtModel {
    let mut model = ArtModel::new();
    model.add_emoji("⚽️", (-200, -100), 80);
    model.add_emoji("🥃", (50, 100), 40);
    model
}

// =============================================================
// Round-trip law
// =============================================================

#[test]
fn round_trip_blank_background() {
    let model = sample_model();
    let bytes = encode(&model).unwrap();
    assert_eq!(decode(&bytes).unwrap(), model);
}

#[test]
fn round_trip_url_background() {
    let mut model = sample_model();
    model.set_background(Background::Url("https://x.test/bg.png".into()));
    let bytes = encode(&model).unwrap();
    assert_eq!(decode(&bytes).unwrap(), model);
}

#[test]
fn round_trip_image_data_background() {
    let mut model = sample_model();
    model.set_background(Background::ImageData(vec![0, 1, 2, 254, 255]));
    let bytes = encode(&model).unwrap();
    assert_eq!(decode(&bytes).unwrap(), model);
}

#[test]
fn round_trip_empty_model() {
    let model = ArtModel::new();
    let bytes = encode(&model).unwrap();
    assert_eq!(decode(&bytes).unwrap(), model);
}

// =============================================================
// Wire shape
// =============================================================

#[test]
fn encoded_document_has_expected_shape() {
    let mut model = sample_model();
    model.set_background(Background::Url("https://x.test/bg.png".into()));
    let bytes = encode(&model).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["background"], serde_json::json!({"url": "https://x.test/bg.png"}));
    assert_eq!(json["emojis"].as_array().unwrap().len(), 2);
    let first = &json["emojis"][0];
    assert_eq!(first["text"], "⚽️");
    assert_eq!(first["x"], -200);
    assert_eq!(first["y"], -100);
    assert_eq!(first["size"], 80);
    assert_eq!(first["id"], 1);
}

#[test]
fn image_data_is_base64_text_not_a_number_array() {
    let mut model = ArtModel::new();
    model.set_background(Background::ImageData(vec![1, 2, 3]));
    let bytes = encode(&model).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["background"]["imageData"], "AQID");
}

// =============================================================
// Malformed input
// =============================================================

#[test]
fn decode_rejects_garbage_bytes() {
    assert!(matches!(decode(b"not json at all"), Err(DecodeError::Malformed(_))));
    assert!(matches!(decode(&[0xFF, 0xFE, 0x00]), Err(DecodeError::Malformed(_))));
}

#[test]
fn decode_rejects_wrong_shape() {
    let bytes = br#"{"background": "blank", "emojis": [{"id": 1}]}"#;
    assert!(matches!(decode(bytes), Err(DecodeError::Malformed(_))));
}

#[test]
fn decode_rejects_duplicate_emoji_ids() {
    let text = r#"{
        "background": "blank",
        "emojis": [
            {"id": 1, "text": "🎲", "x": 0, "y": 0, "size": 40},
            {"id": 1, "text": "🎯", "x": 5, "y": 5, "size": 40}
        ]
    }"#;
    assert!(matches!(decode(text.as_bytes()), Err(DecodeError::DuplicateEmojiId(1))));
}
