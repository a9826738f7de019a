//! Document file encode/decode.
//!
//! The persisted document format is a single JSON object:
//!
//! ```json
//! {
//!   "background": "blank" | {"url": "…"} | {"imageData": "<base64>"},
//!   "emojis": [{"id": 1, "text": "⚽️", "x": -200, "y": -100, "size": 80}]
//! }
//! ```
//!
//! `decode(encode(m)) == m` holds for every reachable model. Both the
//! save path and the autosave path go through `encode`; document open and
//! autosave restore go through `decode`.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::collections::HashSet;

use crate::model::{ArtModel, EmojiId};

/// Persisted bytes are not a well-formed document. Surfaced to the caller
/// of open/load; the document fails to open.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate emoji id {0}")]
    DuplicateEmojiId(EmojiId),
}

/// The model could not be serialized. Autosave logs this and skips the
/// write; it is never fatal.
#[derive(Debug, thiserror::Error)]
#[error("failed to encode document: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Serialize a model to document-file bytes.
pub fn encode(model: &ArtModel) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(model)?)
}

/// Parse document-file bytes back into a model. The emoji-id uniqueness
/// invariant is enforced here so a hand-edited file cannot smuggle
/// duplicates into a live document.
pub fn decode(bytes: &[u8]) -> Result<ArtModel, DecodeError> {
    let model: ArtModel = serde_json::from_slice(bytes)?;
    let mut seen = HashSet::new();
    for emoji in &model.emojis {
        if !seen.insert(emoji.id) {
            return Err(DecodeError::DuplicateEmojiId(emoji.id));
        }
    }
    Ok(model)
}
