//! Art model: placed emoji, the background choice, and the mutation ops.
//!
//! This module defines the pure data layer that describes what is on the
//! canvas (`Emoji`, `Background`, `ArtModel`). It has no opinion about
//! undo, persistence, or fetching; those live in the document controller.
//! Mutations by id are permissive: an absent id is a silent no-op, never
//! an error.
//!
//! Data flows into this layer from the document controller (intents) and
//! from the codec (deserialization). The renderer reads `emojis` in order
//! to determine draw order: insertion order is z-order.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_EMOJI_SIZE;

/// Unique identifier for a placed emoji within one document.
pub type EmojiId = i64;

/// A placed emoji as stored in the document and in the document file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// Unique identifier; immutable after creation.
    pub id: EmojiId,
    /// The emoji glyph itself.
    pub text: String,
    /// Horizontal offset from the canvas origin.
    pub x: i64,
    /// Vertical offset from the canvas origin.
    pub y: i64,
    /// Point size the glyph is rendered at.
    pub size: i64,
}

/// The document's canvas backdrop. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "BackgroundRepr", into = "BackgroundRepr")]
pub enum Background {
    /// No backdrop.
    #[default]
    Blank,
    /// Backdrop fetched from a remote URL.
    Url(String),
    /// Backdrop embedded in the document as raw image bytes.
    ImageData(Vec<u8>),
}

impl Background {
    /// The remote URL, if this background is a [`Background::Url`].
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }

    /// The embedded bytes, if this background is a [`Background::ImageData`].
    #[must_use]
    pub fn image_data(&self) -> Option<&[u8]> {
        match self {
            Self::ImageData(data) => Some(data),
            _ => None,
        }
    }
}

/// On-disk shape of [`Background`]: the string `"blank"`, `{"url": …}`, or
/// `{"imageData": "<base64>"}`. Embedded bytes are base64 text rather than
/// serde's default number-array encoding for `Vec<u8>`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BackgroundRepr {
    Tag(String),
    Url { url: String },
    ImageData {
        #[serde(rename = "imageData")]
        image_data: String,
    },
}

impl From<Background> for BackgroundRepr {
    fn from(background: Background) -> Self {
        match background {
            Background::Blank => Self::Tag("blank".to_owned()),
            Background::Url(url) => Self::Url { url },
            Background::ImageData(data) => Self::ImageData { image_data: BASE64.encode(data) },
        }
    }
}

impl TryFrom<BackgroundRepr> for Background {
    type Error = String;

    fn try_from(repr: BackgroundRepr) -> Result<Self, Self::Error> {
        match repr {
            BackgroundRepr::Tag(tag) if tag == "blank" => Ok(Self::Blank),
            BackgroundRepr::Tag(tag) => Err(format!("unknown background tag '{tag}'")),
            BackgroundRepr::Url { url } => Ok(Self::Url(url)),
            BackgroundRepr::ImageData { image_data } => BASE64
                .decode(image_data)
                .map(Self::ImageData)
                .map_err(|e| format!("invalid base64 image data: {e}")),
        }
    }
}

/// The full art document state: placed emoji plus the background choice.
///
/// Emoji ids are pairwise distinct and the sequence order defines rendering
/// order (later entries draw on top).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArtModel {
    /// Canvas backdrop.
    pub background: Background,
    /// Placed emoji in z-order.
    pub emojis: Vec<Emoji>,
}

impl ArtModel {
    /// Create an empty model with a blank background.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new emoji and return its freshly allocated id.
    ///
    /// Ids are allocated as `max(existing) + 1`, so the sequence stays
    /// monotonic across a serialize/deserialize cycle without persisting a
    /// counter.
    pub fn add_emoji(&mut self, text: &str, (x, y): (i64, i64), size: i64) -> EmojiId {
        let id = self.emojis.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        self.emojis.push(Emoji { id, text: text.to_owned(), x, y, size });
        id
    }

    /// Replace the background wholesale. No validation happens at this
    /// layer; URL reachability and byte content are the controller's
    /// concern.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Offset an emoji's position by `(dx, dy)`. Silent no-op if `id` is
    /// not present.
    pub fn move_emoji(&mut self, id: EmojiId, dx: i64, dy: i64) {
        if let Some(emoji) = self.emojis.iter_mut().find(|e| e.id == id) {
            emoji.x += dx;
            emoji.y += dy;
        }
    }

    /// Multiply an emoji's size by `factor`, rounding half away from zero
    /// and flooring at [`MIN_EMOJI_SIZE`]. Silent no-op if `id` is not
    /// present.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn scale_emoji(&mut self, id: EmojiId, factor: f64) {
        if let Some(emoji) = self.emojis.iter_mut().find(|e| e.id == id) {
            let scaled = (emoji.size as f64 * factor).round() as i64;
            emoji.size = scaled.max(MIN_EMOJI_SIZE);
        }
    }

    /// Return a reference to an emoji by id.
    #[must_use]
    pub fn emoji(&self, id: EmojiId) -> Option<&Emoji> {
        self.emojis.iter().find(|e| e.id == id)
    }

    /// Number of placed emoji.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    /// Returns `true` if no emoji have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }
}
