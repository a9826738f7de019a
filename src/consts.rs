//! Shared numeric constants for the emojiboard crate.

// ── Undo ────────────────────────────────────────────────────────

/// Maximum retained undo entries; the oldest is dropped beyond this.
pub const MAX_UNDO_DEPTH: usize = 100;

// ── Emoji geometry ──────────────────────────────────────────────

/// Floor applied to `scale_emoji` results so a non-positive factor can
/// never drive an emoji's size to zero or below.
pub const MIN_EMOJI_SIZE: i64 = 1;

// ── Autosave ────────────────────────────────────────────────────

/// Quiet period after the last mutation before an autosave write fires.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1500;
