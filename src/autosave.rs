//! Debounced autosave scheduling.
//!
//! DESIGN
//! ======
//! Every mutation bumps the document's save generation and schedules a
//! one-shot timer here. When the timer fires it asks the document for a
//! payload tagged with its generation; if a later mutation superseded it
//! the document returns nothing and the timer dies silently. Only the
//! final timer of a burst survives the quiet period, so a burst of edits
//! collapses into exactly one write (debounce, not throttle).
//!
//! ERROR HANDLING
//! ==============
//! Autosave is best-effort: encode failures and I/O failures are logged
//! and the write is skipped. Nothing here is fatal; the next mutation
//! re-arms the timer.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::consts::DEFAULT_AUTOSAVE_DEBOUNCE_MS;
use crate::document::Document;

/// Well-known per-install autosave location:
/// `<data dir>/emojiboard/autosave.emojiboard`.
#[must_use]
pub fn default_autosave_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("emojiboard");
    path.push("autosave.emojiboard");
    path
}

/// Debounce quiet period, overridable via `AUTOSAVE_DEBOUNCE_MS`.
#[must_use]
pub fn debounce_interval() -> Duration {
    Duration::from_millis(env_parse("AUTOSAVE_DEBOUNCE_MS", DEFAULT_AUTOSAVE_DEBOUNCE_MS))
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key).map_or(default, |v| v.parse::<T>().unwrap_or(default))
}

/// Arm a one-shot save timer for `generation`. Later mutations supersede
/// it through the document's generation check.
pub(crate) fn schedule(doc: Document, generation: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(doc.config().autosave_debounce).await;
        let Some(bytes) = doc.autosave_payload(generation).await else {
            return;
        };
        let path = doc.config().autosave_path.clone();
        if let Some(parent) = path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!(path = %parent.display(), error = %e, "autosave skipped: could not create directory");
                return;
            }
        }
        match tokio::fs::write(&path, &bytes).await {
            Ok(()) => {
                debug!(path = %path.display(), bytes = bytes.len(), "autosaved document");
                doc.emit_autosaved();
            }
            Err(e) => warn!(path = %path.display(), error = %e, "autosave write failed"),
        }
    });
}
