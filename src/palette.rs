//! Palette store: named emoji collections behind a preference-store
//! boundary.
//!
//! DESIGN
//! ======
//! Palettes are persisted as one JSON blob under a namespaced key
//! (`palettes:<store name>`) through the [`PrefStore`] contract, which is
//! the only thing this module knows about preference storage. On first
//! run (no stored value, or an empty one) a fixed built-in set of named
//! collections is installed and persisted.
//!
//! Persistence is an explicit `save()` step invoked after each mutation,
//! never an implicit side effect of assignment. Store failures are logged
//! and skipped; the in-memory palettes stay authoritative.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A named emoji collection shown in the picker. `emojis` is a string of
/// glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub emojis: String,
    pub id: i64,
}

/// Built-in collections installed on first run, in insertion order (each
/// lands at the front, so the last entry here displays first).
const BUILTIN_PALETTES: &[(&str, &str)] = &[
    ("Vehicles", "🚗🚕🚙🚌🚎🏎🚓🚑🚒🚐🛻🚚🚛🚜✈️🚀🛸🚁⛵️🚤🛳⛴🚢🚂🚆🚇🚊🚉"),
    ("Sports", "🏈⚾️🏀⚽️🎾🏐🥏🏓⛳️🥅🥌🏂⛷🎳"),
    ("Music", "🎼🎤🎹🪗🥁🎺🪘🪕🎻"),
    ("Animals", "🐥🐣🐂🐄🐎🐖🐏🐑🦙🐐🐓🐁🐀🐒🦆🦅🦉🦇🐢🐍🦎🦖🦕🐙🐠🐟🦈🐊🦓🦍🦧🦣🐘🦛🦏🐪🐫🦒🦘🦬🐃🦚🦜🦢🦩🕊🐇🦝🦨🦡🦫🦦🦥🐿🦔"),
    ("Animal Faces", "🐵🙈🙉🙊🐶🐱🐭🐹🐰🦊🐻🐼🐻‍❄️🐨🐯🦁🐮🐷🐸🐲"),
    ("Flora", "🌲🌴🌿☘️🍀🍁🍄🌾💐🌷🌹🥀🌺🌸🌼🌻"),
    ("Weather", "☀️🌤⛅️🌥☁️🌦🌧⛈🌩🌨❄️💨☔️💧💦🌊☂️🌫🌪"),
    ("COVID", "💉🦠😷🤧🤒"),
    ("Faces", "😀😃😄😁😆😅😂🤣🥲☺️😊😇🙂🙃😉😌😍🥰😘😗😙😚😋😛😝😜🤪🤨🧐🤓😎🥸🤩🥳😏😞😔😟😕🙁☹️😣😖😫😩🥺😢😭😤😠😡🤯😳🥶😱😨🤗🤔🤭🤫🤥😬🙄😯🧐🥱😴🤮😷🤧🤒🤠"),
];

fn storage_key(name: &str) -> String {
    format!("palettes:{name}")
}

/// Preference-store read/write contract: a single opaque blob per
/// namespaced key.
pub trait PrefStore: Send {
    /// Read the blob stored under `key`, if any.
    fn load(&self, key: &str) -> Option<Vec<u8>>;
    /// Write `bytes` under `key`, replacing any prior value.
    fn store(&mut self, key: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// File-backed preference store: one file per key under a per-install
/// config directory.
pub struct FilePrefStore {
    dir: PathBuf,
}

impl FilePrefStore {
    /// Store rooted at `<config dir>/emojiboard`.
    #[must_use]
    pub fn new() -> Self {
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push("emojiboard");
        Self { dir }
    }

    /// Store rooted at an explicit directory.
    #[must_use]
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace(':', "-")))
    }
}

impl Default for FilePrefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefStore for FilePrefStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Some(bytes),
            Err(_) => None,
        }
    }

    fn store(&mut self, key: &str, bytes: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), bytes)
    }
}

/// In-memory preference store for tests and previews. Clones share the
/// same backing map, so a test can keep a handle to what the palette
/// store writes.
#[derive(Default, Clone)]
pub struct MemoryPrefStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryPrefStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl PrefStore for MemoryPrefStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs().get(key).cloned()
    }

    fn store(&mut self, key: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.blobs().insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}

/// Named palette collection with explicit persistence.
///
/// Invariant: never empty after construction; `remove_palette` refuses to
/// remove the last palette.
pub struct PaletteStore {
    name: String,
    palettes: Vec<Palette>,
    store: Box<dyn PrefStore>,
}

impl PaletteStore {
    /// Open the store named `name`, restoring persisted palettes or
    /// installing the built-in set on first run.
    pub fn new(name: &str, store: Box<dyn PrefStore>) -> Self {
        let mut this = Self { name: name.to_owned(), palettes: Vec::new(), store };
        this.restore();
        if this.palettes.is_empty() {
            info!(store = %this.name, "installing built-in palettes");
            for (palette_name, emojis) in BUILTIN_PALETTES {
                this.insert_raw(palette_name, emojis, 0);
            }
            this.save();
        }
        this
    }

    /// Store name (used in the persistence key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All palettes in display order.
    #[must_use]
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    /// Number of palettes. Never zero after construction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Palette at `index`, clamped into range rather than panicking.
    #[must_use]
    pub fn palette(&self, index: usize) -> &Palette {
        let safe = index.min(self.palettes.len().saturating_sub(1));
        &self.palettes[safe]
    }

    /// Insert a palette at `index` (clamped), allocating the next id as
    /// `max(existing) + 1`. Persists immediately.
    pub fn insert_palette(&mut self, name: &str, emojis: &str, index: usize) {
        self.insert_raw(name, emojis, index);
        self.save();
    }

    fn insert_raw(&mut self, name: &str, emojis: &str, index: usize) {
        let unique = self.palettes.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let safe = index.min(self.palettes.len());
        self.palettes.insert(
            safe,
            Palette { name: name.to_owned(), emojis: emojis.to_owned(), id: unique },
        );
    }

    /// Remove the palette at `index` unless it is the last one. Returns
    /// the caller's index wrapped into the new range, for cursor reuse.
    pub fn remove_palette(&mut self, index: usize) -> usize {
        if self.palettes.len() > 1 && index < self.palettes.len() {
            self.palettes.remove(index);
            self.save();
        }
        index % self.palettes.len()
    }

    /// Rename the palette at `index`; silent no-op if out of range.
    pub fn rename_palette(&mut self, index: usize, name: &str) {
        if let Some(palette) = self.palettes.get_mut(index) {
            palette.name = name.to_owned();
            self.save();
        }
    }

    /// Replace the glyph string of the palette at `index`; silent no-op
    /// if out of range.
    pub fn set_palette_emojis(&mut self, index: usize, emojis: &str) {
        if let Some(palette) = self.palettes.get_mut(index) {
            palette.emojis = emojis.to_owned();
            self.save();
        }
    }

    /// Persist the current palettes through the preference store. Failures
    /// are logged and skipped; never fatal.
    pub fn save(&mut self) {
        let key = storage_key(&self.name);
        match serde_json::to_vec(&self.palettes) {
            Ok(bytes) => {
                if let Err(e) = self.store.store(&key, &bytes) {
                    warn!(store = %self.name, error = %e, "palette save failed");
                }
            }
            Err(e) => warn!(store = %self.name, error = %e, "palettes failed to encode"),
        }
    }

    /// Re-read palettes from the preference store, replacing in-memory
    /// state when a decodable blob is present.
    pub fn restore(&mut self) {
        let key = storage_key(&self.name);
        let Some(bytes) = self.store.load(&key) else {
            return;
        };
        match serde_json::from_slice::<Vec<Palette>>(&bytes) {
            Ok(palettes) if !palettes.is_empty() => self.palettes = palettes,
            Ok(_) => {}
            Err(e) => warn!(store = %self.name, error = %e, "stored palettes are malformed; keeping current"),
        }
    }
}
