//! Document controller: undo-aware mutation intents over one art model.
//!
//! DESIGN
//! ======
//! `Document` is a cloneable handle over the single owned [`ArtModel`].
//! All state (model, undo/redo stacks, fetch bookkeeping) lives behind one
//! `RwLock`, so there are no concurrent writers; spawned tasks (background
//! fetch, autosave) re-acquire the lock and hand their results back under
//! it. Consumers subscribe to an explicit event stream rather than
//! observing fields.
//!
//! Undo is snapshot-based: every intent pushes the whole pre-mutation
//! model onto an explicit undo stack together with a display name, and
//! undo/redo swap whole models. This trades memory for correctness
//! regardless of operation complexity, and keeps depth bounded and
//! testable.
//!
//! The background pipeline is driven by structural change of the
//! background value, not by which intent ran, so undo, redo, and open all
//! participate: restoring a model whose background is a URL starts a
//! fetch. Superseded fetches are discarded by a generation check under the
//! state lock.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use std::collections::VecDeque;
use std::mem;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, warn};

use crate::autosave;
use crate::codec::{self, DecodeError, EncodeError};
use crate::consts::MAX_UNDO_DEPTH;
use crate::fetch::{self, CanvasImage, FetchStatus, ImageFetcher};
use crate::model::{ArtModel, Background, Emoji, EmojiId};

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Per-document settings. `Default` points autosave at the per-install
/// well-known location; tests substitute a scratch path and a short
/// debounce.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Where the debounced autosave writes the document file.
    pub autosave_path: PathBuf,
    /// Quiet period after the last mutation before autosave fires.
    pub autosave_debounce: Duration,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            autosave_path: autosave::default_autosave_path(),
            autosave_debounce: autosave::debounce_interval(),
        }
    }
}

/// Changes published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// The art model changed (intent, undo, redo, or open).
    ArtChanged,
    /// The fetch status moved to a new state.
    FetchStatusChanged(FetchStatus),
    /// The cached background image was replaced or cleared.
    BackgroundImageChanged,
    /// An autosave write completed.
    Autosaved,
}

/// One entry on the undo or redo stack: the display name of the intent
/// plus the whole model to restore.
struct UndoEntry {
    name: &'static str,
    art: ArtModel,
}

struct DocState {
    art: ArtModel,
    /// Bounded history; the oldest entry falls off the front at the cap.
    undo_stack: VecDeque<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    /// Background value the fetch pipeline last ran for. Comparing this
    /// against the live background detects structural change across
    /// intents, undo, redo, and open alike.
    applied_background: Background,
    background_image: Option<CanvasImage>,
    fetch_status: FetchStatus,
    /// Bumped on every background transition; a completing fetch whose
    /// generation no longer matches is stale and discards its result.
    fetch_generation: u64,
    /// Bumped on every mutation; an autosave timer whose generation no
    /// longer matches was superseded by a later mutation.
    save_generation: u64,
}

/// Undo-aware controller owning exactly one [`ArtModel`].
#[derive(Clone)]
pub struct Document {
    state: Arc<RwLock<DocState>>,
    events: broadcast::Sender<DocumentEvent>,
    fetcher: Arc<dyn ImageFetcher>,
    config: Arc<DocumentConfig>,
}

impl Document {
    /// Create a document with an empty model.
    pub async fn new(config: DocumentConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self::from_model(ArtModel::new(), config, fetcher).await
    }

    /// Restore a document from serialized snapshot bytes. Malformed bytes
    /// fail with [`DecodeError`] and the document does not open.
    pub async fn open(
        bytes: &[u8],
        config: DocumentConfig,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Result<Self, DecodeError> {
        Ok(Self::from_model(codec::decode(bytes)?, config, fetcher).await)
    }

    async fn from_model(
        art: ArtModel,
        config: DocumentConfig,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        let (events, _drain) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let doc = Self {
            state: Arc::new(RwLock::new(DocState {
                art,
                undo_stack: VecDeque::new(),
                redo_stack: Vec::new(),
                applied_background: Background::Blank,
                background_image: None,
                fetch_status: FetchStatus::Idle,
                fetch_generation: 0,
                save_generation: 0,
            })),
            events,
            fetcher,
            config: Arc::new(config),
        };
        // A restored model may carry a non-blank background, and open
        // schedules a debounced save exactly as a direct intent does.
        {
            let mut state = doc.state.write().await;
            doc.after_change(&mut state);
        }
        doc
    }

    /// Subscribe to the change stream. Slow subscribers lose the oldest
    /// buffered events, never the newest.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.events.subscribe()
    }

    /// Settings this document was opened with.
    #[must_use]
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    // --- Intents ---

    /// Replace the background. Undoable as "Set Background".
    pub async fn set_background(&self, background: Background) {
        self.mutate("Set Background", |art| art.set_background(background)).await;
    }

    /// Place a new emoji and return its id. Undoable as "Add Emoji".
    pub async fn add_emoji(&self, text: &str, position: (i64, i64), size: i64) -> EmojiId {
        self.mutate("Add Emoji", |art| art.add_emoji(text, position, size)).await
    }

    /// Offset an emoji by `(dx, dy)`; no-op if `id` is absent. Undoable as
    /// "Move Emoji".
    pub async fn move_emoji(&self, id: EmojiId, dx: i64, dy: i64) {
        self.mutate("Move Emoji", |art| art.move_emoji(id, dx, dy)).await;
    }

    /// Scale an emoji's size by `factor`; no-op if `id` is absent.
    /// Undoable as "Scale Emoji".
    pub async fn scale_emoji(&self, id: EmojiId, factor: f64) {
        self.mutate("Scale Emoji", |art| art.scale_emoji(id, factor)).await;
    }

    async fn mutate<T>(&self, name: &'static str, apply: impl FnOnce(&mut ArtModel) -> T) -> T {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.redo_stack.clear();
        state.undo_stack.push_back(UndoEntry { name, art: state.art.clone() });
        if state.undo_stack.len() > MAX_UNDO_DEPTH {
            state.undo_stack.pop_front();
        }
        let out = apply(&mut state.art);
        self.after_change(state);
        out
    }

    // --- Undo / redo ---

    /// Restore the model to its state before the most recent intent.
    /// Returns `false` when there is nothing to undo.
    pub async fn undo(&self) -> bool {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let Some(entry) = state.undo_stack.pop_back() else {
            return false;
        };
        let displaced = mem::replace(&mut state.art, entry.art);
        state.redo_stack.push(UndoEntry { name: entry.name, art: displaced });
        self.after_change(state);
        true
    }

    /// Re-apply the most recently undone intent. Returns `false` when
    /// there is nothing to redo.
    pub async fn redo(&self) -> bool {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let Some(entry) = state.redo_stack.pop() else {
            return false;
        };
        let displaced = mem::replace(&mut state.art, entry.art);
        state.undo_stack.push_back(UndoEntry { name: entry.name, art: displaced });
        self.after_change(state);
        true
    }

    /// Whether an undo is available.
    pub async fn can_undo(&self) -> bool {
        !self.state.read().await.undo_stack.is_empty()
    }

    /// Whether a redo is available.
    pub async fn can_redo(&self) -> bool {
        !self.state.read().await.redo_stack.is_empty()
    }

    /// Display name of the intent `undo` would revert, for UI history.
    pub async fn undo_name(&self) -> Option<&'static str> {
        self.state.read().await.undo_stack.back().map(|e| e.name)
    }

    /// Display name of the intent `redo` would re-apply.
    pub async fn redo_name(&self) -> Option<&'static str> {
        self.state.read().await.redo_stack.last().map(|e| e.name)
    }

    /// Number of retained undo entries.
    pub async fn undo_depth(&self) -> usize {
        self.state.read().await.undo_stack.len()
    }

    // --- Reads ---

    /// Clone of the current model.
    pub async fn snapshot(&self) -> ArtModel {
        self.state.read().await.art.clone()
    }

    /// Placed emoji in z-order.
    pub async fn emojis(&self) -> Vec<Emoji> {
        self.state.read().await.art.emojis.clone()
    }

    /// Current background choice.
    pub async fn background(&self) -> Background {
        self.state.read().await.art.background.clone()
    }

    /// Current fetch status.
    pub async fn fetch_status(&self) -> FetchStatus {
        self.state.read().await.fetch_status.clone()
    }

    /// Cached decoded background image, if any.
    pub async fn background_image(&self) -> Option<CanvasImage> {
        self.state.read().await.background_image.clone()
    }

    /// Serialize the current model to document-file bytes.
    pub async fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        codec::encode(&self.state.read().await.art)
    }

    /// Encode for the autosave timer that holds `generation`. Returns
    /// `None` when a later mutation superseded that timer or the model
    /// failed to encode (logged, autosave skipped).
    pub(crate) async fn autosave_payload(&self, generation: u64) -> Option<Vec<u8>> {
        let state = self.state.read().await;
        if state.save_generation != generation {
            return None;
        }
        match codec::encode(&state.art) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, "autosave skipped: model failed to encode");
                None
            }
        }
    }

    pub(crate) fn emit_autosaved(&self) {
        self.emit(DocumentEvent::Autosaved);
    }

    // --- Internals ---

    /// Runs under the write lock after every model change (intent, undo,
    /// redo, open): background pipeline, autosave debounce, notification.
    fn after_change(&self, state: &mut DocState) {
        self.sync_background(state);
        state.save_generation += 1;
        autosave::schedule(self.clone(), state.save_generation);
        self.emit(DocumentEvent::ArtChanged);
    }

    /// Recompute cached image and fetch status iff the background value
    /// actually changed structurally since the pipeline last ran.
    fn sync_background(&self, state: &mut DocState) {
        if state.applied_background == state.art.background {
            return;
        }
        state.applied_background = state.art.background.clone();
        state.fetch_generation += 1;
        let generation = state.fetch_generation;

        match state.art.background.clone() {
            Background::Blank => {
                self.set_image(state, None);
                self.set_status(state, FetchStatus::Idle);
            }
            Background::ImageData(bytes) => {
                // Decode failure on embedded data stays Idle with no
                // cached image; only remote fetches report Failed.
                let image = match fetch::decode_image(&bytes) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        warn!(error = %e, "embedded background did not decode");
                        None
                    }
                };
                self.set_image(state, image);
                self.set_status(state, FetchStatus::Idle);
            }
            Background::Url(url) => {
                self.set_image(state, None);
                self.set_status(state, FetchStatus::Fetching);
                let doc = self.clone();
                tokio::spawn(async move {
                    doc.run_fetch(generation, url).await;
                });
            }
        }
    }

    async fn run_fetch(&self, generation: u64, url: String) {
        let result = self.fetcher.fetch(&url).await;
        let mut state = self.state.write().await;
        if state.fetch_generation != generation {
            debug!(%url, "discarding superseded background fetch");
            return;
        }
        let decoded = match result {
            Ok(bytes) => match fetch::decode_image(&bytes) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(%url, error = %e, "fetched background did not decode");
                    None
                }
            },
            Err(e) => {
                warn!(%url, error = %e, "background fetch failed");
                None
            }
        };
        match decoded {
            Some(image) => {
                self.set_image(&mut state, Some(image));
                self.set_status(&mut state, FetchStatus::Idle);
            }
            None => {
                self.set_image(&mut state, None);
                self.set_status(&mut state, FetchStatus::Failed(url));
            }
        }
    }

    fn set_status(&self, state: &mut DocState, status: FetchStatus) {
        if state.fetch_status != status {
            state.fetch_status = status.clone();
            self.emit(DocumentEvent::FetchStatusChanged(status));
        }
    }

    fn set_image(&self, state: &mut DocState, image: Option<CanvasImage>) {
        if state.background_image != image {
            state.background_image = image;
            self.emit(DocumentEvent::BackgroundImageChanged);
        }
    }

    fn emit(&self, event: DocumentEvent) {
        // A send error only means no subscriber is currently listening.
        drop(self.events.send(event));
    }
}
