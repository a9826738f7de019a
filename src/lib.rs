//! Document-state and undo engine for an emoji drawing application.
//!
//! This crate owns everything about an emoji document except pixels and
//! gestures: the art model (placed emoji plus a background choice), the
//! undo-capable document controller, the background-image fetch state
//! machine, debounced autosave, JSON persistence, and the palette store
//! that backs the emoji picker. The host UI layer is responsible only for
//! rendering the model, translating gestures into [`document::Document`]
//! intents, and reacting to the controller's event stream.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Pure art model: emoji, background, mutation ops |
//! | [`document`] | Undo-aware controller, fetch pipeline, events |
//! | [`fetch`] | Image fetch boundary and decode helpers |
//! | [`codec`] | Document file encode/decode |
//! | [`autosave`] | Debounced autosave scheduling |
//! | [`palette`] | Named emoji collections behind a preference store |
//! | [`consts`] | Shared numeric constants (undo depth, size floor, etc.) |

pub mod autosave;
pub mod codec;
pub mod consts;
pub mod document;
pub mod fetch;
pub mod model;
pub mod palette;
