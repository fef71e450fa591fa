//! # Playback Control
//!
//! Owns the "what is playing" state of the listener UI: the current episode,
//! the play/pause intent, and the readiness of the underlying audio source.
//!
//! The controller is a pure state machine driven by UI and media events; it
//! performs no I/O and holds no audio resources itself. The host feeds it
//! `select`/`play_pause` from the UI, `on_source_ready`/`on_ended` from the
//! media element, and deletion notifications from the storage façade, then
//! reads back [`PlaybackController::should_output`] to drive the actual
//! audio sink.

pub mod controller;

pub use controller::{PlaybackController, SourceState};
