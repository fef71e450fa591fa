//! # Local Episode Store
//!
//! SQLite-backed storage backend. This is the guaranteed-available store the
//! fallback orchestrator degrades to, so it must never depend on network
//! reachability or external credentials.
//!
//! Episodes are self-contained: the audio payload lives inline in the same
//! row as the metadata, and `list` materializes it back into a playable
//! data URI. `backup` adds whole-catalog export/import for manual transfer
//! between devices.

pub mod backup;
pub mod sqlite;

pub use sqlite::SqliteEpisodeStore;
