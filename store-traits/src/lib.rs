//! # Episode Store Contracts
//!
//! Shared types and traits that every storage backend of the podcast
//! publisher implements.
//!
//! ## Overview
//!
//! This crate defines the contract between the service façade and the
//! concrete storage backends. Each backend (local SQLite, generic REST API,
//! BaaS document table, git-hosted JSON store) implements the same
//! three-operation contract plus an availability probe, so the fallback
//! orchestrator in `core-service` can treat them interchangeably.
//!
//! ## Contents
//!
//! - [`EpisodeStore`](store::EpisodeStore) - add/list/delete contract + availability probe
//! - [`Episode`](episode::Episode) / [`NewEpisodeData`](episode::NewEpisodeData) - the persisted record and its transient input
//! - [`HttpClient`](http::HttpClient) - async HTTP seam used by remote backends
//! - [`Clock`](time::Clock) - injectable time source for deterministic tests
//! - [`StoreError`](error::StoreError) - the shared error taxonomy
//!
//! ## Error Handling
//!
//! All store traits use [`StoreError`](error::StoreError). Backend
//! implementations should:
//!
//! - Convert backend-specific errors to `StoreError`
//! - Provide actionable error messages
//! - Raise `StoreError::Validation` before any I/O is attempted
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` bounds to support safe concurrent usage
//! across async tasks.

pub mod episode;
pub mod error;
pub mod http;
pub mod media;
pub mod store;
pub mod time;

pub use error::{Result, StoreError};

// Re-export commonly used types
pub use episode::{AudioPayload, Episode, EpisodeId, NewEpisodeData, MAX_AUDIO_BYTES};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use store::EpisodeStore;
pub use time::{Clock, SystemClock};
