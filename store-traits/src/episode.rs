//! Episode domain model and upload validation
//!
//! The [`Episode`] record is the entity shared by every storage backend; the
//! transient [`NewEpisodeData`] carries a single upload from the admin form
//! into [`EpisodeStore::add`](crate::store::EpisodeStore::add) and is
//! discarded afterwards.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// Maximum accepted audio payload size (50 MiB).
pub const MAX_AUDIO_BYTES: usize = 50 * 1024 * 1024;

/// Unique identifier for an episode
///
/// Random UUIDs rather than timestamp-derived strings, so two concurrent
/// uploads can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(pub Uuid);

impl EpisodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EpisodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw audio upload: payload bytes plus the metadata the browser declared.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    /// Payload bytes. `Bytes` is cheaply cloneable, so a failed primary
    /// attempt can be replayed against the local store without copying.
    pub bytes: Bytes,
    /// Declared media type, e.g. `audio/mpeg`
    pub media_type: String,
    /// Original file name, e.g. `episode-01.mp3`
    pub file_name: String,
}

impl AudioPayload {
    pub fn new(bytes: Bytes, media_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Data required when creating a new episode.
///
/// Consumed exactly once by `add`; never persisted as-is.
#[derive(Debug, Clone)]
pub struct NewEpisodeData {
    pub title: String,
    pub description: String,
    pub audio: AudioPayload,
}

impl NewEpisodeData {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        audio: AudioPayload,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            audio,
        }
    }

    /// Validate the upload before any I/O is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when a text field is blank, the
    /// payload is missing or larger than [`MAX_AUDIO_BYTES`], or the declared
    /// media type is not an audio type.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::validation("title", "must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(StoreError::validation("description", "must not be empty"));
        }
        if self.audio.is_empty() {
            return Err(StoreError::validation("audio", "no audio payload supplied"));
        }
        if self.audio.len() > MAX_AUDIO_BYTES {
            return Err(StoreError::validation(
                "audio",
                format!(
                    "payload is {} bytes, limit is {} bytes (50 MiB)",
                    self.audio.len(),
                    MAX_AUDIO_BYTES
                ),
            ));
        }
        if !self.audio.media_type.starts_with("audio/") {
            return Err(StoreError::validation(
                "audio",
                format!("`{}` is not an audio media type", self.audio.media_type),
            ));
        }
        Ok(())
    }
}

/// The definitive episode record, as returned by every backend.
///
/// `storage_path` is a backend-specific locator (`local://…`, `git://…`)
/// needed to delete the underlying payload; callers treat it as opaque.
/// `audio_url` is a resolvable playback URI, which for inline-payload
/// backends is a data URI regenerated on each `list` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: EpisodeId,
    pub title: String,
    pub description: String,
    pub audio_url: String,
    pub storage_path: String,
    /// Epoch milliseconds; the default newest-first ordering key.
    pub created_at: i64,
}

/// Order episodes newest-first by creation time.
///
/// Backends sort after fetching rather than trusting remote ordering.
pub fn sort_newest_first(episodes: &mut [Episode]) {
    episodes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
