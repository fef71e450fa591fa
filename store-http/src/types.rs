//! Wire types for the remote store dialects

use serde::{Deserialize, Serialize};

use store_traits::episode::{EpisodeId, NewEpisodeData};
use store_traits::media::encode_data_uri;

/// Episode record as shipped over the generic REST and git-hosted dialects.
///
/// `audio_data` is a base64 data URI carrying the payload inline, so one
/// request body commits metadata and payload together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub audio_data: String,
    pub audio_type: String,
    pub audio_name: String,
    pub file_size: u64,
    pub created_at: i64,
}

impl EpisodeRecord {
    /// Build the wire record for a validated upload.
    pub fn from_upload(id: EpisodeId, data: &NewEpisodeData, created_at: i64) -> Self {
        Self {
            id: id.to_string(),
            title: data.title.clone(),
            description: data.description.clone(),
            audio_data: encode_data_uri(&data.audio.media_type, &data.audio.bytes),
            audio_type: data.audio.media_type.clone(),
            audio_name: data.audio.file_name.clone(),
            file_size: data.audio.len() as u64,
            created_at,
        }
    }
}

/// Row shape of the document-table dialect.
///
/// Column names are snake_case and `created_at` is an RFC 3339 string, as
/// document-table backends store it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub audio_data: String,
    pub audio_type: String,
    pub audio_name: String,
    pub file_size: u64,
    pub created_at: String,
}

/// Entry returned by the repository contents API, both for directory
/// listings and single-file lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    pub sha: String,
    pub download_url: Option<String>,
}

/// Body of a contents-API file creation.
#[derive(Debug, Serialize)]
pub struct PutFileRequest {
    pub message: String,
    pub content: String,
    pub branch: String,
}

/// Body of a contents-API file deletion.
#[derive(Debug, Serialize)]
pub struct DeleteFileRequest {
    pub message: String,
    pub sha: String,
    pub branch: String,
}
