//! BaaS document-table adapter
//!
//! Persists episodes as rows of an `episodes` table exposed through a
//! hosted PostgREST-style endpoint. Rows are snake_case with RFC 3339
//! timestamps; reads convert back to the epoch-millisecond ordering key.

use async_trait::async_trait;
use chrono::DateTime;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use store_traits::episode::{sort_newest_first, Episode, EpisodeId, NewEpisodeData};
use store_traits::http::{HttpClient, HttpMethod, HttpRequest};
use store_traits::media::encode_data_uri;
use store_traits::store::EpisodeStore;
use store_traits::time::Clock;
use store_traits::{Result, StoreError};

use crate::error::RemoteStoreError;
use crate::types::DocumentRow;

/// Configuration for a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    /// Project root, e.g. `https://abcdefgh.supabase.co`
    pub project_url: String,
    /// Anonymous/service API key
    pub api_key: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl DocumentStoreConfig {
    /// Values shipped in sample configs; treated as "not configured".
    pub const PLACEHOLDER_URL: &'static str = "https://your-project.supabase.co";
    pub const PLACEHOLDER_KEY: &'static str = "your-anon-key";

    pub fn new(project_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Whether real credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.project_url.is_empty()
            && !self.api_key.is_empty()
            && self.project_url != Self::PLACEHOLDER_URL
            && self.api_key != Self::PLACEHOLDER_KEY
    }
}

/// Episode store backed by a hosted document table.
pub struct DocumentStore {
    http: Arc<dyn HttpClient>,
    config: DocumentStoreConfig,
    clock: Arc<dyn Clock>,
}

impl DocumentStore {
    pub fn new(
        http: Arc<dyn HttpClient>,
        config: DocumentStoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            config,
            clock,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/episodes",
            self.config.project_url.trim_end_matches('/')
        )
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_token(&self.config.api_key)
            .timeout(self.config.request_timeout)
    }

    fn parse_timestamp(rfc3339: &str) -> std::result::Result<i64, RemoteStoreError> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(|dt| dt.timestamp_millis())
            .map_err(|e| {
                RemoteStoreError::ParseError(format!("Invalid timestamp `{}`: {}", rfc3339, e))
            })
    }

    fn row_to_episode(row: DocumentRow) -> std::result::Result<Episode, RemoteStoreError> {
        let id = EpisodeId::from_string(&row.id).map_err(|e| {
            RemoteStoreError::ParseError(format!("Invalid episode id `{}`: {}", row.id, e))
        })?;

        Ok(Episode {
            id,
            title: row.title,
            description: row.description,
            audio_url: row.audio_data,
            storage_path: format!("doc://{}", row.audio_name),
            created_at: Self::parse_timestamp(&row.created_at)?,
        })
    }
}

#[async_trait]
impl EpisodeStore for DocumentStore {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn add(&self, data: NewEpisodeData) -> Result<Episode> {
        data.validate()?;

        let row = DocumentRow {
            id: EpisodeId::new().to_string(),
            title: data.title.clone(),
            description: data.description.clone(),
            audio_data: encode_data_uri(&data.audio.media_type, &data.audio.bytes),
            audio_type: data.audio.media_type.clone(),
            audio_name: data.audio.file_name.clone(),
            file_size: data.audio.len() as u64,
            created_at: self.clock.now().to_rfc3339(),
        };

        let request = self
            .request(HttpMethod::Post, self.table_url())
            .header("Prefer", "return=representation")
            .json(&vec![&row])?;

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        // The representation echoes the committed row, including any
        // column defaults the backend applied.
        let mut committed: Vec<DocumentRow> = serde_json::from_slice(&response.body)
            .map_err(|e| {
                StoreError::from(RemoteStoreError::ParseError(format!(
                    "Failed to parse insert representation: {}",
                    e
                )))
            })?;

        let committed = committed.pop().ok_or_else(|| {
            StoreError::from(RemoteStoreError::ParseError(
                "Insert representation was empty".to_string(),
            ))
        })?;

        info!(id = %committed.id, bytes = data.audio.len(), "Uploaded episode to document store");
        Self::row_to_episode(committed).map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Episode>> {
        let url = format!("{}?select=*&order=created_at.desc", self.table_url());
        let request = self.request(HttpMethod::Get, url);

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        let rows: Vec<DocumentRow> = serde_json::from_slice(&response.body).map_err(|e| {
            StoreError::from(RemoteStoreError::ParseError(format!(
                "Failed to parse episode rows: {}",
                e
            )))
        })?;

        let mut episodes = rows
            .into_iter()
            .map(Self::row_to_episode)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;

        // The query already orders server-side; sorting again keeps the
        // contract independent of backend behavior.
        sort_newest_first(&mut episodes);

        debug!(count = episodes.len(), "Listed episodes from document store");
        Ok(episodes)
    }

    #[instrument(skip(self, episode), fields(id = %episode.id))]
    async fn delete(&self, episode: &Episode) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(), episode.id);
        let request = self
            .request(HttpMethod::Delete, url)
            .header("Prefer", "return=representation");

        let response = self.http.execute(request).await?;
        if response.status == 404 {
            return Err(StoreError::NotFound {
                id: episode.id.to_string(),
            });
        }
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        // Filtered deletes report success even when nothing matched; the
        // representation tells us whether a row was actually removed.
        let removed: Vec<DocumentRow> = serde_json::from_slice(&response.body).map_err(|e| {
            StoreError::from(RemoteStoreError::ParseError(format!(
                "Failed to parse delete representation: {}",
                e
            )))
        })?;

        if removed.is_empty() {
            return Err(StoreError::NotFound {
                id: episode.id.to_string(),
            });
        }

        info!(id = %episode.id, "Deleted episode from document store");
        Ok(())
    }

    async fn is_available(&self) -> bool {
        self.config.is_configured()
    }

    fn backend_name(&self) -> &'static str {
        "document-store"
    }
}
