//! Generic REST API adapter
//!
//! The reference remote backend: a plain JSON-over-HTTP episode collection
//! (`GET /episodes`, `POST /episodes`, `DELETE /episodes/{id}`). Other
//! hosted flavors that follow the same shape (e.g. an object-store gateway)
//! are configuration presets of this adapter rather than separate
//! implementations.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use store_traits::episode::{sort_newest_first, Episode, EpisodeId, NewEpisodeData};
use store_traits::http::{HttpClient, HttpMethod, HttpRequest};
use store_traits::store::EpisodeStore;
use store_traits::time::Clock;
use store_traits::{Result, StoreError};

use crate::error::RemoteStoreError;
use crate::types::EpisodeRecord;

/// Configuration for a [`RestApiStore`].
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// API root, e.g. `https://my-podcast.example.com/api`
    pub base_url: String,
    /// Optional bearer token sent with every request
    pub api_key: Option<String>,
    /// Scheme used for `storage_path` locators (`api://…` by default)
    pub locator_scheme: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl RestApiConfig {
    /// Endpoint value shipped in sample configs; treated as "not configured".
    pub const PLACEHOLDER_URL: &'static str = "https://your-app.example.com/api";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            locator_scheme: "api".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_locator_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.locator_scheme = scheme.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Whether the endpoint points at a real deployment.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && self.base_url != Self::PLACEHOLDER_URL
    }
}

/// Episode store backed by a generic REST API.
pub struct RestApiStore {
    http: Arc<dyn HttpClient>,
    config: RestApiConfig,
    clock: Arc<dyn Clock>,
}

impl RestApiStore {
    pub fn new(http: Arc<dyn HttpClient>, config: RestApiConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            config,
            clock,
        }
    }

    fn episodes_url(&self) -> String {
        format!("{}/episodes", self.config.base_url.trim_end_matches('/'))
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        let mut request = HttpRequest::new(method, url).timeout(self.config.request_timeout);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_token(key);
        }
        request
    }

    fn record_to_episode(&self, record: EpisodeRecord) -> std::result::Result<Episode, RemoteStoreError> {
        let id = EpisodeId::from_string(&record.id)
            .map_err(|e| RemoteStoreError::ParseError(format!("Invalid episode id `{}`: {}", record.id, e)))?;

        Ok(Episode {
            id,
            title: record.title,
            description: record.description,
            audio_url: record.audio_data,
            storage_path: format!("{}://{}", self.config.locator_scheme, record.audio_name),
            created_at: record.created_at,
        })
    }
}

#[async_trait]
impl EpisodeStore for RestApiStore {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn add(&self, data: NewEpisodeData) -> Result<Episode> {
        data.validate()?;

        let record = EpisodeRecord::from_upload(
            EpisodeId::new(),
            &data,
            self.clock.unix_timestamp_millis(),
        );

        let request = self
            .request(HttpMethod::Post, self.episodes_url())
            .json(&record)?;

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        info!(id = %record.id, bytes = data.audio.len(), "Uploaded episode to REST API");
        self.record_to_episode(record).map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Episode>> {
        let request = self.request(HttpMethod::Get, self.episodes_url());

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        let records: Vec<EpisodeRecord> = serde_json::from_slice(&response.body)
            .map_err(|e| {
                StoreError::from(RemoteStoreError::ParseError(format!(
                    "Failed to parse episode list: {}",
                    e
                )))
            })?;

        let mut episodes = records
            .into_iter()
            .map(|r| self.record_to_episode(r))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;

        sort_newest_first(&mut episodes);

        debug!(count = episodes.len(), "Listed episodes from REST API");
        Ok(episodes)
    }

    #[instrument(skip(self, episode), fields(id = %episode.id))]
    async fn delete(&self, episode: &Episode) -> Result<()> {
        let url = format!("{}/{}", self.episodes_url(), episode.id);
        let request = self.request(HttpMethod::Delete, url);

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

        info!(id = %episode.id, "Deleted episode from REST API");
        Ok(())
    }

    async fn is_available(&self) -> bool {
        self.config.is_configured()
    }

    fn backend_name(&self) -> &'static str {
        "rest-api"
    }
}
