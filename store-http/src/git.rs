//! Version-control-hosted adapter
//!
//! Persists each episode as one JSON file under `episodes/` in a hosted git
//! repository, driven entirely through the repository contents API. Every
//! mutation is a commit, so the catalog history doubles as an audit log.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use store_traits::episode::{sort_newest_first, Episode, EpisodeId, NewEpisodeData};
use store_traits::http::{HttpClient, HttpMethod, HttpRequest};
use store_traits::store::EpisodeStore;
use store_traits::time::Clock;
use store_traits::{Result, StoreError};

use crate::error::RemoteStoreError;
use crate::types::{DeleteFileRequest, EpisodeRecord, PutFileRequest, RepoEntry};

/// Hosting API base URL
const API_BASE: &str = "https://api.github.com";

/// Repository directory holding one JSON file per episode
const EPISODES_DIR: &str = "episodes";

/// Configuration for a [`GitHostedStore`].
#[derive(Debug, Clone)]
pub struct GitHostedConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Personal access token with contents read/write scope
    pub token: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl GitHostedConfig {
    /// Values shipped in sample configs; treated as "not configured".
    pub const PLACEHOLDER_TOKEN: &'static str = "ghp_your_token_here";
    pub const PLACEHOLDER_OWNER: &'static str = "your-username";

    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: "main".to_string(),
            token: token.into(),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Whether real credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty()
            && !self.token.is_empty()
            && self.owner != Self::PLACEHOLDER_OWNER
            && self.token != Self::PLACEHOLDER_TOKEN
    }
}

/// Episode store backed by a hosted git repository.
pub struct GitHostedStore {
    http: Arc<dyn HttpClient>,
    config: GitHostedConfig,
    clock: Arc<dyn Clock>,
}

impl GitHostedStore {
    pub fn new(http: Arc<dyn HttpClient>, config: GitHostedConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            config,
            clock,
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            API_BASE, self.config.owner, self.config.repo, path
        )
    }

    fn episode_path(id: &EpisodeId) -> String {
        format!("{}/{}.json", EPISODES_DIR, id)
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .header("Authorization", format!("token {}", self.config.token))
            .header("Accept", "application/vnd.github.v3+json")
            .timeout(self.config.request_timeout)
    }

    fn record_to_episode(record: EpisodeRecord) -> std::result::Result<Episode, RemoteStoreError> {
        let id = EpisodeId::from_string(&record.id).map_err(|e| {
            RemoteStoreError::ParseError(format!("Invalid episode id `{}`: {}", record.id, e))
        })?;

        Ok(Episode {
            id,
            title: record.title,
            description: record.description,
            audio_url: record.audio_data,
            storage_path: format!("git://{}", record.audio_name),
            created_at: record.created_at,
        })
    }

    /// Fetch and parse one episode file from its raw download URL.
    async fn fetch_episode(&self, entry: &RepoEntry) -> std::result::Result<Episode, RemoteStoreError> {
        let url = entry.download_url.clone().ok_or_else(|| {
            RemoteStoreError::ParseError(format!("Entry `{}` has no download URL", entry.name))
        })?;

        let request = self.request(HttpMethod::Get, url);
        let response = self.http.execute(request).await.map_err(RemoteStoreError::Store)?;

        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let record: EpisodeRecord = serde_json::from_slice(&response.body).map_err(|e| {
            RemoteStoreError::ParseError(format!("Corrupt episode file `{}`: {}", entry.name, e))
        })?;

        Self::record_to_episode(record)
    }
}

#[async_trait]
impl EpisodeStore for GitHostedStore {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn add(&self, data: NewEpisodeData) -> Result<Episode> {
        data.validate()?;

        let id = EpisodeId::new();
        let record = EpisodeRecord::from_upload(id, &data, self.clock.unix_timestamp_millis());

        let document = serde_json::to_vec_pretty(&record)
            .map_err(|e| StoreError::Backend(format!("Failed to serialize episode: {}", e)))?;

        let body = PutFileRequest {
            message: format!("Add episode: {}", record.title),
            content: STANDARD.encode(document),
            branch: self.config.branch.clone(),
        };

        let request = self
            .request(HttpMethod::Put, self.contents_url(&Self::episode_path(&id)))
            .json(&body)?;

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        info!(id = %id, bytes = data.audio.len(), "Committed episode to hosted repository");
        Self::record_to_episode(record).map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Episode>> {
        let request = self.request(HttpMethod::Get, self.contents_url(EPISODES_DIR));

        let response = self.http.execute(request).await?;

        // A repository with no uploads yet has no episodes directory.
        if response.status == 404 {
            debug!("Episodes directory absent, catalog is empty");
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        let entries: Vec<RepoEntry> = serde_json::from_slice(&response.body).map_err(|e| {
            StoreError::from(RemoteStoreError::ParseError(format!(
                "Failed to parse directory listing: {}",
                e
            )))
        })?;

        let mut episodes = Vec::new();
        for entry in entries.iter().filter(|e| e.name.ends_with(".json")) {
            match self.fetch_episode(entry).await {
                Ok(episode) => episodes.push(episode),
                // One corrupt file must not hide the rest of the catalog.
                Err(e) => warn!(file = %entry.name, error = %e, "Skipping unreadable episode file"),
            }
        }

        sort_newest_first(&mut episodes);

        debug!(count = episodes.len(), "Listed episodes from hosted repository");
        Ok(episodes)
    }

    #[instrument(skip(self, episode), fields(id = %episode.id))]
    async fn delete(&self, episode: &Episode) -> Result<()> {
        let url = self.contents_url(&Self::episode_path(&episode.id));

        // The contents API requires the current blob sha to delete.
        let lookup = self.request(HttpMethod::Get, url.clone());
        let response = self.http.execute(lookup).await?;

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

        let entry: RepoEntry = serde_json::from_slice(&response.body).map_err(|e| {
            StoreError::from(RemoteStoreError::ParseError(format!(
                "Failed to parse file info: {}",
                e
            )))
        })?;

        let body = DeleteFileRequest {
            message: format!("Delete episode: {}", episode.title),
            sha: entry.sha,
            branch: self.config.branch.clone(),
        };

        let request = self.request(HttpMethod::Delete, url).json(&body)?;

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(RemoteStoreError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        info!(id = %episode.id, "Deleted episode from hosted repository");
        Ok(())
    }

    async fn is_available(&self) -> bool {
        self.config.is_configured()
    }

    fn backend_name(&self) -> &'static str {
        "git-hosted"
    }
}
