//! # Podcast service façade and bootstrap helpers.
//!
//! This crate wires a chosen primary backend (REST API, document table,
//! git-hosted store - or none) together with the always-available local
//! SQLite store, behind the three-function surface the UI consumes:
//! [`get_all_episodes`](PodcastService::get_all_episodes),
//! [`add_episode`](PodcastService::add_episode), and
//! [`delete_episode`](PodcastService::delete_episode).
//!
//! Backend selection happens once, at process start, through
//! [`CoreConfig`](config::CoreConfig); the [`FallbackStore`](fallback::FallbackStore)
//! then degrades transparently to the local store whenever the primary is
//! unconfigured, unreachable, or failing.

pub mod auth;
pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;

pub use auth::AdminAuthenticator;
pub use config::{BackendConfig, CoreConfig};
pub use error::{CoreError, Result};
pub use fallback::FallbackStore;
pub use logging::{init_logging, LogFormat, LoggingConfig};

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use store_http::ReqwestHttpClient;
use store_local::SqliteEpisodeStore;
use store_traits::episode::{Episode, NewEpisodeData};
use store_traits::error::StoreError;
use store_traits::store::EpisodeStore;
use store_traits::time::SystemClock;

/// Primary façade exposed to host applications.
///
/// Owns the persisted episode catalog. UI layers hold only transient copies
/// of `get_all_episodes` results and re-list after every mutation.
pub struct PodcastService {
    store: FallbackStore,
    local: Arc<SqliteEpisodeStore>,
    authenticator: Option<Arc<dyn AdminAuthenticator>>,
}

impl PodcastService {
    /// Bootstrap the service from configuration.
    pub async fn new(config: CoreConfig) -> Result<Self> {
        let clock = config.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let local = Arc::new(SqliteEpisodeStore::new(config.database_path, clock.clone()).await?);

        let primary = match &config.backend {
            BackendConfig::LocalOnly => None,
            backend => {
                let http = config
                    .http_client
                    .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
                backend.build_primary(http, clock)
            }
        };

        if let Some(primary) = &primary {
            info!(backend = primary.backend_name(), "Primary backend configured");
        } else {
            info!("No primary backend; episodes persist locally only");
        }

        Ok(Self::with_stores(local, primary, config.primary_timeout))
    }

    /// Construct the service from explicit store handles.
    ///
    /// This is the dependency-injection path used by tests and embedders
    /// that build their own adapters.
    pub fn with_stores(
        local: Arc<SqliteEpisodeStore>,
        primary: Option<Arc<dyn EpisodeStore>>,
        primary_timeout: Duration,
    ) -> Self {
        let store = FallbackStore::new(primary, local.clone(), primary_timeout);
        Self {
            store,
            local,
            authenticator: None,
        }
    }

    /// Attach the admin credential verifier.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn AdminAuthenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// All episodes, newest-first.
    pub async fn get_all_episodes(&self) -> Result<Vec<Episode>> {
        Ok(self.store.list().await?)
    }

    /// Publish a new episode.
    pub async fn add_episode(&self, data: NewEpisodeData) -> Result<()> {
        let episode = self.store.add(data).await?;
        info!(id = %episode.id, title = %episode.title, "Episode published");
        Ok(())
    }

    /// Remove an episode.
    ///
    /// An already-deleted episode is reported as success: the caller wanted
    /// it gone, and it is.
    pub async fn delete_episode(&self, episode: &Episode) -> Result<()> {
        match self.store.delete(episode).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { id }) => {
                warn!(id = %id, "Episode was already deleted");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Export the local catalog as a JSON document.
    pub async fn export_catalog(&self) -> Result<String> {
        Ok(self.local.export_json().await?)
    }

    /// Replace the local catalog from a JSON document (all-or-nothing).
    pub async fn import_catalog(&self, json: &str) -> Result<usize> {
        Ok(self.local.import_json(json).await?)
    }

    /// Verify an admin passphrase through the configured collaborator.
    ///
    /// Denies when no verifier is wired in.
    pub async fn authenticate_admin(&self, passphrase: &str) -> Result<bool> {
        match &self.authenticator {
            Some(authenticator) => authenticator.verify(passphrase).await,
            None => {
                warn!("Admin access requested but no authenticator is configured");
                Ok(false)
            }
        }
    }
}
