//! # Service Configuration
//!
//! Builder for [`CoreConfig`], the single place where a deployment chooses
//! its primary backend and injects its dependencies. Backend clients are
//! constructed here at process start and passed down explicitly; no module
//! holds a process-wide client singleton.
//!
//! ## Usage
//!
//! ```ignore
//! use core_service::config::{BackendConfig, CoreConfig};
//! use store_http::RestApiConfig;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/var/lib/podcast/episodes.db")
//!     .backend(BackendConfig::HttpApi(RestApiConfig::new(
//!         "https://my-podcast.example.com/api",
//!     )))
//!     .build()
//!     .expect("Failed to build config");
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use store_http::{
    DocumentStore, DocumentStoreConfig, GitHostedConfig, GitHostedStore, RestApiConfig,
    RestApiStore,
};
use store_traits::http::HttpClient;
use store_traits::store::EpisodeStore;
use store_traits::time::Clock;

use crate::error::{CoreError, Result};

/// Default bound on a single primary-backend attempt.
pub const DEFAULT_PRIMARY_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the configurable primary timeout.
pub const MAX_PRIMARY_TIMEOUT: Duration = Duration::from_secs(120);

/// Which primary backend this deployment persists to.
///
/// One registry entry per backend kind; the selection happens here, via
/// configuration, rather than by swapping source files.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// No remote backend; the local store serves everything.
    LocalOnly,
    /// Generic REST episode collection (reference wire shape).
    HttpApi(RestApiConfig),
    /// Hosted document table.
    DocumentStore(DocumentStoreConfig),
    /// Git-hosted JSON files.
    GitHosted(GitHostedConfig),
}

impl BackendConfig {
    /// Construct the primary adapter this configuration names.
    ///
    /// Returns `None` for [`BackendConfig::LocalOnly`].
    pub fn build_primary(
        &self,
        http: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Option<Arc<dyn EpisodeStore>> {
        match self {
            BackendConfig::LocalOnly => None,
            BackendConfig::HttpApi(config) => {
                Some(Arc::new(RestApiStore::new(http, config.clone(), clock)))
            }
            BackendConfig::DocumentStore(config) => {
                Some(Arc::new(DocumentStore::new(http, config.clone(), clock)))
            }
            BackendConfig::GitHosted(config) => {
                Some(Arc::new(GitHostedStore::new(http, config.clone(), clock)))
            }
        }
    }
}

/// Core configuration for the podcast service.
///
/// Use [`CoreConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Path to the local SQLite episode database
    pub database_path: PathBuf,

    /// Primary backend selection
    pub backend: BackendConfig,

    /// HTTP client used by remote backends (defaults to reqwest)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Time source for `created_at` stamps (defaults to the system clock)
    pub clock: Option<Arc<dyn Clock>>,

    /// Bound on a single primary-backend attempt
    pub primary_timeout: Duration,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database_path", &self.database_path)
            .field("backend", &self.backend)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("clock", &self.clock.as_ref().map(|_| "Clock { ... }"))
            .field("primary_timeout", &self.primary_timeout)
            .finish()
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`] with fail-fast validation.
#[derive(Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    backend: Option<BackendConfig>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    primary_timeout: Option<Duration>,
}

impl CoreConfigBuilder {
    /// Set the local episode database path (required).
    pub fn database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Select the primary backend (defaults to [`BackendConfig::LocalOnly`]).
    pub fn backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Inject a custom HTTP client.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Inject a custom time source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Bound a single primary attempt; values above two minutes are clamped.
    pub fn primary_timeout(mut self, timeout: Duration) -> Self {
        self.primary_timeout = Some(timeout);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CapabilityMissing`] when a required dependency
    /// was not provided.
    pub fn build(self) -> Result<CoreConfig> {
        let database_path = self.database_path.ok_or_else(|| CoreError::CapabilityMissing {
            capability: "database_path".to_string(),
            message: "No local episode database path provided. The local store is the \
                      guaranteed fallback and cannot be disabled; call \
                      `.database_path(...)` on the builder."
                .to_string(),
        })?;

        let primary_timeout = self
            .primary_timeout
            .unwrap_or(DEFAULT_PRIMARY_TIMEOUT)
            .min(MAX_PRIMARY_TIMEOUT);

        Ok(CoreConfig {
            database_path,
            backend: self.backend.unwrap_or(BackendConfig::LocalOnly),
            http_client: self.http_client,
            clock: self.clock,
            primary_timeout,
        })
    }
}
