//! Fallback orchestration
//!
//! [`FallbackStore`] wraps one optional primary backend and the
//! always-available local store. Every operation resolves with at most two
//! backend attempts: one bounded attempt against the primary (skipped
//! entirely when the availability probe says no), then at most one hop to
//! the local store. The same backend is never retried.
//!
//! The two stores are not reconciled: an episode written to the local store
//! while the primary was down stays local, and `list` reflects whichever
//! store answered. This divergence is accepted behavior.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use store_traits::episode::{Episode, NewEpisodeData};
use store_traits::error::{Result, StoreError};
use store_traits::store::EpisodeStore;

/// Orchestrator that degrades from a primary backend to the local store.
pub struct FallbackStore {
    primary: Option<Arc<dyn EpisodeStore>>,
    local: Arc<dyn EpisodeStore>,
    primary_timeout: Duration,
}

impl FallbackStore {
    /// Wrap a primary backend (if any) around the local store.
    ///
    /// The local store must be unconditionally available; it is the terminal
    /// fallback and never falls back itself.
    pub fn new(
        primary: Option<Arc<dyn EpisodeStore>>,
        local: Arc<dyn EpisodeStore>,
        primary_timeout: Duration,
    ) -> Self {
        Self {
            primary,
            local,
            primary_timeout,
        }
    }

    /// The primary backend, if configured and currently available.
    async fn available_primary(&self) -> Option<&Arc<dyn EpisodeStore>> {
        match &self.primary {
            Some(primary) if primary.is_available().await => Some(primary),
            Some(primary) => {
                debug!(
                    backend = primary.backend_name(),
                    "Primary backend unavailable, routing to local store"
                );
                None
            }
            None => None,
        }
    }

    /// Run a primary attempt under the configured deadline.
    async fn bounded<T>(&self, attempt: impl Future<Output = Result<T>> + Send) -> Result<T> {
        match tokio::time::timeout(self.primary_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                seconds: self.primary_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl EpisodeStore for FallbackStore {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn add(&self, data: NewEpisodeData) -> Result<Episode> {
        // Validation failures would be identical everywhere; reject before
        // any backend sees the payload.
        data.validate()?;

        if let Some(primary) = self.available_primary().await {
            match self.bounded(primary.add(data.clone())).await {
                Ok(episode) => return Ok(episode),
                Err(e) if !e.is_fallback_eligible() => return Err(e),
                Err(e) => warn!(
                    backend = primary.backend_name(),
                    error = %e,
                    "Primary add failed, retrying against local store"
                ),
            }
        }

        self.local.add(data).await
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Episode>> {
        if let Some(primary) = self.available_primary().await {
            match self.bounded(primary.list()).await {
                Ok(episodes) => return Ok(episodes),
                Err(e) if !e.is_fallback_eligible() => return Err(e),
                Err(e) => warn!(
                    backend = primary.backend_name(),
                    error = %e,
                    "Primary list failed, retrying against local store"
                ),
            }
        }

        self.local.list().await
    }

    #[instrument(skip(self, episode), fields(id = %episode.id))]
    async fn delete(&self, episode: &Episode) -> Result<()> {
        if let Some(primary) = self.available_primary().await {
            match self.bounded(primary.delete(episode)).await {
                Ok(()) => return Ok(()),
                // An absent record is a statement about the data, not the
                // backend; retrying the delete locally would be meaningless.
                Err(e) if !e.is_fallback_eligible() => return Err(e),
                Err(e) => warn!(
                    backend = primary.backend_name(),
                    error = %e,
                    "Primary delete failed, retrying against local store"
                ),
            }
        }

        self.local.delete(episode).await
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "fallback"
    }
}
