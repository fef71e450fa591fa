//! The storage backend contract
//!
//! Every backend - local SQLite, generic REST API, BaaS document table,
//! git-hosted JSON store - implements [`EpisodeStore`]. The fallback
//! orchestrator in `core-service` composes two implementations (primary and
//! local) behind the same trait.

use async_trait::async_trait;

use crate::episode::{Episode, NewEpisodeData};
use crate::error::Result;

/// Three-operation storage contract plus an availability probe.
///
/// # Contract
///
/// - `add` validates the upload first (payload present, ≤ 50 MiB, audio
///   media type) and persists metadata and payload atomically: either both
///   are committed or the call fails with no observable mutation.
/// - `list` is a pure read returning episodes newest-first by `created_at`.
///   Repeated calls without interleaved mutation return equal results, up to
///   regenerated ephemeral audio URLs.
/// - `delete` removes payload (via `storage_path`) and metadata (via `id`);
///   an already-deleted record yields [`StoreError::NotFound`](crate::error::StoreError::NotFound),
///   which callers may treat as success.
/// - `is_available` must be inexpensive - a configuration or reachability
///   check, not a full round trip with payload.
///
/// # Example
///
/// ```ignore
/// use store_traits::store::EpisodeStore;
///
/// async fn refresh(store: &dyn EpisodeStore) -> store_traits::Result<usize> {
///     let episodes = store.list().await?;
///     Ok(episodes.len())
/// }
/// ```
#[async_trait]
pub trait EpisodeStore: Send + Sync {
    /// Persist a new episode and return the stored record.
    async fn add(&self, data: NewEpisodeData) -> Result<Episode>;

    /// Return all episodes, newest-first.
    async fn list(&self) -> Result<Vec<Episode>>;

    /// Remove an episode's payload and metadata.
    async fn delete(&self, episode: &Episode) -> Result<()>;

    /// Whether this backend is worth attempting at all.
    async fn is_available(&self) -> bool;

    /// Stable label used in diagnostics and fallback logs.
    fn backend_name(&self) -> &'static str;
}
