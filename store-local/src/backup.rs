//! Catalog export/import
//!
//! Admin tooling for manual backup and cross-device transfer. The exchange
//! format is a JSON array of episode records; audio payloads travel inline
//! as data URIs, so one document carries the whole catalog.

use tracing::{info, instrument};

use store_traits::episode::Episode;
use store_traits::error::{Result, StoreError};
use store_traits::media::{decode_data_uri, DecodedAudio};
use store_traits::store::EpisodeStore;

use crate::sqlite::SqliteEpisodeStore;

impl SqliteEpisodeStore {
    /// Serialize the whole catalog as a JSON document.
    #[instrument(skip(self))]
    pub async fn export_json(&self) -> Result<String> {
        let episodes = self.list().await?;

        let json = serde_json::to_string_pretty(&episodes)
            .map_err(|e| StoreError::Backend(format!("Failed to serialize catalog: {}", e)))?;

        info!(count = episodes.len(), "Exported episode catalog");
        Ok(json)
    }

    /// Replace the whole catalog from a JSON document.
    ///
    /// All-or-nothing: the document is fully parsed and every audio payload
    /// decoded before anything is written, and the replacement happens in a
    /// single transaction. A malformed document leaves the store untouched.
    #[instrument(skip(self, json))]
    pub async fn import_json(&self, json: &str) -> Result<usize> {
        let episodes: Vec<Episode> = serde_json::from_str(json)
            .map_err(|e| StoreError::Backend(format!("Invalid catalog document: {}", e)))?;

        let decoded: Vec<(Episode, DecodedAudio)> = episodes
            .into_iter()
            .map(|episode| {
                let audio = decode_data_uri(&episode.audio_url).map_err(|e| {
                    StoreError::Backend(format!("Episode {}: {}", episode.id, e))
                })?;
                Ok((episode, audio))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to begin import: {}", e)))?;

        sqlx::query("DELETE FROM episodes")
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to clear catalog: {}", e)))?;

        let count = decoded.len();
        for (episode, audio) in decoded {
            let audio_name = episode
                .storage_path
                .split_once("://")
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| format!("episode-{}", episode.id));

            Self::insert_record(
                &mut *tx,
                &episode.id,
                &episode.title,
                &episode.description,
                &audio.bytes,
                &audio.media_type,
                &audio_name,
                episode.created_at,
            )
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to commit import: {}", e)))?;

        info!(count, "Imported episode catalog");
        Ok(count)
    }
}
