//! Episode storage using SQLite

use async_trait::async_trait;
use bytes::Bytes;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

use store_traits::episode::{Episode, EpisodeId, NewEpisodeData};
use store_traits::error::{Result, StoreError};
use store_traits::media::encode_data_uri;
use store_traits::store::EpisodeStore;
use store_traits::time::Clock;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS episodes (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    audio_data BLOB NOT NULL,
    audio_type TEXT NOT NULL,
    audio_name TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    created_at INTEGER NOT NULL
)
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_episodes_created_at ON episodes(created_at)";

/// SQLite-backed episode store
///
/// Metadata and payload share one row, so an `add` is atomic: either the
/// whole episode is committed or nothing is. `is_available` is always true;
/// this store is the fallback target and must not have failure modes of its
/// own beyond local disk errors.
pub struct SqliteEpisodeStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteEpisodeStore {
    /// Open (or create) a database at the given path.
    pub async fn new(db_path: PathBuf, clock: Arc<dyn Clock>) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to open episode DB: {}", e)))?;

        Self::init(pool, clock, Some(db_path)).await
    }

    /// Create an in-memory store (for testing).
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// the pool is pinned to a single connection that never expires.
    pub async fn in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Backend(format!("Failed to open episode DB: {}", e)))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to open episode DB: {}", e)))?;

        Self::init(pool, clock, None).await
    }

    async fn init(
        pool: SqlitePool,
        clock: Arc<dyn Clock>,
        db_path: Option<PathBuf>,
    ) -> Result<Self> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to create episodes table: {}", e)))?;

        sqlx::query(CREATE_INDEX)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to create episodes index: {}", e)))?;

        debug!(path = ?db_path, "Initialized local episode store");

        Ok(Self { pool, clock })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_episode(row: &sqlx::sqlite::SqliteRow) -> Result<Episode> {
        let id: String = row.get("id");
        let audio_data: Vec<u8> = row.get("audio_data");
        let audio_type: String = row.get("audio_type");
        let audio_name: String = row.get("audio_name");

        let id = EpisodeId::from_string(&id)
            .map_err(|e| StoreError::Backend(format!("Corrupt episode id `{}`: {}", id, e)))?;

        Ok(Episode {
            id,
            title: row.get("title"),
            description: row.get("description"),
            audio_url: encode_data_uri(&audio_type, &audio_data),
            storage_path: format!("local://{}", audio_name),
            created_at: row.get("created_at"),
        })
    }

    /// Insert a fully-specified record, preserving its id and timestamp.
    ///
    /// Used by catalog import, which restores records rather than creating
    /// new ones.
    pub(crate) async fn insert_record<'e, E>(
        executor: E,
        id: &EpisodeId,
        title: &str,
        description: &str,
        audio_bytes: &Bytes,
        audio_type: &str,
        audio_name: &str,
        created_at: i64,
    ) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO episodes (id, title, description, audio_data, audio_type, audio_name, file_size, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(title)
        .bind(description)
        .bind(audio_bytes.as_ref())
        .bind(audio_type)
        .bind(audio_name)
        .bind(audio_bytes.len() as i64)
        .bind(created_at)
        .execute(executor)
        .await
        .map_err(|e| StoreError::Backend(format!("Failed to store episode: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl EpisodeStore for SqliteEpisodeStore {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn add(&self, data: NewEpisodeData) -> Result<Episode> {
        data.validate()?;

        let id = EpisodeId::new();
        let created_at = self.clock.unix_timestamp_millis();

        Self::insert_record(
            &self.pool,
            &id,
            &data.title,
            &data.description,
            &data.audio.bytes,
            &data.audio.media_type,
            &data.audio.file_name,
            created_at,
        )
        .await?;

        debug!(id = %id, bytes = data.audio.len(), "Stored episode locally");

        Ok(Episode {
            id,
            title: data.title,
            description: data.description,
            audio_url: encode_data_uri(&data.audio.media_type, &data.audio.bytes),
            storage_path: format!("local://{}", data.audio.file_name),
            created_at,
        })
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Episode>> {
        let rows = sqlx::query("SELECT * FROM episodes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to load episodes: {}", e)))?;

        let episodes = rows
            .iter()
            .map(Self::row_to_episode)
            .collect::<Result<Vec<_>>>()?;

        debug!(count = episodes.len(), "Loaded episodes from local store");
        Ok(episodes)
    }

    #[instrument(skip(self, episode), fields(id = %episode.id))]
    async fn delete(&self, episode: &Episode) -> Result<()> {
        let result = sqlx::query("DELETE FROM episodes WHERE id = ?")
            .bind(episode.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to delete episode: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                id: episode.id.to_string(),
            });
        }

        debug!(id = %episode.id, "Deleted episode from local store");
        Ok(())
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "local-sqlite"
    }
}
