//! Fallback orchestration tests
//!
//! Verifies the degradation contract: at most one primary attempt, at most
//! one hop to the local store, no retry of the same backend, and accepted
//! split-store divergence.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use core_service::FallbackStore;
use store_local::SqliteEpisodeStore;
use store_traits::episode::{AudioPayload, Episode, EpisodeId, NewEpisodeData};
use store_traits::error::{Result, StoreError};
use store_traits::store::EpisodeStore;
use store_traits::time::SystemClock;

// ============================================================================
// Scripted primary backends
// ============================================================================

/// How a scripted primary responds to every operation.
enum Script {
    FailWith(fn() -> StoreError),
    Hang,
}

/// Primary double that fails or hangs on demand, counting attempts.
struct ScriptedStore {
    available: bool,
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedStore {
    fn failing() -> Self {
        Self {
            available: true,
            script: Script::FailWith(|| StoreError::Backend("injected failure".to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::failing()
        }
    }

    fn hanging() -> Self {
        Self {
            available: true,
            script: Script::Hang,
            calls: AtomicUsize::new(0),
        }
    }

    fn not_found_on_delete() -> Self {
        Self {
            available: true,
            script: Script::FailWith(|| StoreError::NotFound {
                id: "gone".to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    fn attempts(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn run<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::FailWith(make) => Err(make()),
            Script::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl EpisodeStore for ScriptedStore {
    async fn add(&self, _data: NewEpisodeData) -> Result<Episode> {
        self.run().await
    }

    async fn list(&self) -> Result<Vec<Episode>> {
        self.run().await
    }

    async fn delete(&self, _episode: &Episode) -> Result<()> {
        self.run().await
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn local_store() -> Arc<SqliteEpisodeStore> {
    Arc::new(
        SqliteEpisodeStore::in_memory(Arc::new(SystemClock))
            .await
            .unwrap(),
    )
}

fn upload(title: &str) -> NewEpisodeData {
    NewEpisodeData::new(
        title,
        format!("{} description", title),
        AudioPayload::new(Bytes::from(vec![9u8; 128]), "audio/mpeg", "clip.mp3"),
    )
}

fn timeout() -> Duration {
    Duration::from_secs(5)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn failing_primary_falls_back_for_every_operation() {
    let primary = Arc::new(ScriptedStore::failing());
    let local = local_store().await;
    let store = FallbackStore::new(Some(primary.clone()), local.clone(), timeout());

    store.add(upload("Intro")).await.unwrap();
    let episodes = store.list().await.unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].title, "Intro");
    store.delete(&episodes[0]).await.unwrap();
    assert!(store.list().await.unwrap().is_empty());

    // add + list + delete + final list, one primary attempt each
    assert_eq!(primary.attempts(), 4);
}

#[tokio::test]
async fn unavailable_primary_is_never_attempted() {
    let primary = Arc::new(ScriptedStore::unavailable());
    let local = local_store().await;
    let store = FallbackStore::new(Some(primary.clone()), local, timeout());

    store.add(upload("Intro")).await.unwrap();
    let episodes = store.list().await.unwrap();
    store.delete(&episodes[0]).await.unwrap();

    assert_eq!(primary.attempts(), 0);
}

#[tokio::test]
async fn validation_failure_reaches_no_backend() {
    let primary = Arc::new(ScriptedStore::failing());
    let local = local_store().await;
    let store = FallbackStore::new(Some(primary.clone()), local.clone(), timeout());

    let bad = NewEpisodeData::new(
        "Intro",
        "desc",
        AudioPayload::new(Bytes::from(vec![1u8; 8]), "application/pdf", "notes.pdf"),
    );

    let err = store.add(bad).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
    assert_eq!(primary.attempts(), 0);
    assert!(local.list().await.unwrap().is_empty());
}

// Runs on the real clock: the sqlite pool establishes connections on a
// background thread, which tokio's `start_paused` virtual clock auto-advances
// past, tripping the pool's acquire timeout during setup.
#[tokio::test]
async fn hanging_primary_times_out_and_falls_back() {
    let primary = Arc::new(ScriptedStore::hanging());
    let local = local_store().await;
    let store = FallbackStore::new(Some(primary.clone()), local, Duration::from_secs(30));

    store.add(upload("Intro")).await.unwrap();

    assert_eq!(primary.attempts(), 1);
    assert_eq!(store.list().await.unwrap().len(), 1);
    // the hung attempt also counts once for the list call
    assert_eq!(primary.attempts(), 2);
}

#[tokio::test]
async fn healthy_primary_serves_without_touching_local() {
    let primary = local_store().await;
    let local = local_store().await;
    let store = FallbackStore::new(
        Some(primary.clone() as Arc<dyn EpisodeStore>),
        local.clone(),
        timeout(),
    );

    store.add(upload("Remote")).await.unwrap();

    assert_eq!(primary.list().await.unwrap().len(), 1);
    assert!(local.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn split_stores_are_not_merged() {
    let local = local_store().await;

    // Primary down: the episode lands locally.
    let degraded = FallbackStore::new(
        Some(Arc::new(ScriptedStore::unavailable()) as Arc<dyn EpisodeStore>),
        local.clone(),
        timeout(),
    );
    degraded.add(upload("local-only")).await.unwrap();

    // Primary back: a different record lives remotely.
    let primary = local_store().await;
    primary.add(upload("remote-only")).await.unwrap();
    let healthy = FallbackStore::new(
        Some(primary as Arc<dyn EpisodeStore>),
        local.clone(),
        timeout(),
    );

    // list reflects exactly one store's view, never a union
    let titles: Vec<String> = healthy
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["remote-only"]);
    assert_eq!(local.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn not_found_delete_does_not_fall_back() {
    let primary = Arc::new(ScriptedStore::not_found_on_delete());
    let local = local_store().await;

    // Seed the local store so a wrong fallback hop would "succeed"
    let seeded = local.add(upload("survivor")).await.unwrap();

    let store = FallbackStore::new(Some(primary.clone()), local.clone(), timeout());
    let err = store.delete(&seeded).await.unwrap_err();

    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(primary.attempts(), 1);
    // the local record was never touched
    assert_eq!(local.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn local_failure_after_fallback_is_terminal() {
    let primary = Arc::new(ScriptedStore::failing());
    let local = local_store().await;
    let store = FallbackStore::new(Some(primary), local, timeout());

    // Deleting a record that exists nowhere: primary fails, local reports
    // NotFound, and that local error is the terminal one.
    let ghost = Episode {
        id: EpisodeId::new(),
        title: "ghost".to_string(),
        description: "d".to_string(),
        audio_url: "data:audio/mpeg;base64,AA==".to_string(),
        storage_path: "local://ghost.mp3".to_string(),
        created_at: 1,
    };

    let err = store.delete(&ghost).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn no_primary_routes_straight_to_local() {
    let local = local_store().await;
    let store = FallbackStore::new(None, local, timeout());

    store.add(upload("Intro")).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 1);
}
