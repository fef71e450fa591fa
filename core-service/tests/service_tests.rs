//! Façade tests
//!
//! Drives `PodcastService` the way the UI does: publish, re-list, delete,
//! play, back up. Uses a stepping clock so creation order is deterministic.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use core_playback::PlaybackController;
use core_service::auth::AdminAuthenticator;
use core_service::{PodcastService, Result};
use store_local::SqliteEpisodeStore;
use store_traits::episode::{AudioPayload, NewEpisodeData, MAX_AUDIO_BYTES};
use store_traits::error::StoreError;
use store_traits::time::Clock;

/// Clock advancing five minutes per reading.
struct SteppingClock {
    next_millis: AtomicI64,
}

impl SteppingClock {
    fn new() -> Self {
        Self {
            next_millis: AtomicI64::new(1_700_000_000_000),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.next_millis.fetch_add(5 * 60 * 1_000, Ordering::SeqCst);
        DateTime::from_timestamp_millis(millis).unwrap()
    }
}

async fn service() -> PodcastService {
    let local = Arc::new(
        SqliteEpisodeStore::in_memory(Arc::new(SteppingClock::new()))
            .await
            .unwrap(),
    );
    PodcastService::with_stores(local, None, Duration::from_secs(5))
}

fn upload(title: &str, len: usize) -> NewEpisodeData {
    NewEpisodeData::new(
        title,
        format!("{} description", title),
        AudioPayload::new(Bytes::from(vec![3u8; len]), "audio/mpeg", "clip.mp3"),
    )
}

#[tokio::test]
async fn publishing_and_listening_scenario() {
    let service = service().await;
    let mut controller = PlaybackController::new();

    // Publish "Intro" (1 MiB, audio/mpeg) and see it listed
    service
        .add_episode(upload("Intro", 1024 * 1024))
        .await
        .unwrap();
    let episodes = service.get_all_episodes().await.unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].title, "Intro");

    // A later episode lists first
    service.add_episode(upload("Follow-up", 2048)).await.unwrap();
    let episodes = service.get_all_episodes().await.unwrap();
    let titles: Vec<&str> = episodes.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Follow-up", "Intro"]);

    // Delete "Intro"
    let intro = episodes[1].clone();
    service.delete_episode(&intro).await.unwrap();
    let episodes = service.get_all_episodes().await.unwrap();
    let titles: Vec<&str> = episodes.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Follow-up"]);

    // Select toggles: play, pause, play
    let follow_up = &episodes[0];
    controller.select(follow_up);
    assert!(controller.is_playing());
    controller.select(follow_up);
    assert!(!controller.is_playing());
    controller.select(follow_up);
    assert!(controller.is_playing());
}

#[tokio::test]
async fn deleting_the_loaded_episode_clears_playback() {
    let service = service().await;
    let mut controller = PlaybackController::new();

    service.add_episode(upload("Intro", 512)).await.unwrap();
    let episodes = service.get_all_episodes().await.unwrap();

    controller.select(&episodes[0]);
    controller.on_source_ready(Duration::from_secs(60));
    assert!(controller.should_output());

    service.delete_episode(&episodes[0]).await.unwrap();
    controller.on_episode_deleted(&episodes[0].id);

    assert_eq!(controller.current_episode_id(), None);
    assert!(!controller.is_playing());
}

#[tokio::test]
async fn deleting_twice_is_a_noop_for_the_caller() {
    let service = service().await;

    service.add_episode(upload("Intro", 512)).await.unwrap();
    let episodes = service.get_all_episodes().await.unwrap();

    service.delete_episode(&episodes[0]).await.unwrap();
    // already gone: still success from the caller's perspective
    service.delete_episode(&episodes[0]).await.unwrap();

    assert!(service.get_all_episodes().await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected_without_mutation() {
    let service = service().await;

    let err = service
        .add_episode(upload("Huge", MAX_AUDIO_BYTES + 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        core_service::CoreError::Store(StoreError::Validation { .. })
    ));
    assert!(service.get_all_episodes().await.unwrap().is_empty());
}

#[tokio::test]
async fn catalog_backup_moves_between_devices() {
    let source = service().await;
    source.add_episode(upload("Intro", 512)).await.unwrap();
    source.add_episode(upload("Follow-up", 512)).await.unwrap();

    let document = source.export_catalog().await.unwrap();

    let target = service().await;
    let imported = target.import_catalog(&document).await.unwrap();
    assert_eq!(imported, 2);

    let titles: Vec<String> = target
        .get_all_episodes()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["Follow-up", "Intro"]);
}

struct PassphraseList {
    accepted: Vec<String>,
}

#[async_trait]
impl AdminAuthenticator for PassphraseList {
    async fn verify(&self, passphrase: &str) -> Result<bool> {
        Ok(self.accepted.iter().any(|p| p == passphrase))
    }
}

#[tokio::test]
async fn admin_access_is_denied_without_an_authenticator() {
    let service = service().await;
    assert!(!service.authenticate_admin("anything").await.unwrap());
}

#[tokio::test]
async fn admin_access_delegates_to_the_authenticator() {
    let service = service().await.with_authenticator(Arc::new(PassphraseList {
        accepted: vec!["correct horse".to_string()],
    }));

    assert!(service.authenticate_admin("correct horse").await.unwrap());
    assert!(!service.authenticate_admin("wrong").await.unwrap());
}
