//! Scenario tests for the playback controller
//!
//! Exercises full listener sessions the way the UI drives them: select,
//! wait for the source, let episodes run out, delete mid-playback.

use core_playback::{PlaybackController, SourceState};
use std::time::Duration;
use store_traits::episode::{Episode, EpisodeId};

fn episode(title: &str, created_at: i64) -> Episode {
    Episode {
        id: EpisodeId::new(),
        title: title.to_string(),
        description: format!("{} description", title),
        audio_url: "data:audio/mpeg;base64,AA==".to_string(),
        storage_path: "local://clip.mp3".to_string(),
        created_at,
    }
}

#[test]
fn listening_session_runs_through_the_catalog() {
    let mut controller = PlaybackController::new();

    // Newest-first, as the list view displays them
    let episodes = vec![
        episode("third", 3000),
        episode("second", 2000),
        episode("first", 1000),
    ];

    controller.select(&episodes[0]);
    controller.on_source_ready(Duration::from_secs(120));
    assert!(controller.should_output());

    // Each finished episode hands off to the next one down the list
    controller.on_ended(&episodes);
    assert_eq!(controller.current_episode_id(), Some(episodes[1].id));
    assert!(!controller.should_output()); // new source still loading
    controller.on_source_ready(Duration::from_secs(95));
    assert!(controller.should_output());

    controller.on_ended(&episodes);
    controller.on_source_ready(Duration::from_secs(80));

    // Finishing the last episode stops playback without unloading it
    controller.on_ended(&episodes);
    assert_eq!(controller.current_episode_id(), Some(episodes[2].id));
    assert!(!controller.is_playing());
}

#[test]
fn double_select_toggles_pause_and_resume() {
    let mut controller = PlaybackController::new();
    let e = episode("intro", 1000);

    controller.select(&e);
    controller.on_source_ready(Duration::from_secs(60));
    assert!(controller.is_playing());

    controller.select(&e);
    assert!(!controller.is_playing());

    controller.select(&e);
    assert!(controller.is_playing());
    // readiness survives a pause/resume toggle
    assert!(controller.should_output());
}

#[test]
fn deleting_playing_episode_mid_session_clears_state() {
    let mut controller = PlaybackController::new();
    let episodes = vec![episode("b", 2000), episode("a", 1000)];

    controller.select(&episodes[0]);
    controller.on_source_ready(Duration::from_secs(60));
    controller.seek(Duration::from_secs(12));

    controller.on_episode_deleted(&episodes[0].id);

    assert_eq!(controller.current_episode_id(), None);
    assert!(!controller.is_playing());
    assert_eq!(*controller.source_state(), SourceState::Empty);
    assert_eq!(controller.position(), Duration::ZERO);

    // A fresh selection works normally afterwards
    controller.select(&episodes[1]);
    assert!(controller.is_playing());
}

#[test]
fn refresh_regenerating_source_defers_play_until_ready() {
    let mut controller = PlaybackController::new();
    let e = episode("intro", 1000);

    controller.select(&e);
    controller.on_source_ready(Duration::from_secs(60));
    controller.on_progress(Duration::from_secs(30));
    assert!(controller.should_output());

    // A list refresh re-materialized the audio URL
    controller.on_source_changed();
    assert!(!controller.should_output());
    assert!(controller.is_playing());
    assert_eq!(controller.position(), Duration::ZERO);

    controller.on_source_ready(Duration::from_secs(60));
    assert!(controller.should_output());
}
