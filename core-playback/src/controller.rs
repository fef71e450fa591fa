//! Playback state machine

use std::time::Duration;
use tracing::debug;

use store_traits::episode::{Episode, EpisodeId};

/// Readiness of the audio source behind the current episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    /// No episode loaded
    Empty,
    /// Source attached, duration not yet reported
    Loading,
    /// Source ready for output
    Ready { duration: Duration },
}

/// Playback controller
///
/// `playing` is the user's intent; audio may only flow once the source has
/// reported its duration. A play command issued while the source is still
/// loading is therefore deferred, never dropped: [`should_output`] becomes
/// true the moment readiness arrives, with no further command required.
///
/// [`should_output`]: PlaybackController::should_output
#[derive(Debug)]
pub struct PlaybackController {
    current: Option<EpisodeId>,
    playing: bool,
    source: SourceState,
    position: Duration,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            current: None,
            playing: false,
            source: SourceState::Empty,
            position: Duration::ZERO,
        }
    }

    /// Handle a click on an episode row.
    ///
    /// Selecting the current episode toggles play/pause; selecting another
    /// episode switches to it and starts playing.
    pub fn select(&mut self, episode: &Episode) {
        if self.current == Some(episode.id) {
            self.playing = !self.playing;
            debug!(id = %episode.id, playing = self.playing, "Toggled current episode");
        } else {
            self.current = Some(episode.id);
            self.playing = true;
            self.source = SourceState::Loading;
            self.position = Duration::ZERO;
            debug!(id = %episode.id, "Selected episode");
        }
    }

    /// Toggle the play/pause intent. No-op when nothing is selected.
    pub fn play_pause(&mut self) {
        if self.current.is_some() {
            self.playing = !self.playing;
        }
    }

    /// Handle the media element reaching the end of the current episode.
    ///
    /// `episodes` is the list in its currently displayed order. The next
    /// episode is selected when one exists; on the last episode playback
    /// stops but the episode stays loaded.
    pub fn on_ended(&mut self, episodes: &[Episode]) {
        let Some(current) = self.current else {
            return;
        };

        let index = episodes.iter().position(|e| e.id == current);
        match index {
            Some(i) if i + 1 < episodes.len() => {
                debug!(from = %current, to = %episodes[i + 1].id, "Advancing to next episode");
                self.select(&episodes[i + 1]);
            }
            _ => {
                // Last episode, or no longer in the displayed list
                self.playing = false;
                self.position = Duration::ZERO;
            }
        }
    }

    /// Handle the current episode's underlying audio reference changing
    /// (e.g. a refreshed list regenerated an ephemeral URL).
    ///
    /// Position resets and the source must report readiness again; any play
    /// intent stays pending.
    pub fn on_source_changed(&mut self) {
        if self.current.is_some() {
            self.source = SourceState::Loading;
            self.position = Duration::ZERO;
        }
    }

    /// Handle the source reporting its duration.
    pub fn on_source_ready(&mut self, duration: Duration) {
        if self.current.is_some() {
            self.source = SourceState::Ready { duration };
            debug!(?duration, deferred_play = self.playing, "Source ready");
        }
    }

    /// Handle an episode being deleted from the catalog.
    ///
    /// Deleting the loaded episode clears playback entirely.
    pub fn on_episode_deleted(&mut self, id: &EpisodeId) {
        if self.current == Some(*id) {
            debug!(id = %id, "Current episode deleted, clearing playback");
            self.current = None;
            self.playing = false;
            self.source = SourceState::Empty;
            self.position = Duration::ZERO;
        }
    }

    /// Seek within the current episode. Ignored until the source is ready;
    /// positions past the end clamp to the duration.
    pub fn seek(&mut self, position: Duration) {
        if let SourceState::Ready { duration } = self.source {
            self.position = position.min(duration);
        }
    }

    /// Record playback progress reported by the audio sink.
    pub fn on_progress(&mut self, position: Duration) {
        if matches!(self.source, SourceState::Ready { .. }) {
            self.position = position;
        }
    }

    pub fn current_episode_id(&self) -> Option<EpisodeId> {
        self.current
    }

    /// The user's play/pause intent.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn source_state(&self) -> &SourceState {
        &self.source
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Whether audio should actually flow: play intent AND a ready source.
    pub fn should_output(&self) -> bool {
        self.playing && matches!(self.source, SourceState::Ready { .. })
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}
