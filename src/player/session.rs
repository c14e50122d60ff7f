//! The playback state machine proper.
//!
//! `SessionState` is synchronous and single-owner: the command thread is the
//! only caller, so transitions never race. All decoder access goes through
//! the injected [`AudioBackend`] and all state becomes visible to the
//! outside world through the shared snapshot.

use std::time::Duration;

use rand::seq::IndexedRandom;
use tracing::warn;

use crate::config::PlaybackSettings;
use crate::library::{Catalog, CatalogEntry};

use super::backend::{AudioBackend, DurationProbe};
use super::types::SnapshotHandle;

/// What the command thread has to do about the sampler after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Reaction {
    /// Nothing changed about the current play-through.
    None,
    /// A new play-through began; restart the sampler.
    Started,
    /// Playback ended; cancel the sampler.
    Stopped,
}

pub(super) struct SessionState {
    view: Vec<CatalogEntry>,
    index: Option<usize>,
    playing: bool,
    paused: bool,
    shuffle: bool,
    repeat: bool,
    volume: u8,
    track_length: Duration,
    /// Monotonic play-through id; guards against stale end-of-track signals
    /// from a sampler that was cancelled after queueing its message.
    play_id: u64,
}

impl SessionState {
    pub(super) fn new(view: Vec<CatalogEntry>, settings: &PlaybackSettings) -> Self {
        Self {
            view,
            index: None,
            playing: false,
            paused: false,
            shuffle: settings.shuffle,
            repeat: settings.repeat,
            volume: settings.volume.min(100),
            track_length: Duration::ZERO,
            play_id: 0,
        }
    }

    pub(super) fn play_id(&self) -> u64 {
        self.play_id
    }

    /// Mirror the session into the shared snapshot. Elapsed and the
    /// unplayable marker are owned by the individual transitions.
    pub(super) fn sync(&self, snapshot: &SnapshotHandle) {
        let mut snap = snapshot.lock().unwrap();
        snap.current_index = self.index;
        snap.view_len = self.view.len();
        snap.playing = self.playing;
        snap.paused = self.paused;
        snap.shuffle = self.shuffle;
        snap.repeat = self.repeat;
        snap.track_length = self.track_length;
    }

    pub(super) fn select_and_play(
        &mut self,
        index: usize,
        backend: &mut dyn AudioBackend,
        probe: &dyn DurationProbe,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        // Out-of-range selection is an invalid command: silently ignored.
        let Some(entry) = self.view.get(index).cloned() else {
            return Reaction::None;
        };

        self.track_length = probe.duration_of(&entry.url).unwrap_or(Duration::ZERO);
        self.index = Some(index);

        match backend.load(&entry.url) {
            Ok(()) => {
                backend.set_volume(self.volume as f32 / 100.0);
                backend.play();
                self.playing = true;
                self.paused = false;
                self.play_id += 1;

                {
                    let mut snap = snapshot.lock().unwrap();
                    snap.elapsed = Duration::ZERO;
                    snap.unplayable = None;
                }
                self.sync(snapshot);
                Reaction::Started
            }
            Err(err) => {
                // Track unplayable: report it, fall back to idle on this
                // slot and await the next command.
                warn!("{}", err);
                self.playing = false;
                self.paused = false;
                self.track_length = Duration::ZERO;

                {
                    let mut snap = snapshot.lock().unwrap();
                    snap.elapsed = Duration::ZERO;
                    snap.unplayable = Some(entry.path);
                }
                self.sync(snapshot);
                Reaction::Stopped
            }
        }
    }

    pub(super) fn pause(
        &mut self,
        backend: &mut dyn AudioBackend,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        if self.playing && !self.paused {
            backend.pause();
            self.paused = true;
            self.sync(snapshot);
        }
        Reaction::None
    }

    pub(super) fn resume(
        &mut self,
        backend: &mut dyn AudioBackend,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        if self.playing && self.paused {
            backend.resume();
            self.paused = false;
            self.sync(snapshot);
        }
        Reaction::None
    }

    /// Valid from any state. Keeps the current index so a later play resumes
    /// from the same slot.
    pub(super) fn stop(
        &mut self,
        backend: &mut dyn AudioBackend,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        backend.stop();
        self.playing = false;
        self.paused = false;
        self.track_length = Duration::ZERO;
        snapshot.lock().unwrap().elapsed = Duration::ZERO;
        self.sync(snapshot);
        Reaction::Stopped
    }

    pub(super) fn next(
        &mut self,
        backend: &mut dyn AudioBackend,
        probe: &dyn DurationProbe,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        let Some(target) = self.step_target(1) else {
            return Reaction::None;
        };
        self.select_and_play(target, backend, probe, snapshot)
    }

    pub(super) fn previous(
        &mut self,
        backend: &mut dyn AudioBackend,
        probe: &dyn DurationProbe,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        let Some(target) = self.step_target(-1) else {
            return Reaction::None;
        };
        self.select_and_play(target, backend, probe, snapshot)
    }

    /// Pick the index `next`/`previous` moves to. Shuffle draws uniformly
    /// among every index except the current one; otherwise the step wraps
    /// around the view, and a single track wraps to itself.
    fn step_target(&self, direction: i64) -> Option<usize> {
        let len = self.view.len();
        if len == 0 {
            return None;
        }

        if self.shuffle && len > 1 {
            let choices: Vec<usize> = (0..len).filter(|i| Some(*i) != self.index).collect();
            return choices.choose(&mut rand::rng()).copied();
        }

        Some(match self.index {
            Some(current) if direction >= 0 => (current + 1) % len,
            Some(current) => (current + len - 1) % len,
            None if direction >= 0 => 0,
            None => len - 1,
        })
    }

    pub(super) fn set_shuffle(&mut self, on: bool, snapshot: &SnapshotHandle) -> Reaction {
        self.shuffle = on;
        self.sync(snapshot);
        Reaction::None
    }

    pub(super) fn set_repeat(&mut self, on: bool, snapshot: &SnapshotHandle) -> Reaction {
        self.repeat = on;
        self.sync(snapshot);
        Reaction::None
    }

    pub(super) fn set_volume(
        &mut self,
        volume: u8,
        backend: &mut dyn AudioBackend,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        self.volume = volume.min(100);
        backend.set_volume(self.volume as f32 / 100.0);
        self.sync(snapshot);
        Reaction::None
    }

    /// Rebuild the active view. The playing entry is tracked by path, not
    /// index: if it survives the filter the index relocates and playback
    /// continues untouched; otherwise the view starts over and any active
    /// playback stops.
    pub(super) fn apply_filter(
        &mut self,
        catalog: &Catalog,
        artist: Option<&str>,
        query: &str,
        backend: &mut dyn AudioBackend,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        let current_path = self
            .index
            .and_then(|i| self.view.get(i))
            .map(|entry| entry.path.clone());

        self.view = catalog.filtered(artist, query);

        let relocated = current_path
            .as_ref()
            .and_then(|path| self.view.iter().position(|entry| &entry.path == path));

        let reaction = match relocated {
            Some(position) => {
                self.index = Some(position);
                Reaction::None
            }
            None => {
                let was_active = self.playing;
                if was_active {
                    backend.stop();
                    self.playing = false;
                    self.paused = false;
                    self.track_length = Duration::ZERO;
                    snapshot.lock().unwrap().elapsed = Duration::ZERO;
                }
                self.index = if self.view.is_empty() { None } else { Some(0) };
                if was_active {
                    Reaction::Stopped
                } else {
                    Reaction::None
                }
            }
        };

        self.sync(snapshot);
        reaction
    }

    /// The single transition path available to the sampler. Repeat restarts
    /// the same slot from zero; otherwise this behaves as `next`.
    pub(super) fn track_ended(
        &mut self,
        play_id: u64,
        backend: &mut dyn AudioBackend,
        probe: &dyn DurationProbe,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        if play_id != self.play_id || !self.playing {
            // Stale signal from a play-through that is already over.
            return Reaction::None;
        }

        if self.repeat {
            return self.restart_current(backend, snapshot);
        }
        self.next(backend, probe, snapshot)
    }

    fn restart_current(
        &mut self,
        backend: &mut dyn AudioBackend,
        snapshot: &SnapshotHandle,
    ) -> Reaction {
        match backend.restart() {
            Ok(()) => {
                self.play_id += 1;
                snapshot.lock().unwrap().elapsed = Duration::ZERO;
                self.sync(snapshot);
                Reaction::Started
            }
            Err(err) => {
                warn!("{}", err);
                self.stop(backend, snapshot)
            }
        }
    }
}
