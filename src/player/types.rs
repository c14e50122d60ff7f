//! Player command and snapshot types shared with presentation shells.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

#[derive(Debug)]
pub enum PlayerCmd {
    /// Start playing the track at the given index of the active view.
    SelectAndPlay(usize),
    /// Pause; only honored while playing.
    Pause,
    /// Resume; only honored while paused.
    Resume,
    /// Stop playback, reset elapsed, keep the current index.
    Stop,
    /// Advance to the next track (random with shuffle on) and play it.
    Next,
    /// Step to the previous track (random with shuffle on) and play it.
    Previous,
    SetShuffle(bool),
    SetRepeat(bool),
    /// Set volume 0-100; out-of-range values are clamped.
    SetVolume(u8),
    /// Rebuild the active view from the catalog with an artist filter
    /// and/or a search query.
    ApplyFilter {
        artist: Option<String>,
        query: String,
    },
    /// Sent by the progress sampler when a play-through reaches its end.
    /// Not meant for external callers; stale ids are ignored.
    TrackEnded { play_id: u64 },
    /// Shut the player thread down.
    Quit,
}

/// Runtime playback information shared with presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    /// Index of the current track in the active view, if any.
    pub current_index: Option<usize>,
    /// Number of entries in the active view.
    pub view_len: usize,
    pub playing: bool,
    pub paused: bool,
    pub shuffle: bool,
    pub repeat: bool,
    /// Elapsed playback time of the current play-through.
    pub elapsed: Duration,
    /// Probed track length; zero when metadata could not be read, in which
    /// case progress reporting degrades to elapsed-only.
    pub track_length: Duration,
    /// Path of the last entry the decoder refused, if any.
    pub unplayable: Option<String>,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            current_index: None,
            view_len: 0,
            playing: false,
            paused: false,
            shuffle: false,
            repeat: false,
            elapsed: Duration::ZERO,
            track_length: Duration::ZERO,
            unplayable: None,
        }
    }
}

pub type SnapshotHandle = Arc<Mutex<PlayerSnapshot>>;
