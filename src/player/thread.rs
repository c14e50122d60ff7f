//! The command thread owning the decoder, and its public handle.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::PlaybackSettings;
use crate::library::Catalog;

use super::backend::{AudioBackend, DurationProbe};
use super::sampler::Sampler;
use super::session::{Reaction, SessionState};
use super::types::{PlayerCmd, PlayerSnapshot, SnapshotHandle};

/// Handle to the single active playback session.
///
/// Commands are queued to the owning thread; observation happens through
/// the shared snapshot, never by poking at player internals.
pub struct Player {
    tx: Sender<PlayerCmd>,
    snapshot: SnapshotHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Spawn the command thread. The backend is built through a factory on
    /// that thread because audio output streams cannot move between threads.
    pub fn new(
        catalog: Catalog,
        make_backend: impl FnOnce() -> Box<dyn AudioBackend> + Send + 'static,
        probe: Box<dyn DurationProbe>,
        settings: PlaybackSettings,
    ) -> Self {
        let snapshot: SnapshotHandle = Arc::new(Mutex::new(PlayerSnapshot::default()));
        let (tx, rx) = mpsc::channel::<PlayerCmd>();

        let thread_tx = tx.clone();
        let thread_snapshot = snapshot.clone();
        let join = thread::spawn(move || {
            let backend = make_backend();
            run_player_thread(catalog, backend, probe, settings, rx, thread_tx, thread_snapshot);
        });

        Self {
            tx,
            snapshot,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    /// A point-in-time copy of the playback state.
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), mpsc::SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Stop playback and wait for the player thread to exit.
    pub fn shutdown(&self) {
        let _ = self.send(PlayerCmd::Quit);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_player_thread(
    catalog: Catalog,
    mut backend: Box<dyn AudioBackend>,
    probe: Box<dyn DurationProbe>,
    settings: PlaybackSettings,
    rx: mpsc::Receiver<PlayerCmd>,
    tx: Sender<PlayerCmd>,
    snapshot: SnapshotHandle,
) {
    let interval = Duration::from_millis(settings.sampler_interval_ms.max(1));
    let mut session = SessionState::new(catalog.filtered(None, ""), &settings);
    session.sync(&snapshot);

    let mut sampler: Option<Sampler> = None;

    while let Ok(cmd) = rx.recv() {
        let reaction = match cmd {
            PlayerCmd::SelectAndPlay(index) => {
                session.select_and_play(index, backend.as_mut(), probe.as_ref(), &snapshot)
            }
            PlayerCmd::Pause => session.pause(backend.as_mut(), &snapshot),
            PlayerCmd::Resume => session.resume(backend.as_mut(), &snapshot),
            PlayerCmd::Stop => session.stop(backend.as_mut(), &snapshot),
            PlayerCmd::Next => session.next(backend.as_mut(), probe.as_ref(), &snapshot),
            PlayerCmd::Previous => session.previous(backend.as_mut(), probe.as_ref(), &snapshot),
            PlayerCmd::SetShuffle(on) => session.set_shuffle(on, &snapshot),
            PlayerCmd::SetRepeat(on) => session.set_repeat(on, &snapshot),
            PlayerCmd::SetVolume(volume) => {
                session.set_volume(volume, backend.as_mut(), &snapshot)
            }
            PlayerCmd::ApplyFilter { artist, query } => session.apply_filter(
                &catalog,
                artist.as_deref(),
                &query,
                backend.as_mut(),
                &snapshot,
            ),
            PlayerCmd::TrackEnded { play_id } => {
                session.track_ended(play_id, backend.as_mut(), probe.as_ref(), &snapshot)
            }
            PlayerCmd::Quit => break,
        };

        match reaction {
            Reaction::Started => {
                // Fully cancel the previous play-through's sampler before a
                // new one touches the snapshot.
                if let Some(mut old) = sampler.take() {
                    old.stop_and_join();
                }
                sampler = Some(Sampler::spawn(
                    interval,
                    session.play_id(),
                    backend.position_probe(),
                    snapshot.clone(),
                    tx.clone(),
                ));
            }
            Reaction::Stopped => {
                if let Some(mut old) = sampler.take() {
                    old.stop_and_join();
                }
            }
            Reaction::None => {}
        }
    }

    if let Some(mut old) = sampler.take() {
        old.stop_and_join();
    }
    backend.stop();
}
