//! Cancellable progress sampler.
//!
//! One sampler runs per play-through. It polls the decoder position (or
//! accumulates wall-clock time when no probe is available) into the shared
//! snapshot, and signals end-of-track exactly once through the command
//! channel. Starting a new sampler requires stopping and joining the old
//! one first, so two samplers never race on the same snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::backend::PositionProbe;
use super::types::{PlayerCmd, SnapshotHandle};

/// A play-through counts as finished slightly before its nominal length;
/// decoder position reporting is too coarse to ever reach it exactly.
const END_OF_TRACK_RATIO: f64 = 0.995;

pub(super) fn end_reached(elapsed: Duration, length: Duration) -> bool {
    length > Duration::ZERO && elapsed.as_secs_f64() >= length.as_secs_f64() * END_OF_TRACK_RATIO
}

pub(super) struct Sampler {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl Sampler {
    pub(super) fn spawn(
        interval: Duration,
        play_id: u64,
        probe: Option<Arc<dyn PositionProbe>>,
        snapshot: SnapshotHandle,
        tx: Sender<PlayerCmd>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let join = thread::spawn(move || {
            let mut fired = false;
            while !flag.load(Ordering::Relaxed) {
                thread::sleep(interval);
                if flag.load(Ordering::Relaxed) {
                    break;
                }

                let (elapsed, length) = {
                    let mut snap = snapshot.lock().unwrap();
                    if !snap.playing || snap.paused {
                        continue;
                    }
                    let elapsed = match &probe {
                        Some(probe) => probe.position(),
                        None => snap.elapsed + interval,
                    };
                    snap.elapsed = elapsed;
                    (elapsed, snap.track_length)
                };

                if !fired && end_reached(elapsed, length) {
                    fired = true;
                    // The command thread decides between repeat-restart and
                    // advancing; a stale play_id is ignored there.
                    let _ = tx.send(PlayerCmd::TrackEnded { play_id });
                }
            }
        });

        Self {
            stop,
            join: Some(join),
        }
    }

    /// Signal the sampler to stop and wait for it to exit.
    pub(super) fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
