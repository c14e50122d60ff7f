//! Decoder and metadata collaborator traits, with the `rodio`/`lofty`
//! production implementations.
//!
//! The state machine only ever drives these traits; tests substitute
//! recording fakes, and none of the playback semantics depend on a real
//! audio device.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, StreamError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: String, reason: String },
}

/// Read-only window into the decoder's playback position, safe to poll from
/// the sampler thread.
pub trait PositionProbe: Send + Sync {
    fn position(&self) -> Duration;
}

/// The single logical decoder resource. It is created on, owned by and only
/// ever driven from the player's command thread; the output stream behind
/// the production implementation cannot move between threads.
pub trait AudioBackend {
    /// Load a locator, replacing whatever was loaded before. The new track
    /// starts paused; `play` begins output.
    fn load(&mut self, locator: &str) -> Result<(), PlayerError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    /// Rewind the current track to position zero and keep playing.
    fn restart(&mut self) -> Result<(), PlayerError>;
    /// Volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    /// Position probe for the currently loaded track, when the decoder can
    /// report one. `None` degrades the sampler to wall-clock accumulation.
    fn position_probe(&self) -> Option<Arc<dyn PositionProbe>>;
}

/// Duration lookup for a playable resource; failure is non-fatal and simply
/// reported as `None`.
pub trait DurationProbe: Send {
    fn duration_of(&self, locator: &str) -> Option<Duration>;
}

impl PositionProbe for Sink {
    fn position(&self) -> Duration {
        self.get_pos()
    }
}

/// Decoder backend on top of a `rodio` output stream.
pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Arc<Sink>>,
    current: Option<String>,
    volume: f32,
}

impl RodioBackend {
    pub fn new() -> Result<Self, StreamError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for an interactive shell.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            current: None,
            volume: 1.0,
        })
    }

    fn build_sink(&self, locator: &str) -> Result<Sink, PlayerError> {
        let file = File::open(locator).map_err(|source| PlayerError::Open {
            path: locator.to_string(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file)).map_err(|err| PlayerError::Decode {
            path: locator.to_string(),
            reason: err.to_string(),
        })?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(sink)
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, locator: &str) -> Result<(), PlayerError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = self.build_sink(locator)?;
        sink.set_volume(self.volume);
        self.sink = Some(Arc::new(sink));
        self.current = Some(locator.to_string());
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn restart(&mut self) -> Result<(), PlayerError> {
        if let Some(sink) = &self.sink {
            if sink.try_seek(Duration::ZERO).is_ok() {
                sink.play();
                return Ok(());
            }
        }

        // Source does not support seeking: rebuild the sink instead.
        let Some(locator) = self.current.clone() else {
            return Ok(());
        };
        self.load(&locator)?;
        self.play();
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn position_probe(&self) -> Option<Arc<dyn PositionProbe>> {
        self.sink
            .as_ref()
            .map(|sink| sink.clone() as Arc<dyn PositionProbe>)
    }
}

/// Duration probing through `lofty`.
pub struct LoftyProbe;

impl DurationProbe for LoftyProbe {
    fn duration_of(&self, locator: &str) -> Option<Duration> {
        match lofty::read_from_path(Path::new(locator)) {
            Ok(tagged) => Some(tagged.properties().duration()),
            Err(err) => {
                debug!("no duration for {:?}: {}", locator, err);
                None
            }
        }
    }
}
