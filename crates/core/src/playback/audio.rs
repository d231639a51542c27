use crate::playback::{PlaybackError, PlaybackSink};
use crate::tts::TtsAudio;
use futures::future::BoxFuture;
use futures::FutureExt;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A minimal, poison-tolerant, lazy initializer for a single value.
///
/// Rationale: [`rodio::OutputStream`] must be kept alive for the duration of
/// playback. Opening a new stream per clip drops the previous stream mid-play
/// and can truncate or blank the audio.
struct LazyInit<T> {
    value: Mutex<Option<T>>,
}

impl<T> LazyInit<T> {
    fn new() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }

    fn get_or_try_init_with<R, E>(
        &self,
        init: impl FnOnce() -> Result<T, E>,
        f: impl FnOnce(&T) -> R,
        invariant_err: impl FnOnce() -> E,
    ) -> Result<R, E> {
        let mut guard = match self.value.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("playback OutputStream cache lock was poisoned; recovering");
                poisoned.into_inner()
            }
        };

        // NOTE: `init` is used at most once (only when the cache is empty).
        if guard.is_none() {
            *guard = Some(init()?);
        }

        match guard.as_ref() {
            Some(v) => Ok(f(v)),
            None => Err(invariant_err()),
        }
    }
}

/// Plays synthesized clips on the default output device. If the device
/// cannot be opened the sink disables itself and later calls become silent
/// no-ops; the toy keeps working without sound.
#[derive(Clone)]
pub struct AudioPlaybackSink {
    disabled: Arc<AtomicBool>,
    // Keep the OutputStream alive across play calls. Clones share one stream.
    output_stream: Arc<LazyInit<OutputStream>>,
}

impl AudioPlaybackSink {
    pub fn new() -> Self {
        Self {
            disabled: Arc::new(AtomicBool::new(false)),
            output_stream: Arc::new(LazyInit::new()),
        }
    }

    fn play_blocking(&self, audio: TtsAudio) -> Result<(), PlaybackError> {
        let played = self.output_stream.get_or_try_init_with(
            || {
                OutputStreamBuilder::open_default_stream().map_err(|err| {
                    PlaybackError::AudioOutputUnavailable {
                        details: err.to_string(),
                    }
                })
            },
            |stream| {
                let source = Decoder::new(Cursor::new(audio.bytes.clone())).map_err(|err| {
                    PlaybackError::Decode {
                        details: err.to_string(),
                    }
                })?;
                let mixer = stream.mixer();
                let sink = Sink::connect_new(&mixer);
                sink.append(source);
                sink.sleep_until_end();
                Ok(())
            },
            || PlaybackError::AudioOutputUnavailable {
                details: "output stream cache empty after init".to_owned(),
            },
        );

        match played {
            Ok(inner) => inner,
            Err(err) => {
                // The device is gone for good; stop trying.
                self.disabled.store(true, Ordering::Relaxed);
                tracing::warn!(error = %err, "audio output unavailable, playback disabled");
                Err(err)
            }
        }
    }
}

impl Default for AudioPlaybackSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSink for AudioPlaybackSink {
    fn play(&self, audio: TtsAudio) -> BoxFuture<'_, Result<(), PlaybackError>> {
        let this = self.clone();
        async move {
            if audio.is_empty() || this.disabled.load(Ordering::Relaxed) {
                return Ok(());
            }

            let worker = this.clone();
            match tokio::task::spawn_blocking(move || worker.play_blocking(audio)).await {
                Ok(result) => result,
                Err(join_err) => Err(PlaybackError::AudioOutputUnavailable {
                    details: join_err.to_string(),
                }),
            }
        }
        .boxed()
    }
}
