use crate::playback::{PlaybackError, PlaybackSink};
use crate::tts::TtsAudio;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct DummyPlaybackSink {
    plays: Arc<AtomicUsize>,
}

impl DummyPlaybackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::Relaxed)
    }
}

impl PlaybackSink for DummyPlaybackSink {
    fn play(&self, _audio: TtsAudio) -> BoxFuture<'_, Result<(), PlaybackError>> {
        self.plays.fetch_add(1, Ordering::Relaxed);
        async move { Ok(()) }.boxed()
    }
}
