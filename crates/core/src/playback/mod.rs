mod audio;
mod dummy;

use crate::tts::TtsAudio;
use futures::future::BoxFuture;

pub use audio::AudioPlaybackSink;
pub use dummy::DummyPlaybackSink;

#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    #[error("audio output unavailable: {details}")]
    AudioOutputUnavailable { details: String },

    #[error("could not decode synthesized audio: {details}")]
    Decode { details: String },
}

pub trait PlaybackSink: Send + Sync {
    fn play(&self, audio: TtsAudio) -> BoxFuture<'_, Result<(), PlaybackError>>;
}
