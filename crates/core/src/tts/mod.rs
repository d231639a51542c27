mod dummy;
mod openai;

use crate::config::VoiceId;
use bytes::Bytes;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use dummy::DummyTtsClient;
pub use openai::OpenAiTtsClient;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TtsRequest {
    pub text: String,
    pub voice: VoiceId,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Mp3,
}

/// Synthesized speech as returned by the collaborator, still encoded.
/// Decoding happens in the playback sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TtsAudio {
    pub bytes: Bytes,
    pub format: AudioFormat,
}

impl TtsAudio {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TtsError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech api error {status}: {body}")]
    Api { status: u16, body: String },
}

pub trait TtsClient: Send + Sync {
    fn synthesize(&self, request: TtsRequest) -> BoxFuture<'_, Result<TtsAudio, TtsError>>;
}
