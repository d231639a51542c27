mod dummy;
mod openai;

use crate::config::SpeechLang;
use bytes::Bytes;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use dummy::DummySttClient;
pub use openai::OpenAiSttClient;

/// One recorded utterance, as handed over by whatever captured it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Bytes,
    pub file_name: String,
}

impl AudioClip {
    pub fn new(bytes: Bytes, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
        }
    }

    pub async fn load(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip.wav".to_owned());
        Ok(Self::new(Bytes::from(bytes), file_name))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
}

#[derive(thiserror::Error, Debug)]
pub enum SttError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcription api error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("scratch storage error: {0}")]
    Scratch(#[from] std::io::Error),
}

pub trait SttClient: Send + Sync {
    fn transcribe(
        &self,
        clip: AudioClip,
        lang: SpeechLang,
    ) -> BoxFuture<'_, Result<Transcript, SttError>>;
}
