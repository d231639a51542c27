use crate::tts::{AudioFormat, TtsAudio, TtsClient, TtsError, TtsRequest};
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;

#[derive(Clone)]
pub struct DummyTtsClient;

impl DummyTtsClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyTtsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TtsClient for DummyTtsClient {
    fn synthesize(&self, _request: TtsRequest) -> BoxFuture<'_, Result<TtsAudio, TtsError>> {
        async move {
            Ok(TtsAudio {
                bytes: Bytes::new(),
                format: AudioFormat::Mp3,
            })
        }
        .boxed()
    }
}
