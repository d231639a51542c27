use crate::config::SpeechLang;
use crate::stt::{AudioClip, SttClient, SttError, Transcript};
use futures::future::BoxFuture;
use futures::FutureExt;

#[derive(Clone)]
pub struct DummySttClient {
    text: String,
}

impl DummySttClient {
    pub fn new() -> Self {
        Self {
            text: "괜찮아요".to_owned(),
        }
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

impl Default for DummySttClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SttClient for DummySttClient {
    fn transcribe(
        &self,
        _clip: AudioClip,
        _lang: SpeechLang,
    ) -> BoxFuture<'_, Result<Transcript, SttError>> {
        let text = self.text.clone();
        async move { Ok(Transcript { text }) }.boxed()
    }
}
