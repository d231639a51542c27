use crate::config::SpeechLang;
use crate::stt::{AudioClip, SttClient, SttError, Transcript};
use crate::util::ScratchFile;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

const STT_MODEL: &str = "whisper-1";

#[derive(Clone)]
pub struct OpenAiSttClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiSttClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl SttClient for OpenAiSttClient {
    fn transcribe(
        &self,
        clip: AudioClip,
        lang: SpeechLang,
    ) -> BoxFuture<'_, Result<Transcript, SttError>> {
        let this = self.clone();
        async move {
            // The clip only touches disk for the duration of this call;
            // the guard removes it on every exit path.
            let scratch = ScratchFile::write("clip", "wav", &clip.bytes)?;
            let bytes = tokio::fs::read(scratch.path()).await?;

            let part = Part::bytes(bytes)
                .file_name(clip.file_name.clone())
                .mime_str("audio/wav")?;
            let form = Form::new()
                .text("model", STT_MODEL)
                .text("language", lang.as_str().to_owned())
                .part("file", part);

            let url = format!("{}/audio/transcriptions", this.base_url);
            let response = this
                .client
                .post(&url)
                .bearer_auth(&this.api_key)
                .multipart(form)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(SttError::Api { status, body });
            }

            let body: TranscriptionResponse = response.json().await?;
            Ok(Transcript {
                text: body.text.trim().to_owned(),
            })
        }
        .boxed()
    }
}
