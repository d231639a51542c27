use crate::tts::{AudioFormat, TtsAudio, TtsClient, TtsError, TtsRequest};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::Serialize;

const TTS_MODEL: &str = "tts-1";

#[derive(Clone)]
pub struct OpenAiTtsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiTtsClient {
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

#[derive(Serialize)]
struct SpeechRequest {
    model: String,
    voice: String,
    input: String,
    response_format: String,
}

impl TtsClient for OpenAiTtsClient {
    fn synthesize(&self, request: TtsRequest) -> BoxFuture<'_, Result<TtsAudio, TtsError>> {
        let this = self.clone();
        async move {
            let speech_request = SpeechRequest {
                model: TTS_MODEL.to_string(),
                voice: request.voice.as_str().to_owned(),
                input: request.text,
                response_format: "mp3".to_string(),
            };

            let url = format!("{}/audio/speech", this.base_url);
            let response = this
                .client
                .post(&url)
                .bearer_auth(&this.api_key)
                .json(&speech_request)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(TtsError::Api { status, body });
            }

            let bytes = response.bytes().await?;
            Ok(TtsAudio {
                bytes,
                format: AudioFormat::Mp3,
            })
        }
        .boxed()
    }
}
