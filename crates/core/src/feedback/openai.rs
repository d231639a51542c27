use crate::feedback::{Feedback, FeedbackError, FeedbackGenerator, Persona};
use crate::store::Screen;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const CHAT_MODEL: &str = "gpt-5-mini";

#[derive(Clone)]
pub struct OpenAiChatGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    persona: Persona,
}

impl OpenAiChatGenerator {
    pub fn new(api_key: String, persona: Persona) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model: CHAT_MODEL.to_string(),
            persona,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    async fn complete(
        &self,
        system: Option<String>,
        user: String,
    ) -> Result<Feedback, FeedbackError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user,
        });

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedbackError::Api { status, body });
        }

        let body: ChatResponse = response.json().await?;
        let text = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(FeedbackError::EmptyCompletion)?;

        Ok(Feedback { text })
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

impl FeedbackGenerator for OpenAiChatGenerator {
    fn respond(
        &self,
        scene: String,
        utterance: String,
    ) -> BoxFuture<'_, Result<Feedback, FeedbackError>> {
        let this = self.clone();
        async move {
            let system = this.persona.system_prompt();
            let user = this.persona.turn_prompt(&scene, &utterance);
            this.complete(Some(system), user).await
        }
        .boxed()
    }

    fn praise(&self, screen: Screen) -> BoxFuture<'_, Result<Feedback, FeedbackError>> {
        let this = self.clone();
        async move {
            let prompt = this.persona.praise_prompt(screen);
            this.complete(None, prompt).await
        }
        .boxed()
    }

    fn mission(&self, diary_excerpt: String) -> BoxFuture<'_, Result<Feedback, FeedbackError>> {
        let this = self.clone();
        async move {
            let prompt = this.persona.mission_prompt(&diary_excerpt);
            this.complete(None, prompt).await
        }
        .boxed()
    }
}
