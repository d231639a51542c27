mod dummy;
mod openai;

use crate::store::Screen;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use dummy::DummyFeedbackGenerator;
pub use openai::OpenAiChatGenerator;

/// Free text produced by the hosted text-generation collaborator. Parsed
/// only by keyword search (see [`crate::emotion`]).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
}

#[derive(thiserror::Error, Debug)]
pub enum FeedbackError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation api error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion contained no text")]
    EmptyCompletion,
}

pub trait FeedbackGenerator: Send + Sync {
    /// Warm one-sentence feedback on what the child said in a scene.
    fn respond(
        &self,
        scene: String,
        utterance: String,
    ) -> BoxFuture<'_, Result<Feedback, FeedbackError>>;

    /// One-sentence praise after the child saved a decoration screen.
    fn praise(&self, screen: Screen) -> BoxFuture<'_, Result<Feedback, FeedbackError>>;

    /// A warm action suggestion for tomorrow, based on the latest diary entry.
    fn mission(&self, diary_excerpt: String) -> BoxFuture<'_, Result<Feedback, FeedbackError>>;
}

/// The companion character's fixed instruction set. The child's name, when
/// configured, is woven into the system prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Persona {
    pub child_name: Option<String>,
}

impl Persona {
    pub fn new(child_name: Option<String>) -> Self {
        Self { child_name }
    }

    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(
            "너는 7세 아동의 예의·배려 학습을 돕는 구름이(하늘을 나는 하얀 강아지) 톤의 도우미야. \
             아이가 한 말을 배려/공감/무관심/공격 중 하나로 분류하고, \
             구름이 말투로 1문장 피드백을 해줘. \
             출력 형식: [분류] 구름이: (한 문장)",
        );
        if let Some(name) = &self.child_name {
            prompt.push_str(&format!(" 아이의 이름은 {name}(이)야."));
        }
        prompt
    }

    pub fn turn_prompt(&self, scene: &str, utterance: &str) -> String {
        format!("상황: \"{scene}\"\n아이의 말: \"{utterance}\"")
    }

    pub fn praise_prompt(&self, screen: Screen) -> String {
        let place = match screen {
            Screen::Sky => "하늘을",
            Screen::Room => "방을",
        };
        format!("너는 구름이야. 아이가 {place} 예쁘게 꾸몄어. 귀엽고 다정하게 한 문장으로 칭찬해줘.")
    }

    pub fn mission_prompt(&self, diary_excerpt: &str) -> String {
        format!(
            "너는 구름이야. 아래는 아이의 최근 일기야.\n\"{diary_excerpt}\"\n\
             이 아이가 내일 해보면 좋은 따뜻한 행동 한 가지를 귀엽게 한 문장으로 추천해줘."
        )
    }
}
