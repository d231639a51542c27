use crate::feedback::{Feedback, FeedbackError, FeedbackGenerator};
use crate::store::Screen;
use futures::future::BoxFuture;
use futures::FutureExt;

#[derive(Clone)]
pub struct DummyFeedbackGenerator {
    response: String,
}

impl DummyFeedbackGenerator {
    pub fn new() -> Self {
        Self {
            response: "[배려] 구름이: 친구를 생각하는 마음이 참 따뜻해!".to_owned(),
        }
    }

    pub fn with_response<S: Into<String>>(mut self, response: S) -> Self {
        self.response = response.into();
        self
    }
}

impl Default for DummyFeedbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackGenerator for DummyFeedbackGenerator {
    fn respond(
        &self,
        _scene: String,
        _utterance: String,
    ) -> BoxFuture<'_, Result<Feedback, FeedbackError>> {
        let text = self.response.clone();
        async move { Ok(Feedback { text }) }.boxed()
    }

    fn praise(&self, _screen: Screen) -> BoxFuture<'_, Result<Feedback, FeedbackError>> {
        async move {
            Ok(Feedback {
                text: "구름이: 와, 정말 예쁘게 꾸몄구나!".to_owned(),
            })
        }
        .boxed()
    }

    fn mission(&self, _diary_excerpt: String) -> BoxFuture<'_, Result<Feedback, FeedbackError>> {
        async move {
            Ok(Feedback {
                text: "구름이: 내일은 친구에게 먼저 인사해보면 어때?".to_owned(),
            })
        }
        .boxed()
    }
}
