use crate::config::{AppConfig, SpeechLang, VoiceId};
use crate::emotion::{classify_emotion, classify_feedback, Emotion, FeedbackCategory};
use crate::feedback::{FeedbackError, FeedbackGenerator};
use crate::playback::PlaybackSink;
use crate::session::Session;
use crate::store::StoreError;
use crate::stt::{AudioClip, SttClient, SttError};
use crate::tts::{TtsClient, TtsRequest};

#[derive(thiserror::Error, Debug)]
pub enum TurnError {
    #[error("transcription failed: {0}")]
    Stt(#[from] SttError),

    #[error("feedback generation failed: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("could not persist progress: {0}")]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug)]
pub struct TurnConfig {
    pub speech_lang: SpeechLang,
    pub voice: VoiceId,
}

impl TurnConfig {
    pub fn from_app(app: &AppConfig) -> Self {
        Self {
            speech_lang: app.speech_lang.clone(),
            voice: app.voice.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub transcript: String,
    pub feedback: String,
    pub category: FeedbackCategory,
    pub emotion: Emotion,
    pub awarded: u64,
    pub hearts: u64,
}

/// One conversational turn, strictly sequential: transcribe, generate
/// feedback, classify locally, persist, then speak. A failure before the
/// persist step aborts the turn with nothing committed; a failure after
/// it (synthesis or playback) is a warning and the turn still counts.
pub struct TurnEngine<S, F, T, P> {
    pub stt: S,
    pub feedback: F,
    pub tts: T,
    pub playback: P,
    pub config: TurnConfig,
}

impl<S, F, T, P> TurnEngine<S, F, T, P>
where
    S: SttClient,
    F: FeedbackGenerator,
    T: TtsClient,
    P: PlaybackSink,
{
    pub async fn run(
        &self,
        session: &mut Session,
        scene: &str,
        clip: AudioClip,
    ) -> Result<TurnOutcome, TurnError> {
        let transcript = self
            .stt
            .transcribe(clip, self.config.speech_lang.clone())
            .await?;
        tracing::info!(text = %transcript.text, "utterance transcribed");

        let feedback = self
            .feedback
            .respond(scene.to_owned(), transcript.text.clone())
            .await?;
        tracing::info!(text = %feedback.text, "feedback generated");

        let category = classify_feedback(&feedback.text);
        let emotion = classify_emotion(&feedback.text);

        let awarded = session.record_turn(scene, &transcript.text, &feedback.text, category)?;
        session.note_emotion(emotion);

        let request = TtsRequest {
            text: feedback.text.clone(),
            voice: self.config.voice.clone(),
        };
        match self.tts.synthesize(request).await {
            Ok(audio) => {
                if let Err(err) = self.playback.play(audio).await {
                    tracing::warn!(error = %err, "playback failed, turn continues without audio");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "speech synthesis failed, turn continues without audio");
            }
        }

        Ok(TurnOutcome {
            transcript: transcript.text,
            feedback: feedback.text,
            category,
            emotion,
            awarded,
            hearts: session.hearts(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RewardConfig, UnlockConfig};
    use crate::feedback::DummyFeedbackGenerator;
    use crate::playback::DummyPlaybackSink;
    use crate::store::Store;
    use crate::stt::{DummySttClient, Transcript};
    use crate::tts::{DummyTtsClient, TtsAudio, TtsError};
    use bytes::Bytes;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct FailingSttClient;

    impl SttClient for FailingSttClient {
        fn transcribe(
            &self,
            _clip: AudioClip,
            _lang: SpeechLang,
        ) -> BoxFuture<'_, Result<Transcript, SttError>> {
            async move {
                Err(SttError::Api {
                    status: 500,
                    body: "down".to_owned(),
                })
            }
            .boxed()
        }
    }

    struct FailingTtsClient;

    impl TtsClient for FailingTtsClient {
        fn synthesize(&self, _request: TtsRequest) -> BoxFuture<'_, Result<TtsAudio, TtsError>> {
            async move {
                Err(TtsError::Api {
                    status: 500,
                    body: "down".to_owned(),
                })
            }
            .boxed()
        }
    }

    fn temp_session(prefix: &str) -> Session {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        let root = std::env::temp_dir().join(format!(
            "heartstar_turn_{prefix}_{}_{}",
            std::process::id(),
            nanos
        ));
        Session::open(
            Store::new(root),
            RewardConfig::default(),
            UnlockConfig::default(),
        )
        .expect("fresh session")
    }

    fn cleanup(session: &Session) {
        let _ = std::fs::remove_dir_all(session.store().root());
    }

    fn clip() -> AudioClip {
        AudioClip::new(Bytes::from_static(b"RIFF"), "clip.wav")
    }

    #[tokio::test]
    async fn full_turn_awards_classifies_and_plays() {
        let mut session = temp_session("full");
        let playback = DummyPlaybackSink::new();
        let engine = TurnEngine {
            stt: DummySttClient::new(),
            feedback: DummyFeedbackGenerator::new(),
            tts: DummyTtsClient::new(),
            playback: playback.clone(),
            config: TurnConfig {
                speech_lang: SpeechLang::default(),
                voice: VoiceId::default(),
            },
        };

        let outcome = engine
            .run(&mut session, "친구가 넘어졌어요", clip())
            .await
            .expect("turn completes");

        assert_eq!(outcome.transcript, "괜찮아요");
        assert_eq!(outcome.category, FeedbackCategory::Empathetic);
        assert_eq!(outcome.emotion, Emotion::Happy);
        assert_eq!(outcome.awarded, 5);
        assert_eq!(outcome.hearts, 5);
        assert_eq!(session.emotion(), Emotion::Happy);
        assert_eq!(playback.plays(), 1);

        let persisted = session.store().load_progress().expect("reload");
        assert_eq!(persisted.hearts, 5);
        assert_eq!(persisted.log.len(), 1);
        assert_eq!(persisted.log[0].scene, "친구가 넘어졌어요");

        cleanup(&session);
    }

    #[tokio::test]
    async fn failed_transcription_commits_nothing() {
        let mut session = temp_session("stt_fail");
        let engine = TurnEngine {
            stt: FailingSttClient,
            feedback: DummyFeedbackGenerator::new(),
            tts: DummyTtsClient::new(),
            playback: DummyPlaybackSink::new(),
            config: TurnConfig {
                speech_lang: SpeechLang::default(),
                voice: VoiceId::default(),
            },
        };

        let err = engine
            .run(&mut session, "친구가 넘어졌어요", clip())
            .await
            .expect_err("turn aborts");
        assert!(matches!(err, TurnError::Stt(_)));
        assert_eq!(session.hearts(), 0);

        let persisted = session.store().load_progress().expect("reload");
        assert_eq!(persisted, Default::default());

        cleanup(&session);
    }

    #[tokio::test]
    async fn failed_synthesis_still_counts_the_turn() {
        let mut session = temp_session("tts_fail");
        let playback = DummyPlaybackSink::new();
        let engine = TurnEngine {
            stt: DummySttClient::new(),
            feedback: DummyFeedbackGenerator::new()
                .with_response("[무관심] 구름이: 친구가 조금 서운했을 거야"),
            tts: FailingTtsClient,
            playback: playback.clone(),
            config: TurnConfig {
                speech_lang: SpeechLang::default(),
                voice: VoiceId::default(),
            },
        };

        let outcome = engine
            .run(&mut session, "친구가 울고 있어요", clip())
            .await
            .expect("turn completes without audio");

        assert_eq!(outcome.category, FeedbackCategory::Indifferent);
        assert_eq!(outcome.awarded, 1);
        assert_eq!(playback.plays(), 0);

        let persisted = session.store().load_progress().expect("reload");
        assert_eq!(persisted.hearts, 1);
        assert_eq!(persisted.log.len(), 1);

        cleanup(&session);
    }

    #[tokio::test]
    async fn feedback_without_category_awards_zero_but_logs() {
        let mut session = temp_session("other");
        let engine = TurnEngine {
            stt: DummySttClient::new().with_text("저리 가"),
            feedback: DummyFeedbackGenerator::new()
                .with_response("[공격] 구름이: 그런 말은 친구 마음을 아프게 해"),
            tts: DummyTtsClient::new(),
            playback: DummyPlaybackSink::new(),
            config: TurnConfig {
                speech_lang: SpeechLang::default(),
                voice: VoiceId::default(),
            },
        };

        let outcome = engine
            .run(&mut session, "친구가 선물을 줬어요", clip())
            .await
            .expect("turn completes");

        assert_eq!(outcome.category, FeedbackCategory::Other);
        assert_eq!(outcome.awarded, 0);
        assert_eq!(outcome.emotion, Emotion::Normal);

        let persisted = session.store().load_progress().expect("reload");
        assert_eq!(persisted.hearts, 0);
        assert_eq!(persisted.log.len(), 1);
        assert_eq!(persisted.log[0].points, 0);

        cleanup(&session);
    }
}
