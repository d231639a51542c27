use crate::config::{RewardConfig, UnlockConfig};
use crate::emotion::{Emotion, FeedbackCategory};
use crate::store::{LogEntry, Scene, Screen, Store, StoreError, UserProgress};
use rand::seq::SliceRandom;

const DIARY_SCENE: &str = "일기";
const DIARY_FEEDBACK: &str = "일기 저장";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceOutcome {
    pub correct: bool,
    pub awarded: u64,
    pub hearts: u64,
}

/// Everything one sitting needs, made explicit: the loaded progress
/// record, the in-memory character emotion, the store, and the reward
/// configuration. Replaces the ambient per-session globals of the
/// original toy; every handler takes this context and runs an explicit
/// load/mutate/persist cycle.
pub struct Session {
    store: Store,
    progress: UserProgress,
    emotion: Emotion,
    rewards: RewardConfig,
    unlocks: UnlockConfig,
}

impl Session {
    pub fn open(
        store: Store,
        rewards: RewardConfig,
        unlocks: UnlockConfig,
    ) -> Result<Self, StoreError> {
        let progress = store.load_progress()?;
        Ok(Self {
            store,
            progress,
            // The character always starts a session in the normal pose.
            emotion: Emotion::default(),
            rewards,
            unlocks,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn hearts(&self) -> u64 {
        self.progress.hearts
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn note_emotion(&mut self, emotion: Emotion) {
        self.emotion = emotion;
    }

    /// The multiple-choice mini-game: exact equality against the scene's
    /// first listed response. Awards on a correct answer, no penalty and
    /// no log entry otherwise.
    pub fn check_choice(
        &mut self,
        scene: &Scene,
        selected: &str,
    ) -> Result<ChoiceOutcome, StoreError> {
        let correct = scene.correct() == Some(selected);
        let awarded = if correct { self.rewards.correct_choice } else { 0 };

        if correct {
            self.progress.hearts += awarded;
            self.store.save_progress(&self.progress)?;
        }

        Ok(ChoiceOutcome {
            correct,
            awarded,
            hearts: self.progress.hearts,
        })
    }

    pub fn award_for(&self, category: FeedbackCategory) -> u64 {
        match category {
            FeedbackCategory::Empathetic => self.rewards.empathetic,
            FeedbackCategory::Indifferent => self.rewards.indifferent,
            FeedbackCategory::Other => 0,
        }
    }

    /// Commits one completed voice turn: award per category, append the
    /// log entry, rewrite the progress file. Callers only reach this
    /// point once every upstream collaborator call has succeeded.
    pub fn record_turn(
        &mut self,
        scene: &str,
        utterance: &str,
        feedback: &str,
        category: FeedbackCategory,
    ) -> Result<u64, StoreError> {
        let awarded = self.award_for(category);
        self.progress.hearts += awarded;
        self.progress.log.push(LogEntry {
            scene: scene.to_owned(),
            utterance: utterance.to_owned(),
            feedback: feedback.to_owned(),
            points: awarded,
        });
        self.store.save_progress(&self.progress)?;
        Ok(awarded)
    }

    pub fn add_diary(&mut self, text: String) -> Result<(), StoreError> {
        self.progress.diary.push(text.clone());
        self.progress.log.push(LogEntry {
            scene: DIARY_SCENE.to_owned(),
            utterance: text,
            feedback: DIARY_FEEDBACK.to_owned(),
            points: 0,
        });
        self.store.save_progress(&self.progress)
    }

    pub fn latest_diary(&self) -> Option<&str> {
        self.progress.diary.last().map(String::as_str)
    }

    /// Items whose threshold the current heart total has reached. Purely
    /// presentational gating.
    pub fn unlocked(&self, screen: Screen) -> Vec<&str> {
        self.unlocks
            .tiers(screen)
            .iter()
            .filter(|tier| self.progress.hearts >= tier.threshold)
            .map(|tier| tier.item.as_str())
            .collect()
    }

    /// Candidate responses in presentation order. The shuffle only affects
    /// display; correctness is still judged against the scene's first
    /// listed response.
    pub fn shuffled_responses(&self, scene: &Scene) -> Vec<String> {
        let mut responses = scene.responses.clone();
        responses.shuffle(&mut rand::rng());
        responses
    }
}
