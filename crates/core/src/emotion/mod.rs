mod rules;

use serde::{Deserialize, Serialize};

pub use rules::{Evaluation, Hit, Rule, RuleSet};

/// Which character illustration and background theme to show. Held in
/// memory for one session only; never persisted.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Surprised,
    #[default]
    Normal,
}

/// How the generated feedback judged the child's words. Drives the point
/// award for the turn.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Empathetic,
    Indifferent,
    #[default]
    Other,
}

/// Happy is checked before surprised; a text containing words from both
/// lists therefore reads as happy.
pub fn emotion_rules() -> RuleSet<Emotion> {
    RuleSet::new(
        vec![
            Rule::new(
                Emotion::Happy,
                ["배려", "공감", "고마워", "기뻐", "멋져", "잘했", "사랑", "happy", "joy"],
            ),
            Rule::new(
                Emotion::Surprised,
                ["깜짝", "놀라", "어머", "우와", "헉", "wow", "surprise"],
            ),
        ],
        Emotion::Normal,
    )
}

pub fn category_rules() -> RuleSet<FeedbackCategory> {
    RuleSet::new(
        vec![
            Rule::new(FeedbackCategory::Empathetic, ["배려", "공감"]),
            Rule::new(FeedbackCategory::Indifferent, ["무관심"]),
        ],
        FeedbackCategory::Other,
    )
}

pub fn classify_emotion(text: &str) -> Emotion {
    emotion_rules().eval(text)
}

pub fn classify_feedback(text: &str) -> FeedbackCategory {
    category_rules().eval(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_words_classify_as_happy() {
        assert_eq!(classify_emotion("[배려] 정말 잘했어!"), Emotion::Happy);
        assert_eq!(classify_emotion("고마워 하는 마음이 예뻐"), Emotion::Happy);
    }

    #[test]
    fn surprised_words_classify_as_surprised() {
        assert_eq!(classify_emotion("우와, 그랬구나!"), Emotion::Surprised);
        assert_eq!(classify_emotion("깜짝 놀랐겠다"), Emotion::Surprised);
    }

    #[test]
    fn neither_list_classifies_as_normal() {
        assert_eq!(classify_emotion("다음에 또 이야기해줘"), Emotion::Normal);
        assert_eq!(classify_emotion(""), Emotion::Normal);
    }

    #[test]
    fn both_lists_present_happy_wins() {
        // Priority-order tie-break: happy is checked first.
        let text = "우와, 친구를 배려하는 마음이 멋져!";
        assert_eq!(classify_emotion(text), Emotion::Happy);

        let eval = emotion_rules().eval_detailed(text);
        assert!(eval.ambiguous());
        assert_eq!(eval.label, Emotion::Happy);
    }

    #[test]
    fn empathetic_feedback_detected() {
        assert_eq!(
            classify_feedback("[공감] 친구 마음을 잘 알아줬네"),
            FeedbackCategory::Empathetic
        );
        assert_eq!(classify_feedback("[배려] 참 다정했어"), FeedbackCategory::Empathetic);
    }

    #[test]
    fn indifferent_feedback_detected() {
        assert_eq!(
            classify_feedback("[무관심] 친구가 조금 서운했을 거야"),
            FeedbackCategory::Indifferent
        );
    }

    #[test]
    fn unrecognized_feedback_is_other() {
        assert_eq!(classify_feedback("[공격] 그런 말은 아파요"), FeedbackCategory::Other);
    }
}
