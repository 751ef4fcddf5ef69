use serde::{Deserialize, Serialize};

use crate::selection::Selection;
use crate::spec::Question;

/// How a single choice relates to the correct answer and the user's pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChoiceStatus {
    CorrectAndChosen,
    CorrectAndMissed,
    IncorrectAndChosen,
    UnchosenAndIncorrect,
}

impl ChoiceStatus {
    pub fn classify(is_correct: bool, was_chosen: bool) -> Self {
        match (is_correct, was_chosen) {
            (true, true) => ChoiceStatus::CorrectAndChosen,
            (true, false) => ChoiceStatus::CorrectAndMissed,
            (false, true) => ChoiceStatus::IncorrectAndChosen,
            (false, false) => ChoiceStatus::UnchosenAndIncorrect,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceStatus::CorrectAndChosen => "correct-and-chosen",
            ChoiceStatus::CorrectAndMissed => "correct-and-missed",
            ChoiceStatus::IncorrectAndChosen => "incorrect-and-chosen",
            ChoiceStatus::UnchosenAndIncorrect => "unchosen-and-incorrect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceReview {
    pub label: String,
    pub status: ChoiceStatus,
}

/// Review of one question against its committed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub prompt: String,
    pub answered_correctly: bool,
    pub choices: Vec<ChoiceReview>,
}

pub fn review_question(question: &Question, answer: &Selection) -> QuestionReview {
    let choices = question
        .choices()
        .iter()
        .enumerate()
        .map(|(index, label)| ChoiceReview {
            label: label.clone(),
            status: ChoiceStatus::classify(
                question.is_correct_choice(index),
                answer.contains(index),
            ),
        })
        .collect();
    QuestionReview {
        prompt: question.prompt().to_string(),
        answered_correctly: question.is_correct_set(answer),
        choices,
    }
}
