use thiserror::Error;

/// Reasons a question definition is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("correct answer shape does not match question type '{kind}'")]
    TypeMismatch { kind: &'static str },
    #[error("question needs at least 2 choices, got {count}")]
    TooFewChoices { count: usize },
    #[error("boolean question needs exactly 2 choices, got {count}")]
    BooleanChoiceCount { count: usize },
    #[error("correct index {index} is outside 0..{choices}")]
    CorrectOutOfRange { index: usize, choices: usize },
    #[error("multi-choice question has an empty correct set")]
    EmptyCorrectSet,
    #[error("correct index {index} is listed more than once")]
    DuplicateCorrectIndex { index: usize },
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::TypeMismatch { .. } => "type_mismatch",
            ValidationError::TooFewChoices { .. } => "too_few_choices",
            ValidationError::BooleanChoiceCount { .. } => "boolean_choice_count",
            ValidationError::CorrectOutOfRange { .. } => "correct_out_of_range",
            ValidationError::EmptyCorrectSet => "empty_correct_set",
            ValidationError::DuplicateCorrectIndex { .. } => "duplicate_correct_index",
        }
    }
}

/// Failures of session operations. A failing call never mutates the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("choice {index} is outside 0..{choices}")]
    InvalidChoiceIndex { index: usize, choices: usize },
    #[error("question {question} has no selection yet")]
    IncompleteSelection { question: usize },
    #[error("the quiz is already complete")]
    SessionComplete,
    #[error("there is no current question; the quiz is complete")]
    NoCurrentQuestion,
    #[error("invalid session snapshot: {0}")]
    InvalidSnapshot(String),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidChoiceIndex { .. } => "invalid_choice_index",
            SessionError::IncompleteSelection { .. } => "incomplete_selection",
            SessionError::SessionComplete => "session_complete",
            SessionError::NoCurrentQuestion => "no_current_question",
            SessionError::InvalidSnapshot(_) => "invalid_snapshot",
        }
    }
}
