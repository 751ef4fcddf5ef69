use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::selection::Selection;

/// Supported answer types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Exactly one choice is correct.
    #[serde(alias = "single-choice", alias = "multiple-choice")]
    SingleChoice,
    /// Any non-empty subset of the choices may be correct.
    #[serde(alias = "multi-choice", alias = "multiple-answer")]
    MultiChoice,
    /// Single choice between exactly two options.
    #[serde(alias = "true-false")]
    Boolean,
}

impl QuestionType {
    pub fn is_multi(&self) -> bool {
        matches!(self, QuestionType::MultiChoice)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultiChoice => "multi_choice",
            QuestionType::Boolean => "boolean",
        }
    }
}

/// Correct answer as authored: a bare index or a list of indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(usize),
    Set(Vec<usize>),
}

impl CorrectAnswer {
    fn is_set(&self) -> bool {
        matches!(self, CorrectAnswer::Set(_))
    }
}

/// Serialized form of a question; deserializing a [`Question`] goes through
/// this shape and the same checks as [`Question::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionDocument {
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub choices: Vec<String>,
    pub correct: CorrectAnswer,
}

impl QuestionDocument {
    /// Every problem with this definition, in a stable order.
    pub fn problems(&self) -> Vec<ValidationError> {
        let mut problems = Vec::new();
        let count = self.choices.len();

        if self.kind == QuestionType::Boolean {
            if count != 2 {
                problems.push(ValidationError::BooleanChoiceCount { count });
            }
        } else if count < 2 {
            problems.push(ValidationError::TooFewChoices { count });
        }

        if self.kind.is_multi() != self.correct.is_set() {
            problems.push(ValidationError::TypeMismatch {
                kind: self.kind.as_str(),
            });
            return problems;
        }

        match &self.correct {
            CorrectAnswer::Index(index) => {
                if *index >= count {
                    problems.push(ValidationError::CorrectOutOfRange {
                        index: *index,
                        choices: count,
                    });
                }
            }
            CorrectAnswer::Set(indices) => {
                if indices.is_empty() {
                    problems.push(ValidationError::EmptyCorrectSet);
                }
                for (position, index) in indices.iter().enumerate() {
                    if *index >= count {
                        problems.push(ValidationError::CorrectOutOfRange {
                            index: *index,
                            choices: count,
                        });
                    }
                    if indices[..position].contains(index) {
                        problems.push(ValidationError::DuplicateCorrectIndex { index: *index });
                    }
                }
            }
        }

        problems
    }
}

/// One immutable quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDocument", into = "QuestionDocument")]
pub struct Question {
    prompt: String,
    kind: QuestionType,
    choices: Vec<String>,
    correct: CorrectAnswer,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        kind: QuestionType,
        choices: Vec<String>,
        correct: CorrectAnswer,
    ) -> Result<Self, ValidationError> {
        QuestionDocument {
            prompt: prompt.into(),
            kind,
            choices,
            correct,
        }
        .try_into()
    }

    pub fn single_choice<S: Into<String>>(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
        correct: usize,
    ) -> Result<Self, ValidationError> {
        Self::new(
            prompt,
            QuestionType::SingleChoice,
            choices.into_iter().map(Into::into).collect(),
            CorrectAnswer::Index(correct),
        )
    }

    pub fn multi_choice<S: Into<String>>(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
        correct: impl IntoIterator<Item = usize>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            prompt,
            QuestionType::MultiChoice,
            choices.into_iter().map(Into::into).collect(),
            CorrectAnswer::Set(correct.into_iter().collect()),
        )
    }

    /// A `False`/`True` question whose correct choice is `answer`.
    pub fn boolean(prompt: impl Into<String>, answer: bool) -> Self {
        Self {
            prompt: prompt.into(),
            kind: QuestionType::Boolean,
            choices: vec!["False".into(), "True".into()],
            correct: CorrectAnswer::Index(usize::from(answer)),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn correct(&self) -> &CorrectAnswer {
        &self.correct
    }

    /// Exact match of a candidate answer against the correct answer.
    /// Sets compare without regard to order; a candidate of the wrong shape
    /// or an empty one never matches.
    pub fn is_correct_set(&self, candidate: &Selection) -> bool {
        match (&self.correct, candidate) {
            (CorrectAnswer::Index(correct), Selection::Single(Some(chosen))) => correct == chosen,
            (CorrectAnswer::Set(correct), Selection::Multi(chosen)) => {
                let mut chosen = chosen.clone();
                chosen.sort_unstable();
                *correct == chosen
            }
            _ => false,
        }
    }

    /// Whether choice `index` belongs to the correct answer.
    pub fn is_correct_choice(&self, index: usize) -> bool {
        match &self.correct {
            CorrectAnswer::Index(correct) => *correct == index,
            CorrectAnswer::Set(correct) => correct.contains(&index),
        }
    }
}

impl TryFrom<QuestionDocument> for Question {
    type Error = ValidationError;

    fn try_from(document: QuestionDocument) -> Result<Self, Self::Error> {
        if let Some(problem) = document.problems().into_iter().next() {
            return Err(problem);
        }
        let QuestionDocument {
            prompt,
            kind,
            choices,
            correct,
        } = document;
        let correct = match correct {
            CorrectAnswer::Set(mut indices) => {
                indices.sort_unstable();
                CorrectAnswer::Set(indices)
            }
            index => index,
        };
        Ok(Self {
            prompt,
            kind,
            choices,
            correct,
        })
    }
}

impl From<Question> for QuestionDocument {
    fn from(question: Question) -> Self {
        Self {
            prompt: question.prompt,
            kind: question.kind,
            choices: question.choices,
            correct: question.correct,
        }
    }
}

impl JsonSchema for Question {
    fn schema_name() -> Cow<'static, str> {
        QuestionDocument::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        QuestionDocument::json_schema(generator)
    }
}
