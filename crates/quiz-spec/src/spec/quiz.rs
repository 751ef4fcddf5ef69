use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;

/// Presentation hints for a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct QuizPresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Top-level quiz definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuizSpec {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<QuizPresentation>,
    pub questions: Vec<Question>,
}

impl QuizSpec {
    /// Intro text shown before the first question, falling back to the
    /// description.
    pub fn help(&self) -> Option<&str> {
        self.presentation
            .as_ref()
            .and_then(|presentation| presentation.intro.as_deref())
            .or(self.description.as_deref())
    }

    /// Theme the quiz author suggests for presenting it.
    pub fn theme(&self) -> Option<&str> {
        self.presentation
            .as_ref()
            .and_then(|presentation| presentation.theme.as_deref())
    }
}
