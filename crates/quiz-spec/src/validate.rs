use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::spec::QuizSpec;
use crate::spec::question::QuestionDocument;

/// One problem found in a quiz document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_index: Option<usize>,
    pub path: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// Checks a raw quiz document and reports every problem found, unlike
/// deserialization which stops at the first.
pub fn validate_quiz(quiz: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    let Some(object) = quiz.as_object() else {
        errors.push(malformed(None, "", "quiz must be a JSON object"));
        return finish(errors);
    };

    for field in ["id", "title", "version"] {
        if !object.get(field).is_some_and(Value::is_string) {
            errors.push(malformed(
                None,
                &format!("/{field}"),
                &format!("'{field}' must be a string"),
            ));
        }
    }

    if !optional_string(object.get("description")) {
        errors.push(malformed(
            None,
            "/description",
            "'description' must be a string",
        ));
    }
    match object.get("presentation") {
        None | Some(Value::Null) => {}
        Some(Value::Object(presentation)) => {
            for field in ["intro", "theme"] {
                if !optional_string(presentation.get(field)) {
                    errors.push(malformed(
                        None,
                        &format!("/presentation/{field}"),
                        &format!("'{field}' must be a string"),
                    ));
                }
            }
        }
        Some(_) => errors.push(malformed(
            None,
            "/presentation",
            "'presentation' must be an object",
        )),
    }

    match object.get("questions").and_then(Value::as_array) {
        None => errors.push(malformed(
            None,
            "/questions",
            "'questions' must be an array",
        )),
        Some(questions) if questions.is_empty() => errors.push(ValidationIssue {
            question_index: None,
            path: "/questions".into(),
            message: "quiz has no questions".into(),
            code: "no_questions".into(),
        }),
        Some(questions) => {
            for (index, question) in questions.iter().enumerate() {
                validate_question(index, question, &mut errors);
            }
        }
    }

    if errors.is_empty()
        && let Err(err) = serde_json::from_value::<QuizSpec>(quiz.clone())
    {
        errors.push(malformed(None, "", &err.to_string()));
    }

    finish(errors)
}

fn optional_string(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::String(_)))
}

fn validate_question(index: usize, question: &Value, errors: &mut Vec<ValidationIssue>) {
    let base = format!("/questions/{index}");
    let document: QuestionDocument = match serde_json::from_value(question.clone()) {
        Ok(document) => document,
        Err(err) => {
            errors.push(malformed(Some(index), &base, &err.to_string()));
            return;
        }
    };

    for problem in document.problems() {
        let field = match &problem {
            ValidationError::TypeMismatch { .. } => "type",
            ValidationError::TooFewChoices { .. } | ValidationError::BooleanChoiceCount { .. } => {
                "choices"
            }
            ValidationError::CorrectOutOfRange { .. }
            | ValidationError::EmptyCorrectSet
            | ValidationError::DuplicateCorrectIndex { .. } => "correct",
        };
        errors.push(ValidationIssue {
            question_index: Some(index),
            path: format!("{base}/{field}"),
            message: problem.to_string(),
            code: problem.code().into(),
        });
    }
}

fn malformed(question_index: Option<usize>, path: &str, message: &str) -> ValidationIssue {
    ValidationIssue {
        question_index,
        path: path.into(),
        message: message.into(),
        code: "malformed".into(),
    }
}

fn finish(errors: Vec<ValidationIssue>) -> ValidationResult {
    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}
