use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use quiz_spec::{
    Advance, QuizSession, QuizSpec, SessionError, SessionSnapshot, build_render_payload,
    quiz_schema as spec_quiz_schema, render_json_ui as qa_render_json_ui,
    render_text as qa_render_text, validate_quiz as spec_validate_quiz,
};

const DEFAULT_QUIZ: &str = include_str!("../../quiz-spec/tests/fixtures/sample_quiz.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse quiz: {0}")]
    QuizParse(#[source] serde_json::Error),
    #[error("failed to parse session state: {0}")]
    StateParse(#[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ComponentError {
    fn code(&self) -> &'static str {
        match self {
            ComponentError::ConfigParse(_) => "config_parse",
            ComponentError::QuizParse(_) => "quiz_parse",
            ComponentError::StateParse(_) => "state_parse",
            ComponentError::JsonEncode(_) => "json_encode",
            ComponentError::Session(err) => err.code(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    quiz_json: Option<String>,
}

/// Sample quiz used when the config names none.
pub fn default_quiz_json() -> &'static str {
    DEFAULT_QUIZ
}

fn load_quiz(config_json: &str) -> Result<QuizSpec, ComponentError> {
    let config = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)?
    };

    let quiz_json = config.quiz_json.as_deref().unwrap_or(DEFAULT_QUIZ);

    serde_json::from_str(quiz_json).map_err(ComponentError::QuizParse)
}

/// Restores the session carried in `state_json`; an empty state starts a
/// fresh session.
fn load_session(spec: &QuizSpec, state_json: &str) -> Result<QuizSession, ComponentError> {
    if state_json.trim().is_empty() {
        return Ok(QuizSession::from_spec(spec));
    }
    let snapshot: SessionSnapshot =
        serde_json::from_str(state_json).map_err(ComponentError::StateParse)?;
    Ok(QuizSession::resume(spec.questions.clone(), snapshot)?)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => error_json(&err).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => error_json(&err).to_string(),
    }
}

fn error_json(err: &ComponentError) -> Value {
    json!({ "error": err.to_string(), "code": err.code() })
}

fn session_response(spec: &QuizSpec, session: &QuizSession) -> Result<Value, ComponentError> {
    let state = serde_json::to_value(session.snapshot()).map_err(ComponentError::JsonEncode)?;
    let payload = build_render_payload(spec, session);
    Ok(json!({
        "status": payload.status.as_str(),
        "state": state,
        "view": qa_render_json_ui(&payload),
    }))
}

pub fn describe(config_json: &str) -> String {
    respond(
        load_quiz(config_json)
            .and_then(|spec| serde_json::to_value(spec).map_err(ComponentError::JsonEncode)),
    )
}

pub fn quiz_schema() -> String {
    respond(Ok(spec_quiz_schema()))
}

/// Validates a raw quiz document, reporting every problem found.
pub fn validate_quiz(quiz_json: &str) -> String {
    respond(
        serde_json::from_str::<Value>(quiz_json)
            .map_err(ComponentError::QuizParse)
            .and_then(|quiz| {
                serde_json::to_value(spec_validate_quiz(&quiz)).map_err(ComponentError::JsonEncode)
            }),
    )
}

pub fn start(config_json: &str) -> String {
    respond(load_quiz(config_json).and_then(|spec| {
        let session = QuizSession::from_spec(&spec);
        session_response(&spec, &session)
    }))
}

pub fn toggle(config_json: &str, state_json: &str, choice: usize) -> String {
    respond(load_quiz(config_json).and_then(|spec| {
        let mut session = load_session(&spec, state_json)?;
        session.toggle_selection(choice)?;
        session_response(&spec, &session)
    }))
}

pub fn advance(config_json: &str, state_json: &str) -> String {
    respond(load_quiz(config_json).and_then(|spec| {
        let mut session = load_session(&spec, state_json)?;
        let advanced = match session.advance()? {
            Advance::Next(index) => {
                debug!(quiz = %spec.id, next = index, "advanced");
                "next"
            }
            Advance::Complete => "complete",
        };
        let mut response = session_response(&spec, &session)?;
        response["advanced"] = Value::String(advanced.into());
        Ok(response)
    }))
}

pub fn score(config_json: &str, state_json: &str) -> String {
    respond(load_quiz(config_json).and_then(|spec| {
        let session = load_session(&spec, state_json)?;
        serde_json::to_value(session.score()).map_err(ComponentError::JsonEncode)
    }))
}

pub fn review(config_json: &str, state_json: &str) -> String {
    respond(load_quiz(config_json).and_then(|spec| {
        let session = load_session(&spec, state_json)?;
        serde_json::to_value(session.review()).map_err(ComponentError::JsonEncode)
    }))
}

pub fn render_text(config_json: &str, state_json: &str) -> String {
    respond_string(load_quiz(config_json).and_then(|spec| {
        let session = load_session(&spec, state_json)?;
        Ok(qa_render_text(&build_render_payload(&spec, &session)))
    }))
}

pub fn render_json_ui(config_json: &str, state_json: &str) -> String {
    respond(load_quiz(config_json).and_then(|spec| {
        let session = load_session(&spec, state_json)?;
        Ok(qa_render_json_ui(&build_render_payload(&spec, &session)))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(response: &str) -> Value {
        serde_json::from_str(response).expect("json")
    }

    fn state_of(response: &str) -> String {
        parse(response)["state"].to_string()
    }

    #[test]
    fn describe_returns_default_quiz() {
        let quiz = parse(&describe(""));
        assert_eq!(quiz["id"], "sample-quiz");
        assert_eq!(quiz["questions"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn describe_reports_bad_quiz() {
        let config = json!({
            "quiz_json": json!({
                "id": "bad",
                "title": "Bad",
                "version": "1",
                "questions": [
                    { "prompt": "p", "type": "boolean", "choices": ["a", "b"], "correct": 4 }
                ]
            }).to_string()
        });
        let response = parse(&describe(&config.to_string()));
        assert_eq!(response["code"], "quiz_parse");
        assert!(response["error"].as_str().unwrap_or_default().contains("outside"));
    }

    #[test]
    fn schema_is_object_schema() {
        let schema = parse(&quiz_schema());
        assert!(schema["properties"]["questions"].is_object());
    }

    #[test]
    fn validate_quiz_reports_errors() {
        let result = parse(&validate_quiz(
            r#"{"id":"x","title":"x","version":"1","questions":[]}"#,
        ));
        assert_eq!(result["valid"], false);
        assert_eq!(result["errors"][0]["code"], "no_questions");
    }

    #[test]
    fn full_walk_through_state_json() {
        let response = start("");
        assert_eq!(parse(&response)["status"], "need_input");
        let mut state = state_of(&response);

        for picks in [vec![1], vec![2, 0], vec![1]] {
            for pick in picks {
                state = state_of(&toggle("", &state, pick));
            }
            let response = advance("", &state);
            state = state_of(&response);
        }

        let score = parse(&score("", &state));
        assert_eq!(score, json!({ "correct": 3, "total": 3 }));
        let view = parse(&render_json_ui("", &state));
        assert_eq!(view["status"], "complete");
        let text = render_text("", &state);
        assert!(text.contains("Score: 3 / 3"));
    }

    #[test]
    fn advance_without_selection_returns_code() {
        let state = state_of(&start(""));
        let response = parse(&advance("", &state));
        assert_eq!(response["code"], "incomplete_selection");
    }

    #[test]
    fn toggle_out_of_range_returns_code() {
        let response = parse(&toggle("", "", 9));
        assert_eq!(response["code"], "invalid_choice_index");
    }

    #[test]
    fn advance_reports_completion() {
        let config = json!({
            "quiz_json": json!({
                "id": "one",
                "title": "One",
                "version": "1",
                "questions": [
                    {
                        "prompt": "p",
                        "type": "true-false",
                        "choices": ["False", "True"],
                        "correct": 0
                    }
                ]
            }).to_string()
        })
        .to_string();
        let state = state_of(&toggle(&config, "", 0));
        let response = parse(&advance(&config, &state));
        assert_eq!(response["advanced"], "complete");
        assert_eq!(response["view"]["score"]["correct"], 1);

        let finished = response["state"].to_string();
        let again = parse(&toggle(&config, &finished, 0));
        assert_eq!(again["code"], "session_complete");
    }

    #[test]
    fn review_classifies_choices() {
        let mut state = state_of(&start(""));
        for picks in [vec![0], vec![0, 2], vec![1]] {
            for pick in picks {
                state = state_of(&toggle("", &state, pick));
            }
            state = state_of(&advance("", &state));
        }
        let review = parse(&review("", &state));
        assert_eq!(review[0]["choices"][1]["status"], "correct-and-missed");
        assert_eq!(review[0]["choices"][0]["status"], "incorrect-and-chosen");
    }

    #[test]
    fn rejects_tampered_state() {
        let state = json!({
            "current_index": 1,
            "pending": { "kind": "multi", "value": [] },
            "committed": [
                { "kind": "single", "value": null },
                { "kind": "multi", "value": [] },
                { "kind": "single", "value": null }
            ]
        });
        let response = parse(&score("", &state.to_string()));
        assert_eq!(response["code"], "invalid_snapshot");
    }
}
