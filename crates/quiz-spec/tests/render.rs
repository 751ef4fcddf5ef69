use quiz_spec::{
    QuizPresentation, QuizSession, QuizSpec, RenderStatus, build_render_payload, render_json_ui,
    render_text,
};

fn sample_spec() -> QuizSpec {
    serde_json::from_str(include_str!("fixtures/sample_quiz.json")).expect("deserialize")
}

#[test]
fn render_text_shows_current_question_and_marks() {
    let spec = sample_spec();
    let mut session = QuizSession::from_spec(&spec);
    session.toggle_selection(1).unwrap();
    let payload = build_render_payload(&spec, &session);

    assert_eq!(payload.status, RenderStatus::NeedInput);
    assert!(payload.can_advance);
    let text = render_text(&payload);
    assert!(text.contains("Question 1/3 [single_choice]"));
    assert!(text.contains("2. [x] Jupiter"));
    assert!(text.contains("1. [ ] Earth"));
    assert!(text.contains("Help: Three warm-up questions."));
}

#[test]
fn render_json_ui_reports_review_when_complete() {
    let spec = sample_spec();
    let mut session = QuizSession::from_spec(&spec);
    let rounds: [&[usize]; 3] = [&[0], &[2, 0], &[1]];
    for picks in rounds {
        for pick in picks {
            session.toggle_selection(*pick).unwrap();
        }
        session.advance().unwrap();
    }

    let ui = render_json_ui(&build_render_payload(&spec, &session));
    assert_eq!(ui["status"], "complete");
    assert!(ui["current_question"].is_null());
    assert_eq!(ui["score"]["correct"], 2);
    assert_eq!(ui["score"]["total"], 3);
    assert_eq!(ui["review"][0]["choices"][0]["status"], "incorrect-and-chosen");
    assert_eq!(ui["review"][0]["choices"][1]["status"], "correct-and-missed");
}

#[test]
fn render_json_ui_hides_score_while_active() {
    let spec = sample_spec();
    let session = QuizSession::from_spec(&spec);
    let ui = render_json_ui(&build_render_payload(&spec, &session));
    assert_eq!(ui["quiz_id"], "sample-quiz");
    assert_eq!(ui["progress"]["total"], 3);
    assert!(ui["score"].is_null());
    assert!(ui["theme"].is_null());
    assert_eq!(ui["can_advance"], false);
    let choices = ui["current_question"]["choices"].as_array().expect("choices");
    assert_eq!(choices.len(), 4);
    assert!(choices.iter().all(|choice| choice["selected"] == false));
}

#[test]
fn render_json_ui_carries_presentation_theme() {
    let mut spec = sample_spec();
    spec.presentation = Some(QuizPresentation {
        intro: None,
        theme: Some("light".into()),
    });
    let session = QuizSession::from_spec(&spec);
    let payload = build_render_payload(&spec, &session);
    assert_eq!(payload.theme.as_deref(), Some("light"));
    assert_eq!(render_json_ui(&payload)["theme"], "light");
}
