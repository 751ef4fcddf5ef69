use serde_json::{Value, json};

use crate::{
    review::QuestionReview,
    session::{Progress, QuizSession, Score},
    spec::{QuestionType, QuizSpec},
};

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The current question still needs an answer.
    NeedInput,
    /// Every question has been answered.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderChoice {
    pub label: String,
    pub selected: bool,
}

/// The question currently awaiting input.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub index: usize,
    pub prompt: String,
    pub kind: QuestionType,
    pub choices: Vec<RenderChoice>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub quiz_id: String,
    pub quiz_title: String,
    pub quiz_version: String,
    pub status: RenderStatus,
    pub help: Option<String>,
    pub theme: Option<String>,
    pub progress: Progress,
    pub current: Option<RenderQuestion>,
    pub can_advance: bool,
    pub score: Option<Score>,
    pub review: Option<Vec<QuestionReview>>,
}

/// Build the renderer payload from the quiz and the session walking it.
pub fn build_render_payload(spec: &QuizSpec, session: &QuizSession) -> RenderPayload {
    let current = session.current_question().ok().map(|question| {
        let pending = session.pending_selection();
        RenderQuestion {
            index: session.current_index(),
            prompt: question.prompt().to_string(),
            kind: question.kind(),
            choices: question
                .choices()
                .iter()
                .enumerate()
                .map(|(index, label)| RenderChoice {
                    label: label.clone(),
                    selected: pending.contains(index),
                })
                .collect(),
        }
    });

    let complete = session.is_complete();
    RenderPayload {
        quiz_id: spec.id.clone(),
        quiz_title: spec.title.clone(),
        quiz_version: spec.version.clone(),
        status: if complete {
            RenderStatus::Complete
        } else {
            RenderStatus::NeedInput
        },
        help: spec.help().map(str::to_string),
        theme: spec.theme().map(str::to_string),
        progress: session.progress(),
        current,
        can_advance: session.can_advance(),
        score: complete.then(|| session.score()),
        review: complete.then(|| session.review()),
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let current = payload.current.as_ref().map(|question| {
        json!({
            "index": question.index,
            "prompt": question.prompt,
            "type": question.kind.as_str(),
            "choices": question
                .choices
                .iter()
                .map(|choice| json!({ "label": choice.label, "selected": choice.selected }))
                .collect::<Vec<_>>(),
        })
    });

    json!({
        "quiz_id": payload.quiz_id,
        "quiz_title": payload.quiz_title,
        "quiz_version": payload.quiz_version,
        "status": payload.status.as_str(),
        "help": payload.help,
        "theme": payload.theme,
        "progress": {
            "answered": payload.progress.answered,
            "total": payload.progress.total,
        },
        "current_question": current,
        "can_advance": payload.can_advance,
        "score": payload.score,
        "review": payload.review,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Quiz: {} ({})", payload.quiz_title, payload.quiz_id));
    lines.push(format!(
        "Status: {} ({}/{})",
        payload.status.as_str(),
        payload.progress.answered,
        payload.progress.total
    ));
    if let Some(help) = &payload.help {
        lines.push(format!("Help: {}", help));
    }

    if let Some(question) = &payload.current {
        lines.push(format!(
            "Question {}/{} [{}]: {}",
            question.index + 1,
            payload.progress.total,
            question.kind.as_str(),
            question.prompt
        ));
        for (index, choice) in question.choices.iter().enumerate() {
            let mark = if choice.selected { "x" } else { " " };
            lines.push(format!("  {}. [{}] {}", index + 1, mark, choice.label));
        }
    }

    if let Some(score) = &payload.score {
        lines.push(format!("Score: {} / {}", score.correct, score.total));
    }
    if let Some(review) = &payload.review {
        lines.push("Review:".into());
        for (index, question) in review.iter().enumerate() {
            let verdict = if question.answered_correctly {
                "correct"
            } else {
                "incorrect"
            };
            lines.push(format!("  {}. {} ({})", index + 1, question.prompt, verdict));
            for choice in &question.choices {
                lines.push(format!("     - {}: {}", choice.label, choice.status.as_str()));
            }
        }
    }

    lines.join("\n")
}
