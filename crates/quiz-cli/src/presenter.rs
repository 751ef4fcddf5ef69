use std::fmt::Write;

use quiz_spec::{ChoiceStatus, QuestionReview, Score};
use serde_json::Value;

use crate::settings::Theme;

/// ANSI styling for review lines; `None` prints plain text.
#[derive(Copy, Clone)]
pub struct Palette {
    correct: Option<&'static str>,
    incorrect: Option<&'static str>,
    muted: Option<&'static str>,
}

impl Palette {
    pub fn for_theme(theme: Theme, colors: bool) -> Self {
        if !colors {
            return Self {
                correct: None,
                incorrect: None,
                muted: None,
            };
        }
        match theme {
            Theme::Dark => Self {
                correct: Some("1;92"),
                incorrect: Some("1;9;91"),
                muted: Some("90"),
            },
            Theme::Light => Self {
                correct: Some("1;32"),
                incorrect: Some("1;9;31"),
                muted: Some("2"),
            },
        }
    }

    fn paint(&self, status: ChoiceStatus, text: &str) -> String {
        let style = match status {
            ChoiceStatus::CorrectAndChosen | ChoiceStatus::CorrectAndMissed => self.correct,
            ChoiceStatus::IncorrectAndChosen => self.incorrect,
            ChoiceStatus::UnchosenAndIncorrect => self.muted,
        };
        match style {
            Some(code) => format!("\x1b[{}m{}\x1b[0m", code, text),
            None => text.to_string(),
        }
    }
}

fn marker(status: ChoiceStatus) -> &'static str {
    match status {
        ChoiceStatus::CorrectAndChosen => "[✓]",
        ChoiceStatus::CorrectAndMissed => "[+]",
        ChoiceStatus::IncorrectAndChosen => "[✗]",
        ChoiceStatus::UnchosenAndIncorrect => "[ ]",
    }
}

/// Prints quiz views produced by the component.
pub struct QuizPresenter {
    palette: Palette,
    header_printed: bool,
}

impl QuizPresenter {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, view: &QuizView) {
        if self.header_printed {
            return;
        }
        println!("Quiz: {}", view.quiz_title);
        if let Some(help) = &view.help {
            println!("{}", help);
        }
        self.header_printed = true;
    }

    pub fn show_question(&self, view: &QuizView) {
        let Some(question) = &view.current else {
            return;
        };
        println!();
        println!(
            "{}/{} {} {}",
            question.index + 1,
            view.total,
            question.prompt,
            question.kind.hint()
        );
        for (index, choice) in question.choices.iter().enumerate() {
            let mark = if choice.selected { "x" } else { " " };
            println!("  {}. [{}] {}", index + 1, mark, choice.label);
        }
        if view.can_advance {
            println!("Type a number to change your answer, 'n' for next.");
        } else {
            println!("Type a number to answer.");
        }
    }

    pub fn show_rejection(&self, message: &str) {
        eprintln!("Not accepted: {}", message);
    }

    pub fn show_parse_error(&self, error: &InputError) {
        eprintln!("Invalid input: {}", error.0);
    }

    pub fn show_summary(&self, score: &Score, review: &[QuestionReview]) {
        println!();
        println!("Score: {} / {}", score.correct, score.total);
        for (index, question) in review.iter().enumerate() {
            let verdict = if question.answered_correctly {
                "correct"
            } else {
                "incorrect"
            };
            println!("{}. {} ({})", index + 1, question.prompt, verdict);
            for choice in &question.choices {
                let line = format!("{} {}", marker(choice.status), choice.label);
                println!("   {}", self.palette.paint(choice.status, &line));
            }
        }
    }

    pub fn show_snapshot(&self, bytes: &[u8]) {
        println!("Session (CBOR hex): {}", encode_hex(bytes));
    }
}

/// View payload extracted from the component output.
pub struct QuizView {
    pub quiz_title: String,
    pub help: Option<String>,
    pub theme: Option<String>,
    pub complete: bool,
    pub total: usize,
    pub current: Option<ViewQuestion>,
    pub can_advance: bool,
    pub score: Option<Score>,
    pub review: Vec<QuestionReview>,
}

impl QuizView {
    pub fn from_json(json: &Value) -> Result<Self, String> {
        let quiz_title = json
            .get("quiz_title")
            .and_then(Value::as_str)
            .ok_or_else(|| "quiz view missing quiz_title".to_string())?
            .to_string();
        let help = json
            .get("help")
            .and_then(Value::as_str)
            .map(|value| value.to_string());
        let theme = json
            .get("theme")
            .and_then(Value::as_str)
            .map(|value| value.to_string());
        let complete = json.get("status").and_then(Value::as_str) == Some("complete");
        let total = json
            .get("progress")
            .and_then(|progress| progress.get("total"))
            .and_then(Value::as_u64)
            .ok_or_else(|| "quiz view missing progress".to_string())? as usize;
        let current = match json.get("current_question") {
            Some(question) if !question.is_null() => Some(ViewQuestion::from_json(question)?),
            _ => None,
        };
        let can_advance = json
            .get("can_advance")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let score = match json.get("score") {
            Some(score) if !score.is_null() => Some(
                serde_json::from_value(score.clone())
                    .map_err(|err| format!("quiz view has a bad score: {}", err))?,
            ),
            _ => None,
        };
        let review = match json.get("review") {
            Some(review) if !review.is_null() => serde_json::from_value(review.clone())
                .map_err(|err| format!("quiz view has a bad review: {}", err))?,
            _ => Vec::new(),
        };
        Ok(Self {
            quiz_title,
            help,
            theme,
            complete,
            total,
            current,
            can_advance,
            score,
            review,
        })
    }
}

pub struct ViewChoice {
    pub label: String,
    pub selected: bool,
}

/// The question awaiting input, as the component rendered it.
pub struct ViewQuestion {
    pub index: usize,
    pub prompt: String,
    pub kind: ViewKind,
    pub choices: Vec<ViewChoice>,
}

impl ViewQuestion {
    fn from_json(value: &Value) -> Result<Self, String> {
        let index = value
            .get("index")
            .and_then(Value::as_u64)
            .ok_or_else(|| "question missing index".to_string())? as usize;
        let prompt = value
            .get("prompt")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("question {} missing prompt", index))?
            .to_string();
        let kind = ViewKind::from_label(value.get("type").and_then(Value::as_str).unwrap_or(""));
        let choices = value
            .get("choices")
            .and_then(Value::as_array)
            .ok_or_else(|| format!("question {} missing choices", index))?
            .iter()
            .map(|choice| ViewChoice {
                label: choice
                    .get("label")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                selected: choice
                    .get("selected")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            })
            .collect();
        Ok(Self {
            index,
            prompt,
            kind,
            choices,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewKind {
    SingleChoice,
    MultiChoice,
    Boolean,
    Unknown,
}

impl ViewKind {
    fn from_label(label: &str) -> Self {
        match label {
            "single_choice" => ViewKind::SingleChoice,
            "multi_choice" => ViewKind::MultiChoice,
            "boolean" => ViewKind::Boolean,
            _ => ViewKind::Unknown,
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            ViewKind::SingleChoice => "(choose one)",
            ViewKind::MultiChoice => "(select all that apply)",
            ViewKind::Boolean => "(true or false)",
            ViewKind::Unknown => "",
        }
    }
}

/// Input the player typed that is not a command or choice list.
#[derive(Debug, PartialEq, Eq)]
pub struct InputError(pub String);

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_parses_active_payload() {
        let view = QuizView::from_json(&json!({
            "quiz_title": "Sample",
            "status": "need_input",
            "progress": { "answered": 1, "total": 3 },
            "current_question": {
                "index": 1,
                "prompt": "Select all prime numbers.",
                "type": "multi_choice",
                "choices": [
                    { "label": "2", "selected": true },
                    { "label": "4", "selected": false }
                ]
            },
            "can_advance": true,
            "score": null,
            "review": null
        }))
        .expect("view");
        assert!(!view.complete);
        let question = view.current.expect("current");
        assert_eq!(question.kind, ViewKind::MultiChoice);
        assert!(question.choices[0].selected);
        assert!(view.score.is_none());
        assert!(view.theme.is_none());
    }

    #[test]
    fn view_requires_title() {
        assert!(QuizView::from_json(&json!({ "progress": { "total": 1 } })).is_err());
    }

    #[test]
    fn plain_palette_leaves_text_alone() {
        let palette = Palette::for_theme(Theme::Dark, false);
        assert_eq!(
            palette.paint(ChoiceStatus::IncorrectAndChosen, "[✗] Earth"),
            "[✗] Earth"
        );
        let colored = Palette::for_theme(Theme::Light, true);
        assert!(
            colored
                .paint(ChoiceStatus::CorrectAndMissed, "[+] Jupiter")
                .starts_with("\x1b[1;32m")
        );
    }

    #[test]
    fn hex_encoding() {
        assert_eq!(encode_hex(&[0x00, 0xab, 0x10]), "00ab10");
    }
}
