mod presenter;
mod settings;

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use component_quiz::{advance, default_quiz_json, start, toggle};
use presenter::{InputError, Palette, QuizPresenter, QuizView};
use quiz_spec::{SessionSnapshot, ValidationResult, quiz_schema, validate_quiz};
use serde_json::{Value, json};
use settings::{Settings, Theme, resolve_settings_path};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Component error codes the player can recover from by typing something else.
const RECOVERABLE_CODES: &[&str] = &["incomplete_selection", "invalid_choice_index"];

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Text-based quiz runner",
    long_about = "Plays quizzes one question at a time, scores them, and checks quiz files"
)]
struct Cli {
    /// Settings file holding the theme preference
    /// (defaults to QUIZ_SETTINGS or ./quiz-settings.json).
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Show debug logging on stderr.
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a quiz in the terminal.
    Play {
        /// Path to the quiz JSON (defaults to the built-in sample quiz).
        #[arg(long, value_name = "QUIZ")]
        quiz: Option<PathBuf>,
        /// Print the final session snapshot as CBOR hex.
        #[arg(long)]
        snapshot: bool,
    },
    /// Check a quiz file and list every problem found.
    Validate {
        /// Path to the quiz JSON.
        #[arg(long, value_name = "QUIZ")]
        quiz: PathBuf,
    },
    /// Print the JSON schema for quiz files.
    Schema,
    /// Print the built-in sample quiz.
    Sample,
    /// Show or change the theme preference.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme.
    Show,
    /// Switch between dark and light.
    Toggle,
    /// Set the theme explicitly.
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings_path = resolve_settings_path(cli.settings);
    match cli.command {
        Command::Play { quiz, snapshot } => {
            let saved = Settings::load_if_present(&settings_path)?;
            run_play(quiz, snapshot, saved.map(|settings| settings.theme))
        }
        Command::Validate { quiz } => run_validate(quiz),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&quiz_schema())?);
            Ok(())
        }
        Command::Sample => {
            println!("{}", default_quiz_json().trim_end());
            Ok(())
        }
        Command::Theme { action } => run_theme(&settings_path, action),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_theme(path: &std::path::Path, action: ThemeAction) -> CliResult<()> {
    let mut settings = Settings::load(path)?;
    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            settings.theme = settings.theme.toggled();
            settings.save(path)?;
        }
        ThemeAction::Set { theme } => {
            settings.theme = theme;
            settings.save(path)?;
        }
    }
    println!("Theme: {}", settings.theme.as_str());
    Ok(())
}

fn run_validate(quiz_path: PathBuf) -> CliResult<()> {
    let quiz_json = fs::read_to_string(quiz_path)?;
    let quiz: Value = serde_json::from_str(&quiz_json)?;

    let result = validate_quiz(&quiz);
    println!(
        "Validation result: {}",
        if result.valid { "valid" } else { "invalid" }
    );
    describe_validation(&result);

    if result.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            let path = if error.path.is_empty() {
                "<root>"
            } else {
                error.path.as_str()
            };
            println!("  {} [{}] {}", path, error.code, error.message);
        }
    }
}

/// A saved preference wins over the quiz's suggested theme.
fn pick_theme(saved: Option<Theme>, quiz_theme: Option<&str>) -> Theme {
    saved
        .or_else(|| quiz_theme.and_then(Theme::from_label))
        .unwrap_or_default()
}

fn run_play(quiz_path: Option<PathBuf>, snapshot: bool, saved: Option<Theme>) -> CliResult<()> {
    let config_json = match quiz_path {
        Some(path) => {
            let quiz_json = fs::read_to_string(&path)?;
            json!({ "quiz_json": quiz_json }).to_string()
        }
        None => String::new(),
    };

    let started = parse_component_result(&start(&config_json))?;
    let mut state = started["state"].to_string();
    let mut view = QuizView::from_json(&started["view"])
        .map_err(|err| format!("quiz view error: {}", err))?;

    let theme = pick_theme(saved, view.theme.as_deref());
    let colors = env::var_os("NO_COLOR").is_none();
    let mut presenter = QuizPresenter::new(Palette::for_theme(theme, colors));
    presenter.show_header(&view);
    info!(theme = theme.as_str(), "quiz started");

    while !view.complete {
        presenter.show_question(&view);
        let Some(line) = read_input()? else {
            return Err("input ended before the quiz was complete".into());
        };

        let response = match parse_command(&line) {
            Ok(PlayerInput::Exit) => return Err("quiz aborted by user".into()),
            Ok(PlayerInput::Next) => advance(&config_json, &state),
            Ok(PlayerInput::Choices(choices)) => {
                match apply_choices(&config_json, &state, &choices)? {
                    Ok(response) => response,
                    Err(message) => {
                        presenter.show_rejection(&message);
                        continue;
                    }
                }
            }
            Err(err) => {
                presenter.show_parse_error(&err);
                continue;
            }
        };

        if let Some(message) = component_rejection(&response)? {
            presenter.show_rejection(&message);
            continue;
        }
        let value = parse_component_result(&response)?;
        state = value["state"].to_string();
        view = QuizView::from_json(&value["view"])
            .map_err(|err| format!("quiz view error: {}", err))?;
        debug!(state = %state, "session updated");
    }

    let score = view.score.ok_or("completed quiz view has no score")?;
    presenter.show_summary(&score, &view.review);
    if snapshot {
        let snapshot: SessionSnapshot = serde_json::from_str(&state)?;
        presenter.show_snapshot(&snapshot.to_cbor()?);
    }
    Ok(())
}

/// Toggles each choice in turn; a rejected choice discards the whole line.
fn apply_choices(
    config_json: &str,
    state: &str,
    choices: &[usize],
) -> CliResult<Result<String, String>> {
    let mut current = state.to_string();
    let mut response = String::new();
    for choice in choices {
        response = toggle(config_json, &current, *choice);
        if let Some(message) = component_rejection(&response)? {
            return Ok(Err(message));
        }
        current = parse_component_result(&response)?["state"].to_string();
    }
    Ok(Ok(response))
}

fn read_input() -> CliResult<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn parse_component_result(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        Err(error.into())
    } else {
        Ok(value)
    }
}

/// Message of an error the player can recover from; other errors propagate.
fn component_rejection(response: &str) -> CliResult<Option<String>> {
    let value: Value = serde_json::from_str(response)?;
    let Some(error) = value.get("error").and_then(Value::as_str) else {
        return Ok(None);
    };
    let code = value.get("code").and_then(Value::as_str).unwrap_or_default();
    if RECOVERABLE_CODES.contains(&code) {
        Ok(Some(error.to_string()))
    } else {
        Err(error.into())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PlayerInput {
    Next,
    Exit,
    /// Zero-based choice indices, applied in order.
    Choices(Vec<usize>),
}

fn parse_command(raw: &str) -> Result<PlayerInput, InputError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Ok(PlayerInput::Exit);
    }
    if trimmed.eq_ignore_ascii_case("n") || trimmed.eq_ignore_ascii_case("next") {
        return Ok(PlayerInput::Next);
    }
    if trimmed.is_empty() {
        return Err(InputError(
            "type a choice number, 'n' for next or 'exit'".into(),
        ));
    }

    let choices = trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(number) if number >= 1 => Ok(number - 1),
            _ => Err(InputError(format!("'{}' is not a choice number", part))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    if choices.is_empty() {
        return Err(InputError("no choice numbers given".into()));
    }
    Ok(PlayerInput::Choices(choices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_theme_beats_quiz_theme() {
        assert_eq!(pick_theme(Some(Theme::Dark), Some("light")), Theme::Dark);
        assert_eq!(pick_theme(None, Some("light")), Theme::Light);
        assert_eq!(pick_theme(None, Some("neon")), Theme::Dark);
        assert_eq!(pick_theme(None, None), Theme::Dark);
    }

    #[test]
    fn parse_command_accepts_keywords() {
        assert_eq!(parse_command("n"), Ok(PlayerInput::Next));
        assert_eq!(parse_command(" NEXT "), Ok(PlayerInput::Next));
        assert_eq!(parse_command("exit"), Ok(PlayerInput::Exit));
    }

    #[test]
    fn parse_command_reads_one_based_choices() {
        assert_eq!(parse_command("2"), Ok(PlayerInput::Choices(vec![1])));
        assert_eq!(parse_command("3, 1"), Ok(PlayerInput::Choices(vec![2, 0])));
        assert_eq!(parse_command("1 3"), Ok(PlayerInput::Choices(vec![0, 2])));
    }

    #[test]
    fn parse_command_rejects_garbage() {
        assert!(parse_command("").is_err());
        assert!(parse_command("0").is_err());
        assert!(parse_command("two").is_err());
        assert!(parse_command(",").is_err());
    }

    #[test]
    fn rejection_is_reported_for_recoverable_codes() {
        let response = advance("", "");
        assert!(
            component_rejection(&response)
                .expect("recoverable")
                .is_some()
        );
        let fatal = r#"{"error":"boom","code":"quiz_parse"}"#;
        assert!(component_rejection(fatal).is_err());
        assert_eq!(component_rejection(r#"{"status":"need_input"}"#).ok(), Some(None));
    }
}
