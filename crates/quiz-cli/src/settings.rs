use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CliResult;

const SETTINGS_ENV: &str = "QUIZ_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "quiz-settings.json";

/// Colour scheme preference.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// Persisted user preferences. Lives apart from any quiz session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
}

impl Settings {
    /// Reads settings, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> CliResult<Self> {
        Ok(Self::load_if_present(path)?.unwrap_or_default())
    }

    /// Reads settings; `None` when the file does not exist.
    pub fn load_if_present(path: &Path) -> CliResult<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = %path.display(), theme = self.theme.as_str(), "settings saved");
        Ok(())
    }
}

/// Explicit path, then `QUIZ_SETTINGS`, then `./quiz-settings.json`.
pub fn resolve_settings_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var_os(SETTINGS_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}
