use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ThemeState {
    pub theme: Theme,
    pub dark_mode: bool,
}

impl From<Theme> for ThemeState {
    fn from(theme: Theme) -> Self {
        Self {
            theme,
            dark_mode: theme.is_dark(),
        }
    }
}

/// Process-wide string key-value preferences
#[derive(Debug, Default)]
pub struct Preferences {
    values: RwLock<HashMap<String, String>>,
}

impl Preferences {
    pub fn with_theme(theme: Theme) -> Self {
        let prefs = Self::default();
        prefs.set(THEME_KEY, theme.as_str());
        prefs
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    /// Stored theme; anything unreadable falls back to light mode.
    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Flip the theme and store the new value
    pub fn toggle_theme(&self) -> Theme {
        let mut values = self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let current: Theme = values
            .get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        let next = current.toggled();
        values.insert(THEME_KEY.to_string(), next.as_str().to_string());
        info!("Theme switched to {}", next);
        next
    }
}
