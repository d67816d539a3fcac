use std::path::PathBuf;

use crate::quiz::bundle::{BuilderOptions, LabelStyle};

pub const DATA_DIR_VAR: &str = "VERSE_QUIZ_DATA_DIR";
pub const DEFAULT_LANG_VAR: &str = "VERSE_QUIZ_DEFAULT_LANG";
pub const DEFAULT_THEME_VAR: &str = "VERSE_QUIZ_DEFAULT_THEME";
pub const LABELS_VAR: &str = "VERSE_QUIZ_LABELS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub default_lang: String,
    pub default_theme: String,
    pub labels: LabelStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data-source"),
            default_lang: "zh".to_string(),
            default_theme: "default".to_string(),
            labels: LabelStyle::Display,
        }
    }
}

impl Config {
    /// Reads the environment (call `dotenv()` first to pick up a `.env` file).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_dir: non_empty(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            default_lang: non_empty(DEFAULT_LANG_VAR).unwrap_or(defaults.default_lang),
            default_theme: non_empty(DEFAULT_THEME_VAR).unwrap_or(defaults.default_theme),
            labels: non_empty(LABELS_VAR)
                .map(|v| LabelStyle::from_param(&v))
                .unwrap_or(defaults.labels),
        }
    }

    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            default_theme: self.default_theme.clone(),
            labels: self.labels,
        }
    }
}
