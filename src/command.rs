use log::warn;

use crate::config::Config;
use crate::quiz::selection::Difficulty;

pub const USAGE: &str = "\
usage: verse-quiz <command> [key=value ...]

commands:
  bundle       [theme=] [lang=] [difficulty=easy|medium|hard]
  review       ref=<BOOK_CHAPTER_VERSE> [theme=] [lang=]
  book-names   [lang=]
  themes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bundle {
        theme: String,
        lang: String,
        difficulty: Difficulty,
    },
    Review {
        reference: String,
        theme: String,
        lang: String,
    },
    BookNames {
        lang: String,
    },
    Themes,
}

impl Command {
    /// `args` excludes the program name. Parameters mirror the bundle query string
    /// (`theme=love lang=en difficulty=hard`); missing ones take the configured defaults.
    pub fn parse(args: &[String], config: &Config) -> Option<Self> {
        let (name, rest) = args.split_first()?;

        let mut theme = config.default_theme.clone();
        let mut lang = config.default_lang.clone();
        let mut difficulty = Difficulty::default();
        let mut reference = String::new();

        for arg in rest {
            let Some((key, value)) = arg.split_once('=') else {
                warn!("Ignoring argument '{}', expected key=value", arg);
                continue;
            };
            // empty values keep the default, like an empty query parameter
            if value.is_empty() {
                continue;
            }
            match key {
                "theme" => theme = value.to_string(),
                "lang" => lang = value.to_string(),
                "difficulty" => difficulty = Difficulty::from_param(value),
                "ref" => reference = value.to_string(),
                _ => warn!("Ignoring unknown parameter '{}'", key),
            }
        }

        match name.as_str() {
            "bundle" => Some(Command::Bundle {
                theme,
                lang,
                difficulty,
            }),
            "review" => Some(Command::Review {
                reference,
                theme,
                lang,
            }),
            "book-names" => Some(Command::BookNames { lang }),
            "themes" => Some(Command::Themes),
            _ => None,
        }
    }
}
