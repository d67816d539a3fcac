use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("theme '{theme}' not found")]
    ThemeNotFound { theme: String },

    #[error("theme '{theme}' has {available} usable references, at least {required} are needed")]
    PoolTooSmall {
        theme: String,
        available: usize,
        required: usize,
    },

    #[error("no text for verse '{reference}' in language '{lang}'")]
    VerseNotFound { reference: String, lang: String },

    #[error("'{reference}' is not a valid verse reference")]
    MalformedReference { reference: String },

    #[error("corpus unavailable: {details}")]
    DependencyUnavailable { details: String },
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        QuizError::DependencyUnavailable {
            details: format!("I/O error: {}", err),
        }
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::DependencyUnavailable {
            details: format!("JSON error: {}", err),
        }
    }
}

impl QuizError {
    /// Status a request layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            QuizError::ThemeNotFound { .. } => 404,
            QuizError::PoolTooSmall { .. } => 422,
            QuizError::VerseNotFound { .. } | QuizError::MalformedReference { .. } => 500,
            QuizError::DependencyUnavailable { .. } => 503,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::ThemeNotFound { .. } => "ThemeNotFound",
            QuizError::PoolTooSmall { .. } => "PoolTooSmall",
            QuizError::VerseNotFound { .. } => "VerseNotFound",
            QuizError::MalformedReference { .. } => "MalformedReference",
            QuizError::DependencyUnavailable { .. } => "DependencyUnavailable",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.kind().to_string(),
            details: self.to_string(),
        }
    }
}

/// JSON shape of a failed request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}
