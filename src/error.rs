//! Error types for SkillSprint.

use thiserror::Error;

/// Library-level error type for SkillSprint operations.
#[derive(Error, Debug)]
pub enum SprintError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Content error: {0}")]
    Content(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Flow '{flow}' failed: {message}")]
    Flow { flow: &'static str, message: String },

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl SprintError {
    /// Build a flow error for the named flow.
    pub fn flow(flow: &'static str, message: impl Into<String>) -> Self {
        SprintError::Flow {
            flow,
            message: message.into(),
        }
    }

    /// Whether the error came from the hosted model rather than from us.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            SprintError::Flow { .. } | SprintError::OpenAI(_) | SprintError::Agent(_) | SprintError::Http(_)
        )
    }
}

/// Result type alias for SkillSprint operations.
pub type Result<T> = std::result::Result<T, SprintError>;
