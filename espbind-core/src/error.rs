//! Error types shared across the crate
//!
//! Configuration problems (missing folders, quests, aliases, scripts) are
//! recoverable and carry optional remediation suggestions for the CLI to
//! surface. Per-property resolution misses during auto-fill are never errors;
//! they are reported through [`crate::autofill::AutoFillOutcome`] instead.

pub type Result<T> = std::result::Result<T, BindError>;

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// Recoverable configuration problem (not-found folder/file/quest/alias/script).
    #[error("{message}")]
    Config {
        message: String,
        context: Option<String>,
        suggestions: Vec<String>,
    },

    /// A manual property value failed to parse for its declared kind.
    /// Raised before any mutation of the script.
    #[error("invalid {expected} value for property '{name}': {value}")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// A form link string did not match the `Plugin.esp|0xFormID` shape.
    #[error("invalid form link '{0}': expected 'Plugin.esp|0xFormID'")]
    FormLink(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse plugin document: {0}")]
    Json(#[from] serde_json::Error),
}

impl BindError {
    /// A configuration error with just a message.
    pub fn config(message: impl Into<String>) -> Self {
        BindError::Config {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// A configuration error with context and remediation suggestions.
    pub fn config_with(
        message: impl Into<String>,
        context: Option<&str>,
        suggestions: &[&str],
    ) -> Self {
        BindError::Config {
            message: message.into(),
            context: context.map(|c| c.to_string()),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Remediation suggestions attached to this error, if any.
    pub fn suggestions(&self) -> &[String] {
        match self {
            BindError::Config { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Extra context attached to this error, if any.
    pub fn context(&self) -> Option<&str> {
        match self {
            BindError::Config { context, .. } => context.as_deref(),
            _ => None,
        }
    }
}
