//! Error types for the formatter

pub type Result<T> = std::result::Result<T, FormatterError>;

#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
    /// A required input was rejected before any output was written
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// The sink rejected a write
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Severity input that has no label in the level table
    #[error("Unknown log level: '{0}'")]
    UnknownLevel(String),
}

impl FormatterError {
    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        FormatterError::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create an unknown level error
    pub fn unknown_level(level: impl ToString) -> Self {
        FormatterError::UnknownLevel(level.to_string())
    }

    /// Whether the error came from the sink
    pub fn is_io(&self) -> bool {
        matches!(self, FormatterError::Io(_))
    }
}
