use thiserror::Error;

/// Errors raised while talking to the text-generation endpoint
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation failed: {status_code} {message}")]
    HttpError { status_code: u16, message: String },

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("Configuration Error: {0}")]
    ConfigError(String),
}

impl GenerationError {
    /// Status code of the failed call, if the endpoint answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GenerationError::HttpError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Result type for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors raised by the intent handlers
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Please generate a report first")]
    NoReport,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Scoring Error: {0}")]
    Scoring(String),

    #[error("{source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: GenerationError,
    },
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
