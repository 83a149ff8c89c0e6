use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// State store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Provider call failure
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Rejected input
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// State store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database could not be opened
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    /// Statement failed
    #[error("Query failed: {message}")]
    Query { message: String },

    /// Schema migration failed
    #[error("Migration failed: {message}")]
    Migration { message: String },

    /// Stored value could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Driver error
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// LLM provider errors
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No usable API key
    #[error("No API key configured. Set GEMINI_API_KEY and try again.")]
    MissingCredential,

    /// Non-success status; `message` is the response body
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Body could not be read
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Configured timeout elapsed
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Input errors caught before any network call
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Idea is blank after trimming
    #[error("Write an idea first.")]
    EmptyIdea,

    /// Another analysis is pending
    #[error("An analysis is already in progress.")]
    Busy,

    /// No revision has this id or prefix
    #[error("No revision matches '{id}'")]
    RevisionNotFound { id: String },

    /// Prefix matches more than one revision
    #[error("'{prefix}' matches {count} revisions, use a longer prefix")]
    AmbiguousRevision { prefix: String, count: usize },
}

/// Reasons the response extractor found no structured result
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// No `{` before a later `}`
    #[error("no brace-delimited span in completion")]
    NoJsonSpan,

    /// Span does not parse as a JSON object
    #[error("brace span is not valid JSON: {message}")]
    Malformed { message: String },
}

const GENERIC_FAILURE: &str = "Something went wrong while analyzing. Please try again.";

impl AppError {
    /// Best available message for the single user-visible error field.
    ///
    /// Provider failures surface the response body verbatim; everything else
    /// falls back to the error's display text, then to a generic message.
    pub fn user_message(&self) -> String {
        let message = match self {
            AppError::Completion(CompletionError::Api { status, message }) => {
                if message.trim().is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    message.clone()
                }
            }
            AppError::Completion(CompletionError::Http(e)) => e.to_string(),
            AppError::Completion(e @ CompletionError::MissingCredential) => e.to_string(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for state store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for completion calls
pub type CompletionResult<T> = Result<T, CompletionError>;
