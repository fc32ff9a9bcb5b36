use thiserror::Error;

use crate::models::ActionMode;

/// Type alias for Result with CleanerError
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Errors that end a cleanup run
///
/// Every variant is fatal: nothing is retried and no thread is skipped.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// Bad flag value or combination, reported before any network I/O
    #[error("invalid arguments: {0}")]
    Validation(String),

    /// The provider's result estimate exceeds the safety cap; nothing was modified
    #[error("too many results! estimated result count {estimate} is above cap {cap}")]
    OverCap { estimate: u64, cap: u64 },

    /// Paging through the search results failed
    #[error("error searching for threads")]
    Search(#[source] ApiError),

    /// Retrieving a single thread's detail failed
    #[error("unable to fetch thread {thread_id}")]
    Fetch {
        thread_id: String,
        #[source]
        source: ApiError,
    },

    /// Trashing or deleting a thread failed after `acted` threads were handled
    #[error(
        "unable to {} thread \"{}\" ({} threads already {})",
        .action.verb(),
        .subject,
        .acted,
        .action.past_tense()
    )]
    Action {
        action: ActionMode,
        subject: String,
        acted: usize,
        #[source]
        source: ApiError,
    },

    /// Authentication failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error (token file permissions, config reads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by the remote mail service
///
/// The classification only shapes the message shown to the operator;
/// the cleaner treats every kind as fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Rate limit exceeded (429)
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server returned 5xx error
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Resource not found (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request (400)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403), usually a missing OAuth scope
    #[error("access forbidden: {0}")]
    Forbidden(String),

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Response could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Anything else the API reports
    #[error("Gmail API error: {0}")]
    Other(String),
}

impl From<google_gmail1::Error> for ApiError {
    fn from(error: google_gmail1::Error) -> Self {
        match error {
            google_gmail1::Error::Failure(ref response) => {
                let status = response.status();
                let status_code = status.as_u16();
                let message = format!(
                    "HTTP {}: {}",
                    status_code,
                    status.canonical_reason().unwrap_or("Unknown")
                );
                from_status(status_code, message)
            }
            google_gmail1::Error::BadRequest(ref err) => ApiError::BadRequest(format!("{}", err)),
            google_gmail1::Error::HttpError(ref err) => {
                ApiError::Network(format!("connection error: {}", err))
            }
            google_gmail1::Error::Io(err) => ApiError::Network(err.to_string()),
            google_gmail1::Error::JsonDecodeError(body, err) => {
                ApiError::InvalidResponse(format!("{} (body: {})", err, body))
            }
            _ => ApiError::Other(error.to_string()),
        }
    }
}

/// Classify a non-success HTTP status
fn from_status(status_code: u16, message: String) -> ApiError {
    match status_code {
        429 => ApiError::RateLimited(message),
        404 => ApiError::NotFound(message),
        400 => ApiError::BadRequest(message),
        403 => ApiError::Forbidden(message),
        500..=599 => ApiError::Server {
            status: status_code,
            message,
        },
        _ => ApiError::Other(message),
    }
}
