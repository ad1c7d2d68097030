//! Error types for the canvas-mirror application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Remote access errors
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    Api(String),

    // Upstream payload errors (video variants, manifests)
    #[error("Malformed upstream data: {0}")]
    MalformedUpstream(String),

    #[error("Unsupported content: {0}")]
    UnsupportedContent(String),

    // Traversal bookkeeping
    #[error("Context stack corrupted: expected depth {expected}, found {actual}")]
    StackInvariant { expected: usize, actual: usize },

    // Download errors
    #[error("Request failed: HTTP {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Download failed: {0}")]
    Download(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether the remote refused or lacks the resource.
    ///
    /// These are the conditions that scope a failure to the attempted subtree.
    pub fn is_access_error(&self) -> bool {
        matches!(self, Error::AccessDenied(_) | Error::NotFound(_))
    }

    /// Whether this error must abort the whole run instead of one branch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::StackInvariant { .. })
    }

    /// Whether a failed request is worth repeating.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_errors() {
        assert!(Error::AccessDenied("modules".into()).is_access_error());
        assert!(Error::NotFound("front page".into()).is_access_error());
        assert!(!Error::Api("boom".into()).is_access_error());
    }

    #[test]
    fn test_only_stack_corruption_is_fatal() {
        assert!(Error::StackInvariant {
            expected: 1,
            actual: 2
        }
        .is_fatal());
        assert!(!Error::AccessDenied("x".into()).is_fatal());
        assert!(!Error::MalformedUpstream("x".into()).is_fatal());
    }

    #[test]
    fn test_retryable_classification() {
        let status = |code: u16| Error::HttpStatus {
            status: reqwest::StatusCode::from_u16(code).unwrap(),
            url: "https://cdn.example.com/seg-1.ts".into(),
        };
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!status(400).is_retryable());
        // the message text alone no longer decides
        assert!(!Error::Download("upstream said HTTP 503".into()).is_retryable());
        assert!(!Error::AccessDenied("x".into()).is_retryable());
    }
}
