use thiserror::Error;

/// Type alias for Result with SummarizeError
pub type Result<T> = std::result::Result<T, SummarizeError>;

/// Error types for the Gmail summarization workflow
#[derive(Error, Debug)]
pub enum SummarizeError {
    /// Gmail API returned an error
    #[error("Gmail API error: {0}")]
    ApiError(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Network-related error (connection issues, timeouts, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server returned 5xx error
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Resource not found (404)
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Invalid message format or parsing error
    #[error("Invalid message format: {0}")]
    InvalidMessageFormat(String),

    /// Label-related errors
    #[error("Label error: {0}")]
    LabelError(String),

    /// Summarization endpoint errors
    #[error("Summarization error: {0}")]
    SummarizerError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<google_gmail1::Error> for SummarizeError {
    fn from(error: google_gmail1::Error) -> Self {
        match error {
            // HTTP response with status code (non-success responses)
            google_gmail1::Error::Failure(ref response) => {
                let status = response.status();
                let status_code = status.as_u16();
                let message = format!(
                    "HTTP {}: {}",
                    status_code,
                    status.canonical_reason().unwrap_or("Unknown")
                );

                match status_code {
                    429 => SummarizeError::RateLimited(message),
                    404 => SummarizeError::MessageNotFound("Resource not found".to_string()),
                    400 => SummarizeError::BadRequest(message),
                    403 => SummarizeError::Forbidden(message),
                    500..=599 => SummarizeError::ServerError {
                        status: status_code,
                        message,
                    },
                    _ => SummarizeError::ApiError(message),
                }
            }
            // BadRequest variant (request not understood by server)
            google_gmail1::Error::BadRequest(ref err) => {
                SummarizeError::BadRequest(format!("{}", err))
            }
            // Network/connection errors
            google_gmail1::Error::HttpError(ref err) => {
                SummarizeError::NetworkError(format!("Connection error: {}", err))
            }
            google_gmail1::Error::Io(err) => SummarizeError::NetworkError(err.to_string()),
            // All other errors
            _ => SummarizeError::ApiError(error.to_string()),
        }
    }
}

impl From<async_openai::error::OpenAIError> for SummarizeError {
    fn from(error: async_openai::error::OpenAIError) -> Self {
        SummarizeError::SummarizerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SummarizeError::RateLimited("HTTP 429: Too Many Requests".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Rate limit exceeded"));

        let auth_error = SummarizeError::AuthError("Invalid token".to_string());
        let display = format!("{}", auth_error);
        assert!(display.contains("Authentication failed"));

        let server_error = SummarizeError::ServerError {
            status: 503,
            message: "Service unavailable".to_string(),
        };
        let display = format!("{}", server_error);
        assert!(display.contains("503"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: SummarizeError = io_error.into();
        assert!(matches!(error, SummarizeError::IoError(_)));
    }
}
