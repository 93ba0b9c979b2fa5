//! Error types module
//!
//! All failures that can reach an HTTP client are unified under [`AppError`].
//! Each variant self-describes its status code, log level and client-facing
//! message through [`ErrorMetadata`], so handlers never pick status codes ad hoc.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Recoverable issues like a stale review page
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "BAD_REQUEST")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request referred to a resource that changed underneath it.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Template error: {0}")]
    Template(String),
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, LogLevel::Debug),
        AppError::Conflict(_) => (409, "CONFLICT", false, LogLevel::Warn),
        AppError::Template(_) => (500, "TEMPLATE_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Template(_) => "Failed to render page".to_string(),
            AppError::BadRequest(msg) | AppError::Conflict(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_is_hidden() {
        let err = AppError::Template("Variable `photos` not found".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "TEMPLATE_ERROR");
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to render page");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_conflict_metadata() {
        let err = AppError::Conflict("review list changed".to_string());
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");
        assert!(!err.is_sensitive());
        assert_eq!(err.client_message(), "review list changed");
    }

    #[test]
    fn test_bad_request_passes_message_through() {
        let err = AppError::BadRequest("index out of range".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "index out of range");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_detailed_message_without_source() {
        let err = AppError::BadRequest("bad index".to_string());
        assert_eq!(err.detailed_message(), "Bad request: bad index");
    }
}
