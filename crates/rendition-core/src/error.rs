//! Error metadata shared by the storage and uploader error types.
//!
//! Each crate owns its own `thiserror` enum; this module only describes how an
//! error should be presented and logged by whoever surfaces it.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like unknown version lookups
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNKNOWN_VERSION")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Client-facing message; defaults to the display form of the error.
    fn client_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        self.to_string()
    }
}
