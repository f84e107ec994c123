//! Result and error types for Repasar.

use thiserror::Error;

/// Result type for Repasar operations
pub type RepasarResult<T> = Result<T, RepasarError>;

/// Errors that can occur while driving the walkthrough
#[derive(Debug, Error)]
pub enum RepasarError {
    /// Browser launch error (unrecoverable, aborts the run)
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error (unrecoverable when it hits the initial URL)
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A readiness poll expired before its condition held
    #[error("Timed out after {ms}ms waiting for {waiting_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waiting_for: String,
    },

    /// In-page script evaluation error
    #[error("Script evaluation failed: {message}")]
    Evaluation {
        /// Error message
        message: String,
    },

    /// Screenshot capture error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepasarError {
    /// Whether the error should abort the whole run rather than a single step
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::BrowserLaunch { .. } | Self::Navigation { .. })
    }
}
