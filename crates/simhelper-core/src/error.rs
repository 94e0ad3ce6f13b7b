//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // External Process Errors
    // ─────────────────────────────────────────────────────────────
    /// The program could not be found or started.
    #[error("Failed to start '{program}': {reason}")]
    ProcessSpawn { program: String, reason: String },

    /// The program ran but wrote nothing usable to stdout.
    #[error("'{command}' produced no output: {stderr}")]
    EmptyOutput { command: String, stderr: String },

    /// Output was present but did not have the expected shape.
    ///
    /// `raw` keeps the offending input for diagnostics.
    #[error("Failed to parse {message}")]
    Parse { message: String, raw: String },

    // ─────────────────────────────────────────────────────────────
    // Registry Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No simulator with UDID '{udid}'")]
    DeviceNotFound { udid: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn process_spawn(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            program: program.into(),
            reason: reason.into(),
        }
    }

    pub fn empty_output(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::EmptyOutput {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn device_not_found(udid: impl Into<String>) -> Self {
        Self::DeviceNotFound { udid: udid.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
