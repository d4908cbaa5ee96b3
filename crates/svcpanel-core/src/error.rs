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
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    #[error("Failed to restore terminal: {0}")]
    TerminalRestore(String),

    // ─────────────────────────────────────────────────────────────
    // Service Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Service not found: {name}")]
    ServiceNotFound { name: String },

    #[error("Service command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Privilege Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Elevation declined or failed: {reason}")]
    ElevationDeclinedOrFailed { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Log Channel Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Log channel '{channel}' unavailable: {reason}")]
    ChannelUnavailable { channel: String, reason: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn service_not_found(name: impl Into<String>) -> Self {
        Self::ServiceNotFound { name: name.into() }
    }

    pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn elevation(reason: impl Into<String>) -> Self {
        Self::ElevationDeclinedOrFailed {
            reason: reason.into(),
        }
    }

    pub fn channel_unavailable(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ChannelUnavailable {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}
