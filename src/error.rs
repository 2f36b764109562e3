//! Error types for session execution and rendering.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a session stopped early. Each variant is fatal to its session only.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("setup command failed: {command}: {reason}")]
    SetupFailed { command: String, reason: String },

    #[error("failed to start '{command}' in a PTY: {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("failed to send input: {0}")]
    SendFailed(#[source] std::io::Error),

    #[error("timeout after {timeout:?} waiting for '{pattern}'")]
    WaitTimeout { pattern: String, timeout: Duration },

    #[error("failed to render {path}: {source}")]
    RenderFailed {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
}

impl SessionError {
    /// Short machine-friendly name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::SetupFailed { .. } => "setup_failed",
            SessionError::SpawnFailed { .. } => "spawn_failed",
            SessionError::SendFailed(_) => "send_failed",
            SessionError::WaitTimeout { .. } => "wait_timeout",
            SessionError::RenderFailed { .. } => "render_failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SessionError::WaitTimeout {
            pattern: "READY".to_string(),
            timeout: Duration::from_millis(200),
        };
        assert_eq!(err.to_string(), "timeout after 200ms waiting for 'READY'");
        assert_eq!(err.kind(), "wait_timeout");

        let err = SessionError::SetupFailed {
            command: "false".to_string(),
            reason: "exit status: 1".to_string(),
        };
        assert!(err.to_string().contains("false"));
    }
}
