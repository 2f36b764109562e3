//! Sessions, prompts and the results produced by running them.

use crate::error::SessionError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Timeout for `wait_until` when the prompt does not set one.
pub const DEFAULT_WAIT_UNTIL_TIMEOUT: Duration = Duration::from_millis(30_000);

/// One scripted run of the target program.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Session {
    pub name: String,
    pub description: String,
    pub cwd: Option<PathBuf>,
    /// Shell commands run with `sh -c` before the program starts.
    pub setup: Vec<String>,
    /// Overrides the configured target command for this session.
    pub command: Option<Vec<String>>,
    pub prompts: Vec<Prompt>,
}

impl Session {
    /// File stem for the capture of prompt `index` (0-based).
    pub fn capture_name(&self, index: usize) -> String {
        if let Some(name) = self.prompts.get(index).and_then(|p| p.capture_name.as_deref()) {
            return name.to_string();
        }
        if self.prompts.len() == 1 {
            self.name.clone()
        } else {
            format!("{}-{}", self.name, index + 1)
        }
    }
}

/// One scripted step: optional wait, optional input, optional capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Prompt {
    /// Literal text sent as-is, no newline is appended.
    pub input: Option<String>,
    /// Symbolic key name, see [`crate::keys::key_to_bytes`].
    pub key: Option<String>,
    /// Fixed wait in milliseconds.
    pub wait: Option<u64>,
    /// Text to wait for on screen; takes precedence over `wait`.
    pub wait_until: Option<String>,
    /// Timeout for `wait_until` in milliseconds.
    pub timeout: Option<u64>,
    pub capture: bool,
    pub capture_name: Option<String>,
}

impl Prompt {
    /// The fixed wait, ignored when `wait_until` is set.
    pub fn fixed_wait(&self) -> Option<Duration> {
        if self.wait_until.is_some() {
            return None;
        }
        self.wait.filter(|&ms| ms > 0).map(Duration::from_millis)
    }

    pub fn wait_until_timeout(&self) -> Duration {
        self.timeout
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_WAIT_UNTIL_TIMEOUT)
    }
}

/// A captured screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub name: String,
    pub filename: String,
    pub prompt: Option<String>,
    pub wait: Option<Duration>,
}

/// Outcome of one session.
#[derive(Debug)]
pub struct SessionResult {
    pub name: String,
    pub description: String,
    pub cwd: Option<PathBuf>,
    pub screenshots: Vec<Screenshot>,
    pub error: Option<SessionError>,
}

impl SessionResult {
    pub fn new(session: &Session) -> Self {
        Self {
            name: session.name.clone(),
            description: session.description.clone(),
            cwd: session.cwd.clone(),
            screenshots: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
