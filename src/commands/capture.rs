//! [`Capture`] action: renders the current screen to a PNG.

use crate::command::{Action, Context};
use crate::error::SessionError;
use async_trait::async_trait;
use std::time::Duration;

/// Snapshots the screen and writes `<output_dir>/<name>.png`.
pub struct Capture {
    pub name: String,
    /// Input of the prompt that produced the capture, recorded in the manifest.
    pub prompt: Option<String>,
    pub wait: Option<Duration>,
}

impl Capture {
    pub const NAME: &'static str = "capture";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: None,
            wait: None,
        }
    }
}

#[async_trait(?Send)]
impl Action for Capture {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<(), SessionError> {
        ctx.capture(&self.name, self.prompt.clone(), self.wait)
    }
}
