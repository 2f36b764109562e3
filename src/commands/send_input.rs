//! [`SendInput`] action: writes literal text to the program's stdin.

use crate::command::{Action, Context};
use crate::error::SessionError;
use async_trait::async_trait;
use tracing::debug;

/// Sends bytes to the program's stdin as-is.
///
/// No newline is appended; pair it with a `KeyPress` of `enter` to submit a
/// line.
pub struct SendInput {
    pub data: Vec<u8>,
}

impl SendInput {
    pub const NAME: &'static str = "send";

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            data: text.into().into_bytes(),
        }
    }
}

#[async_trait(?Send)]
impl Action for SendInput {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<(), SessionError> {
        debug!(bytes = self.data.len(), "sending input");
        ctx.write_to_pty(&self.data)
    }
}
