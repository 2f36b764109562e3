//! [`KeyPress`] action: sends the byte sequence for a named key.

use crate::command::{Action, Context};
use crate::error::SessionError;
use crate::keys::key_to_bytes;
use async_trait::async_trait;
use tracing::debug;

/// Sends a symbolic key such as `enter`, `ctrl+c` or `up`.
pub struct KeyPress {
    pub key: String,
    pub data: Vec<u8>,
}

impl KeyPress {
    pub const NAME: &'static str = "key";

    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let data = key_to_bytes(&key);
        Self { key, data }
    }
}

#[async_trait(?Send)]
impl Action for KeyPress {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<(), SessionError> {
        debug!(key = %self.key, "pressing key");
        ctx.write_to_pty(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(KeyPress::new("enter").data, b"\r");
        assert_eq!(KeyPress::new("ctrl+c").data, [0x03]);
        assert_eq!(KeyPress::new("up").data, b"\x1b[A");
    }

    #[test]
    fn test_unknown_key_sent_literally() {
        assert_eq!(KeyPress::new("Hello").data, b"Hello");
    }
}
