//! [`WaitUntil`] action: blocks until text appears on the screen.

use crate::command::{Action, Context};
use crate::error::SessionError;
use async_trait::async_trait;
use std::time::Duration;

/// Blocks until `pattern` is visible on the rendered screen, or until
/// `timeout` elapses.
///
/// The screen is state rather than a stream, so a pattern that is already
/// visible matches immediately, including one matched by an earlier prompt.
pub struct WaitUntil {
    pub pattern: String,
    pub timeout: Duration,
}

impl WaitUntil {
    pub const NAME: &'static str = "wait_until";

    pub fn new(pattern: impl Into<String>, timeout: Duration) -> Self {
        Self {
            pattern: pattern.into(),
            timeout,
        }
    }
}

#[async_trait(?Send)]
impl Action for WaitUntil {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<(), SessionError> {
        ctx.wait_for_pattern(&self.pattern, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing;

    #[tokio::test]
    async fn test_matches_visible_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = testing::renderer();
        let mut ctx = testing::context(&mut renderer, dir.path());
        ctx.screen().write(b"$ ready\r\n");
        WaitUntil::new("ready", Duration::from_secs(1))
            .execute(&mut ctx)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_timeout_reports_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = testing::renderer();
        let mut ctx = testing::context(&mut renderer, dir.path());
        let err = WaitUntil::new("missing", Duration::from_millis(100))
            .execute(&mut ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "wait_timeout");
        assert!(err.to_string().contains("missing"), "got: {err}");
    }

    #[tokio::test]
    async fn test_pattern_split_across_lines_does_not_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = testing::renderer();
        let mut ctx = testing::context(&mut renderer, dir.path());
        ctx.screen().write(b"rea\r\ndy");
        assert!(
            WaitUntil::new("ready", Duration::from_millis(50))
                .execute(&mut ctx)
                .await
                .is_err()
        );
    }
}
