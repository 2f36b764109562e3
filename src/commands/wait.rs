//! [`Wait`] action: pauses for a fixed duration.

use crate::command::{Action, Context};
use crate::error::SessionError;
use async_trait::async_trait;
use std::time::Duration;

/// Pauses before running the next action.
pub struct Wait {
    pub duration: Duration,
}

impl Wait {
    pub const NAME: &'static str = "wait";

    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait(?Send)]
impl Action for Wait {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, _ctx: &mut Context<'_>) -> Result<(), SessionError> {
        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing;
    use std::time::Instant;

    #[tokio::test]
    async fn test_sleeps_for_duration() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = testing::renderer();
        let mut ctx = testing::context(&mut renderer, dir.path());
        let started = Instant::now();
        Wait::new(Duration::from_millis(120))
            .execute(&mut ctx)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(120));
    }
}
