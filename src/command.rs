//! The [`Action`] trait and the [`Context`] type actions receive when executed.

use crate::error::SessionError;
use crate::pty::PtySession;
use crate::render::Renderer;
use crate::screen::SharedScreen;
use crate::session::Screenshot;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Interval between screen checks while waiting for a pattern.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Execution context passed to [`Action::execute`].
///
/// Provides access to the PTY stdin, the live screen, the renderer and the
/// screenshots captured so far in the session.
pub struct Context<'a> {
    pub(crate) pty: PtySession,
    pub(crate) screen: SharedScreen,
    pub(crate) renderer: &'a mut Renderer,
    pub(crate) output_dir: PathBuf,
    pub(crate) screenshots: Vec<Screenshot>,
}

impl Context<'_> {
    /// Write raw bytes to the program's stdin.
    pub fn write_to_pty(&mut self, data: &[u8]) -> Result<(), SessionError> {
        self.pty.write(data)
    }

    pub fn screen(&self) -> &SharedScreen {
        &self.screen
    }

    /// Block until `pattern` is visible on the screen, or until `timeout`
    /// elapses.
    pub async fn wait_for_pattern(
        &self,
        pattern: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.screen.contains(pattern) {
                return Ok(());
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(SessionError::WaitTimeout {
                    pattern: pattern.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Snapshot the screen, render it to `<output_dir>/<name>.png` and record
    /// the screenshot.
    pub fn capture(
        &mut self,
        name: &str,
        prompt: Option<String>,
        wait: Option<Duration>,
    ) -> Result<(), SessionError> {
        let filename = format!("{name}.png");
        let path = self.output_dir.join(&filename);
        let buffer = self.screen.snapshot();
        self.renderer
            .render_to_file(&buffer, &path)
            .map_err(|source| SessionError::RenderFailed {
                path: path.clone(),
                source,
            })?;

        info!("captured {}", path.display());
        self.screenshots.push(Screenshot {
            name: name.to_string(),
            filename,
            prompt,
            wait,
        });
        Ok(())
    }
}

/// A single step of a prompt.
///
/// Prompts are compiled into a list of actions by
/// [`crate::commands::actions_for`] and executed in order against one
/// [`Context`]. Implement this trait to add a new kind of step.
#[async_trait(?Send)]
pub trait Action {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Execute the action using the provided engine context.
    async fn execute(&self, ctx: &mut Context<'_>) -> Result<(), SessionError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::config::Theme;
    use crate::pty::TerminalSize;
    use crate::vterm::VirtualTerminal;
    use std::path::Path;

    pub fn renderer() -> Renderer {
        Renderer::new(&Theme {
            font: Some("builtin".to_string()),
            ..Theme::default()
        })
    }

    /// A context around `cat`, with a screen the test feeds directly.
    pub fn context<'a>(renderer: &'a mut Renderer, output_dir: &Path) -> Context<'a> {
        let size = TerminalSize { cols: 40, rows: 5 };
        let (pty, _reader) = PtySession::spawn(&["cat".to_string()], None, size).unwrap();
        let scheme = Theme::default().color_scheme();
        Context {
            pty,
            screen: SharedScreen::new(VirtualTerminal::new(size.cols, size.rows, scheme)),
            renderer,
            output_dir: output_dir.to_path_buf(),
            screenshots: Vec::new(),
        }
    }
}
