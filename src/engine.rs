use crate::command::Context;
use crate::commands::actions_for;
use crate::config::{Emulation, StepOrder, Theme};
use crate::error::SessionError;
use crate::pty::{PtySession, ShutdownPolicy, TerminalSize};
use crate::pty_reader::spawn_reader;
use crate::render::Renderer;
use crate::screen::SharedScreen;
use crate::session::{Session, SessionResult};
use crate::text_screen::StyledTextScreen;
use crate::vterm::VirtualTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

const INTERRUPT: &[u8] = b"\x03";
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the engine needs that is shared by all sessions.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Program and arguments, unless a session overrides them.
    pub command: Vec<String>,
    pub size: TerminalSize,
    pub theme: Theme,
    pub output_dir: PathBuf,
    pub order: StepOrder,
    pub emulation: Emulation,
    pub shutdown: ShutdownPolicy,
}

/// Runs sessions: setup, spawn, script, capture, shutdown.
pub struct Engine {
    settings: EngineSettings,
    renderer: Renderer,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        let renderer = Renderer::new(&settings.theme);
        Self { settings, renderer }
    }

    /// Create an engine with a prepared renderer.
    pub fn with_renderer(settings: EngineSettings, renderer: Renderer) -> Self {
        Self { settings, renderer }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run sessions one after another, continuing past failures.
    pub async fn run_all(&mut self, sessions: &[Session]) -> Vec<SessionResult> {
        let mut results = Vec::with_capacity(sessions.len());
        for session in sessions {
            let result = self.run_session(session).await;
            match &result.error {
                None => info!(
                    "session {} done: {} screenshot(s)",
                    result.name,
                    result.screenshots.len()
                ),
                Some(e) => error!("session {} failed: {e}", result.name),
            }
            results.push(result);
        }
        results
    }

    /// Run one session to completion.
    ///
    /// Always returns a result; a failing step stops the script and is
    /// attached to the result together with the screenshots taken so far.
    pub async fn run_session(&mut self, session: &Session) -> SessionResult {
        let mut result = SessionResult::new(session);
        info!("running session {}", session.name);

        if let Err(e) = run_setup(session).await {
            result.error = Some(e);
            return result;
        }

        let command = session.command.as_ref().unwrap_or(&self.settings.command);
        let size = self.settings.size;
        let (pty, reader) = match PtySession::spawn(command, session.cwd.as_deref(), size) {
            Ok(spawned) => spawned,
            Err(e) => {
                result.error = Some(e);
                return result;
            }
        };
        debug!(pid = ?pty.pid(), "spawned {}", command.join(" "));

        let screen = self.new_screen();
        let mut exited = match spawn_reader(reader, screen.clone()) {
            Ok(rx) => rx,
            Err(e) => {
                result.error = Some(SessionError::SpawnFailed {
                    command: command.join(" "),
                    reason: format!("failed to start PTY reader: {e}"),
                });
                return result;
            }
        };

        let mut ctx = Context {
            pty,
            screen,
            renderer: &mut self.renderer,
            output_dir: self.settings.output_dir.clone(),
            screenshots: Vec::new(),
        };

        result.error = run_script(&mut ctx, session, self.settings.order)
            .await
            .err();

        shutdown(&mut ctx.pty, &mut exited, self.settings.shutdown).await;
        result.screenshots = ctx.screenshots;
        result
    }

    fn new_screen(&self) -> SharedScreen {
        let TerminalSize { cols, rows } = self.settings.size;
        let scheme = self.settings.theme.color_scheme();
        match self.settings.emulation {
            Emulation::Vt100 => SharedScreen::new(VirtualTerminal::new(cols, rows, scheme)),
            Emulation::StyledText => SharedScreen::new(StyledTextScreen::new(cols, rows, scheme)),
        }
    }
}

async fn run_setup(session: &Session) -> Result<(), SessionError> {
    for command in &session.setup {
        debug!("setup: {command}");
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(cwd) = &session.cwd {
            cmd.current_dir(cwd);
        }

        let failed = |reason: String| SessionError::SetupFailed {
            command: command.clone(),
            reason,
        };
        let output = cmd.output().await.map_err(|e| failed(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{}: {}", output.status, stderr.trim())));
        }
    }
    Ok(())
}

async fn run_script(
    ctx: &mut Context<'_>,
    session: &Session,
    order: StepOrder,
) -> Result<(), SessionError> {
    for (index, prompt) in session.prompts.iter().enumerate() {
        for action in actions_for(prompt, session.capture_name(index), order) {
            debug!(prompt = index + 1, "{}", action.name());
            action.execute(ctx).await?;
        }
    }
    Ok(())
}

/// Interrupt, interrupt again, then wait for exit and kill on the deadline.
async fn shutdown(pty: &mut PtySession, exited: &mut oneshot::Receiver<()>, policy: ShutdownPolicy) {
    // Write errors are expected here once the program has already gone.
    let _ = pty.write(INTERRUPT);
    sleep(policy.interrupt_grace).await;
    let _ = pty.write(INTERRUPT);

    let deadline = Instant::now() + policy.exit_deadline;
    loop {
        let eof = !matches!(exited.try_recv(), Err(TryRecvError::Empty));
        if eof || !pty.is_running() {
            debug!("program exited");
            return;
        }
        if Instant::now() >= deadline {
            break;
        }
        sleep(EXIT_POLL_INTERVAL).await;
    }

    warn!("program did not exit after interrupt, killing it");
    if let Err(e) = pty.kill() {
        warn!("failed to kill program: {e}");
    }
}
