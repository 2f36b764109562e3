use crate::error::SessionError;
use portable_pty::{Child, ChildKiller, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

/// Two-phase shutdown: interrupt twice, then wait with a deadline before
/// killing the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownPolicy {
    /// Pause between the first and the second interrupt.
    pub interrupt_grace: Duration,
    /// How long to wait for exit after the second interrupt.
    pub exit_deadline: Duration,
}

impl Default for ShutdownPolicy {
    fn default() -> Self {
        Self {
            interrupt_grace: Duration::from_millis(500),
            exit_deadline: Duration::from_secs(5),
        }
    }
}

/// Manages a program running inside a PTY
pub struct PtySession {
    // Held so the PTY stays open for the lifetime of the session.
    _master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
}

impl PtySession {
    /// Spawn `command` in a PTY of `size`, returning the session and reader separately.
    ///
    /// `TERM` is set to `xterm-256color` so programs emit colors.
    pub fn spawn(
        command: &[String],
        cwd: Option<&Path>,
        size: TerminalSize,
    ) -> Result<(Self, Box<dyn Read + Send>), SessionError> {
        let display = command.join(" ");
        let failed = |reason: String| SessionError::SpawnFailed {
            command: display.clone(),
            reason,
        };

        let (program, args) = command
            .split_first()
            .ok_or_else(|| failed("empty command".to_string()))?;

        let pty_system = portable_pty::native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: size.rows,
                cols: size.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| failed(format!("failed to open PTY: {e}")))?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        cmd.env("TERM", "xterm-256color");
        if let Some(cwd) = cwd {
            cmd.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| failed(e.to_string()))?;
        // Only the child keeps the slave side open, so the reader sees EOF
        // once it exits.
        drop(pair.slave);

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| failed(format!("failed to get PTY writer: {e}")))?;
        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| failed(format!("failed to get PTY reader: {e}")))?;

        let session = PtySession {
            _master: pair.master,
            child,
            writer,
        };

        Ok((session, reader))
    }

    /// Write data to the program's stdin
    pub fn write(&mut self, data: &[u8]) -> Result<(), SessionError> {
        self.writer
            .write_all(data)
            .and_then(|_| self.writer.flush())
            .map_err(SessionError::SendFailed)
    }

    /// Check if the child process is still running
    pub fn is_running(&mut self) -> bool {
        self.child.try_wait().ok().flatten().is_none()
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.process_id()
    }

    /// Kill the child and reap it.
    pub fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill()?;
        self.child.wait()?;
        Ok(())
    }
}
