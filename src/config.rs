//! TOML configuration: terminal size, theme, target command and sessions.
//!
//! ```toml
//! output = "./screenshots"
//! command = ["htop"]
//!
//! [terminal]
//! width = 100
//! height = 30
//!
//! [theme]
//! background = "#1a1a1a"
//! foreground = "#d4d4d4"
//! font_size = 16.0
//!
//! [[sessions]]
//! name = "overview"
//! cwd = "~/project"
//!
//! [[sessions.prompts]]
//! wait_until = "Load average"
//! capture = true
//! ```
//!
//! Every field has a default, so an empty file is a valid (if useless) config.

use crate::color::{Color, ColorScheme, Palette};
use crate::engine::EngineSettings;
use crate::pty::{ShutdownPolicy, TerminalSize};
use crate::session::Session;
use anyhow::{Context as _, Result, bail, ensure};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: PathBuf,
    pub manifest: bool,
    pub order: StepOrder,
    /// Program and arguments started in the PTY.
    pub command: Vec<String>,
    pub terminal: TerminalConfig,
    pub theme: Theme,
    pub shutdown: ShutdownConfig,
    pub sessions: Vec<Session>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("./screenshots"),
            manifest: false,
            order: StepOrder::default(),
            command: vec!["sh".to_string()],
            terminal: TerminalConfig::default(),
            theme: Theme::default(),
            shutdown: ShutdownConfig::default(),
            sessions: Vec::new(),
        }
    }
}

/// Whether a prompt's wait happens before or after its input is sent.
///
/// Fixed for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepOrder {
    #[default]
    WaitThenSend,
    SendThenWait,
}

/// Which screen model interprets the program output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emulation {
    /// Full cursor-addressed terminal emulation.
    #[default]
    Vt100,
    /// Linear styled text, for programs that only print.
    StyledText,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub width: u16,
    pub height: u16,
    pub emulation: Emulation,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
            emulation: Emulation::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    /// Font file path, or `"builtin"`. Unset means search common locations.
    pub font: Option<String>,
    pub font_size: f32,
    pub padding: u32,
    /// Replacement for the 16 base colors.
    pub palette: Option<Vec<Color>>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color::rgb(0x1a, 0x1a, 0x1a),
            foreground: Color::rgb(0xd4, 0xd4, 0xd4),
            font: None,
            font_size: 14.0,
            padding: 20,
            palette: None,
        }
    }
}

impl Theme {
    pub fn color_scheme(&self) -> ColorScheme {
        let palette = self
            .palette
            .as_deref()
            .and_then(|colors| <[Color; 16]>::try_from(colors).ok())
            .map(Palette)
            .unwrap_or_default();
        ColorScheme::new(palette, self.foreground, self.background)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    pub interrupt_grace_ms: u64,
    pub exit_deadline_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        let policy = ShutdownPolicy::default();
        Self {
            interrupt_grace_ms: policy.interrupt_grace.as_millis() as u64,
            exit_deadline_ms: policy.exit_deadline.as_millis() as u64,
        }
    }
}

impl Config {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate config from a TOML string. `~` in paths is expanded.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.output = expand_home(&config.output);
        for session in &mut config.sessions {
            if let Some(cwd) = &session.cwd {
                session.cwd = Some(expand_home(cwd));
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.terminal.width > 0 && self.terminal.height > 0,
            "terminal width and height must be positive"
        );
        ensure!(!self.command.is_empty(), "command must not be empty");
        if let Some(palette) = &self.theme.palette {
            ensure!(
                palette.len() == 16,
                "theme.palette must have 16 colors, got {}",
                palette.len()
            );
        }

        let mut names = HashSet::new();
        for session in &self.sessions {
            ensure!(!session.name.trim().is_empty(), "session name must not be empty");
            if !names.insert(session.name.as_str()) {
                bail!("duplicate session name: {}", session.name);
            }
            if let Some(command) = &session.command {
                ensure!(
                    !command.is_empty(),
                    "session {}: command must not be empty",
                    session.name
                );
            }
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            command: self.command.clone(),
            size: TerminalSize {
                cols: self.terminal.width,
                rows: self.terminal.height,
            },
            theme: self.theme.clone(),
            output_dir: self.output.clone(),
            order: self.order,
            emulation: self.terminal.emulation,
            shutdown: ShutdownPolicy {
                interrupt_grace: Duration::from_millis(self.shutdown.interrupt_grace_ms),
                exit_deadline: Duration::from_millis(self.shutdown.exit_deadline_ms),
            },
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.output, PathBuf::from("./screenshots"));
        assert_eq!(config.terminal.width, 120);
        assert_eq!(config.terminal.height, 40);
        assert_eq!(config.theme.background, Color::rgb(26, 26, 26));
        assert_eq!(config.theme.font_size, 14.0);
        assert_eq!(config.order, StepOrder::WaitThenSend);
        assert_eq!(config.terminal.emulation, Emulation::Vt100);
        assert_eq!(config.shutdown.exit_deadline_ms, 5000);
        assert!(config.sessions.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r##"
output = "out"
manifest = true
order = "send-then-wait"
command = ["python3", "-q"]

[terminal]
width = 80
height = 24
emulation = "styled-text"

[theme]
name = "light"
background = "#ffffff"
foreground = "#000000"
font = "builtin"
padding = 8

[shutdown]
interrupt_grace_ms = 100
exit_deadline_ms = 1000

[[sessions]]
name = "demo"
description = "first"
setup = ["touch x"]

[[sessions.prompts]]
input = "print(1)"
key = "enter"
wait = 500
capture = true

[[sessions.prompts]]
wait_until = ">>>"
timeout = 2000
capture_name = "prompt"
"##,
        )
        .unwrap();

        assert!(config.manifest);
        assert_eq!(config.order, StepOrder::SendThenWait);
        assert_eq!(config.terminal.emulation, Emulation::StyledText);
        assert_eq!(config.theme.font.as_deref(), Some("builtin"));

        let session = &config.sessions[0];
        assert_eq!(session.setup, vec!["touch x"]);
        assert_eq!(session.prompts.len(), 2);
        assert_eq!(session.prompts[0].input.as_deref(), Some("print(1)"));
        assert_eq!(session.prompts[0].wait, Some(500));
        assert!(session.prompts[0].capture);
        assert_eq!(session.prompts[1].timeout, Some(2000));
        assert!(!session.prompts[1].capture);

        let settings = config.engine_settings();
        assert_eq!(settings.size, TerminalSize { cols: 80, rows: 24 });
        assert_eq!(settings.command, vec!["python3", "-q"]);
        assert_eq!(settings.shutdown.exit_deadline, Duration::from_secs(1));
    }

    #[test]
    fn test_custom_palette() {
        let colors = (0..16)
            .map(|i| format!("\"#0000{i:02x}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let config = Config::parse(&format!("[theme]\npalette = [{colors}]\n")).unwrap();
        let scheme = config.theme.color_scheme();
        assert_eq!(scheme.palette.0[15], Color::rgb(0, 0, 15));
    }

    #[test]
    fn test_rejects_bad_palette_length() {
        let err = Config::parse("[theme]\npalette = [\"#000000\"]\n").unwrap_err();
        assert!(err.to_string().contains("16 colors"), "got: {err}");
    }

    #[test]
    fn test_rejects_invalid_color() {
        assert!(Config::parse("[theme]\nbackground = \"blue\"\n").is_err());
    }

    #[test]
    fn test_rejects_duplicate_sessions() {
        let err = Config::parse("[[sessions]]\nname = \"a\"\n[[sessions]]\nname = \"a\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {err}");
    }

    #[test]
    fn test_rejects_unnamed_session() {
        assert!(Config::parse("[[sessions]]\ndescription = \"x\"\n").is_err());
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(Config::parse("[terminal]\nwidth = 0\n").is_err());
    }

    #[test]
    fn test_expands_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config =
            Config::parse("output = \"~/shots\"\n[[sessions]]\nname = \"a\"\ncwd = \"~/p\"\n")
                .unwrap();
        assert_eq!(config.output, home.join("shots"));
        assert_eq!(config.sessions[0].cwd, Some(home.join("p")));
    }

    #[test]
    fn test_load_reports_path() {
        let err = Config::load("/nonexistent/ptyshot.toml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/ptyshot.toml"));
    }
}
