//! # ptyshot
//!
//! Scripted screenshots of interactive terminal programs.
//!
//! ptyshot starts a program inside a pseudo-terminal, drives it with a short
//! script of waits, text input and key presses, and renders the emulated
//! screen to PNG whenever a step asks for a capture. Colors, bold, italic
//! and underline survive into the image, so the result looks like the real
//! terminal rather than a text dump.
//!
//! ## Quick start
//!
//! ```no_run
//! use ptyshot::{Config, Engine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::parse(
//!         r#"
//! command = ["sh"]
//!
//! [[sessions]]
//! name = "listing"
//!
//! [[sessions.prompts]]
//! input = "ls --color=always"
//! key = "enter"
//! wait = 500
//! capture = true
//! "#,
//!     )?;
//!
//!     let mut engine = Engine::new(config.engine_settings());
//!     for result in engine.run_all(&config.sessions).await {
//!         println!("{}: {} screenshot(s)", result.name, result.screenshots.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Prompt steps
//!
//! | Field | Description |
//! |-------|-------------|
//! | `wait = 500` | Pause for 500 ms |
//! | `wait_until = "$ "` | Wait until the text is visible on screen |
//! | `timeout = 2000` | Deadline for `wait_until` (default 30 s) |
//! | `input = "ls"` | Send literal text, no newline appended |
//! | `key = "enter"` | Send a named key (`ctrl+c`, `up`, `tab`, ...) |
//! | `capture = true` | Render the screen to `<output>/<name>.png` |
//! | `capture_name = "menu"` | Override the file stem of the capture |
//!
//! By default a prompt waits before it sends; set `order = "send-then-wait"`
//! to flip that for the whole run.
//!
//! ## Implementing a custom action
//!
//! Each prompt compiles into a list of [`Action`]s run against a shared
//! [`Context`]:
//!
//! ```no_run
//! use ptyshot::command::{Action, Context};
//! use ptyshot::error::SessionError;
//! use async_trait::async_trait;
//!
//! pub struct Bell;
//!
//! #[async_trait(?Send)]
//! impl Action for Bell {
//!     fn name(&self) -> &'static str { "bell" }
//!
//!     async fn execute(&self, ctx: &mut Context<'_>) -> Result<(), SessionError> {
//!         ctx.write_to_pty(b"\x07")
//!     }
//! }
//! ```

pub mod color;
pub mod command;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod manifest;
pub mod render;
pub mod screen;
pub mod session;
pub mod snapshot;
pub mod style;
pub mod text_screen;
pub mod vterm;
pub mod pty;
pub(crate) mod pty_reader;

pub use command::{Action, Context};
pub use commands::{Capture, KeyPress, SendInput, Wait, WaitUntil};
pub use config::{Config, Emulation, StepOrder, Theme};
pub use engine::{Engine, EngineSettings};
pub use error::{RenderError, SessionError};
pub use manifest::Manifest;
pub use pty::{ShutdownPolicy, TerminalSize};
pub use render::Renderer;
pub use screen::{ScreenBuffer, ScreenSource, SharedScreen};
pub use session::{Prompt, Screenshot, Session, SessionResult};
