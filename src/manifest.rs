//! `manifest.json`: a machine-readable index of a run's screenshots.

use crate::config::Config;
use crate::session::SessionResult;
use anyhow::{Context as _, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: String,
    pub terminal: TerminalInfo,
    pub sessions: Vec<SessionEntry>,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct TerminalInfo {
    pub width: u16,
    pub height: u16,
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct SessionEntry {
    pub name: String,
    pub description: String,
    pub cwd: String,
    pub screenshots: Vec<ScreenshotEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScreenshotEntry {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_sessions: usize,
    pub total_screenshots: usize,
    pub success: usize,
    pub failed: usize,
}

impl Manifest {
    pub fn new(config: &Config, results: &[SessionResult], generated_at: DateTime<Utc>) -> Self {
        let mut summary = Summary {
            total_sessions: results.len(),
            ..Summary::default()
        };

        let sessions = results
            .iter()
            .map(|result| {
                summary.total_screenshots += result.screenshots.len();
                if result.is_success() {
                    summary.success += 1;
                } else {
                    summary.failed += 1;
                }
                SessionEntry {
                    name: result.name.clone(),
                    description: result.description.clone(),
                    cwd: result
                        .cwd
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    screenshots: result
                        .screenshots
                        .iter()
                        .map(|shot| ScreenshotEntry {
                            filename: shot.filename.clone(),
                            prompt: shot.prompt.clone(),
                            wait_ms: shot.wait.map(|d| d.as_millis() as u64),
                        })
                        .collect(),
                    error: result.error.as_ref().map(|e| e.to_string()),
                }
            })
            .collect();

        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            terminal: TerminalInfo {
                width: config.terminal.width,
                height: config.terminal.height,
                theme: config.theme.name.clone(),
            },
            sessions,
            summary,
        }
    }

    /// Write the manifest as pretty JSON into `dir`, returning its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        Ok(path)
    }
}
