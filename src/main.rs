use anyhow::{Context, Result};
use clap::Parser;
use ptyshot::{Config, Engine, Manifest, SessionResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "ptyshot",
    about = "Drive a terminal program through a PTY and capture its screen as PNG",
    version
)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory, overrides the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write manifest.json next to the screenshots
    #[arg(short, long)]
    manifest: bool,

    /// Only run the named session (repeatable)
    #[arg(short, long = "session", value_name = "NAME")]
    sessions: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let results = Engine::new(config.engine_settings())
        .run_all(&config.sessions)
        .await;

    if config.manifest {
        let manifest = Manifest::new(&config, &results, chrono::Utc::now());
        match manifest.write(&config.output) {
            Ok(path) => info!("wrote {}", path.display()),
            Err(e) => error!("{e:#}"),
        }
    }

    print_summary(&results);
    if results.iter().all(SessionResult::is_success) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Load the config, apply CLI overrides and prepare the output directory.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(&args.config)?;
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    config.manifest |= args.manifest;

    if !args.sessions.is_empty() {
        for name in &args.sessions {
            anyhow::ensure!(
                config.sessions.iter().any(|s| &s.name == name),
                "Unknown session: {name}"
            );
        }
        config.sessions.retain(|s| args.sessions.contains(&s.name));
    }

    std::fs::create_dir_all(&config.output).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output.display()
        )
    })?;
    Ok(config)
}

fn print_summary(results: &[SessionResult]) {
    let failed = results.iter().filter(|r| !r.is_success()).count();
    let screenshots: usize = results.iter().map(|r| r.screenshots.len()).sum();
    println!(
        "{} session(s), {} screenshot(s), {} failed",
        results.len(),
        screenshots,
        failed
    );
    for result in results {
        match &result.error {
            None => println!("  ok    {}", result.name),
            Some(e) => println!("  FAIL  {} ({}): {e}", result.name, e.kind()),
        }
    }
}
