//! atleta: interactive management of the military athlete database.
//!
//! Reads `atleta.toml` (or the path given with `--config`), then runs the
//! menu on stdin/stdout. Logs go to `atleta.log` in the configured
//! `log_dir`, never to the console.
//!
//! ```
//! atleta --config /etc/atleta.toml
//! ATLETA_STORE__PATH=/tmp/atleta.db atleta
//! ```

mod config;
mod console;
mod entry;
mod menu;

use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::{config::AppConfig, console::StdConsole};

#[derive(Parser)]
#[command(author, version, about = "Military athlete database manager")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "atleta.toml")]
  config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let config = AppConfig::load(&cli.config)?;

  let _guard = init_logging(&config)?;
  tracing::info!(store = %config.store.path.display(), "session started");

  let mut console = StdConsole::new();
  menu::run(&config, &mut console).await?;

  tracing::info!("session ended");
  Ok(())
}

/// Route tracing output to `<log_dir>/atleta.log`. The returned guard
/// flushes pending lines when dropped.
fn init_logging(config: &AppConfig) -> anyhow::Result<WorkerGuard> {
  fs::create_dir_all(&config.log_dir)
    .with_context(|| format!("failed to create log directory {}", config.log_dir.display()))?;

  let appender = tracing_appender::rolling::never(&config.log_dir, "atleta.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
