mod app;
mod browse;
mod cache;
mod catalog;
mod commands;
mod config;
mod event;
mod query;
mod ui;

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jbs")]
#[command(about = "Browse the Jelly Belly flavor catalog from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./jbs.yaml, then $XDG_CONFIG_HOME/jbs/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Initial sort: name, name-desc, flavorGroup, flavorGroup-desc, sugarFree, sugarFree-desc
  #[arg(short, long)]
  sort: Option<String>,

  /// Only show beans with a flavor group containing this text
  #[arg(short, long)]
  filter: Option<String>,

  /// Beans loaded per scroll step
  #[arg(long)]
  page_size: Option<usize>,

  /// Always fetch from the catalog service, skipping the local cache
  #[arg(long)]
  no_cache: bool,
}

/// Log to a file; the terminal belongs to the TUI.
///
/// Filter comes from `JBS_LOG`, e.g. `JBS_LOG=jbs=debug`.
fn init_logging() -> Result<WorkerGuard> {
  let log_dir = dirs::data_dir()
    .unwrap_or_else(std::env::temp_dir)
    .join("jbs");
  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let appender = tracing_appender::rolling::never(&log_dir, "jbs.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_env("JBS_LOG").unwrap_or_else(|_| EnvFilter::new("jbs=info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Flushes buffered log lines on drop
  let _guard = init_logging()?;

  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line wins over the config file
  if let Some(sort) = args.sort {
    if catalog::SortKey::parse(&sort).is_none() {
      warn!(sort = %sort, "unknown sort key, keeping service order");
    }
    config.browse.default_sort = sort;
  }
  if let Some(page_size) = args.page_size {
    config.browse.page_size = page_size;
  }
  if args.no_cache {
    config.cache.enabled = false;
  }
  config.validate()?;

  let mut app = app::App::new(config, args.filter.unwrap_or_default())?;
  app.run().await?;

  Ok(())
}
