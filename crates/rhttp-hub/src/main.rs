mod app;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use rhttp_client::HttpTool;
use rhttp_core::config::{self, Config, DEFAULT_CONFIG};

/// Interactive terminal HTTP client.
#[derive(Debug, Parser)]
#[command(name = "rhttp", version, about)]
struct Cli {
    /// Extra configuration file, merged over the defaults and the user file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write logs. Defaults to the platform data directory.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the default configuration and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.print_config {
        print!("{DEFAULT_CONFIG}");
        return Ok(());
    }

    let log_path = cli.log_file.or_else(config::default_log_path);
    if let Some(path) = &log_path {
        init_logging(path)?;
    }

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let tool = HttpTool::new(config).context("invalid key bindings")?;
    tracing::info!("starting rhttp");

    // Setup terminal
    install_panic_hook();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = app::run(&mut terminal, tool);

    // Restore terminal
    restore_terminal().context("failed to restore terminal")?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("{err:?}");
    }
    result
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("RHTTP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}
