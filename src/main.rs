mod app;
mod editor;
mod filter;
mod storage;
mod store;
mod task;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use crate::app::{App, AppEvent};
use crate::filter::Criterion;
use crate::storage::FileStorage;

#[derive(Debug, Parser)]
#[command(name = "tasktrack", version, about = "Terminal task tracker")]
struct Cli {
    /// Directory the task data lives in (defaults to the platform data dir).
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Initial filter: all, todo, inProgress, done, high, medium or low.
    /// Unknown keys show everything.
    #[arg(long, value_name = "KEY")]
    filter: Option<String>,
}

fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tasktrack")
    })
}

/// Logs go to a file: the alternate screen owns the terminal.
fn init_logging(dir: &Path) -> anyhow::Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("tasktrack.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let dir = data_dir(&cli);

    let storage = FileStorage::new(&dir)
        .with_context(|| format!("could not open data directory {}", dir.display()))?;
    init_logging(&dir)?;
    let mut app = App::load(storage);
    if let Some(key) = cli.filter.as_deref() {
        app.apply(AppEvent::SetFilter(Criterion::from_key(key)));
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("terminal event loop failed")?;
    Ok(())
}
