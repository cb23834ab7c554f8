use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridline::{events, ui, App, ChannelSource, Dataset, FileSource, PageSource, TableConfig};

/// Rows generated when no dataset file is given.
const SAMPLE_ROWS: usize = 50;

#[derive(Parser, Debug)]
#[command(name = "gridline")]
#[command(about = "Interactive table with selection, sorting and paging")]
struct Args {
    /// JSON dataset: an array of rows, or an object with a "rows" array.
    /// A generated sample is served when omitted.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML table configuration (columns, page size, selection)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows per page (overrides the configuration)
    #[arg(long)]
    page_limit: Option<u32>,

    /// Simulated page latency of the sample server, in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Write logs to this file (filter with GRIDLINE_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    let mut config = TableConfig::load(args.config.as_deref())?;
    if let Some(page_limit) = args.page_limit {
        config.page_limit = page_limit;
    }
    if let Some(latency_ms) = args.latency_ms {
        config.latency_ms = latency_ms;
    }
    info!(?config, "configuration loaded");

    // The sample server runs on this runtime while the UI loop stays on the
    // main thread.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let source: Box<dyn PageSource> = match &args.file {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(ChannelSource::spawn(
            Dataset::sample(SAMPLE_ROWS),
            Duration::from_millis(config.latency_ms),
            "sample",
        )),
    };

    let mut app = App::new(source, config)?;
    app.theme = ui::Theme::auto_detect();
    run_tui(app)
}

/// Log to `path`; the terminal belongs to the UI.
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let env_filter = EnvFilter::try_from_env("GRIDLINE_LOG")
        .or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();

        // A column that can't be filled is a configuration error, not a
        // rendering glitch.
        let view = app.view().context("table configuration error")?;

        let mut hits = ui::HitMap::new();
        terminal.draw(|frame| {
            hits = ui::render(frame, app, &view);
        })?;
        app.hit_map = hits;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    info!("quitting");
    Ok(())
}
