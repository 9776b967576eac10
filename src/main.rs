use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shmwatch::data::duration::parse_duration;
use shmwatch::{events, ui, App, Fetcher, FileFetcher, HttpFetcher, Settings};

/// Longest the loop waits for input before pumping the dashboard.
const EVENT_POLL_MAX: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "shmwatch")]
#[command(about = "Live terminal dashboard for structural health monitoring sensors")]
struct Args {
    /// Path to a TOML config file (default: shmwatch.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the sensor backend
    #[arg(long, conflicts_with = "file")]
    endpoint: Option<String>,

    /// Read readings from a JSON file instead of the backend
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Poll cadence (e.g., "2s", "500ms")
    #[arg(short, long, value_parser = parse_duration)]
    poll_interval: Option<Duration>,

    /// How long an alert banner stays up (e.g., "10s")
    #[arg(long, value_parser = parse_duration)]
    alert_duration: Option<Duration>,

    /// Per-request HTTP timeout (e.g., "5s")
    #[arg(long, value_parser = parse_duration)]
    timeout: Option<Duration>,

    /// File that receives log output
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch one reading, print it as JSON and exit
    #[arg(long)]
    probe: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded settings.
    fn apply(self, settings: &mut Settings) {
        if let Some(endpoint) = self.endpoint {
            settings.endpoint = endpoint;
            settings.file = None;
        }
        if let Some(file) = self.file {
            settings.file = Some(file);
        }
        if let Some(interval) = self.poll_interval {
            settings.poll_interval = interval;
        }
        if let Some(duration) = self.alert_duration {
            settings.alert_duration = duration;
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout = timeout;
        }
        if let Some(log_file) = self.log_file {
            settings.log_file = log_file;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let probe = args.probe;

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    init_logging(&settings)?;
    info!(?settings, "starting shmwatch");

    // Async runtime for fetches; the TUI stays on the main thread
    let rt = Runtime::new()?;
    let _guard = rt.enter();
    let fetcher = build_fetcher(&settings)?;

    if probe {
        return run_probe(&rt, fetcher.as_ref());
    }

    let app = App::new(fetcher, settings.dashboard_config(), rt.handle().clone());
    run_tui(app)
}

/// Send tracing output to the log file; the terminal belongs to the TUI.
fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("Failed to open log file {}", settings.log_file.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.log_level)
            .with_context(|| format!("Invalid log level: {}", settings.log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_fetcher(settings: &Settings) -> Result<Arc<dyn Fetcher>> {
    match &settings.file {
        Some(path) => Ok(Arc::new(FileFetcher::new(path))),
        None => {
            let fetcher = HttpFetcher::with_timeout(&settings.endpoint, settings.request_timeout)
                .with_context(|| format!("Invalid endpoint: {}", settings.endpoint))?;
            Ok(Arc::new(fetcher))
        }
    }
}

/// One-shot fetch for scripts and health checks.
fn run_probe(rt: &Runtime, fetcher: &dyn Fetcher) -> Result<()> {
    let reading = rt
        .block_on(fetcher.fetch())
        .with_context(|| format!("Probe of {} failed", fetcher.description()))?;
    println!("{}", serde_json::to_string_pretty(&reading)?);
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableFocusChange);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);
    if let Err(e) = &result {
        error!(error = %e, "dashboard loop failed");
    }
    app.quit();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableFocusChange)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    app.start();

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Block until input or the next timed dashboard event, whichever is first
        if let Some(event) = events::poll_event(app.poll_timeout(EVENT_POLL_MAX))? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    events::handle_key_event(app, key)
                }
                Event::FocusGained => events::handle_focus(app, true),
                Event::FocusLost => events::handle_focus(app, false),
                // Terminal will redraw on next iteration
                _ => {}
            }
        }

        app.pump();
    }

    Ok(())
}
