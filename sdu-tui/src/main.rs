//! SDU TUI: terminal client for the Unified Health Data System.
//!
//! Screens:
//! 1. Dashboard: counters and quick actions
//! 2. Search: exams by patient CPF, download links
//! 3. Upload: exam and diagnosis files
//! 4. CID: offline ICD-10 reference and charts

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sdu_core::{ApiClient, ClientConfig, HttpTransport};
use sdu_tui::app::AppState;
use sdu_tui::worker::{self, WorkerCommand};
use sdu_tui::{input, ui};

#[derive(Parser)]
#[command(name = "sdu-tui", about = "Terminal client for the SDU health data backend")]
struct Args {
    /// Backend base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(ClientConfig::default_path);
    let config = ClientConfig::load(&config_path)?.with_base_url(args.base_url)?;

    // The terminal is ours, so logs go to a file.
    init_logging(&config)?;
    tracing::info!(base_url = %config.base_url, "starting sdu-tui");

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let transport = HttpTransport::new(&config).context("building HTTP client")?;
    let client = ApiClient::new(transport);
    let worker_handle = worker::spawn_worker(client, cmd_rx, resp_tx)?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, config.base_url.clone());
    app.start_session_check();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("sdu-tui exited");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(config: &ClientConfig) -> Result<()> {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sdu");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("sdu-tui.log");
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("parsing log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}
