use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use rideops_wizard::app::{WizardAction, WizardApp};
use rideops_wizard::config::WizardConfig;
use rideops_wizard::draft::{spawn_save, DraftStore, FileDraftStore, MemoryDraftStore};
use rideops_wizard::error::{AppError, Result};
use rideops_wizard::event::{Event, EventHandler};
use rideops_wizard::prefetch::{spawn_prefetch, DemoPrefetcher, FixturePrefetcher, Prefetcher};
use std::io::stdout;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rideops-wizard")]
#[command(author, version, about = "Vehicle onboarding and booking wizard")]
struct Args {
    /// Path to config file (default: <config dir>/rideops/wizard.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flow to run, e.g. vehicle-onboarding or booking
    #[arg(long)]
    flow: Option<String>,

    /// Use demo prefill data and keep drafts in memory
    #[arg(long)]
    dryrun: bool,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting rideops-wizard");
        }
    }

    // Config and flow errors are reported before the terminal is taken over
    let mut config = match args.config {
        Some(ref path) => WizardConfig::load_from(path)?,
        None => WizardConfig::load()?,
    };
    if args.dryrun {
        config.general.dryrun = true;
    }
    let flow_id = args.flow.clone().unwrap_or_else(|| config.general.default_flow.clone());
    let flow = config.flow(&flow_id)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = WizardApp::new(&config.general.title, flow, config.general.dryrun)?;
    let result = run_wizard(&mut terminal, &mut app, &config).await;
    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Wizard error: {}", e);
    }

    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| AppError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| AppError::Terminal(e.to_string()))
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| AppError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture).map_err(|e| AppError::Terminal(e.to_string()))?;
    Ok(())
}

fn draft_store(config: &WizardConfig) -> Arc<dyn DraftStore> {
    if config.general.dryrun || !config.drafts.enabled {
        return Arc::new(MemoryDraftStore::new());
    }
    let dir = config.drafts.resolved_dir();
    info!("Drafts are written to {:?}", dir);
    Arc::new(FileDraftStore::new(dir))
}

fn prefetcher(config: &WizardConfig) -> Result<Option<Arc<dyn Prefetcher>>> {
    let source: Arc<dyn Prefetcher> = if config.general.dryrun {
        Arc::new(DemoPrefetcher::default())
    } else if let Some(ref path) = config.prefetch.fixtures {
        Arc::new(FixturePrefetcher::load_from(path)?)
    } else {
        return Ok(None);
    };
    Ok(Some(source))
}

async fn run_wizard(terminal: &mut Tui, app: &mut WizardApp, config: &WizardConfig) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    let store = draft_store(config);
    let prefetcher = prefetcher(config)?;

    let (draft_tx, mut draft_rx) = mpsc::unbounded_channel();
    let (prefetch_tx, mut prefetch_rx) = mpsc::unbounded_channel();

    let mut pending = app.start();

    loop {
        match pending.take() {
            Some(WizardAction::SaveDraft(draft)) => spawn_save(store.clone(), draft, draft_tx.clone()),
            Some(WizardAction::Prefetch(ticket)) => match prefetcher {
                Some(ref source) => spawn_prefetch(source.clone(), ticket, prefetch_tx.clone()),
                None => {
                    warn!("Step {} wants prefill data but no source is configured", ticket.step);
                    app.cancel_prefetch();
                }
            },
            None => {}
        }

        terminal
            .draw(|frame| rideops_wizard::app::ui::draw(frame, app))
            .map_err(|e| AppError::Terminal(e.to_string()))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => pending = app.handle_key(key),
                Some(Event::Resize) => {}
                Some(Event::Tick) => app.tick(),
                None => break,
            },
            Some(outcome) = draft_rx.recv() => app.handle_draft_outcome(outcome),
            Some(outcome) = prefetch_rx.recv() => app.handle_prefetch_outcome(outcome),
        }

        if app.should_exit {
            break;
        }
    }

    info!(
        submitted = app.controller.is_submitted(),
        completed = app.controller.completed_count(),
        "Wizard closed"
    );
    Ok(())
}
