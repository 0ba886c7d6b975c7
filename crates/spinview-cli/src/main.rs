use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spinview_core::SpinConfig;
use spinview_tui::event::EventHandler;
use spinview_tui::{App, SpinSetup};

#[derive(Parser)]
#[command(name = "spinview")]
#[command(author, version, about = "Interactive 360° spin image viewer for the terminal")]
struct Cli {
    /// Frame locator template (URL or path); $FRAME is replaced with
    /// the 1-based frame number
    template: String,

    /// Total number of frames in the rotation
    #[arg(short, long)]
    frames: usize,

    /// Fetch the reduced frame set instead of every frame
    #[arg(long)]
    reduced: bool,

    /// Override the reduced-mode frame stride
    #[arg(long)]
    step: Option<u32>,

    /// Re-arm auto-rotation after a release without momentum
    #[arg(long)]
    resume: bool,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stderr keeps the alternate screen clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration, then apply flag overrides
    let mut config = SpinConfig::load()?;
    if let Some(step) = cli.step {
        config.reduced_step_size = step;
    }
    if cli.resume {
        config.resume_auto_rotate = true;
    }

    let setup = SpinSetup {
        template: cli.template,
        frame_count: cli.frames,
        smooth: !cli.reduced,
        config,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetTitle("Spinview")
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(setup, cli.tick_ms, &mut terminal).await;

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

async fn run(
    setup: SpinSetup,
    tick_ms: u64,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let viewport_width = terminal.size()?.width;
    let mut app = App::new(setup, viewport_width).await?;
    let events = EventHandler::new(tick_ms);
    app.run(terminal, &events)
}
