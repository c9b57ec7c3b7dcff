//! Dice roller TUI application.
//!
//! One die, one roll counter and a background that changes color on every
//! roll.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! cargo run -p roller -- --headless --seed 42 --mute
//! ```
//!
//! Build with `--features playback` to hear the clip on the speakers instead
//! of the terminal bell.

mod app;
mod events;
mod headless;
mod ui;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use roller_core::{Ease, RollPolicy, RollerConfig};
use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Frame budget for the event poll
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// A single die that spins, lands on a random face and repaints the screen.
#[derive(Debug, Parser)]
#[command(name = "dice-roller", version, about)]
struct Cli {
    /// Read commands from stdin instead of drawing a TUI
    #[arg(long)]
    headless: bool,

    /// Sound clip played on every roll
    #[arg(long, value_name = "PATH")]
    sound: Option<PathBuf>,

    /// Disable the roll sound
    #[arg(long)]
    mute: bool,

    /// Seed for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    /// What a roll does while another is still in flight (reject, queue, overlap)
    #[arg(long)]
    policy: Option<RollPolicy>,

    /// Easing curve for the spin
    #[arg(long)]
    ease: Option<Ease>,

    /// Log destination in TUI mode
    #[arg(long, value_name = "PATH", default_value = "dice-roller.log")]
    log_file: PathBuf,
}

impl Cli {
    /// Layer command-line flags over `config`
    fn apply(&self, mut config: RollerConfig) -> RollerConfig {
        if let Some(path) = &self.sound {
            config = config.with_sound_path(path.clone());
        }
        if self.mute {
            config = config.with_muted(true);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(policy) = self.policy {
            config = config.with_policy(policy);
        }
        if let Some(ease) = self.ease {
            config = config.with_ease(ease);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match RollerConfig::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cli.headless {
        tracing_subscriber::fmt()
            .with_max_level(config.log_level)
            .with_writer(io::stderr)
            .init();
        return headless::run_headless(&config).await.map_err(|e| e.into());
    }

    init_file_logging(&cli.log_file, &config)?;
    tracing::info!(policy = %config.policy, muted = config.muted, "starting dice roller");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = App::from_config(&config);
    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// The TUI owns the terminal, so logs go to a file
fn init_file_logging(path: &Path, config: &RollerConfig) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        // Render
        let completed = terminal.draw(|f| render(f, app))?;
        app.set_viewport(completed.area);

        // Handle events with timeout for animations
        if event::poll(POLL_INTERVAL)? {
            let ev = event::read()?;
            match handle_event(app, ev) {
                EventResult::Quit => app.should_quit = true,
                EventResult::Continue | EventResult::NeedsRedraw => {}
            }
        }

        if app.should_quit {
            break;
        }

        // Land due rolls, reap finished sounds
        app.tick();

        // Give spawned sound tasks a turn
        tokio::task::yield_now().await;
    }

    Ok(())
}
