use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{cursor, execute, terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use terminal_racer::cli::Cli;
use terminal_racer::input::{AiInput, InputSource, KeyboardInput};
use terminal_racer::render::TerminalRenderer;
use terminal_racer::{GameConfig, GameEngine};

/// How often the main task checks for a quit key
const QUIT_POLL_MS: u64 = 50;
/// How long the game-over screen stays up before the terminal is restored
const GAME_OVER_HOLD_MS: u64 = 2000;

/// Alternate screen for the lifetime of the game, raw mode when reading keys
struct TerminalGuard {
    out: Stdout,
    raw: bool,
}

impl TerminalGuard {
    fn enter(raw: bool) -> io::Result<Self> {
        if raw {
            terminal::enable_raw_mode()?;
        }
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        Ok(Self { out, raw })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

async fn quit_requested(keyboard: Option<Arc<KeyboardInput>>) {
    let Some(keyboard) = keyboard else {
        return std::future::pending::<()>().await;
    };
    let mut poll = tokio::time::interval(Duration::from_millis(QUIT_POLL_MS));
    loop {
        poll.tick().await;
        if keyboard.quit_requested() {
            return;
        }
    }
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr, frames to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    info!("Terminal Racer v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.apply(GameConfig::load_or_default());
    config.validate()?;
    info!(
        "Configuration loaded: {}x{} track, {}ms tick, {}s session",
        config.track_width,
        config.track_height,
        config.tick_interval.as_millis(),
        config.game_duration.as_secs()
    );

    let keyboard = (!cli.ai).then(|| Arc::new(KeyboardInput::new()));
    let input: Arc<dyn InputSource> = match &keyboard {
        Some(keyboard) => keyboard.clone(),
        None => {
            let ai = AiInput::with_interval(config.ai_decision_interval);
            Arc::new(match config.seed {
                Some(seed) => ai.with_seed(seed),
                None => ai,
            })
        }
    };

    let guard = TerminalGuard::enter(keyboard.is_some())?;

    let renderer = TerminalRenderer::stdout(!cli.no_color);
    let engine = GameEngine::new(config, input, Box::new(renderer));
    engine.start()?;

    let summary = tokio::select! {
        summary = engine.wait() => summary,
        _ = quit_requested(keyboard.clone()) => {
            info!("Quit requested");
            engine.stop().await;
            None
        }
        _ = interrupted() => {
            info!("Interrupted");
            engine.stop().await;
            None
        }
    };

    if summary.is_some() {
        tokio::time::sleep(Duration::from_millis(GAME_OVER_HOLD_MS)).await;
    }
    drop(guard);

    match summary {
        Some(summary) => {
            info!("Session summary: {}", summary.to_json());
            println!("{}", summary.reason);
            println!("Final score: {}", summary.score);
        }
        None => println!("Final score: {}", engine.snapshot().score),
    }

    Ok(())
}
