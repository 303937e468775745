//! Wonders - the wheel-of-fortune word game for the terminal
//!
//! Spin the drum, name a letter, guess the word.

mod app;
mod config;
mod game;
mod storage;
mod tui;
mod words;

use anyhow::{Context, Result};
use app::AppCoordinator;
use config::GameConfig;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::path::Path;
use std::time::{Duration, Instant};
use storage::Storage;
use tracing::{info, warn};
use tui::Tui;

const LOG_FILE: &str = "wonders.log";

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let log_file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(anyhow::Error::from_boxed)
        .context("installing log subscriber")
}

fn main() -> Result<()> {
    // Playing without a log is fine; say why before the board takes the screen
    match Storage::data_dir() {
        Ok(dir) => {
            if let Err(e) = init_logging(&dir) {
                eprintln!("wonders: logging disabled: {e:#}");
            }
        }
        Err(e) => eprintln!("wonders: logging disabled: {e}"),
    }
    info!("starting wonders");

    let config = GameConfig::from_env();
    let storage = match Storage::open() {
        Ok(storage) => Some(storage),
        Err(e) => {
            warn!(error = %e, "storage unavailable, settings will not be kept");
            None
        }
    };
    let mut coordinator = AppCoordinator::new(&config, storage);

    let mut terminal = Tui::new().context("opening terminal")?;
    terminal.enter().context("preparing terminal")?;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => coordinator.on_escape(),
                        KeyCode::Enter => coordinator.on_enter(),
                        KeyCode::Backspace => coordinator.on_backspace(),
                        KeyCode::Tab => coordinator.on_tab(),
                        KeyCode::Up => coordinator.on_up(),
                        KeyCode::Down => coordinator.on_down(),
                        KeyCode::Char(c) => coordinator.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            coordinator.tick(Instant::now());
            last_tick = Instant::now();
        }

        if coordinator.take_sound().is_some() {
            terminal.bell()?;
        }

        if coordinator.should_quit {
            break;
        }
    }

    info!("exiting");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_reports_unusable_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let err = init_logging(&blocker.join("logs")).unwrap_err();
        assert!(format!("{err:#}").contains("creating data directory"));
        assert!(!blocker.join("logs").join(LOG_FILE).exists());
    }
}
