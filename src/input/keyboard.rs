//! Keyboard input over crossterm events
//!
//! The terminal must already be in raw mode; the binary owns that. Quit keys
//! never reach the tick loop, they raise a flag the binary polls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::game::constants::{keyboard, timing};
use crate::input::{Direction, DirectionSlot, InputSource, StopSignal, Worker};

/// What a key press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Quit,
    Ignore,
}

pub fn map_key(key: &KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Steer(Direction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Steer(Direction::Right),
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Steer(Direction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Steer(Direction::Down),
        _ => KeyAction::Ignore,
    }
}

pub struct KeyboardInput {
    slot: Arc<DirectionSlot>,
    running: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
    worker: Mutex<Option<Worker>>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(DirectionSlot::new()),
            running: Arc::new(AtomicBool::new(false)),
            quit: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Whether a quit key has been pressed since the last initialize
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

fn read_keys(slot: &DirectionSlot, quit: &AtomicBool, stop: &StopSignal) {
    let poll_interval = Duration::from_millis(keyboard::POLL_INTERVAL_MS);

    while !stop.is_stopped() {
        match event::poll(poll_interval) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => match map_key(&key) {
                    KeyAction::Steer(direction) => {
                        debug!("Key {:?} steers {}", key.code, direction);
                        slot.store(Some(direction));
                    }
                    KeyAction::Quit => {
                        debug!("Quit requested");
                        quit.store(true, Ordering::SeqCst);
                    }
                    KeyAction::Ignore => {}
                },
                Ok(_) => {}
                Err(e) => warn!("Failed to read terminal event: {}", e),
            },
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to poll terminal events: {}", e);
                if stop.wait(poll_interval) {
                    break;
                }
            }
        }
    }
}

impl InputSource for KeyboardInput {
    fn initialize(&self) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }

        self.slot.clear();
        self.quit.store(false, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);

        let slot = self.slot.clone();
        let quit = self.quit.clone();
        let running = self.running.clone();

        let spawned = Worker::spawn("keyboard-input", move |stop| {
            read_keys(&slot, &quit, &stop);
            running.store(false, Ordering::SeqCst);
        });

        match spawned {
            Ok(spawned) => *worker = Some(spawned),
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                warn!("Failed to start keyboard worker: {}", e);
            }
        }
    }

    fn current_direction(&self) -> Option<Direction> {
        self.slot.load()
    }

    fn clear(&self) {
        self.slot.clear();
    }

    fn take_direction(&self) -> Option<Direction> {
        self.slot.take()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(mut worker) = self.worker.lock().take() {
            worker.shutdown(Duration::from_millis(timing::INPUT_SHUTDOWN_MS));
        }
        self.slot.clear();
    }
}

impl Drop for KeyboardInput {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_steering_keys() {
        assert_eq!(map_key(&press(KeyCode::Char('a'))), KeyAction::Steer(Direction::Left));
        assert_eq!(map_key(&press(KeyCode::Left)), KeyAction::Steer(Direction::Left));
        assert_eq!(map_key(&press(KeyCode::Char('d'))), KeyAction::Steer(Direction::Right));
        assert_eq!(map_key(&press(KeyCode::Right)), KeyAction::Steer(Direction::Right));
        assert_eq!(map_key(&press(KeyCode::Char('w'))), KeyAction::Steer(Direction::Up));
        assert_eq!(map_key(&press(KeyCode::Up)), KeyAction::Steer(Direction::Up));
        assert_eq!(map_key(&press(KeyCode::Char('s'))), KeyAction::Steer(Direction::Down));
        assert_eq!(map_key(&press(KeyCode::Down)), KeyAction::Steer(Direction::Down));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(&press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(map_key(&press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(map_key(&press(KeyCode::Char('c'))), KeyAction::Ignore);
    }

    #[test]
    fn test_release_ignored() {
        let mut key = press(KeyCode::Char('a'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(&key), KeyAction::Ignore);
    }
}
