//! Random-steering AI driver

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::game::constants::{ai, timing};
use crate::input::{Direction, DirectionSlot, InputSource, Worker};

/// Pick one steering decision
///
/// 30% left, 30% right, 20% accelerate, 10% decelerate, 10% nothing.
pub fn decide<R: Rng + ?Sized>(rng: &mut R) -> Option<Direction> {
    match rng.gen_range(0..100) {
        0..=29 => Some(Direction::Left),
        30..=59 => Some(Direction::Right),
        60..=79 => Some(Direction::Up),
        80..=89 => Some(Direction::Down),
        _ => None,
    }
}

/// Input source that steers at random on a fixed cadence
pub struct AiInput {
    slot: Arc<DirectionSlot>,
    running: Arc<AtomicBool>,
    decision_interval: Duration,
    seed: Option<u64>,
    worker: Mutex<Option<Worker>>,
}

impl AiInput {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(ai::DECISION_INTERVAL_MS))
    }

    pub fn with_interval(decision_interval: Duration) -> Self {
        Self {
            slot: Arc::new(DirectionSlot::new()),
            running: Arc::new(AtomicBool::new(false)),
            decision_interval,
            seed: None,
            worker: Mutex::new(None),
        }
    }

    /// Replay the same decision sequence on every initialize
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn decision_interval(&self) -> Duration {
        self.decision_interval
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for AiInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for AiInput {
    fn initialize(&self) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }

        self.slot.clear();
        self.running.store(true, Ordering::SeqCst);

        let slot = self.slot.clone();
        let running = self.running.clone();
        let interval = self.decision_interval;
        let mut rng = self.rng();

        let spawned = Worker::spawn("ai-input", move |stop| {
            while !stop.wait(interval) {
                if let Some(direction) = decide(&mut rng) {
                    debug!("AI steers {}", direction);
                    slot.store(Some(direction));
                }
            }
            running.store(false, Ordering::SeqCst);
        });

        match spawned {
            Ok(spawned) => *worker = Some(spawned),
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                warn!("Failed to start AI input worker: {}", e);
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

impl Drop for AiInput {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_decision_distribution() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = [0u32; 5];
        for _ in 0..10_000 {
            let idx = match decide(&mut rng) {
                Some(Direction::Left) => 0,
                Some(Direction::Right) => 1,
                Some(Direction::Up) => 2,
                Some(Direction::Down) => 3,
                None => 4,
            };
            counts[idx] += 1;
        }

        let expected = [3000, 3000, 2000, 1000, 1000];
        for (count, want) in counts.iter().zip(expected) {
            assert!((*count as i32 - want).abs() < 300, "{:?}", counts);
        }
    }

    #[test]
    fn test_lifecycle() {
        let input = AiInput::with_interval(Duration::from_millis(1)).with_seed(5);
        assert!(!input.is_running());

        input.initialize();
        assert!(input.is_running());
        // Second initialize keeps the same worker
        input.initialize();

        let mut seen = None;
        for _ in 0..500 {
            if let Some(direction) = input.take_direction() {
                seen = Some(direction);
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert!(seen.is_some());

        input.shutdown();
        assert!(!input.is_running());
        assert_eq!(input.current_direction(), None);

        // Idempotent
        input.shutdown();
    }

    #[test]
    fn test_restart_after_shutdown() {
        let input = AiInput::with_interval(Duration::from_millis(5));
        input.initialize();
        input.shutdown();
        input.initialize();
        assert!(input.is_running());
        input.shutdown();
    }
}
