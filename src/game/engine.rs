//! Game engine: drives a [`GameSession`] from a fixed-rate tokio task
//!
//! The session sits behind a `parking_lot::Mutex`. The tick task locks it once
//! per tick and never across an await point. A `watch` channel carries the
//! stop request so every wait in the loop can be cancelled.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::game::constants::timing::STOP_TIMEOUT_MS;
use crate::game::observer::{GameStateObserver, ObserverId};
use crate::game::outcome::SessionSummary;
use crate::game::session::{GameSession, TickOutcome};
use crate::game::snapshot::GameStateSnapshot;
use crate::input::InputSource;
use crate::render::Renderer;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game engine must be started from within a tokio runtime")]
    NoRuntime,
}

struct TickTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct GameEngine {
    session: Arc<Mutex<GameSession>>,
    tick_interval: Duration,
    task: Mutex<Option<TickTask>>,
    /// True while a tick task is alive
    running_tx: Arc<watch::Sender<bool>>,
}

impl GameEngine {
    pub fn new(config: GameConfig, input: Arc<dyn InputSource>, renderer: Box<dyn Renderer>) -> Self {
        let tick_interval = config.tick_interval;
        let (running_tx, _) = watch::channel(false);
        Self {
            session: Arc::new(Mutex::new(GameSession::new(config, input, renderer))),
            tick_interval,
            task: Mutex::new(None),
            running_tx: Arc::new(running_tx),
        }
    }

    /// Begin a session and spawn its tick task
    ///
    /// Returns `Ok(false)` without touching anything if a session is already
    /// running.
    pub fn start(&self) -> Result<bool, EngineError> {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let mut task = self.task.lock();
        let now = Instant::now();
        if !self.session.lock().begin(now) {
            return Ok(false);
        }

        if let Some(previous) = task.take() {
            previous.handle.abort();
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.running_tx.send_replace(true);

        let handle = runtime.spawn(run_loop(
            self.session.clone(),
            now + self.tick_interval,
            self.tick_interval,
            shutdown_rx,
            self.running_tx.clone(),
        ));

        *task = Some(TickTask { shutdown_tx, handle });
        Ok(true)
    }

    /// Stop the session without a game-over transition
    ///
    /// Waits a bounded time for the tick task to exit. Returns false if no
    /// session was running.
    pub async fn stop(&self) -> bool {
        let task = self.task.lock().take();
        let halted = self.session.lock().halt();

        if let Some(TickTask {
            shutdown_tx,
            mut handle,
        }) = task
        {
            let _ = shutdown_tx.send(true);
            match timeout(Duration::from_millis(STOP_TIMEOUT_MS), &mut handle).await {
                Ok(Ok(())) => debug!("Tick task joined"),
                Ok(Err(e)) if e.is_cancelled() => {}
                Ok(Err(e)) => warn!("Tick task failed: {}", e),
                Err(_) => {
                    warn!("Tick task did not stop within {}ms, aborting", STOP_TIMEOUT_MS);
                    handle.abort();
                }
            }
        }

        halted
    }

    /// Wait until the tick task exits, returning the summary if the session
    /// ended on its own
    pub async fn wait(&self) -> Option<SessionSummary> {
        let mut running_rx = self.running_tx.subscribe();
        // Sender lives in self, so this only fails if the engine is gone
        let _ = running_rx.wait_for(|running| !*running).await;
        self.summary()
    }

    pub fn is_running(&self) -> bool {
        self.session.lock().is_running()
    }

    pub fn add_observer(&self, observer: Arc<dyn GameStateObserver>) -> ObserverId {
        self.session.lock().add_observer(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.session.lock().remove_observer(id)
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        self.session.lock().snapshot()
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.session.lock().summary()
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            let _ = task.shutdown_tx.send(true);
            task.handle.abort();
        }
        self.session.lock().halt();
    }
}

async fn run_loop(
    session: Arc<Mutex<GameSession>>,
    first_tick: Instant,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    running_tx: Arc<watch::Sender<bool>>,
) {
    let mut ticker = interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Game loop started at {}ms per tick", period.as_millis());

    loop {
        if *shutdown.borrow() {
            break;
        }

        let now = tokio::select! {
            now = ticker.tick() => now,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        };

        let outcome = session.lock().tick(now);
        match outcome {
            TickOutcome::Continue => {}
            TickOutcome::Finished(reason) => {
                debug!("Game loop finished: {}", reason);
                break;
            }
            TickOutcome::Idle => break,
        }
    }

    running_tx.send_replace(false);
    info!("Game loop stopped");
}
