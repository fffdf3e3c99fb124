//! One racing session and its tick cycle
//!
//! `GameSession` holds every piece of mutable game state and advances it one
//! tick at a time. It has no notion of wall-clock scheduling: the caller
//! passes the tick instant in, which keeps the cycle deterministic under test.
//! [`crate::game::engine::GameEngine`] drives it from a tokio task.
//!
//! Per tick, in order: vehicle self-update, input, clamp, scroll, score,
//! collision, time limit, observers, render.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::game::collision::Collision;
use crate::game::observer::{GameStateObserver, ObserverId, ObserverRegistry};
use crate::game::outcome::{remaining_seconds, time_limit_reached, EndReason, SessionSummary};
use crate::game::performance::PerformanceMonitor;
use crate::game::snapshot::GameStateSnapshot;
use crate::game::track::Track;
use crate::game::vehicle::Vehicle;
use crate::input::{Direction, InputSource};
use crate::render::{Frame, Renderer};

/// Mixed into the configured seed so the session and track RNGs differ
const SESSION_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Stopped,
    Running,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session still running
    Continue,
    /// Session ended during this tick
    Finished(EndReason),
    /// Session was not running; nothing happened
    Idle,
}

pub struct GameSession {
    config: GameConfig,
    vehicle: Vehicle,
    track: Track,
    score: i64,
    rng: StdRng,
    input: Arc<dyn InputSource>,
    renderer: Box<dyn Renderer>,
    observers: ObserverRegistry,
    phase: SessionPhase,
    started_at: Option<Instant>,
    elapsed: Duration,
    last_render: Option<Instant>,
    ticks: u64,
    end_reason: Option<EndReason>,
    monitor: PerformanceMonitor,
}

impl GameSession {
    pub fn new(config: GameConfig, input: Arc<dyn InputSource>, renderer: Box<dyn Renderer>) -> Self {
        let (x, y) = config.start_position();
        let mut vehicle = Vehicle::with_max_speed(x, y, config.max_speed);

        let (track, rng) = match config.seed {
            Some(seed) => (
                Track::with_seed(config.track_width, config.track_height, seed),
                StdRng::seed_from_u64(seed ^ SESSION_SEED_SALT),
            ),
            None => (
                Track::new(config.track_width, config.track_height),
                StdRng::from_entropy(),
            ),
        };

        let (left, right) = track.interior_bounds();
        vehicle.set_boundaries(left, right);

        Self {
            monitor: PerformanceMonitor::new(config.tick_interval),
            config,
            vehicle,
            track,
            score: 0,
            rng,
            input,
            renderer,
            observers: ObserverRegistry::new(),
            phase: SessionPhase::Stopped,
            started_at: None,
            elapsed: Duration::ZERO,
            last_render: None,
            ticks: 0,
            end_reason: None,
        }
    }

    /// Reset all state and enter Running. Returns false if already running.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.phase == SessionPhase::Running {
            return false;
        }

        let (x, y) = self.config.start_position();
        self.vehicle.reset(x, y);
        self.track.reset();
        self.score = 0;
        self.ticks = 0;
        self.elapsed = Duration::ZERO;
        self.started_at = Some(now);
        self.last_render = None;
        self.end_reason = None;
        self.monitor.reset();

        self.input.initialize();
        self.phase = SessionPhase::Running;

        info!(
            "Session started on {}x{} track, {}s limit",
            self.config.track_width,
            self.config.track_height,
            self.config.game_duration.as_secs()
        );
        true
    }

    /// Run one tick at `now`
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }

        self.monitor.tick_start();
        self.ticks += 1;
        if let Some(started_at) = self.started_at {
            self.elapsed = now.saturating_duration_since(started_at);
        }

        self.vehicle.update(&mut self.rng);

        if let Some(direction) = self.input.take_direction() {
            self.apply_direction(direction);
        }

        if self.vehicle.clamp_to_boundaries() {
            debug!("Vehicle clamped back to x={}", self.vehicle.x());
        }

        let scroll = self.track.scroll();
        self.score += scroll.avoided_score;

        if !self.vehicle.is_crashed() {
            self.score += i64::from(self.vehicle.speed());
        }

        let mut finished = None;

        if !self.vehicle.is_crashed() {
            let collision = self.track.check_collision(self.vehicle.x(), self.vehicle.y());
            if collision.is_collision() {
                finished = self.handle_collision(collision);
            }
        }

        if finished.is_none() && time_limit_reached(self.elapsed, self.config.game_duration) {
            finished = Some(EndReason::TimeUp);
        }

        let outcome = match finished {
            Some(reason) => {
                self.end_game(reason);
                TickOutcome::Finished(reason)
            }
            None => {
                self.observers.notify(&self.snapshot());
                self.maybe_render(now);
                TickOutcome::Continue
            }
        };

        if let Some(status) = self.monitor.tick_end() {
            if status.is_degraded() {
                warn!("Tick loop {}", self.monitor.status_message());
            }
        }

        outcome
    }

    fn apply_direction(&mut self, direction: Direction) {
        let blocked = match direction {
            Direction::Left => !self.vehicle.move_left(),
            Direction::Right => !self.vehicle.move_right(),
            Direction::Up => {
                self.vehicle.accelerate();
                false
            }
            Direction::Down => {
                self.vehicle.decelerate();
                false
            }
        };

        if blocked && !self.vehicle.is_crashed() {
            self.renderer
                .show_boundary_hit_effect(self.vehicle.x(), self.vehicle.y(), direction);
        }
    }

    /// Crash the vehicle and charge the penalty. Returns the end reason when
    /// collisions are fatal.
    fn handle_collision(&mut self, collision: Collision) -> Option<EndReason> {
        let (x, y) = (self.vehicle.x(), self.vehicle.y());

        self.vehicle.crash();
        self.score -= collision.penalty();

        let symbol = match collision {
            Collision::Hurdle { kind, .. } => {
                self.track.mark_hit(x, y);
                kind.symbol()
            }
            Collision::Boundary => self.track.boundary_symbol(),
            Collision::OutOfBounds | Collision::None => self.vehicle.symbol(),
        };
        self.renderer.show_collision_effect(x, y, symbol);

        info!(
            "Vehicle collided at ({}, {}): {:?}, penalty {}",
            x,
            y,
            collision,
            collision.penalty()
        );

        if self.config.fatal_collisions {
            EndReason::from_collision(&collision)
        } else {
            None
        }
    }

    fn maybe_render(&mut self, now: Instant) {
        let due = match self.last_render {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.config.frame_interval,
        };
        if !due {
            return;
        }

        let frame = self.frame();
        self.renderer.render(&frame);
        self.last_render = Some(now);
    }

    /// Finish the session with `reason`
    ///
    /// Stops input, shows the game-over screen and sends observers the one
    /// terminal snapshot. Does nothing unless running.
    pub fn end_game(&mut self, reason: EndReason) {
        if self.phase != SessionPhase::Running {
            return;
        }

        self.phase = SessionPhase::Stopped;
        self.end_reason = Some(reason);
        self.input.shutdown();
        self.renderer.show_game_over(self.score, &reason);
        self.observers.notify(&self.snapshot());

        info!(
            "Session ended: {} Score {} after {} ticks",
            reason, self.score, self.ticks
        );
    }

    /// Stop without a game-over transition. Returns false if not running.
    pub fn halt(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }

        self.phase = SessionPhase::Stopped;
        self.input.shutdown();
        info!("Session stopped after {} ticks", self.ticks);
        true
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            score: self.score,
            remaining_seconds: remaining_seconds(self.elapsed, self.config.game_duration),
            is_game_over: self.end_reason.is_some(),
            game_over_reason: self.end_reason,
            vehicle_speed: self.vehicle.speed(),
            difficulty_level: self.track.difficulty_level(),
            vehicle_x: self.vehicle.x(),
            vehicle_y: self.vehicle.y(),
            obstacle_count: self.track.obstacles().len(),
            tick: self.ticks,
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            vehicle: self.vehicle.snapshot(),
            track: self.track.snapshot(),
            score: self.score,
            remaining_seconds: remaining_seconds(self.elapsed, self.config.game_duration),
            timing: self.config.debug_overlay.then(|| self.monitor.timing()),
        }
    }

    /// Final result, available once the session has ended
    pub fn summary(&self) -> Option<SessionSummary> {
        self.end_reason.map(|reason| SessionSummary {
            score: self.score,
            reason,
            distance_traveled: self.track.distance_traveled(),
            difficulty_level: self.track.difficulty_level(),
            ticks: self.ticks,
            elapsed_secs: self.elapsed.as_secs_f64(),
        })
    }

    pub fn add_observer(&mut self, observer: Arc<dyn GameStateObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
