use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::game::constants::{ai, timing, track, vehicle};

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("track must be at least {min_width}x{min_height}, got {width}x{height}")]
    TrackTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("max speed must be at least 1, got {0}")]
    InvalidMaxSpeed(i32),
}

/// Game configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub track_width: i32,
    pub track_height: i32,
    /// Time between simulation ticks
    pub tick_interval: Duration,
    /// Minimum time between rendered frames
    pub frame_interval: Duration,
    /// Session length before "time's up"
    pub game_duration: Duration,
    pub max_speed: i32,
    /// Cadence of the AI driver
    pub ai_decision_interval: Duration,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
    /// End the session on the first collision
    pub fatal_collisions: bool,
    /// Show tick timing in the frame
    pub debug_overlay: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            track_width: track::WIDTH,
            track_height: track::HEIGHT,
            tick_interval: Duration::from_millis(timing::TICK_DURATION_MS),
            frame_interval: Duration::from_millis(timing::FRAME_INTERVAL_MS),
            game_duration: Duration::from_secs(timing::GAME_DURATION_SECS),
            max_speed: vehicle::MAX_SPEED,
            ai_decision_interval: Duration::from_millis(ai::DECISION_INTERVAL_MS),
            seed: None,
            fatal_collisions: true,
            debug_overlay: false,
        }
    }
}

/// Parse one variable, keeping the default on a bad value
fn parse_var<T, F>(lookup: &F, key: &str, accept: impl Fn(&T) -> bool, expected: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(parsed) if accept(&parsed) => Some(parsed),
        Ok(_) => {
            tracing::warn!("{} must be {}, using default", key, expected);
            None
        }
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load config through an arbitrary variable lookup
    pub fn load_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = parse_var(&lookup, "TRACK_WIDTH", |w: &i32| (track::MIN_WIDTH..=500).contains(w), "8-500") {
            config.track_width = width;
        }

        if let Some(height) = parse_var(&lookup, "TRACK_HEIGHT", |h: &i32| (track::MIN_HEIGHT..=500).contains(h), "5-500") {
            config.track_height = height;
        }

        if let Some(ms) = parse_var(&lookup, "TICK_MS", |ms: &u64| (1..=1000).contains(ms), "1-1000") {
            config.tick_interval = Duration::from_millis(ms);
        }

        if let Some(ms) = parse_var(&lookup, "FRAME_MS", |ms: &u64| *ms <= 1000, "0-1000") {
            config.frame_interval = Duration::from_millis(ms);
        }

        if let Some(secs) = parse_var(&lookup, "GAME_SECONDS", |s: &u64| (1..=3600).contains(s), "1-3600") {
            config.game_duration = Duration::from_secs(secs);
        }

        if let Some(speed) = parse_var(&lookup, "MAX_SPEED", |s: &i32| (1..=10).contains(s), "1-10") {
            config.max_speed = speed;
        }

        if let Some(ms) = parse_var(&lookup, "AI_DECISION_MS", |ms: &u64| *ms > 0, "> 0") {
            config.ai_decision_interval = Duration::from_millis(ms);
        }

        if let Some(seed) = parse_var(&lookup, "GAME_SEED", |_: &u64| true, "an unsigned integer") {
            config.seed = Some(seed);
        }

        if let Some(raw) = lookup("FATAL_COLLISIONS") {
            match parse_bool(&raw) {
                Some(fatal) => config.fatal_collisions = fatal,
                None => tracing::warn!("Invalid FATAL_COLLISIONS '{}', using default", raw),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.track_width < track::MIN_WIDTH || self.track_height < track::MIN_HEIGHT {
            return Err(ConfigError::TrackTooSmall {
                width: self.track_width,
                height: self.track_height,
                min_width: track::MIN_WIDTH,
                min_height: track::MIN_HEIGHT,
            });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("tick interval"));
        }
        if self.game_duration.is_zero() {
            return Err(ConfigError::ZeroDuration("game duration"));
        }
        if self.ai_decision_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("AI decision interval"));
        }
        if self.max_speed < 1 {
            return Err(ConfigError::InvalidMaxSpeed(self.max_speed));
        }
        Ok(())
    }

    /// Vehicle start position: centred, a few rows above the bottom edge
    pub fn start_position(&self) -> (i32, i32) {
        (
            self.track_width / 2,
            self.track_height - vehicle::START_ROW_OFFSET,
        )
    }
}
