//! Terminal Racer
//!
//! A single-player racing game rendered in character cells. A vehicle steers
//! across a scrolling track while obstacles fall toward it; the session runs
//! on a fixed-rate tokio tick task with input acquired on a separate thread.
//!
//! # Features
//!
//! - `terminal` - crossterm keyboard input and terminal renderer (enabled by default)

pub mod cli;
pub mod config;
pub mod game;
pub mod input;
pub mod render;

pub use config::{ConfigError, GameConfig};
pub use game::engine::{EngineError, GameEngine};
pub use game::observer::{GameStateObserver, ObserverId};
pub use game::outcome::{EndReason, SessionSummary};
pub use game::snapshot::GameStateSnapshot;
