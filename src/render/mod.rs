//! Frame presentation
//!
//! The tick loop hands renderers owned snapshots, never live state. Effects
//! are cosmetic and must not influence the simulation.

#[cfg(feature = "terminal")]
mod terminal;

#[cfg(feature = "terminal")]
pub use terminal::{compose_frame, Effect, TerminalRenderer};

use crate::game::outcome::EndReason;
use crate::game::performance::TickTiming;
use crate::game::track::TrackSnapshot;
use crate::game::vehicle::VehicleSnapshot;
use crate::input::Direction;

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub vehicle: VehicleSnapshot,
    pub track: TrackSnapshot,
    pub score: i64,
    pub remaining_seconds: u64,
    /// Present only when the debug overlay is enabled
    pub timing: Option<TickTiming>,
}

pub trait Renderer: Send {
    fn render(&mut self, frame: &Frame);

    fn show_game_over(&mut self, score: i64, reason: &EndReason);

    /// The vehicle tried to move into a boundary
    fn show_boundary_hit_effect(&mut self, x: i32, y: i32, direction: Direction);

    /// The vehicle crashed at (x, y) into whatever `symbol` was there
    fn show_collision_effect(&mut self, x: i32, y: i32, symbol: char);
}

/// Renderer for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame) {}

    fn show_game_over(&mut self, _score: i64, _reason: &EndReason) {}

    fn show_boundary_hit_effect(&mut self, _x: i32, _y: i32, _direction: Direction) {}

    fn show_collision_effect(&mut self, _x: i32, _y: i32, _symbol: char) {}
}
