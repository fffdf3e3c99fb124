//! Input acquisition
//!
//! An input source runs its own worker thread and publishes the most recent
//! steering decision into a shared [`DirectionSlot`]. The tick loop consumes
//! at most one direction per tick through [`InputSource::take_direction`].

mod ai;
#[cfg(feature = "terminal")]
mod keyboard;
mod slot;
mod worker;

use std::fmt;

pub use ai::AiInput;
#[cfg(feature = "terminal")]
pub use keyboard::{map_key, KeyAction, KeyboardInput};
pub use slot::DirectionSlot;
pub use worker::{StopSignal, Worker};

/// Steering request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    /// Accelerate
    Up,
    /// Decelerate
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// A producer of steering decisions shared between its worker and the tick loop
pub trait InputSource: Send + Sync {
    /// Start the worker. Calling it on a running source does nothing.
    fn initialize(&self);

    /// Most recent unconsumed direction
    fn current_direction(&self) -> Option<Direction>;

    fn clear(&self);

    /// Read and clear the pending direction in one step
    fn take_direction(&self) -> Option<Direction> {
        let direction = self.current_direction();
        self.clear();
        direction
    }

    fn is_running(&self) -> bool;

    /// Stop the worker, waiting a bounded time for it to exit. Idempotent.
    fn shutdown(&self);
}
