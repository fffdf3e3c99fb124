//! Per-tick game state snapshot published to observers

use serde::{Deserialize, Serialize};

use crate::game::outcome::EndReason;

/// Immutable copy of the session state at one moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub score: i64,
    pub remaining_seconds: u64,
    pub is_game_over: bool,
    pub game_over_reason: Option<EndReason>,
    pub vehicle_speed: i32,
    pub difficulty_level: u32,
    pub vehicle_x: i32,
    pub vehicle_y: i32,
    pub obstacle_count: usize,
    /// Ticks executed in this session
    pub tick: u64,
}

impl GameStateSnapshot {
    /// Reason text, empty while the session is still running
    pub fn game_over_message(&self) -> String {
        self.game_over_reason
            .map(|reason| reason.message())
            .unwrap_or_default()
    }
}
