//! Session end reasons and the final summary

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::collision::Collision;
use crate::game::obstacle::ObstacleKind;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Game duration elapsed
    TimeUp,
    /// Vehicle hit a boundary cell
    BoundaryCrash,
    /// Vehicle hit an obstacle
    HurdleCrash(ObstacleKind),
    /// Vehicle left the track extent
    OutOfBounds,
}

impl EndReason {
    /// Reason for a fatal collision; `None` when there was no collision
    pub fn from_collision(collision: &Collision) -> Option<Self> {
        match collision {
            Collision::None => None,
            Collision::OutOfBounds => Some(EndReason::OutOfBounds),
            Collision::Boundary => Some(EndReason::BoundaryCrash),
            Collision::Hurdle { kind, .. } => Some(EndReason::HurdleCrash(*kind)),
        }
    }

    pub fn is_crash(&self) -> bool {
        !matches!(self, EndReason::TimeUp)
    }

    /// Text shown on the game-over screen
    pub fn message(&self) -> String {
        match self {
            EndReason::TimeUp => "Time's up!".to_string(),
            EndReason::BoundaryCrash => "You crashed into the track boundary!".to_string(),
            EndReason::HurdleCrash(kind) => format!("You crashed into a {}!", kind.name()),
            EndReason::OutOfBounds => "You went out of bounds!".to_string(),
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Whether the session has run for its full duration
pub fn time_limit_reached(elapsed: Duration, game_duration: Duration) -> bool {
    elapsed >= game_duration
}

/// Whole seconds left in the session, never negative
pub fn remaining_seconds(elapsed: Duration, game_duration: Duration) -> u64 {
    game_duration.as_secs().saturating_sub(elapsed.as_secs())
}

/// Final result of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: i64,
    pub reason: EndReason,
    pub distance_traveled: u64,
    pub difficulty_level: u32,
    pub ticks: u64,
    pub elapsed_secs: f64,
}

impl SessionSummary {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_from_collision() {
        assert_eq!(EndReason::from_collision(&Collision::None), None);
        assert_eq!(
            EndReason::from_collision(&Collision::Boundary),
            Some(EndReason::BoundaryCrash)
        );
        assert_eq!(
            EndReason::from_collision(&Collision::OutOfBounds),
            Some(EndReason::OutOfBounds)
        );
        assert_eq!(
            EndReason::from_collision(&Collision::Hurdle {
                kind: ObstacleKind::Zigzag,
                damage: 75
            }),
            Some(EndReason::HurdleCrash(ObstacleKind::Zigzag))
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(EndReason::TimeUp.to_string(), "Time's up!");
        assert_eq!(
            EndReason::HurdleCrash(ObstacleKind::Fast).message(),
            "You crashed into a fast hurdle!"
        );
        assert!(!EndReason::TimeUp.is_crash());
        assert!(EndReason::OutOfBounds.is_crash());
    }

    #[test]
    fn test_time_limit() {
        let duration = Duration::from_secs(60);
        assert!(!time_limit_reached(Duration::from_millis(59_999), duration));
        assert!(time_limit_reached(Duration::from_secs(60), duration));
        assert!(time_limit_reached(Duration::from_secs(75), duration));
    }

    #[test]
    fn test_remaining_seconds() {
        let duration = Duration::from_secs(60);
        assert_eq!(remaining_seconds(Duration::ZERO, duration), 60);
        assert_eq!(remaining_seconds(Duration::from_millis(1500), duration), 59);
        assert_eq!(remaining_seconds(Duration::from_secs(90), duration), 0);
    }

    #[test]
    fn test_summary_json() {
        let summary = SessionSummary {
            score: 120,
            reason: EndReason::TimeUp,
            distance_traveled: 1200,
            difficulty_level: 3,
            ticks: 1200,
            elapsed_secs: 60.0,
        };
        let json: serde_json::Value = serde_json::from_str(&summary.to_json()).unwrap();
        assert_eq!(json["score"], 120);
        assert_eq!(json["reason"], "TimeUp");
        assert_eq!(json["difficulty_level"], 3);
    }
}
