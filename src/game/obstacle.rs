//! Obstacle entity and per-variant movement rules

use serde::{Deserialize, Serialize};

use crate::game::constants::generation::{SPAWN_MARGIN, ZIGZAG_SHIFT_PERIOD};

/// Obstacle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Falls one row per tick
    Standard,
    /// Falls two rows per tick
    Fast,
    /// Falls one row per tick and drifts sideways
    Zigzag,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [Self::Standard, Self::Fast, Self::Zigzag];

    pub fn symbol(&self) -> char {
        match self {
            ObstacleKind::Standard => '*',
            ObstacleKind::Fast => '>',
            ObstacleKind::Zigzag => 'Z',
        }
    }

    /// Score lost when the vehicle hits this obstacle
    pub fn damage(&self) -> i64 {
        match self {
            ObstacleKind::Standard => 50,
            ObstacleKind::Fast => 60,
            ObstacleKind::Zigzag => 75,
        }
    }

    /// Score gained when this obstacle scrolls off the track untouched
    pub fn score_value(&self) -> i64 {
        match self {
            ObstacleKind::Standard => 10,
            ObstacleKind::Fast => 15,
            ObstacleKind::Zigzag => 20,
        }
    }

    /// Rows travelled per tick
    pub fn fall_rate(&self) -> i32 {
        match self {
            ObstacleKind::Fast => 2,
            ObstacleKind::Standard | ObstacleKind::Zigzag => 1,
        }
    }

    /// Human readable name used in game-over messages
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Standard => "standard hurdle",
            ObstacleKind::Fast => "fast hurdle",
            ObstacleKind::Zigzag => "zigzag hurdle",
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }
}

/// A single hazard on the track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    pub kind: ObstacleKind,
    /// Set once the vehicle collides with it; hit obstacles earn no avoidance score
    pub hit: bool,
    /// Ticks since spawn, drives the zigzag shift period
    moves: u32,
    /// Horizontal zigzag direction, +1 right or -1 left
    drift: i32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind,
            hit: false,
            moves: 0,
            drift: 1,
        }
    }

    pub fn standard(x: i32, y: i32) -> Self {
        Self::new(ObstacleKind::Standard, x, y)
    }

    pub fn fast(x: i32, y: i32) -> Self {
        Self::new(ObstacleKind::Fast, x, y)
    }

    pub fn zigzag(x: i32, y: i32) -> Self {
        Self::new(ObstacleKind::Zigzag, x, y)
    }

    #[inline]
    pub fn symbol(&self) -> char {
        self.kind.symbol()
    }

    #[inline]
    pub fn damage(&self) -> i64 {
        self.kind.damage()
    }

    #[inline]
    pub fn score_value(&self) -> i64 {
        self.kind.score_value()
    }

    /// Exact cell equality, no tolerance
    #[inline]
    pub fn occupies(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }

    /// Apply one tick of movement for this variant
    ///
    /// `track_width` bounds the zigzag drift: it turns around once it is within
    /// the spawn margin of either boundary.
    pub fn advance(&mut self, track_width: i32) {
        self.y += self.kind.fall_rate();
        self.moves = self.moves.wrapping_add(1);

        if self.kind == ObstacleKind::Zigzag && self.moves % ZIGZAG_SHIFT_PERIOD == 0 {
            if self.x <= SPAWN_MARGIN {
                self.drift = 1;
            } else if self.x >= track_width - 1 - SPAWN_MARGIN {
                self.drift = -1;
            }
            self.x += self.drift;
        }
    }

    pub fn view(&self) -> ObstacleView {
        ObstacleView {
            x: self.x,
            y: self.y,
            kind: self.kind,
        }
    }
}

/// Render-facing copy of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: i32,
    pub y: i32,
    pub kind: ObstacleKind,
}

impl ObstacleView {
    pub fn symbol(&self) -> char {
        self.kind.symbol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_table() {
        assert_eq!(ObstacleKind::Standard.symbol(), '*');
        assert_eq!(ObstacleKind::Standard.damage(), 50);
        assert_eq!(ObstacleKind::Standard.score_value(), 10);

        assert_eq!(ObstacleKind::Fast.symbol(), '>');
        assert_eq!(ObstacleKind::Fast.damage(), 60);
        assert_eq!(ObstacleKind::Fast.score_value(), 15);

        assert_eq!(ObstacleKind::Zigzag.symbol(), 'Z');
        assert_eq!(ObstacleKind::Zigzag.damage(), 75);
        assert_eq!(ObstacleKind::Zigzag.score_value(), 20);
    }

    #[test]
    fn test_from_symbol() {
        for kind in ObstacleKind::ALL {
            assert_eq!(ObstacleKind::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(ObstacleKind::from_symbol('|'), None);
    }

    #[test]
    fn test_standard_falls_one_row() {
        let mut obstacle = Obstacle::standard(5, 0);
        obstacle.advance(20);
        assert_eq!((obstacle.x, obstacle.y), (5, 1));
    }

    #[test]
    fn test_fast_falls_two_rows() {
        let mut obstacle = Obstacle::fast(5, 0);
        obstacle.advance(20);
        obstacle.advance(20);
        assert_eq!((obstacle.x, obstacle.y), (5, 4));
    }

    #[test]
    fn test_zigzag_shifts_every_second_tick() {
        let mut obstacle = Obstacle::zigzag(10, 0);

        obstacle.advance(20);
        assert_eq!((obstacle.x, obstacle.y), (10, 1));
        obstacle.advance(20);
        assert_eq!((obstacle.x, obstacle.y), (11, 2));
        obstacle.advance(20);
        assert_eq!(obstacle.x, 11);
        obstacle.advance(20);
        assert_eq!(obstacle.x, 12);
    }

    #[test]
    fn test_zigzag_reverses_at_interior_bounds() {
        // Right bound for width 20 is column 17
        let mut obstacle = Obstacle::zigzag(17, 0);
        obstacle.advance(20);
        obstacle.advance(20);
        assert_eq!(obstacle.x, 16);

        let mut obstacle = Obstacle::zigzag(2, 0);
        obstacle.drift = -1;
        obstacle.advance(20);
        obstacle.advance(20);
        assert_eq!(obstacle.x, 3);
    }

    #[test]
    fn test_zigzag_stays_inside_track() {
        let mut obstacle = Obstacle::zigzag(9, 0);
        for _ in 0..200 {
            obstacle.advance(12);
            assert!(obstacle.x >= 1 && obstacle.x <= 10, "x = {}", obstacle.x);
        }
    }

    #[test]
    fn test_occupies_is_exact() {
        let obstacle = Obstacle::standard(4, 7);
        assert!(obstacle.occupies(4, 7));
        assert!(!obstacle.occupies(4, 8));
        assert!(!obstacle.occupies(5, 7));
    }
}
