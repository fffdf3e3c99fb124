//! Obstacle generator
//!
//! Creates single obstacles and multi-obstacle patterns for a difficulty level.
//! Pattern columns are derived from fractions of the track width so layouts
//! stay proportionate on any track.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::{smallvec, SmallVec};

use crate::game::constants::generation::*;
use crate::game::obstacle::{Obstacle, ObstacleKind};

/// Inline storage for a pattern; the largest layout has three obstacles
pub type Pattern = SmallVec<[Obstacle; 3]>;

/// Fixed multi-obstacle layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// One random obstacle
    Single,
    /// Two standard obstacles either side of the centre
    Paired,
    /// Obstacles at both edges and the centre
    TripleWithGap,
    /// Two zigzags at one and two thirds of the width
    ZigzagPair,
    /// Fast, standard and zigzag spread across the track
    Mixed,
}

impl PatternKind {
    /// Layout used at a difficulty level
    pub fn for_level(difficulty_level: u32) -> Self {
        match difficulty_level {
            0 | 1 => PatternKind::Single,
            2 => PatternKind::Paired,
            3 => PatternKind::TripleWithGap,
            4 => PatternKind::ZigzagPair,
            _ => PatternKind::Mixed,
        }
    }
}

/// Creates obstacles at row 0 of a track
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    track_width: i32,
    rng: StdRng,
}

impl ObstacleGenerator {
    pub fn new(track_width: i32) -> Self {
        Self {
            track_width,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for replays and tests
    pub fn with_seed(track_width: i32, seed: u64) -> Self {
        Self {
            track_width,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn track_width(&self) -> i32 {
        self.track_width
    }

    /// Random interior column, keeping the spawn margin free on both sides
    pub fn random_column(&mut self) -> i32 {
        let low = SPAWN_MARGIN;
        let high = self.track_width - 1 - SPAWN_MARGIN;
        if high <= low {
            return self.track_width / 2;
        }
        self.rng.gen_range(low..=high)
    }

    /// Create a specific variant
    pub fn create(&self, kind: ObstacleKind, x: i32, y: i32) -> Obstacle {
        Obstacle::new(kind, self.clamp_column(x), y)
    }

    /// Random obstacle whose variant odds depend on the difficulty
    pub fn create_random(&mut self, difficulty_level: u32) -> Obstacle {
        let x = self.random_column();
        let roll: u32 = self.rng.gen_range(0..100);

        let kind = if difficulty_level >= ZIGZAG_MIN_LEVEL && roll < ZIGZAG_CHANCE {
            ObstacleKind::Zigzag
        } else if difficulty_level >= FAST_MIN_LEVEL && roll < FAST_CHANCE {
            ObstacleKind::Fast
        } else {
            ObstacleKind::Standard
        };

        Obstacle::new(kind, x, 0)
    }

    /// Multi-obstacle layout for the difficulty level
    pub fn create_pattern(&mut self, difficulty_level: u32) -> Pattern {
        let w = self.track_width;

        match PatternKind::for_level(difficulty_level) {
            PatternKind::Single => smallvec![self.create_random(difficulty_level)],
            PatternKind::Paired => smallvec![
                self.create(ObstacleKind::Standard, w / 2 - 2, 0),
                self.create(ObstacleKind::Standard, w / 2 + 2, 0),
            ],
            PatternKind::TripleWithGap => {
                let centre = if difficulty_level >= 3 {
                    ObstacleKind::Fast
                } else {
                    ObstacleKind::Standard
                };
                smallvec![
                    self.create(ObstacleKind::Standard, SPAWN_MARGIN, 0),
                    self.create(ObstacleKind::Standard, w - 1 - SPAWN_MARGIN, 0),
                    self.create(centre, w / 2, 0),
                ]
            }
            PatternKind::ZigzagPair => smallvec![
                self.create(ObstacleKind::Zigzag, w / 3, 0),
                self.create(ObstacleKind::Zigzag, 2 * w / 3, 0),
            ],
            PatternKind::Mixed => smallvec![
                self.create(ObstacleKind::Fast, w / 4, 0),
                self.create(ObstacleKind::Standard, w / 2, 0),
                self.create(ObstacleKind::Zigzag, 3 * w / 4, 0),
            ],
        }
    }

    /// Roll whether the cadence should emit a pattern instead of one obstacle
    pub fn roll_pattern(&mut self, difficulty_level: u32) -> bool {
        let roll: u32 = self.rng.gen_range(0..100);
        difficulty_level >= PATTERN_MIN_LEVEL && roll < difficulty_level * PATTERN_CHANCE_PER_LEVEL
    }

    /// Obstacles produced by one firing of the generation cadence
    pub fn generate(&mut self, difficulty_level: u32) -> Pattern {
        if self.roll_pattern(difficulty_level) {
            self.create_pattern(difficulty_level)
        } else {
            smallvec![self.create_random(difficulty_level)]
        }
    }

    fn clamp_column(&self, x: i32) -> i32 {
        x.clamp(1, (self.track_width - 2).max(1))
    }
}
