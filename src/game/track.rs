//! Scrolling track
//!
//! Static boundary geometry plus the live obstacle set, distance travelled and
//! the difficulty curve.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::collision::{self, Collision};
use crate::game::constants::track::*;
use crate::game::generator::ObstacleGenerator;
use crate::game::obstacle::{Obstacle, ObstacleView};
use crate::game::obstacle_set::ObstacleSet;

/// What occupies a single track cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Boundary,
    Obstacle(char),
}

/// Outcome of one scroll tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollReport {
    pub avoided_score: i64,
    pub evicted: usize,
    pub spawned: usize,
    /// New level if difficulty increased on this scroll
    pub difficulty_raised: Option<u32>,
}

pub struct Track {
    width: i32,
    height: i32,
    obstacles: ObstacleSet,
    difficulty_level: u32,
    distance_traveled: u64,
}

impl Track {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_generator(width, height, ObstacleGenerator::new(width))
    }

    /// Deterministic track for replays and tests
    pub fn with_seed(width: i32, height: i32, seed: u64) -> Self {
        Self::with_generator(width, height, ObstacleGenerator::with_seed(width, seed))
    }

    pub fn with_generator(width: i32, height: i32, generator: ObstacleGenerator) -> Self {
        Self {
            width,
            height,
            obstacles: ObstacleSet::new(width, height, generator),
            difficulty_level: MIN_DIFFICULTY,
            distance_traveled: 0,
        }
    }

    /// Prepare for a new session
    ///
    /// Clears obstacles, distance and difficulty, then seeds a column of
    /// standard obstacles spaced down the upper part of the track.
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.difficulty_level = MIN_DIFFICULTY;
        self.distance_traveled = 0;

        for i in 0..INITIAL_OBSTACLES {
            let y = INITIAL_FIRST_ROW + i * INITIAL_ROW_SPACING;
            if y >= self.height {
                break;
            }
            let x = self.obstacles.generator_mut().random_column();
            self.obstacles.add(Obstacle::standard(x, y));
        }
    }

    /// Advance obstacles and distance by one tick
    pub fn scroll(&mut self) -> ScrollReport {
        let advance = self.obstacles.advance(self.difficulty_level);

        self.distance_traveled += 1;

        let mut difficulty_raised = None;
        if self.distance_traveled % DIFFICULTY_DISTANCE == 0 && self.difficulty_level < MAX_DIFFICULTY {
            self.difficulty_level += 1;
            difficulty_raised = Some(self.difficulty_level);
            info!(
                "Difficulty raised to {} at distance {}",
                self.difficulty_level, self.distance_traveled
            );
        }

        ScrollReport {
            avoided_score: advance.avoided_score,
            evicted: advance.evicted,
            spawned: advance.spawned,
            difficulty_raised,
        }
    }

    /// Classify what the vehicle at (x, y) runs into
    pub fn check_collision(&self, x: i32, y: i32) -> Collision {
        collision::classify(x, y, self)
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    pub fn is_boundary(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && (x == 0 || x == self.width - 1)
    }

    /// Cell contents; `None` outside the track
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if !self.contains(x, y) {
            return None;
        }
        if self.is_boundary(x, y) {
            return Some(Cell::Boundary);
        }
        Some(match self.obstacles.obstacle_at(x, y) {
            Some(obstacle) => Cell::Obstacle(obstacle.symbol()),
            None => Cell::Empty,
        })
    }

    pub fn obstacle_at(&self, x: i32, y: i32) -> Option<&Obstacle> {
        self.obstacles.obstacle_at(x, y)
    }

    pub fn mark_hit(&mut self, x: i32, y: i32) -> bool {
        self.obstacles.mark_hit(x, y)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.add(obstacle);
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Remove every obstacle without touching distance or difficulty
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn boundary_symbol(&self) -> char {
        BOUNDARY
    }

    /// Leftmost and rightmost columns a vehicle may occupy
    pub fn interior_bounds(&self) -> (i32, i32) {
        (1, self.width - 2)
    }

    #[inline]
    pub fn difficulty_level(&self) -> u32 {
        self.difficulty_level
    }

    #[inline]
    pub fn distance_traveled(&self) -> u64 {
        self.distance_traveled
    }

    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            width: self.width,
            height: self.height,
            boundary_symbol: BOUNDARY,
            difficulty_level: self.difficulty_level,
            distance_traveled: self.distance_traveled,
            obstacles: self.obstacles.views(),
        }
    }
}

/// Copy of the track handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub width: i32,
    pub height: i32,
    pub boundary_symbol: char,
    pub difficulty_level: u32,
    pub distance_traveled: u64,
    pub obstacles: Vec<ObstacleView>,
}

impl TrackSnapshot {
    /// Character grid, one row per vector, with boundaries and obstacles drawn
    pub fn rows(&self) -> Vec<Vec<char>> {
        let width = self.width.max(0) as usize;
        let mut rows = vec![vec![EMPTY; width]; self.height.max(0) as usize];
        for row in rows.iter_mut() {
            if let Some(first) = row.first_mut() {
                *first = self.boundary_symbol;
            }
            if let Some(last) = row.last_mut() {
                *last = self.boundary_symbol;
            }
        }
        for obstacle in &self.obstacles {
            if obstacle.x > 0 && obstacle.x < self.width - 1 && obstacle.y >= 0 && obstacle.y < self.height {
                rows[obstacle.y as usize][obstacle.x as usize] = obstacle.symbol();
            }
        }
        rows
    }
}
