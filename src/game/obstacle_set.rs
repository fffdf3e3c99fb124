//! Live obstacle collection
//!
//! Advances obstacles every scroll, evicts the ones that leave the track and
//! fires the generator on a difficulty-dependent cadence.

use tracing::debug;

use crate::game::constants::generation_interval;
use crate::game::generator::ObstacleGenerator;
use crate::game::obstacle::{Obstacle, ObstacleView};

/// Result of advancing the set by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Avoidance score from evicted, never-hit obstacles
    pub avoided_score: i64,
    pub evicted: usize,
    pub spawned: usize,
}

pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
    generator: ObstacleGenerator,
    track_width: i32,
    track_height: i32,
    /// Scrolls since the last generation
    generation_counter: u32,
}

impl ObstacleSet {
    pub fn new(track_width: i32, track_height: i32, generator: ObstacleGenerator) -> Self {
        Self {
            obstacles: Vec::with_capacity(32),
            generator,
            track_width,
            track_height,
            generation_counter: 0,
        }
    }

    /// Move, evict, then maybe generate
    pub fn advance(&mut self, difficulty_level: u32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let width = self.track_width;
        let height = self.track_height;

        for obstacle in &mut self.obstacles {
            obstacle.advance(width);
        }

        self.obstacles.retain(|obstacle| {
            if obstacle.y < height {
                return true;
            }
            if !obstacle.hit {
                report.avoided_score += obstacle.score_value();
            }
            report.evicted += 1;
            false
        });

        self.generation_counter += 1;
        if self.generation_counter >= generation_interval(difficulty_level) {
            self.generation_counter = 0;
            let batch = self.generator.generate(difficulty_level);
            report.spawned = batch.len();
            debug!(
                "Generated {} obstacle(s) at difficulty {}",
                batch.len(),
                difficulty_level
            );
            self.obstacles.extend(batch);
        }

        report
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Remove every obstacle and restart the cadence
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.generation_counter = 0;
    }

    /// First obstacle occupying the exact cell
    pub fn obstacle_at(&self, x: i32, y: i32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.occupies(x, y))
    }

    /// Flag the obstacle at the cell as hit. Returns false if there is none.
    pub fn mark_hit(&mut self, x: i32, y: i32) -> bool {
        match self.obstacles.iter_mut().find(|o| o.occupies(x, y)) {
            Some(obstacle) => {
                obstacle.hit = true;
                true
            }
            None => false,
        }
    }

    pub fn generator_mut(&mut self) -> &mut ObstacleGenerator {
        &mut self.generator
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn views(&self) -> Vec<ObstacleView> {
        self.obstacles.iter().map(Obstacle::view).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn generation_counter(&self) -> u32 {
        self.generation_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::obstacle::ObstacleKind;

    fn create_test_set() -> ObstacleSet {
        ObstacleSet::new(20, 40, ObstacleGenerator::with_seed(20, 17))
    }

    #[test]
    fn test_evicts_and_credits_unhit_obstacles() {
        let mut set = create_test_set();
        set.add(Obstacle::standard(5, 39));
        set.add(Obstacle::fast(7, 38));
        set.add(Obstacle::standard(9, 10));

        let report = set.advance(1);

        assert_eq!(report.evicted, 2);
        assert_eq!(report.avoided_score, 10 + 15);
        assert_eq!(set.len(), 1);
        assert!(set.iter().all(|o| o.y < 40));
    }

    #[test]
    fn test_hit_obstacles_earn_nothing() {
        let mut set = create_test_set();
        set.add(Obstacle::zigzag(5, 39));
        assert!(set.mark_hit(5, 39));

        let report = set.advance(1);

        assert_eq!(report.evicted, 1);
        assert_eq!(report.avoided_score, 0);
    }

    #[test]
    fn test_generation_after_nine_scrolls_at_level_one() {
        let mut set = create_test_set();

        for tick in 1..9 {
            let report = set.advance(1);
            assert_eq!(report.spawned, 0, "unexpected spawn at tick {}", tick);
        }
        assert!(set.is_empty());

        let report = set.advance(1);
        assert_eq!(report.spawned, 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.generation_counter(), 0);

        let obstacle = set.iter().next().unwrap();
        assert_eq!(obstacle.y, 0);
        assert_eq!(obstacle.kind, ObstacleKind::Standard);
    }

    #[test]
    fn test_cadence_shortens_with_difficulty() {
        let mut set = create_test_set();
        let mut spawn_ticks = Vec::new();
        for tick in 1..=10 {
            if set.advance(5).spawned > 0 {
                spawn_ticks.push(tick);
            }
        }
        assert_eq!(spawn_ticks, vec![5, 10]);
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut set = create_test_set();
        set.add(Obstacle::standard(3, 3));
        set.advance(1);
        set.advance(1);

        set.clear();

        assert!(set.is_empty());
        assert_eq!(set.generation_counter(), 0);
    }

    #[test]
    fn test_obstacle_at_exact_cell() {
        let mut set = create_test_set();
        set.add(Obstacle::fast(4, 4));
        assert_eq!(set.obstacle_at(4, 4).map(|o| o.kind), Some(ObstacleKind::Fast));
        assert!(set.obstacle_at(4, 5).is_none());
        assert!(!set.mark_hit(1, 1));
    }
}
