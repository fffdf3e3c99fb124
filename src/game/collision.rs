//! Collision classification
//!
//! Pure function of the vehicle position and the track. Priority is
//! out-of-bounds, then boundary cell, then obstacle cell.
//!
//! Obstacle hits use exact cell equality. A fast obstacle moves two rows per
//! tick and can therefore pass the vehicle's row without ever sharing its cell.

use crate::game::constants::scoring::{BOUNDARY_PENALTY, OUT_OF_BOUNDS_PENALTY};
use crate::game::obstacle::ObstacleKind;
use crate::game::track::Track;

/// What the vehicle ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    None,
    /// Position lies outside the track extent
    OutOfBounds,
    /// Position is a boundary cell
    Boundary,
    /// Position is shared with a live obstacle
    Hurdle { kind: ObstacleKind, damage: i64 },
}

impl Collision {
    #[inline]
    pub fn is_collision(&self) -> bool {
        !matches!(self, Collision::None)
    }

    /// Score deducted for this collision
    pub fn penalty(&self) -> i64 {
        match self {
            Collision::None => 0,
            Collision::OutOfBounds => OUT_OF_BOUNDS_PENALTY,
            Collision::Boundary => BOUNDARY_PENALTY,
            Collision::Hurdle { damage, .. } => *damage,
        }
    }
}

/// Classify the vehicle cell against the track
pub fn classify(x: i32, y: i32, track: &Track) -> Collision {
    if !track.contains(x, y) {
        return Collision::OutOfBounds;
    }

    if track.is_boundary(x, y) {
        return Collision::Boundary;
    }

    match track.obstacle_at(x, y) {
        Some(obstacle) => Collision::Hurdle {
            kind: obstacle.kind,
            damage: obstacle.damage(),
        },
        None => Collision::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::obstacle::Obstacle;

    fn create_test_track() -> Track {
        Track::with_seed(20, 40, 9)
    }

    #[test]
    fn test_out_of_bounds() {
        let track = create_test_track();
        assert_eq!(classify(-1, 10, &track), Collision::OutOfBounds);
        assert_eq!(classify(20, 10, &track), Collision::OutOfBounds);
        assert_eq!(classify(5, -1, &track), Collision::OutOfBounds);
        assert_eq!(classify(5, 40, &track), Collision::OutOfBounds);
    }

    #[test]
    fn test_boundary_cells_never_none() {
        let track = create_test_track();
        for y in 0..40 {
            assert_eq!(classify(0, y, &track), Collision::Boundary);
            assert_eq!(classify(19, y, &track), Collision::Boundary);
        }
    }

    #[test]
    fn test_boundary_beats_hurdle() {
        let mut track = create_test_track();
        track.add_obstacle(Obstacle::standard(0, 12));
        assert_eq!(classify(0, 12, &track), Collision::Boundary);
    }

    #[test]
    fn test_hurdle_on_exact_cell() {
        let mut track = create_test_track();
        track.add_obstacle(Obstacle::zigzag(10, 37));

        assert_eq!(
            classify(10, 37, &track),
            Collision::Hurdle {
                kind: ObstacleKind::Zigzag,
                damage: 75
            }
        );
        assert_eq!(classify(10, 36, &track), Collision::None);
        assert_eq!(classify(11, 37, &track), Collision::None);
    }

    #[test]
    fn test_fast_obstacle_can_tunnel() {
        let mut track = create_test_track();
        track.add_obstacle(Obstacle::fast(10, 36));

        track.scroll();

        // Jumped from row 36 to row 38, skipping the vehicle row
        assert_eq!(classify(10, 37, &track), Collision::None);
    }

    #[test]
    fn test_penalties() {
        assert_eq!(Collision::None.penalty(), 0);
        assert_eq!(Collision::Boundary.penalty(), 30);
        assert_eq!(Collision::OutOfBounds.penalty(), 50);
        assert_eq!(
            Collision::Hurdle {
                kind: ObstacleKind::Fast,
                damage: 60
            }
            .penalty(),
            60
        );
        assert!(!Collision::None.is_collision());
        assert!(Collision::Boundary.is_collision());
    }
}
