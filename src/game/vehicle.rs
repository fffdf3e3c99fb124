//! Player vehicle
//!
//! Lateral movement, the acceleration ramp and crash/recovery state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::constants::vehicle::{
    ACCELERATION_TICKS, BASE_SPEED, MAX_SPEED, RECOVERY_CHANCE, SYMBOL,
};

/// The player's car
///
/// `y` never changes after placement. `x` always stays inside
/// `[left_boundary, right_boundary]` once a mutation completes.
#[derive(Debug, Clone)]
pub struct Vehicle {
    x: i32,
    y: i32,
    speed: i32,
    max_speed: i32,
    /// Ticks of pending speed increase
    acceleration_ticks: u32,
    crashed: bool,
    left_boundary: i32,
    right_boundary: i32,
}

impl Vehicle {
    pub fn new(x: i32, y: i32) -> Self {
        Self::with_max_speed(x, y, MAX_SPEED)
    }

    pub fn with_max_speed(x: i32, y: i32, max_speed: i32) -> Self {
        Self {
            x,
            y,
            speed: BASE_SPEED,
            max_speed: max_speed.max(BASE_SPEED),
            acceleration_ticks: 0,
            crashed: false,
            left_boundary: i32::MIN,
            right_boundary: i32::MAX,
        }
    }

    /// Set the lateral limits and pull the vehicle inside them
    pub fn set_boundaries(&mut self, left: i32, right: i32) {
        debug_assert!(left <= right, "left boundary must not exceed right boundary");
        self.left_boundary = left;
        self.right_boundary = right.max(left);
        self.clamp_to_boundaries();
    }

    /// Move left by the current speed. Returns whether the position changed.
    pub fn move_left(&mut self) -> bool {
        self.shift(-self.speed)
    }

    /// Move right by the current speed. Returns whether the position changed.
    pub fn move_right(&mut self) -> bool {
        self.shift(self.speed)
    }

    fn shift(&mut self, delta: i32) -> bool {
        if self.crashed {
            return false;
        }
        let target = self
            .x
            .saturating_add(delta)
            .clamp(self.left_boundary, self.right_boundary);
        let moved = target != self.x;
        self.x = target;
        moved
    }

    /// Arm the acceleration ramp
    pub fn accelerate(&mut self) {
        if self.crashed {
            return;
        }
        self.acceleration_ticks = ACCELERATION_TICKS;
    }

    pub fn decelerate(&mut self) {
        if self.crashed {
            return;
        }
        self.speed = (self.speed - 1).max(BASE_SPEED);
    }

    pub fn crash(&mut self) {
        self.crashed = true;
        self.speed = 0;
        self.acceleration_ticks = 0;
    }

    /// Per-tick self update, run before input is applied
    ///
    /// Advances a pending acceleration ramp, and gives a crashed vehicle a
    /// fixed chance to recover.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.acceleration_ticks > 0 {
            self.acceleration_ticks -= 1;
            if self.speed < self.max_speed {
                self.speed += 1;
            }
        }

        if self.crashed && rng.gen_bool(RECOVERY_CHANCE) {
            self.crashed = false;
            self.speed = BASE_SPEED;
        }
    }

    /// Reinitialize for a new session
    pub fn reset(&mut self, x: i32, y: i32) {
        self.y = y;
        self.x = x;
        self.speed = BASE_SPEED;
        self.acceleration_ticks = 0;
        self.crashed = false;
        self.clamp_to_boundaries();
    }

    /// Force x back inside the boundaries. Returns true if it had escaped.
    pub fn clamp_to_boundaries(&mut self) -> bool {
        let clamped = self.x.clamp(self.left_boundary, self.right_boundary);
        let corrected = clamped != self.x;
        self.x = clamped;
        corrected
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn max_speed(&self) -> i32 {
        self.max_speed
    }

    #[inline]
    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    pub fn is_accelerating(&self) -> bool {
        self.acceleration_ticks > 0
    }

    pub fn boundaries(&self) -> (i32, i32) {
        (self.left_boundary, self.right_boundary)
    }

    pub fn symbol(&self) -> char {
        SYMBOL
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            x: self.x,
            y: self.y,
            speed: self.speed,
            crashed: self.crashed,
            symbol: SYMBOL,
        }
    }
}

/// Copy of the vehicle handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub x: i32,
    pub y: i32,
    pub speed: i32,
    pub crashed: bool,
    pub symbol: char,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_vehicle(x: i32) -> Vehicle {
        let mut vehicle = Vehicle::new(x, 37);
        vehicle.set_boundaries(1, 18);
        vehicle
    }

    #[test]
    fn test_move_left_at_boundary_is_refused() {
        let mut vehicle = create_test_vehicle(1);

        assert!(!vehicle.move_left());
        assert_eq!(vehicle.x(), 1);
    }

    #[test]
    fn test_move_shifts_by_speed_and_clamps() {
        let mut vehicle = create_test_vehicle(10);
        let mut rng = StdRng::seed_from_u64(1);

        vehicle.accelerate();
        vehicle.update(&mut rng);
        vehicle.update(&mut rng);
        assert_eq!(vehicle.speed(), 3);

        assert!(vehicle.move_right());
        assert_eq!(vehicle.x(), 13);
        assert!(vehicle.move_right());
        assert_eq!(vehicle.x(), 16);

        // Only two cells left before the boundary
        assert!(vehicle.move_right());
        assert_eq!(vehicle.x(), 18);
        assert!(!vehicle.move_right());
        assert_eq!(vehicle.x(), 18);
    }

    #[test]
    fn test_acceleration_ramp_caps_at_max_speed() {
        let mut vehicle = create_test_vehicle(10);
        let mut rng = StdRng::seed_from_u64(2);

        vehicle.accelerate();
        assert!(vehicle.is_accelerating());
        for _ in 0..3 {
            vehicle.update(&mut rng);
        }
        assert_eq!(vehicle.speed(), MAX_SPEED);
        assert!(!vehicle.is_accelerating());

        // Ramp does not overshoot
        vehicle.accelerate();
        for _ in 0..5 {
            vehicle.update(&mut rng);
        }
        assert_eq!(vehicle.speed(), MAX_SPEED);
    }

    #[test]
    fn test_decelerate_floors_at_one() {
        let mut vehicle = create_test_vehicle(10);
        vehicle.decelerate();
        vehicle.decelerate();
        assert_eq!(vehicle.speed(), 1);
    }

    #[test]
    fn test_crashed_vehicle_ignores_controls() {
        let mut vehicle = create_test_vehicle(10);
        vehicle.crash();

        assert!(vehicle.is_crashed());
        assert_eq!(vehicle.speed(), 0);
        assert!(!vehicle.move_left());
        assert!(!vehicle.move_right());
        assert_eq!(vehicle.x(), 10);

        vehicle.accelerate();
        assert!(!vehicle.is_accelerating());
        vehicle.decelerate();
        assert_eq!(vehicle.speed(), 0);
    }

    #[test]
    fn test_crash_recovery_eventually_happens() {
        let mut vehicle = create_test_vehicle(10);
        let mut rng = StdRng::seed_from_u64(42);
        vehicle.crash();

        let mut ticks = 0;
        while vehicle.is_crashed() && ticks < 10_000 {
            vehicle.update(&mut rng);
            ticks += 1;
        }

        assert!(!vehicle.is_crashed());
        assert_eq!(vehicle.speed(), BASE_SPEED);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut vehicle = create_test_vehicle(10);
        vehicle.accelerate();
        vehicle.crash();

        vehicle.reset(4, 30);

        assert_eq!((vehicle.x(), vehicle.y()), (4, 30));
        assert_eq!(vehicle.speed(), BASE_SPEED);
        assert!(!vehicle.is_crashed());
        assert!(!vehicle.is_accelerating());
    }

    #[test]
    fn test_reset_outside_boundaries_is_clamped() {
        let mut vehicle = create_test_vehicle(10);
        vehicle.reset(40, 30);
        assert_eq!(vehicle.x(), 18);
        vehicle.reset(-3, 30);
        assert_eq!(vehicle.x(), 1);
    }
}
