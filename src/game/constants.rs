/// Timing constants - tick and frame cadence are independent
pub mod timing {
    /// Simulation tick rate in Hz
    pub const TICK_RATE: u32 = 20;
    /// Tick duration in milliseconds
    pub const TICK_DURATION_MS: u64 = 1000 / TICK_RATE as u64;
    /// Minimum time between two rendered frames (~30 FPS cap)
    pub const FRAME_INTERVAL_MS: u64 = 33;
    /// Length of one session in seconds
    pub const GAME_DURATION_SECS: u64 = 60;
    /// How long `stop()` waits for the tick task before giving up on it
    pub const STOP_TIMEOUT_MS: u64 = 1000;
    /// How long an input source waits for its worker thread on shutdown
    pub const INPUT_SHUTDOWN_MS: u64 = 500;
}

/// Vehicle constants
pub mod vehicle {
    /// Default top speed (cells per move)
    pub const MAX_SPEED: i32 = 3;
    /// Speed after a reset or crash recovery
    pub const BASE_SPEED: i32 = 1;
    /// Length of the acceleration ramp armed by `accelerate()`
    pub const ACCELERATION_TICKS: u32 = 3;
    /// Per-tick probability that a crashed vehicle recovers
    pub const RECOVERY_CHANCE: f64 = 0.1;
    /// Rows between the vehicle and the bottom edge of the track
    pub const START_ROW_OFFSET: i32 = 3;
    pub const SYMBOL: char = 'X';
}

/// Track geometry and difficulty curve
pub mod track {
    pub const WIDTH: i32 = 20;
    pub const HEIGHT: i32 = 40;
    pub const BOUNDARY: char = '|';
    pub const EMPTY: char = ' ';
    pub const MIN_DIFFICULTY: u32 = 1;
    pub const MAX_DIFFICULTY: u32 = 5;
    /// Distance between two difficulty increases
    pub const DIFFICULTY_DISTANCE: u64 = 500;
    /// Obstacles placed on the track when a session starts
    pub const INITIAL_OBSTACLES: i32 = 5;
    /// Row of the first initial obstacle
    pub const INITIAL_FIRST_ROW: i32 = 5;
    /// Rows between consecutive initial obstacles
    pub const INITIAL_ROW_SPACING: i32 = 3;
    /// Smallest usable track
    pub const MIN_WIDTH: i32 = 8;
    pub const MIN_HEIGHT: i32 = 5;
}

/// Obstacle generation cadence and variant odds
pub mod generation {
    /// Columns kept free next to each boundary when spawning randomly
    pub const SPAWN_MARGIN: i32 = 2;
    /// Generation interval at difficulty 0 (interval = BASE - level)
    pub const BASE_INTERVAL: u32 = 10;
    /// Floor of the generation interval
    pub const MIN_INTERVAL: u32 = 3;
    pub const ZIGZAG_MIN_LEVEL: u32 = 4;
    /// Percent chance of a zigzag once unlocked
    pub const ZIGZAG_CHANCE: u32 = 20;
    pub const FAST_MIN_LEVEL: u32 = 2;
    /// Percent chance of a fast obstacle once unlocked
    pub const FAST_CHANCE: u32 = 30;
    pub const PATTERN_MIN_LEVEL: u32 = 2;
    /// Pattern probability in percent per difficulty level
    pub const PATTERN_CHANCE_PER_LEVEL: u32 = 10;
    /// Zigzag obstacles shift sideways every this many ticks
    pub const ZIGZAG_SHIFT_PERIOD: u32 = 2;
}

/// Score penalties for collisions without an obstacle
pub mod scoring {
    pub const BOUNDARY_PENALTY: i64 = 30;
    pub const OUT_OF_BOUNDS_PENALTY: i64 = 50;
}

/// AI input constants
pub mod ai {
    /// Time between AI decisions in milliseconds
    pub const DECISION_INTERVAL_MS: u64 = 500;
}

/// Keyboard input constants
pub mod keyboard {
    /// Event poll timeout; also bounds how quickly the worker sees a stop request
    pub const POLL_INTERVAL_MS: u64 = 10;
}

/// Terminal presentation
pub mod render {
    /// Frames a transient hit effect stays on screen
    pub const EFFECT_FRAMES: u32 = 3;
    pub const COLLISION_SYMBOL: char = '#';
    pub const BOUNDARY_HIT_SYMBOL: char = '!';
}

/// Generation interval for a difficulty level
#[inline]
pub fn generation_interval(difficulty_level: u32) -> u32 {
    generation::BASE_INTERVAL
        .saturating_sub(difficulty_level)
        .max(generation::MIN_INTERVAL)
}
