pub const ARENA_WIDTH: f64 = 800.0;
pub const ARENA_HEIGHT: f64 = 600.0;
pub const FRAME_MS: i64 = 16;
pub const MAX_FRAME_DELTA_MS: i64 = 100;

pub const HISTORY_CAPACITY: usize = 1000;
pub const SEGMENT_SPACING: usize = 5;
pub const HEAD_RADIUS: f64 = 10.0;
pub const BODY_RADIUS: f64 = 8.0;
pub const BODY_RADIUS_SHRINK_PER_SEGMENT: f64 = 0.1;
pub const BODY_RADIUS_MAX_SHRINK: f64 = 3.0;
pub const TURN_RATE: f64 = 0.05;
pub const BOOST_MULTIPLIER: f64 = 1.5;
pub const SELF_COLLISION_SKIP: usize = 10;
pub const SELF_COLLISION_RADIUS_WEIGHT: f64 = 0.5;
pub const BODY_CONTACT_RADIUS_WEIGHT: f64 = 0.8;

pub const PLAYER_START_LENGTH: usize = 5;
pub const PLAYER_BASE_SPEED: f64 = 2.0;
pub const AI_START_LENGTH: usize = 3;
pub const AI_BASE_SPEED_MIN: f64 = 1.5;
pub const AI_BASE_SPEED_MAX: f64 = 2.0;
pub const AI_EDGE_INSET: f64 = 20.0;
pub const AI_RESPAWN_DELAY_MS: i64 = 5000;
pub const AI_SCORE_PER_GROWTH: i64 = 10;
pub const DEFAULT_AI_COUNT: usize = 3;
pub const MAX_AI_COUNT: usize = 10;

pub const AI_POWER_UP_ATTRACTION: f64 = 0.7;
pub const AI_BOOST_DISTANCE: f64 = 100.0;
pub const AI_TURN_DEADBAND: f64 = 0.1;
pub const AI_HUNT_THRESHOLD: f64 = 0.5;
pub const AI_HUNT_RADIUS: f64 = 250.0;
pub const AI_AVOID_RADIUS: f64 = 100.0;

pub const FOOD_SCORE_PER_VALUE: i64 = 10;
pub const SPECIAL_FOOD_CHANCE: f64 = 0.1;
pub const REGULAR_FOOD_RADIUS: f64 = 12.0;
pub const REGULAR_FOOD_VALUE: usize = 1;
pub const SPECIAL_FOOD_RADIUS: f64 = 15.0;
pub const SPECIAL_FOOD_VALUE: usize = 3;
pub const INITIAL_FOOD: usize = 1;
pub const MIN_FOOD: usize = 1;
pub const MAX_FOOD: usize = 10;
pub const FOOD_TOP_UP_MIN_MS: i64 = 2000;
pub const FOOD_TOP_UP_MAX_MS: i64 = 5000;

pub const POWER_UP_RADIUS: f64 = 15.0;
pub const POWER_UP_MAX_COUNT: usize = 3;
pub const POWER_UP_ROLL_INTERVAL_MS: i64 = 10_000;
pub const POWER_UP_SPAWN_CHANCE: f64 = 0.3;
pub const SPEED_POWER_UP_MS: i64 = 5000;
pub const INVULNERABILITY_POWER_UP_MS: i64 = 7000;
pub const GHOST_POWER_UP_MS: i64 = 10_000;
pub const SPEED_POWER_UP_MULTIPLIER: f64 = 1.3;

pub const REMAINS_RADIUS: f64 = 20.0;
pub const REMAINS_GROWTH_DIVISOR: f64 = 20.0;
pub const REMAINS_LIFETIME_MS: i64 = 15_000;
pub const AI_KILL_BONUS: i64 = 50;

pub const SPAWN_MARGIN: f64 = 20.0;
pub const MAX_SPAWN_ATTEMPTS: usize = 32;
pub const FOOD_CLEARANCE: f64 = 50.0;
pub const POWER_UP_CLEARANCE: f64 = 100.0;

pub const TOUCH_DEADBAND: f64 = 0.1;

pub const NEON_COLORS: [&str; 5] = ["#0f0", "#f00", "#ff0", "#f0f", "#0ff"];
pub const PLAYER_COLOR: &str = "#0ff";
pub const PLAYER_HEAD_COLOR: &str = "#f0f";
pub const AI_HEAD_COLOR: &str = "#fff";
