//! The Ascent - core simulation for a vertical climbing platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, level generation,
//!   environmental hazards, run lifecycle)
//!
//! Rendering, audio, HUD and input-device handling are external
//! collaborators: they feed a normalized [`sim::ControlFrame`] in and read
//! [`sim::RenderSnapshot`] / drained [`sim::GameEvent`]s out.

pub mod sim;

pub use sim::{ControlFrame, GameEvent, GameOverReason, RenderSnapshot, RunPhase, RunState, tick};

/// Game configuration constants
///
/// Loaded once at startup, immutable for the run. Altitude-interpolated
/// hazard parameters are floored at runtime, so a bad edit here degrades
/// difficulty tuning rather than breaking invariants.
pub mod consts {
    /// Reference fixed timestep for the demo runner and tests (60 Hz, ms)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;

    /// Player physics
    pub const GRAVITY: f32 = 1000.0;
    pub const PLAYER_SPEED: f32 = 220.0;
    /// Negative = upward
    pub const JUMP_VELOCITY: f32 = -520.0;
    pub const MAX_FALL_SPEED: f32 = 800.0;
    pub const WALL_SLIDE_SPEED: f32 = 80.0;
    pub const WALL_JUMP_X: f32 = 300.0;
    pub const WALL_JUMP_Y: f32 = -480.0;
    pub const WALL_JUMP_COOLDOWN_MS: f64 = 200.0;
    /// Per-frame horizontal decay while sliding on ice with no input
    pub const ICE_FRICTION: f32 = 0.98;
    /// Per-frame exponential blend factor toward the target speed on ice
    pub const ICE_STEER_FACTOR: f32 = 0.02;
    /// Random speed boost range while running on ice
    pub const ICE_BOOST_MIN: f32 = 1.1;
    pub const ICE_BOOST_MAX: f32 = 1.2;
    /// Player collision body
    pub const PLAYER_WIDTH: f32 = 14.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;

    /// Platforms
    pub const PLATFORM_HEIGHT: f32 = 24.0;
    pub const CRUMBLE_DELAY_MS: f64 = 1500.0;

    /// Level generation
    pub const SPAWN_ORIGIN_Y: f32 = 500.0;
    pub const SUMMIT_ALTITUDE: f32 = 8000.0;
    pub const SPAWN_AHEAD: f32 = 600.0;
    pub const CLEANUP_BEHIND: f32 = 800.0;
    pub const ROW_GAP_MIN: f32 = 80.0;
    pub const ROW_GAP_MAX: f32 = 110.0;
    pub const ROW_PLATFORMS_MIN: u32 = 2;
    pub const ROW_PLATFORMS_MAX: u32 = 4;
    pub const PLATFORM_WIDTH_MIN: f32 = 80.0;
    pub const PLATFORM_WIDTH_MAX: f32 = 150.0;
    pub const ROW_Y_JITTER: f32 = 15.0;
    pub const EDGE_MARGIN: f32 = 60.0;
    pub const START_PLATFORM_WIDTH: f32 = 300.0;
    pub const SUMMIT_PLATFORM_WIDTH: f32 = 200.0;
    pub const SUMMIT_ROW_GAP: f32 = 100.0;
    pub const INITIAL_ROWS: u32 = 10;
    /// Platform kind weights (rock = remainder)
    pub const ICE_CHANCE: f32 = 0.2;
    pub const CRUMBLING_CHANCE: f32 = 0.2;

    /// Run termination
    pub const FALL_MARGIN: f32 = 50.0;

    /// Wind hazard: idle delay interpolates base -> summit, floored
    pub const WIND_IDLE_MIN_BASE_MS: f64 = 20_000.0;
    pub const WIND_IDLE_MIN_SUMMIT_MS: f64 = 5_000.0;
    pub const WIND_IDLE_MAX_BASE_MS: f64 = 30_000.0;
    pub const WIND_IDLE_MAX_SUMMIT_MS: f64 = 10_000.0;
    pub const WIND_IDLE_FLOOR_MS: f64 = 5_000.0;
    pub const WIND_FORCE_BASE: f32 = 200.0;
    pub const WIND_FORCE_SUMMIT: f32 = 400.0;
    pub const GUST_DURATION_MIN_MS: f64 = 2_000.0;
    pub const GUST_DURATION_MAX_MS: f64 = 3_000.0;

    /// Avalanche hazard
    pub const AVALANCHE_DELAY_MIN_BASE_MS: f64 = 45_000.0;
    pub const AVALANCHE_DELAY_MIN_SUMMIT_MS: f64 = 8_000.0;
    pub const AVALANCHE_DELAY_MAX_BASE_MS: f64 = 60_000.0;
    pub const AVALANCHE_DELAY_MAX_SUMMIT_MS: f64 = 15_000.0;
    pub const AVALANCHE_DELAY_FLOOR_MS: f64 = 5_000.0;
    pub const AVALANCHE_WARNING_MS: f64 = 4_000.0;
    pub const AVALANCHE_ACTIVE_MS: f64 = 3_000.0;
    pub const AVALANCHE_SAFETY_CHECK_DELAY_MS: f64 = 1_000.0;
    /// Max vertical distance to an overhead platform that counts as shelter
    pub const SHELTER_DISTANCE: f32 = 150.0;

    /// Cold hazard
    pub const CHILL_THRESHOLD_BASE_MS: f32 = 60_000.0;
    pub const CHILL_THRESHOLD_SUMMIT_MS: f32 = 15_000.0;
    pub const FREEZE_THRESHOLD_BASE_MS: f32 = 30_000.0;
    pub const FREEZE_THRESHOLD_SUMMIT_MS: f32 = 12_000.0;
    pub const COLD_THRESHOLD_FLOOR_MS: f32 = 10_000.0;
    /// Movement below this many world units counts as standing still
    pub const IDLE_EPSILON: f32 = 2.0;
}

/// Linear interpolation between `a` and `b` by `t` in [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation over f64 millisecond quantities
#[inline]
pub fn lerp_ms(a: f64, b: f64, t: f32) -> f64 {
    a + (b - a) * t as f64
}
