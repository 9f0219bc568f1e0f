//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Polled deadlines against the run clock, no callbacks
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod hazards;
pub mod level;
pub mod platform;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use hazards::{AvalanchePhase, AvalancheSystem, ColdSystem, WindSystem, altitude_progress};
pub use level::{LevelGenerator, Terrain};
pub use platform::{ContactEffect, CrumbleState, Platform, PlatformKind};
pub use player::{AnimationState, Player};
pub use state::{
    GameEvent, GameOverReason, PlatformView, PlayerView, RenderSnapshot, RunPhase, RunState,
};
pub use tick::{ControlFrame, tick};
