//! Run state and core simulation types
//!
//! One [`RunState`] owns everything for a single climb: player, terrain,
//! generator, the three hazard systems, the seeded RNG and the outbound
//! event queue. Nothing survives across runs; a reset constructs a fresh
//! state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hazards::{AvalanchePhase, AvalancheSystem, ColdSystem, WindSystem};
use super::level::{LevelGenerator, Terrain};
use super::platform::PlatformKind;
use super::player::{AnimationState, Player};
use crate::consts::*;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Fell below the camera window
    Fall,
    /// Idled past the freeze threshold
    Frozen,
    /// Caught unsheltered by an avalanche
    Avalanche,
    /// Hit by an enemy (reported by the external enemy subsystem)
    Enemy,
}

/// Run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Climbing,
    GameOver(GameOverReason),
    Victory,
}

/// Outbound cues for the external audio/VFX/HUD collaborators, drained once
/// per frame via [`RunState::take_events`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Jumped,
    WallJumped,
    GustStarted { force: f32 },
    GustEnded,
    AvalancheWarning,
    AvalancheActive,
    AvalancheEnded,
    PlatformCrumbling { id: u32 },
    PlatformDestroyed { id: u32 },
    GameOver { reason: GameOverReason },
    Victory,
}

/// Complete per-run simulation state
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Run clock, advanced by the frame driver (ms)
    pub time_ms: f64,
    pub phase: RunPhase,
    pub player: Player,
    pub terrain: Terrain,
    pub generator: LevelGenerator,
    pub wind: WindSystem,
    pub avalanche: AvalancheSystem,
    pub cold: ColdSystem,
    /// Highest altitude reached, monotonic
    pub max_altitude: f32,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl RunState {
    /// Construct a fresh run: player on the starting platform, opening rows
    /// pre-generated, hazards scheduled from their base (low-altitude) ranges.
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut terrain = Terrain::new();
        let mut generator = LevelGenerator::new();
        generator.seed_initial(&mut terrain, &mut rng);

        let spawn = Vec2::new(
            WORLD_WIDTH / 2.0,
            SPAWN_ORIGIN_Y - PLATFORM_HEIGHT / 2.0 - PLAYER_HEIGHT / 2.0,
        );
        let player = Player::new(spawn);
        let wind = WindSystem::new(&mut rng);
        let avalanche = AvalancheSystem::new(&mut rng);
        let cold = ColdSystem::new(spawn);

        Self {
            seed,
            time_ms: 0.0,
            phase: RunPhase::Climbing,
            player,
            terrain,
            generator,
            wind,
            avalanche,
            cold,
            max_altitude: 0.0,
            rng,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase != RunPhase::Climbing
    }

    /// End the run. Idempotent and fire-once: the first terminal condition
    /// wins, all hazard effects are neutralized, and no further physics runs.
    pub fn trigger_game_over(&mut self, reason: GameOverReason) {
        if self.phase != RunPhase::Climbing {
            return;
        }
        self.phase = RunPhase::GameOver(reason);
        self.wind.neutralize();
        self.avalanche.neutralize();
        self.events.push(GameEvent::GameOver { reason });
        log::info!(
            "game over ({reason:?}) at altitude {:.0}, best {:.0}",
            self.player.altitude(),
            self.max_altitude
        );
    }

    /// Summit reached. Same idempotence and neutralization as game over.
    pub fn trigger_victory(&mut self) {
        if self.phase != RunPhase::Climbing {
            return;
        }
        self.phase = RunPhase::Victory;
        self.wind.neutralize();
        self.avalanche.neutralize();
        self.events.push(GameEvent::Victory);
        log::info!("summit reached after {:.1}s", self.time_ms / 1000.0);
    }

    /// Entry point for the external enemy subsystem
    pub fn report_enemy_hit(&mut self) {
        self.trigger_game_over(GameOverReason::Enemy);
    }

    /// Drain queued events for external collaborators
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for rendering and audio cues
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            altitude: self.player.altitude(),
            max_altitude: self.max_altitude,
            wind_force: self.wind.force(),
            avalanche_phase: self.avalanche.phase(),
            chill_progress: self.cold.chill_progress(),
            player: PlayerView {
                pos: self.player.pos,
                vel: self.player.vel,
                facing_right: self.player.facing_right,
                animation: self.player.animation(),
            },
            platforms: self
                .terrain
                .platforms()
                .iter()
                .filter(|p| p.alive())
                .map(|p| PlatformView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                    width: p.width,
                    shaking: p.shaking(),
                })
                .collect(),
        }
    }
}

/// Player state as seen by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub facing_right: bool,
    pub animation: AnimationState,
}

/// Platform state as seen by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformView {
    pub id: u32,
    pub kind: PlatformKind,
    pub pos: Vec2,
    pub width: f32,
    pub shaking: bool,
}

/// Per-frame read-only snapshot of everything external collaborators need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: RunPhase,
    pub altitude: f32,
    pub max_altitude: f32,
    pub wind_force: f32,
    pub avalanche_phase: AvalanchePhase,
    pub chill_progress: f32,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
}
