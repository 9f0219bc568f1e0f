//! Terrain registry and procedural level generation
//!
//! [`Terrain`] owns the live platform list and answers the spatial queries
//! the rest of the sim needs (standing contact, wall contact, avalanche
//! shelter). [`LevelGenerator`] emits rows of platforms ahead of the camera
//! frontier and places the terminal summit platform exactly once.

use glam::Vec2;
use rand::Rng;

use super::collision::{Aabb, CONTACT_EPSILON};
use super::platform::{ContactEffect, Platform, PlatformKind};
use super::state::GameEvent;
use crate::consts::*;

/// Mutable registry of live platforms
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    platforms: Vec<Platform>,
    next_id: u32,
}

impl Terrain {
    pub fn new() -> Self {
        Self {
            platforms: Vec::new(),
            next_id: 1,
        }
    }

    pub fn spawn(&mut self, kind: PlatformKind, pos: Vec2, width: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.platforms.push(Platform::new(id, kind, pos, width));
        id
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Iterate platforms that are still solid
    pub fn alive(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(|p| p.alive())
    }

    /// The platform the body is resting on from above, if any
    pub fn standing_platform(&self, body: &Aabb) -> Option<u32> {
        self.alive()
            .find(|p| {
                body.overlaps_x(&p.aabb()) && (body.bottom() - p.top()).abs() <= CONTACT_EPSILON
            })
            .map(|p| p.id)
    }

    /// Horizontal wall contact: -1 wall on the left, +1 on the right, 0 none.
    ///
    /// Map edges count as walls, as do platform sides at the same height.
    pub fn wall_contact(&self, body: &Aabb) -> i8 {
        if body.left() <= CONTACT_EPSILON {
            return -1;
        }
        if body.right() >= WORLD_WIDTH - CONTACT_EPSILON {
            return 1;
        }
        for p in self.alive() {
            let solid = p.aabb();
            if !body.overlaps_y(&solid) {
                continue;
            }
            if (body.left() - solid.right()).abs() <= CONTACT_EPSILON {
                return -1;
            }
            if (body.right() - solid.left()).abs() <= CONTACT_EPSILON {
                return 1;
            }
        }
        0
    }

    /// Dispatch a standing contact to the platform's kind handler
    pub fn contact(&mut self, id: u32, now_ms: f64) -> ContactEffect {
        match self.platforms.iter_mut().find(|p| p.id == id) {
            Some(p) => p.on_contact(now_ms),
            None => ContactEffect::None,
        }
    }

    /// Poll crumble deadlines against the run clock
    pub fn tick_crumble(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        for p in &mut self.platforms {
            if p.tick_crumble(now_ms) {
                log::debug!("platform {} crumbled away at y={:.0}", p.id, p.pos.y);
                events.push(GameEvent::PlatformDestroyed { id: p.id });
            }
        }
    }

    /// Drop destroyed platforms and platforms far below the camera frontier
    pub fn prune(&mut self, camera_y: f32) {
        self.platforms
            .retain(|p| p.alive() && p.pos.y <= camera_y + VIEW_HEIGHT + CLEANUP_BEHIND);
    }

    /// Shelter test for the avalanche: a live platform above the body's head
    /// within [`SHELTER_DISTANCE`] whose horizontal extent strictly contains
    /// the body's.
    pub fn is_sheltered(&self, body: &Aabb) -> bool {
        let head = body.top();
        self.alive().any(|p| {
            let solid = p.aabb();
            p.pos.y < head
                && (p.pos.y - head).abs() < SHELTER_DISTANCE
                && body.left() > solid.left()
                && body.right() < solid.right()
        })
    }
}

/// Procedural row generator with altitude bookkeeping
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    /// Y of the highest generated row (decreases as generation climbs)
    highest_y: f32,
    /// One-way flag: once set, no further rows are ever generated
    summit_spawned: bool,
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelGenerator {
    pub fn new() -> Self {
        Self {
            highest_y: SPAWN_ORIGIN_Y,
            summit_spawned: false,
        }
    }

    #[inline]
    pub fn highest_generated_y(&self) -> f32 {
        self.highest_y
    }

    #[inline]
    pub fn summit_spawned(&self) -> bool {
        self.summit_spawned
    }

    /// Spawn the wide starting platform and pre-generate the opening rows
    pub fn seed_initial(&mut self, terrain: &mut Terrain, rng: &mut impl Rng) {
        terrain.spawn(
            PlatformKind::Rock,
            Vec2::new(WORLD_WIDTH / 2.0, SPAWN_ORIGIN_Y),
            START_PLATFORM_WIDTH,
        );
        for _ in 0..INITIAL_ROWS {
            self.generate_row(terrain, rng);
        }
    }

    /// Keep generated terrain at least [`SPAWN_AHEAD`] above the camera
    /// frontier until the summit is placed
    pub fn update(&mut self, terrain: &mut Terrain, camera_y: f32, rng: &mut impl Rng) {
        while self.highest_y > camera_y - SPAWN_AHEAD && !self.summit_spawned {
            self.generate_row(terrain, rng);
        }
    }

    fn generate_row(&mut self, terrain: &mut Terrain, rng: &mut impl Rng) {
        if self.summit_spawned {
            return;
        }

        let climbed = SPAWN_ORIGIN_Y - self.highest_y;
        if climbed >= SUMMIT_ALTITUDE {
            self.spawn_summit(terrain);
            return;
        }

        // One comfortable jump up
        let gap = rng.random_range(ROW_GAP_MIN..=ROW_GAP_MAX);
        let row_y = self.highest_y - gap;

        // Partition the map into equal zones, one platform per zone
        let count = rng.random_range(ROW_PLATFORMS_MIN..=ROW_PLATFORMS_MAX);
        let zone_width = WORLD_WIDTH / count as f32;

        for i in 0..count {
            let zone_center = i as f32 * zone_width + zone_width / 2.0;
            let x_offset = rng.random_range(-zone_width * 0.3..=zone_width * 0.3);
            let x = (zone_center + x_offset).clamp(EDGE_MARGIN, WORLD_WIDTH - EDGE_MARGIN);
            let y = row_y + rng.random_range(-ROW_Y_JITTER..=ROW_Y_JITTER);
            let width = rng.random_range(PLATFORM_WIDTH_MIN..=PLATFORM_WIDTH_MAX);
            let kind = choose_kind(rng);
            terrain.spawn(kind, Vec2::new(x, y), width);
        }

        self.highest_y = row_y;
    }

    fn spawn_summit(&mut self, terrain: &mut Terrain) {
        let summit_y = self.highest_y - SUMMIT_ROW_GAP;
        terrain.spawn(
            PlatformKind::Summit,
            Vec2::new(WORLD_WIDTH / 2.0, summit_y),
            SUMMIT_PLATFORM_WIDTH,
        );
        self.summit_spawned = true;
        self.highest_y = summit_y;
        log::info!("summit platform placed at y={summit_y:.0}");
    }
}

fn choose_kind(rng: &mut impl Rng) -> PlatformKind {
    let roll: f32 = rng.random();
    if roll < ICE_CHANCE {
        PlatformKind::Ice
    } else if roll < ICE_CHANCE + CRUMBLING_CHANCE {
        PlatformKind::Crumbling
    } else {
        PlatformKind::Rock
    }
}
