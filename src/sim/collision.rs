//! Axis-aligned collision detection and response
//!
//! The player is a single AABB moved through a field of static platform
//! AABBs plus the two map-edge walls. Movement is resolved one axis at a
//! time: horizontal first (side pushes, wall contact), then vertical
//! (landings and head bonks). Per-frame displacement is well below the
//! platform thickness, so discrete overlap tests are sufficient.

use glam::Vec2;

use super::level::Terrain;
use crate::consts::*;

/// Contact probe tolerance in world units
pub const CONTACT_EPSILON: f32 = 1.0;

/// Axis-aligned bounding box, stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() < self.half.y + other.half.y
    }

    /// Horizontal ranges overlap (ignores vertical position)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
    }

    /// Vertical ranges overlap (ignores horizontal position)
    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        (self.center.y - other.center.y).abs() < self.half.y + other.half.y
    }
}

/// Move a body and resolve collisions against terrain and map bounds.
///
/// Resolution is direction-based: a body moving down lands on top of a
/// platform, a body moving up bonks its head, horizontal overlap pushes the
/// body back out the side it came from. Velocity along a resolved axis is
/// zeroed.
pub fn move_and_collide(pos: &mut Vec2, vel: &mut Vec2, half: Vec2, terrain: &Terrain, dt: f32) {
    // Horizontal pass
    let old_x = pos.x;
    pos.x += vel.x * dt;

    let min_x = half.x;
    let max_x = WORLD_WIDTH - half.x;
    if pos.x < min_x {
        pos.x = min_x;
        vel.x = 0.0;
    } else if pos.x > max_x {
        pos.x = max_x;
        vel.x = 0.0;
    }

    let body_x = Aabb {
        center: Vec2::new(pos.x, pos.y),
        half,
    };
    for p in terrain.alive() {
        let solid = p.aabb();
        if body_x.overlaps(&solid) {
            if old_x < solid.center.x {
                pos.x = solid.left() - half.x;
            } else {
                pos.x = solid.right() + half.x;
            }
            vel.x = 0.0;
        }
    }

    // Vertical pass
    pos.y += vel.y * dt;

    let body_y = Aabb {
        center: *pos,
        half,
    };
    for p in terrain.alive() {
        let solid = p.aabb();
        if body_y.overlaps(&solid) {
            if vel.y > 0.0 {
                pos.y = solid.top() - half.y;
            } else if vel.y < 0.0 {
                pos.y = solid.bottom() + half.y;
            } else {
                continue;
            }
            vel.y = 0.0;
        }
    }
}
