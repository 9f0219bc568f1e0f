//! Platform entities
//!
//! Platforms are static terrain with per-kind contact behavior, dispatched
//! through a single tagged-enum match rather than one type per kind. The
//! crumble state machine is strictly one-way: Stable -> Shaking -> Destroyed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Platform kinds with differing contact behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Permanent, no contact effect
    Rock,
    /// Flags the player as on ice for the current frame
    Ice,
    /// Starts its destruction timer on first contact
    Crumbling,
    /// Terminal platform, triggers victory on contact
    Summit,
}

/// Crumble lifecycle for [`PlatformKind::Crumbling`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrumbleState {
    Stable,
    /// Destruction deadline on the run clock
    Shaking { until_ms: f64 },
    Destroyed,
}

/// Effect of a player landing on a platform, reported to the run driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEffect {
    None,
    /// Player is on ice this frame
    Ice,
    /// Crumble timer armed by this contact
    CrumbleStarted,
    /// Summit reached
    Victory,
}

/// A static terrain platform
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    /// Center position
    pub pos: Vec2,
    pub width: f32,
    pub crumble: CrumbleState,
}

impl Platform {
    pub fn new(id: u32, kind: PlatformKind, pos: Vec2, width: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            width,
            crumble: CrumbleState::Stable,
        }
    }

    /// Destroyed platforms are kept in the registry until the next prune
    /// pass but are no longer solid or contactable.
    #[inline]
    pub fn alive(&self) -> bool {
        self.crumble != CrumbleState::Destroyed
    }

    #[inline]
    pub fn shaking(&self) -> bool {
        matches!(self.crumble, CrumbleState::Shaking { .. })
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, PLATFORM_HEIGHT))
    }

    /// Top surface Y (player feet rest here)
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - PLATFORM_HEIGHT / 2.0
    }

    /// Player detected resting on top of this platform.
    ///
    /// Re-contacting a shaking platform has no effect; the deadline set by
    /// the first contact stands.
    pub fn on_contact(&mut self, now_ms: f64) -> ContactEffect {
        if !self.alive() {
            return ContactEffect::None;
        }
        match self.kind {
            PlatformKind::Rock => ContactEffect::None,
            PlatformKind::Ice => ContactEffect::Ice,
            PlatformKind::Crumbling => {
                if self.crumble == CrumbleState::Stable {
                    self.crumble = CrumbleState::Shaking {
                        until_ms: now_ms + CRUMBLE_DELAY_MS,
                    };
                    ContactEffect::CrumbleStarted
                } else {
                    ContactEffect::None
                }
            }
            PlatformKind::Summit => ContactEffect::Victory,
        }
    }

    /// Advance the crumble timer. Returns true when the platform is
    /// destroyed by this poll.
    pub fn tick_crumble(&mut self, now_ms: f64) -> bool {
        if let CrumbleState::Shaking { until_ms } = self.crumble
            && now_ms >= until_ms
        {
            self.crumble = CrumbleState::Destroyed;
            return true;
        }
        false
    }
}
