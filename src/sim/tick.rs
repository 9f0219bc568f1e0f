//! Frame driver
//!
//! One [`tick`] advances the whole simulation by one frame in a fixed
//! order: clock, contact probe, platform contact effects, player forces,
//! integration, level upkeep, hazards, fall check. Hazard checks run after
//! physics so they see the player's settled position for the frame.

use crate::consts::*;
use crate::sim::collision::move_and_collide;
use crate::sim::platform::ContactEffect;
use crate::sim::player::Player;
use crate::sim::state::{GameEvent, GameOverReason, RunState};

/// One frame of player input, already mapped from whatever device the
/// caller reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFrame {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the simulation by `delta_ms`.
///
/// `camera_y` is the top of the camera window in world space, owned by the
/// caller; the sim uses it for generation lookahead, cleanup and the fall
/// check. Once the run has terminated this is a no-op.
pub fn tick(state: &mut RunState, control: &ControlFrame, camera_y: f32, delta_ms: f32) {
    if state.is_over() {
        return;
    }

    state.time_ms += delta_ms as f64;
    let now = state.time_ms;
    let dt = delta_ms / 1000.0;

    // Contact pass: probe rest contacts from the settled position, then
    // dispatch per-kind platform effects. On-ice is latched for exactly
    // this frame; set_contacts clears it first.
    let reached_summit = {
        let RunState {
            player,
            terrain,
            events,
            ..
        } = &mut *state;

        let body = player.aabb();
        let standing = terrain.standing_platform(&body);
        let wall = terrain.wall_contact(&body);
        player.set_contacts(standing.is_some(), wall);

        let mut summit = false;
        if let Some(id) = standing {
            match terrain.contact(id, now) {
                ContactEffect::None => {}
                ContactEffect::Ice => player.set_on_ice(),
                ContactEffect::CrumbleStarted => {
                    events.push(GameEvent::PlatformCrumbling { id });
                }
                ContactEffect::Victory => summit = true,
            }
        }
        summit
    };
    if reached_summit {
        state.trigger_victory();
        return;
    }

    // Physics, level upkeep and hazards. The first terminal condition
    // detected this frame wins; the rest are not evaluated.
    let verdict = {
        let RunState {
            player,
            terrain,
            generator,
            wind,
            avalanche,
            cold,
            max_altitude,
            rng,
            events,
            ..
        } = &mut *state;

        player.update(control, wind.force(), now, dt, rng, events);
        move_and_collide(&mut player.pos, &mut player.vel, Player::half_extents(), terrain, dt);

        let altitude = player.altitude();
        *max_altitude = max_altitude.max(altitude);

        generator.update(terrain, camera_y, rng);
        terrain.tick_crumble(now, events);
        terrain.prune(camera_y);

        wind.update(now, altitude, rng, events);

        let mut verdict = avalanche.update(now, altitude, &player.aabb(), terrain, rng, events);
        if verdict.is_none() {
            verdict = cold.update(delta_ms, player.pos, altitude);
        }
        if verdict.is_none() && player.pos.y > camera_y + VIEW_HEIGHT + FALL_MARGIN {
            verdict = Some(GameOverReason::Fall);
        }
        verdict
    };
    if let Some(reason) = verdict {
        state.trigger_game_over(reason);
    }
}
