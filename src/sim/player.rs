//! Player controller
//!
//! A finite-state physics body over the cross product of ground/air and
//! wall/no-wall. Contact flags are probed from terrain at the start of each
//! frame by the run driver; `update` turns the control signal, wind force
//! and those flags into velocity, and the driver then integrates the body
//! through [`super::collision::move_and_collide`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::GameEvent;
use super::tick::ControlFrame;
use crate::consts::*;
use crate::lerp;

/// Animation classification exposed for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationState {
    Idle,
    Run,
    Jump,
    Fall,
    WallSlide,
}

/// The climbing avatar
#[derive(Debug, Clone)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub facing_right: bool,
    /// Resting on a platform top (probed at frame start)
    pub on_ground: bool,
    /// -1 wall on the left, +1 on the right, 0 airborne/clear
    pub wall_dir: i8,
    /// One-frame latch set by ice platform contact, cleared every frame
    pub on_ice: bool,
    can_wall_jump: bool,
    last_wall_jump_ms: f64,
    prev_jump_held: bool,
    /// Current ice speed boost, re-rolled when running starts or reverses
    ice_boost: f32,
    ice_boost_dir: i8,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing_right: true,
            on_ground: false,
            wall_dir: 0,
            on_ice: false,
            can_wall_jump: true,
            last_wall_jump_ms: f64::NEG_INFINITY,
            prev_jump_held: false,
            ice_boost: 1.0,
            ice_boost_dir: 0,
        }
    }

    #[inline]
    pub fn half_extents() -> Vec2 {
        Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0)
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            center: self.pos,
            half: Self::half_extents(),
        }
    }

    /// Derived altitude above the spawn origin, never negative
    #[inline]
    pub fn altitude(&self) -> f32 {
        (SPAWN_ORIGIN_Y - self.pos.y).max(0.0)
    }

    #[inline]
    pub fn is_on_wall(&self) -> bool {
        self.wall_dir != 0
    }

    #[inline]
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Install this frame's probed contact flags and clear the ice latch.
    /// Terrain contact dispatch may re-assert `on_ice` before `update` runs.
    pub fn set_contacts(&mut self, on_ground: bool, wall_dir: i8) {
        self.on_ground = on_ground;
        self.wall_dir = wall_dir;
        self.on_ice = false;
    }

    pub fn set_on_ice(&mut self) {
        self.on_ice = true;
    }

    /// Apply control and environmental forces to velocity for this frame.
    ///
    /// `dt` is in seconds, `now_ms` is the run clock. Position integration
    /// and collision response happen afterwards in the run driver.
    pub fn update(
        &mut self,
        control: &ControlFrame,
        wind_force: f32,
        now_ms: f64,
        dt: f32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        let move_dir: i8 = match (control.left, control.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        if move_dir != 0 {
            self.facing_right = move_dir > 0;
        }
        let target_vx = move_dir as f32 * PLAYER_SPEED;

        if self.on_ground && self.on_ice {
            if move_dir != 0 {
                // Slippery but faster: blend toward a boosted target speed.
                // The boost is re-rolled per movement start, not per frame.
                if move_dir != self.ice_boost_dir {
                    self.ice_boost = rng.random_range(ICE_BOOST_MIN..ICE_BOOST_MAX);
                    self.ice_boost_dir = move_dir;
                }
                self.vel.x = lerp(self.vel.x, target_vx * self.ice_boost, ICE_STEER_FACTOR);
            } else {
                // Slide to a stop
                self.vel.x *= ICE_FRICTION;
                self.ice_boost_dir = 0;
            }
        } else if self.on_ground || self.wall_dir == 0 {
            // Direct control on solid ground (even flush against a wall)
            // and in the air; horizontal input is ignored only while
            // clinging to a wall airborne
            self.vel.x = target_vx;
        }

        // Wind pushes only while airborne and off walls
        if !self.on_ground && self.wall_dir == 0 {
            self.vel.x += wind_force * dt;
        }

        // Gravity, clamped to terminal fall speed
        self.vel.y = (self.vel.y + GRAVITY * dt).min(MAX_FALL_SPEED);

        // Wall slide: controlled descent, and touching the wall while
        // falling re-arms the wall jump
        if self.wall_dir != 0 && !self.on_ground && self.vel.y > 0.0 {
            self.vel.y = self.vel.y.min(WALL_SLIDE_SPEED);
            self.can_wall_jump = true;
        }

        // The core owns jump edge detection
        let jump_edge = control.jump && !self.prev_jump_held;
        self.prev_jump_held = control.jump;

        if jump_edge {
            if self.on_ground {
                self.vel.y = JUMP_VELOCITY;
                events.push(GameEvent::Jumped);
            } else if self.wall_dir != 0
                && self.can_wall_jump
                && now_ms - self.last_wall_jump_ms >= WALL_JUMP_COOLDOWN_MS
            {
                // Push away from the wall and flip to face the push
                self.vel.y = WALL_JUMP_Y;
                self.vel.x = -(self.wall_dir as f32) * WALL_JUMP_X;
                self.can_wall_jump = false;
                self.last_wall_jump_ms = now_ms;
                self.facing_right = self.wall_dir < 0;
                events.push(GameEvent::WallJumped);
            }
            // No coyote time: without ground or wall contact the edge is lost
        }
    }

    pub fn animation(&self) -> AnimationState {
        if !self.on_ground {
            if self.wall_dir != 0 {
                AnimationState::WallSlide
            } else if self.vel.y < 0.0 {
                AnimationState::Jump
            } else {
                AnimationState::Fall
            }
        } else if self.vel.x.abs() > 10.0 {
            AnimationState::Run
        } else {
            AnimationState::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn player_on_ground() -> Player {
        let mut p = Player::new(Vec2::new(400.0, 472.0));
        p.set_contacts(true, 0);
        p
    }

    fn step(p: &mut Player, control: &ControlFrame, now_ms: f64) {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        p.update(control, 0.0, now_ms, DT, &mut rng, &mut events);
    }

    #[test]
    fn grounded_horizontal_velocity_follows_control() {
        let mut p = player_on_ground();
        step(
            &mut p,
            &ControlFrame {
                right: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(p.vel.x, PLAYER_SPEED);
        assert!(p.facing_right);

        step(
            &mut p,
            &ControlFrame {
                left: true,
                ..Default::default()
            },
            DT as f64 * 1000.0,
        );
        assert_eq!(p.vel.x, -PLAYER_SPEED);
        assert!(!p.facing_right);

        step(&mut p, &ControlFrame::default(), 2.0 * DT as f64 * 1000.0);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn jump_fires_on_rising_edge_only() {
        let mut p = player_on_ground();
        let jump = ControlFrame {
            jump: true,
            ..Default::default()
        };

        step(&mut p, &jump, 0.0);
        assert_eq!(p.vel.y, JUMP_VELOCITY);

        // Held jump must not re-trigger even if re-grounded
        p.vel.y = 0.0;
        p.set_contacts(true, 0);
        step(&mut p, &jump, 16.0);
        assert!(p.vel.y > JUMP_VELOCITY / 2.0);
    }

    #[test]
    fn no_coyote_time_after_leaving_ground() {
        let mut p = Player::new(Vec2::new(400.0, 300.0));
        p.set_contacts(false, 0);
        let jump = ControlFrame {
            jump: true,
            ..Default::default()
        };
        step(&mut p, &jump, 0.0);
        // Only gravity applied
        assert!(p.vel.y > 0.0);
    }

    #[test]
    fn wall_jump_rate_limited_to_200ms() {
        let mut p = Player::new(Vec2::new(10.0, 300.0));
        p.set_contacts(false, -1);
        p.vel.y = 100.0;

        // One sliding frame arms the wall jump
        step(&mut p, &ControlFrame::default(), 0.0);
        assert!(p.vel.y <= WALL_SLIDE_SPEED);

        let jump = ControlFrame {
            jump: true,
            ..Default::default()
        };
        step(&mut p, &jump, 16.0);
        assert_eq!(p.vel.y, WALL_JUMP_Y);
        assert_eq!(p.vel.x, WALL_JUMP_X);
        assert!(p.facing_right);

        // Re-arm by touching the wall while falling, then attempt again
        // inside the cooldown window: velocity stays at wall-slide values
        p.set_contacts(false, -1);
        p.vel = Vec2::new(0.0, 100.0);
        step(&mut p, &ControlFrame::default(), 50.0);
        let before = p.vel;
        step(&mut p, &jump, 100.0);
        assert_eq!(p.vel.x, before.x);
        assert!(p.vel.y <= WALL_SLIDE_SPEED);

        // After the cooldown the jump fires again
        p.vel = Vec2::new(0.0, 100.0);
        step(&mut p, &ControlFrame::default(), 200.0);
        let jump2 = ControlFrame {
            jump: true,
            ..Default::default()
        };
        step(&mut p, &jump2, 250.0);
        assert_eq!(p.vel.y, WALL_JUMP_Y);
    }

    #[test]
    fn grounded_movement_is_not_frozen_by_adjacent_wall() {
        // Standing flush against the left map edge: both contacts hold
        let mut p = Player::new(Vec2::new(PLAYER_WIDTH / 2.0, 472.0));
        p.set_contacts(true, -1);

        // Walking away from the wall works immediately
        step(
            &mut p,
            &ControlFrame {
                right: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(p.vel.x, PLAYER_SPEED);

        // So does pressing into it; the collision pass owns the clamp
        p.set_contacts(true, -1);
        step(
            &mut p,
            &ControlFrame {
                left: true,
                ..Default::default()
            },
            16.0,
        );
        assert_eq!(p.vel.x, -PLAYER_SPEED);

        // And releasing input stops on the spot
        p.set_contacts(true, -1);
        step(&mut p, &ControlFrame::default(), 32.0);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn horizontal_input_ignored_on_wall() {
        let mut p = Player::new(Vec2::new(10.0, 300.0));
        p.set_contacts(false, -1);
        p.vel.x = 0.0;
        step(
            &mut p,
            &ControlFrame {
                right: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn ice_slide_decays_monotonically_to_rest() {
        let mut p = player_on_ground();
        p.set_on_ice();
        p.vel.x = 100.0;

        let mut prev = p.vel.x.abs();
        for i in 0..240 {
            // Ice latch is re-asserted by contact each frame
            p.set_contacts(true, 0);
            p.set_on_ice();
            step(&mut p, &ControlFrame::default(), i as f64 * 16.0);
            let mag = p.vel.x.abs();
            assert!(mag <= prev, "|vx| grew at frame {i}: {mag} > {prev}");
            prev = mag;
        }
        assert!(p.vel.x.abs() < 100.0 * ICE_FRICTION.powi(239) + 1.0);
    }

    #[test]
    fn ice_running_blends_toward_boosted_speed() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut events = Vec::new();
        let mut p = player_on_ground();
        let right = ControlFrame {
            right: true,
            ..Default::default()
        };

        for i in 0..600 {
            p.set_contacts(true, 0);
            p.set_on_ice();
            p.update(&right, 0.0, i as f64 * 16.0, DT, &mut rng, &mut events);
        }

        // Converges into the boosted band, never past the max boost
        assert!(p.vel.x > PLAYER_SPEED * 1.05, "vx = {}", p.vel.x);
        assert!(p.vel.x <= PLAYER_SPEED * ICE_BOOST_MAX, "vx = {}", p.vel.x);
    }

    #[test]
    fn wind_applies_only_while_airborne() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let wind = 300.0;

        let mut grounded = player_on_ground();
        grounded.update(&ControlFrame::default(), wind, 0.0, DT, &mut rng, &mut events);
        assert_eq!(grounded.vel.x, 0.0);

        let mut airborne = Player::new(Vec2::new(400.0, 300.0));
        airborne.set_contacts(false, 0);
        airborne.update(&ControlFrame::default(), wind, 0.0, DT, &mut rng, &mut events);
        assert!((airborne.vel.x - wind * DT).abs() < 0.001);
    }

    #[test]
    fn fall_speed_is_clamped() {
        let mut p = Player::new(Vec2::new(400.0, 300.0));
        p.set_contacts(false, 0);
        for i in 0..120 {
            step(&mut p, &ControlFrame::default(), i as f64 * 16.0);
        }
        assert_eq!(p.vel.y, MAX_FALL_SPEED);
    }

    #[test]
    fn animation_classification() {
        let mut p = player_on_ground();
        assert_eq!(p.animation(), AnimationState::Idle);

        p.vel.x = PLAYER_SPEED;
        assert_eq!(p.animation(), AnimationState::Run);

        p.set_contacts(false, 0);
        p.vel.y = -100.0;
        assert_eq!(p.animation(), AnimationState::Jump);

        p.vel.y = 100.0;
        assert_eq!(p.animation(), AnimationState::Fall);

        p.set_contacts(false, 1);
        assert_eq!(p.animation(), AnimationState::WallSlide);
    }

    #[test]
    fn altitude_is_derived_and_non_negative() {
        let mut p = Player::new(Vec2::new(400.0, SPAWN_ORIGIN_Y + 100.0));
        assert_eq!(p.altitude(), 0.0);
        p.pos.y = SPAWN_ORIGIN_Y - 2500.0;
        assert_eq!(p.altitude(), 2500.0);
    }
}
