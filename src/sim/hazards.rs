//! Environmental hazard systems: wind, avalanche, cold
//!
//! All three share the same difficulty curve: an altitude-progress value in
//! [0, 1] interpolates timing parameters between low-altitude and
//! near-summit bounds, with defensive floors. Every "wait" is a deadline on
//! the run clock polled each frame; nothing blocks or schedules callbacks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level::Terrain;
use super::state::{GameEvent, GameOverReason};
use crate::consts::*;
use crate::{lerp, lerp_ms};

/// Climb progress toward the summit, clamped to [0, 1]
#[inline]
pub fn altitude_progress(altitude: f32) -> f32 {
    (altitude / SUMMIT_ALTITUDE).clamp(0.0, 1.0)
}

/// Gusting wind that pushes the airborne player sideways
#[derive(Debug, Clone)]
pub struct WindSystem {
    force: f32,
    gusting: bool,
    /// Gust end while gusting, next gust start while idle
    deadline_ms: f64,
}

impl WindSystem {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            force: 0.0,
            gusting: false,
            deadline_ms: idle_delay(0.0, rng),
        }
    }

    /// Signed force, read by the player controller while airborne
    #[inline]
    pub fn force(&self) -> f32 {
        self.force
    }

    #[inline]
    pub fn is_gusting(&self) -> bool {
        self.gusting
    }

    pub fn update(
        &mut self,
        now_ms: f64,
        altitude: f32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        let progress = altitude_progress(altitude);

        if self.gusting {
            if now_ms >= self.deadline_ms {
                self.force = 0.0;
                self.gusting = false;
                self.deadline_ms = now_ms + idle_delay(progress, rng);
                events.push(GameEvent::GustEnded);
                log::debug!("gust ended, next in {:.1}s", (self.deadline_ms - now_ms) / 1000.0);
            }
        } else if now_ms >= self.deadline_ms {
            let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let magnitude = lerp(WIND_FORCE_BASE, WIND_FORCE_SUMMIT, progress);
            self.force = direction * magnitude;
            self.gusting = true;
            self.deadline_ms = now_ms + rng.random_range(GUST_DURATION_MIN_MS..=GUST_DURATION_MAX_MS);
            events.push(GameEvent::GustStarted { force: self.force });
            log::debug!("gust started, force {:.0}", self.force);
        }
    }

    /// Clear the force and stop scheduling. Called once on run termination
    /// so a stale gust cannot push a frozen world.
    pub fn neutralize(&mut self) {
        self.force = 0.0;
        self.gusting = false;
        self.deadline_ms = f64::INFINITY;
    }
}

fn idle_delay(progress: f32, rng: &mut impl Rng) -> f64 {
    let min = lerp_ms(WIND_IDLE_MIN_BASE_MS, WIND_IDLE_MIN_SUMMIT_MS, progress);
    let max = lerp_ms(WIND_IDLE_MAX_BASE_MS, WIND_IDLE_MAX_SUMMIT_MS, progress);
    rng.random_range(min..=max).max(WIND_IDLE_FLOOR_MS)
}

/// Avalanche phase, exposed for visual/audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvalanchePhase {
    Idle,
    Warning,
    Active,
}

/// Periodic avalanche: warning rumble, then a short window in which the
/// player must stand under cover
#[derive(Debug, Clone)]
pub struct AvalancheSystem {
    phase: AvalanchePhase,
    /// End of the current phase (next trigger while idle)
    deadline_ms: f64,
    /// Shelter checks start this far into the active phase
    safety_check_from_ms: f64,
}

impl AvalancheSystem {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            phase: AvalanchePhase::Idle,
            deadline_ms: trigger_delay(0.0, rng),
            safety_check_from_ms: f64::INFINITY,
        }
    }

    #[inline]
    pub fn phase(&self) -> AvalanchePhase {
        self.phase
    }

    /// Returns the termination cause if the player is caught unsheltered.
    pub fn update(
        &mut self,
        now_ms: f64,
        altitude: f32,
        player_body: &Aabb,
        terrain: &Terrain,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> Option<GameOverReason> {
        match self.phase {
            AvalanchePhase::Idle => {
                if now_ms >= self.deadline_ms {
                    self.phase = AvalanchePhase::Warning;
                    self.deadline_ms = now_ms + AVALANCHE_WARNING_MS;
                    events.push(GameEvent::AvalancheWarning);
                    log::info!("avalanche warning at altitude {altitude:.0}");
                }
            }
            AvalanchePhase::Warning => {
                if now_ms >= self.deadline_ms {
                    self.phase = AvalanchePhase::Active;
                    self.deadline_ms = now_ms + AVALANCHE_ACTIVE_MS;
                    self.safety_check_from_ms = now_ms + AVALANCHE_SAFETY_CHECK_DELAY_MS;
                    events.push(GameEvent::AvalancheActive);
                    log::info!("avalanche active");
                }
            }
            AvalanchePhase::Active => {
                if now_ms >= self.deadline_ms {
                    self.phase = AvalanchePhase::Idle;
                    self.deadline_ms = now_ms + trigger_delay(altitude_progress(altitude), rng);
                    self.safety_check_from_ms = f64::INFINITY;
                    events.push(GameEvent::AvalancheEnded);
                    log::info!("avalanche passed");
                } else if now_ms >= self.safety_check_from_ms
                    && !terrain.is_sheltered(player_body)
                {
                    return Some(GameOverReason::Avalanche);
                }
            }
        }
        None
    }

    /// Force back to idle with no further effect. Called on run termination.
    pub fn neutralize(&mut self) {
        self.phase = AvalanchePhase::Idle;
        self.deadline_ms = f64::INFINITY;
        self.safety_check_from_ms = f64::INFINITY;
    }
}

fn trigger_delay(progress: f32, rng: &mut impl Rng) -> f64 {
    let min = lerp_ms(AVALANCHE_DELAY_MIN_BASE_MS, AVALANCHE_DELAY_MIN_SUMMIT_MS, progress);
    let max = lerp_ms(AVALANCHE_DELAY_MAX_BASE_MS, AVALANCHE_DELAY_MAX_SUMMIT_MS, progress);
    rng.random_range(min..=max).max(AVALANCHE_DELAY_FLOOR_MS)
}

/// Cold creep: standing still too long chills, then freezes the player
#[derive(Debug, Clone)]
pub struct ColdSystem {
    last_pos: Vec2,
    idle_ms: f32,
    chilling: bool,
    chill_progress: f32,
}

impl ColdSystem {
    pub fn new(player_pos: Vec2) -> Self {
        Self {
            last_pos: player_pos,
            idle_ms: 0.0,
            chilling: false,
            chill_progress: 0.0,
        }
    }

    #[inline]
    pub fn idle_ms(&self) -> f32 {
        self.idle_ms
    }

    #[inline]
    pub fn is_chilling(&self) -> bool {
        self.chilling
    }

    /// Chill ramp in [0, 1] for the visual tint
    #[inline]
    pub fn chill_progress(&self) -> f32 {
        self.chill_progress
    }

    /// Returns the termination cause once the freeze threshold is crossed.
    pub fn update(
        &mut self,
        delta_ms: f32,
        player_pos: Vec2,
        altitude: f32,
    ) -> Option<GameOverReason> {
        let moved = (player_pos.x - self.last_pos.x).abs() > IDLE_EPSILON
            || (player_pos.y - self.last_pos.y).abs() > IDLE_EPSILON;

        if moved {
            self.idle_ms = 0.0;
            self.chilling = false;
            self.chill_progress = 0.0;
            self.last_pos = player_pos;
            return None;
        }

        // Single monotonic counter: no partial decay while idle
        self.idle_ms += delta_ms;

        let progress = altitude_progress(altitude);
        let chill = lerp(CHILL_THRESHOLD_BASE_MS, CHILL_THRESHOLD_SUMMIT_MS, progress)
            .max(COLD_THRESHOLD_FLOOR_MS);
        let freeze = lerp(FREEZE_THRESHOLD_BASE_MS, FREEZE_THRESHOLD_SUMMIT_MS, progress)
            .max(COLD_THRESHOLD_FLOOR_MS);

        if self.idle_ms > chill {
            self.chilling = true;
            self.chill_progress = ((self.idle_ms - chill) / freeze).min(1.0);
            if self.idle_ms > chill + freeze {
                return Some(GameOverReason::Frozen);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::platform::PlatformKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT_MS: f64 = 16.0;

    #[test]
    fn altitude_progress_is_clamped() {
        assert_eq!(altitude_progress(-50.0), 0.0);
        assert_eq!(altitude_progress(0.0), 0.0);
        assert_eq!(altitude_progress(SUMMIT_ALTITUDE / 2.0), 0.5);
        assert_eq!(altitude_progress(SUMMIT_ALTITUDE * 3.0), 1.0);
    }

    #[test]
    fn wind_alternates_idle_and_gust_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut events = Vec::new();
        let mut wind = WindSystem::new(&mut rng);

        let mut now = 0.0;
        let mut gust_start = None;
        while gust_start.is_none() {
            now += DT_MS;
            wind.update(now, 0.0, &mut rng, &mut events);
            if wind.is_gusting() {
                gust_start = Some(now);
            }
            assert!(now <= WIND_IDLE_MAX_BASE_MS + DT_MS, "no gust by max idle bound");
        }
        let started = gust_start.unwrap();
        assert!(started >= WIND_IDLE_MIN_BASE_MS - DT_MS);

        let magnitude = wind.force().abs();
        assert!((WIND_FORCE_BASE..=WIND_FORCE_SUMMIT).contains(&magnitude));

        // Gust expires within its fixed duration range, force returns to zero
        while wind.is_gusting() {
            now += DT_MS;
            wind.update(now, 0.0, &mut rng, &mut events);
            assert!(now - started <= GUST_DURATION_MAX_MS + DT_MS);
        }
        assert!(now - started >= GUST_DURATION_MIN_MS - DT_MS);
        assert_eq!(wind.force(), 0.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GustStarted { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::GustEnded)));
    }

    #[test]
    fn neutralized_wind_never_gusts_again() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut events = Vec::new();
        let mut wind = WindSystem::new(&mut rng);
        wind.neutralize();
        for i in 0..10_000 {
            wind.update(i as f64 * DT_MS, 0.0, &mut rng, &mut events);
        }
        assert_eq!(wind.force(), 0.0);
        assert!(!wind.is_gusting());
    }

    fn open_sky_body() -> Aabb {
        Aabb::new(Vec2::new(400.0, 300.0), Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    #[test]
    fn unsheltered_player_dies_shortly_into_active_phase() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut events = Vec::new();
        let terrain = Terrain::new();
        let body = open_sky_body();
        let mut avalanche = AvalancheSystem::new(&mut rng);

        let mut now = 0.0;
        let mut active_at = None;
        let verdict = loop {
            now += DT_MS;
            let verdict = avalanche.update(now, 0.0, &body, &terrain, &mut rng, &mut events);
            if active_at.is_none() && avalanche.phase() == AvalanchePhase::Active {
                active_at = Some(now);
            }
            if verdict.is_some() {
                break verdict;
            }
            assert!(
                now <= AVALANCHE_DELAY_MAX_BASE_MS + AVALANCHE_WARNING_MS + AVALANCHE_ACTIVE_MS,
                "avalanche never resolved"
            );
        };

        assert_eq!(verdict, Some(GameOverReason::Avalanche));
        let active_at = active_at.expect("active phase was entered");
        let died_after = now - active_at;
        assert!(died_after >= AVALANCHE_SAFETY_CHECK_DELAY_MS - DT_MS);
        assert!(died_after <= AVALANCHE_SAFETY_CHECK_DELAY_MS + 2.0 * DT_MS);
    }

    #[test]
    fn sheltered_player_survives_full_cycle() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut events = Vec::new();
        let body = open_sky_body();

        // Wide platform just overhead
        let mut terrain = Terrain::new();
        terrain.spawn(PlatformKind::Rock, Vec2::new(400.0, 200.0), 200.0);

        let mut avalanche = AvalancheSystem::new(&mut rng);
        let mut now = 0.0;
        let mut saw_active = false;
        let mut saw_ended = false;
        while !saw_ended {
            now += DT_MS;
            let verdict = avalanche.update(now, 0.0, &body, &terrain, &mut rng, &mut events);
            assert_eq!(verdict, None);
            saw_active |= avalanche.phase() == AvalanchePhase::Active;
            saw_ended = events.iter().any(|e| matches!(e, GameEvent::AvalancheEnded));
            assert!(now < 120_000.0, "cycle never completed");
        }
        assert!(saw_active);
        assert_eq!(avalanche.phase(), AvalanchePhase::Idle);
    }

    #[test]
    fn cold_resets_on_movement() {
        let mut cold = ColdSystem::new(Vec2::new(400.0, 472.0));

        // Accumulate idle time well past the chill threshold at the summit
        for _ in 0..1200 {
            cold.update(DT_MS as f32, Vec2::new(400.0, 472.0), SUMMIT_ALTITUDE);
        }
        assert!(cold.is_chilling());
        assert!(cold.idle_ms() > 0.0);

        // A move beyond the epsilon clears everything
        let verdict = cold.update(DT_MS as f32, Vec2::new(403.0, 472.0), SUMMIT_ALTITUDE);
        assert_eq!(verdict, None);
        assert_eq!(cold.idle_ms(), 0.0);
        assert!(!cold.is_chilling());
        assert_eq!(cold.chill_progress(), 0.0);
    }

    #[test]
    fn sub_epsilon_drift_does_not_reset_cold() {
        let mut cold = ColdSystem::new(Vec2::new(400.0, 472.0));
        cold.update(1000.0, Vec2::new(401.0, 471.0), 0.0);
        assert_eq!(cold.idle_ms(), 1000.0);
    }

    #[test]
    fn freeze_fires_at_chill_plus_freeze_threshold() {
        // At full altitude progress: chill 15s, freeze 12s -> 27s total
        let mut cold = ColdSystem::new(Vec2::new(400.0, 472.0));
        let pos = Vec2::new(400.0, 472.0);

        let mut now = 0.0_f32;
        let verdict = loop {
            now += DT_MS as f32;
            if let Some(v) = cold.update(DT_MS as f32, pos, SUMMIT_ALTITUDE) {
                break v;
            }
            assert!(now < 30_000.0, "freeze never fired");
        };

        assert_eq!(verdict, GameOverReason::Frozen);
        let expected = CHILL_THRESHOLD_SUMMIT_MS + FREEZE_THRESHOLD_SUMMIT_MS;
        assert!(now > expected - 100.0, "froze too early: {now}");
        assert!(now < expected + 100.0, "froze too late: {now}");
    }

    #[test]
    fn chill_progress_ramps_between_thresholds() {
        let mut cold = ColdSystem::new(Vec2::new(400.0, 472.0));
        let pos = Vec2::new(400.0, 472.0);

        // Halfway between chill (15s) and freeze (12s later) at the summit
        let target = CHILL_THRESHOLD_SUMMIT_MS + FREEZE_THRESHOLD_SUMMIT_MS / 2.0;
        let mut now = 0.0_f32;
        while now < target {
            now += DT_MS as f32;
            cold.update(DT_MS as f32, pos, SUMMIT_ALTITUDE);
        }
        assert!(cold.is_chilling());
        assert!((cold.chill_progress() - 0.5).abs() < 0.01);
    }
}
