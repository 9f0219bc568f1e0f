//! The Ascent headless demo runner
//!
//! Drives the simulation with a simple scripted climber at a fixed 60 Hz
//! timestep until the run terminates (or a time cap is hit), logging game
//! events along the way and printing a JSON summary of the final snapshot.
//! Useful for tuning and for eyeballing generation/hazard pacing without
//! a renderer.

use the_ascent::consts::*;
use the_ascent::sim::{ControlFrame, GameEvent, RunState, tick};

/// Cap so a stuck bot cannot run forever (20 minutes of sim time)
const MAX_SIM_MS: f64 = 20.0 * 60.0 * 1000.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xA5C3_17);
    log::info!("starting run with seed {seed}");

    let mut state = RunState::new(seed);

    // Camera only scrolls up, matching the real presentation layer
    let mut camera_y = state.player.pos.y - VIEW_HEIGHT / 2.0 - 100.0;

    let mut frame: u64 = 0;
    while !state.is_over() && state.time_ms < MAX_SIM_MS {
        let control = scripted_control(frame, &state);
        tick(&mut state, &control, camera_y, SIM_DT_MS);

        camera_y = camera_y.min(state.player.pos.y - VIEW_HEIGHT / 2.0 - 100.0);

        for event in state.take_events() {
            match event {
                GameEvent::Jumped | GameEvent::WallJumped => {
                    log::debug!("{event:?} at altitude {:.0}", state.player.altitude());
                }
                other => log::info!("{other:?}"),
            }
        }
        frame += 1;
    }

    let snapshot = state.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("failed to serialize final snapshot: {e}"),
    }
    log::info!(
        "run ended: {:?} after {:.1}s, best altitude {:.0}",
        snapshot.phase,
        state.time_ms / 1000.0,
        snapshot.max_altitude
    );
}

/// Crude climber: oscillates left/right, jumps whenever grounded, and rides
/// wall jumps when it ends up against a wall. Not smart, but it exercises
/// every mechanic.
fn scripted_control(frame: u64, state: &RunState) -> ControlFrame {
    let phase = frame % 240;
    let mut control = ControlFrame {
        left: phase >= 120,
        right: phase < 120,
        jump: false,
    };

    if state.player.is_on_ground() {
        // Re-press every other frame so the edge detector keeps firing
        control.jump = frame % 2 == 0;
    } else if state.player.is_on_wall() {
        control.jump = frame % 4 < 2;
    }
    control
}
