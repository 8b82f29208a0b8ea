//! Headless demo session
//!
//! Drives the simulation at a fixed step with scripted input: the
//! agent circles while firing at a point ahead of its path. Useful
//! for smoke-testing the crate and watching the log output; run with
//! `RUST_LOG=info`.

use glam::Vec2;
use neon_survivor::consts::MAX_DT;
use neon_survivor::{InputState, JsonFileScoreStore, NullAudio, World};

const STEP: f32 = 1.0 / 60.0;
const SESSION_LIMIT: f32 = 120.0;

fn main() {
    env_logger::init();

    let store = JsonFileScoreStore::new("neon_survivor_highscore.json");
    let mut world = World::new(0xC0FFEE, Box::new(NullAudio), Box::new(store));
    world.resize(1280.0, 720.0);
    world.start();

    let mut elapsed = 0.0f32;
    let mut next_report = 0.0f32;

    while elapsed < SESSION_LIMIT {
        let dt = STEP.min(MAX_DT);
        elapsed += dt;

        // Circle strafe, aim ahead of the motion
        let angle = elapsed * 0.8;
        let agent_pos = world.agent.pos;
        world.set_input(InputState {
            joystick: Vec2::from_angle(angle),
            target: agent_pos + Vec2::from_angle(angle + 0.5) * 300.0,
            ..Default::default()
        });
        if (elapsed * 4.0).fract() < STEP * 4.0 {
            world.fire();
        }

        world.advance(dt);

        if elapsed >= next_report {
            next_report += 5.0;
            let snap = world.snapshot();
            log::info!(
                "t={elapsed:5.1}s phase={:?} score={} level={} hp={:.0}/{:.0} entities={}",
                snap.phase,
                snap.hud.score,
                snap.hud.level,
                snap.hud.hp,
                snap.hud.max_hp,
                snap.entities.len(),
            );
        }

        if world.phase == neon_survivor::GamePhase::GameOver {
            log::info!("session over, final score {}", world.score);
            break;
        }
    }

    let snap = world.snapshot();
    println!(
        "final: score {} (best {}), level {}, survived {elapsed:.1}s",
        snap.hud.score, snap.hud.high_score, snap.hud.level
    );
}
