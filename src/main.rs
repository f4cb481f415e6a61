//! Plane Engine Demo
//!
//! Plays a short chase on a walled board and prints the board after every
//! tick, the way a chat bot would edit its message.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plane_engine::{
    Game, LineRasterizer, Plane, PlaneConfig, PlaneObject, StepOutcome, Turns, Player, VERSION,
};

/// Ticks to simulate before the game is ended.
const DEMO_TICKS: u32 = 8;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Plane Engine v{}", VERSION);

    let config = PlaneConfig::from_env().context("reading plane configuration")?;
    info!(
        wall = %config.wall_policy,
        collision = ?config.collision_policy,
        registry = ?config.registry_policy,
        "configuration loaded"
    );

    demo_chase(config)
}

/// Demo function to exercise the engine.
fn demo_chase(config: PlaneConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Chase ===");

    let mut game = Game::new("demo");
    let mut plane = Plane::with_config(8, 8, "⬛".to_string(), config)?;

    let mut walls = {
        let mut raster = LineRasterizer::new(&plane);
        raster.draw_lines([
            ("3,2 -> 3,5", "🧱".to_string()),
            ("5,6 -> 7,6", "🧱".to_string()),
        ])?;
        raster.into_objects()
    };

    let mut runner = PlaneObject::with_value(&plane, 0, 0, "runner", "🏃".to_string());
    let mut hunter = PlaneObject::with_value(&plane, 7, 7, "hunter", "👻".to_string()).ai(true);
    let mut apple = PlaneObject::with_value(&plane, 4, 1, "apple", "🍎".to_string());

    let mut turns = Turns::new([Player::new("runner", "Runner"), Player::new("hunter", "Hunter")]);

    game.start();
    turns.start();
    hunter.start_pursuit(&runner)?;

    for tick in 0..DEMO_TICKS {
        let mover = turns
            .current()
            .map(|player| player.id.clone())
            .unwrap_or_default();

        if mover == "runner" {
            runner.translate(1, 0);
        } else if let StepOutcome::Arrived { at } = plane.pursue(&mut hunter)? {
            info!(tick, %at, "hunter caught the runner");
            hunter.set_value("💥".to_string());
        }

        let report = plane.update(
            &game,
            [&mut runner, &mut hunter, &mut apple]
                .into_iter()
                .chain(walls.iter_mut()),
        )?;

        for (id, event) in &report.collisions {
            info!(tick, %id, with = event.collider.id(), at = %event.at, "collision");
        }
        for event in runner.take_events() {
            info!(tick, with = event.collider.id(), "runner bumped into something");
        }

        println!("{}\n", plane.render());
        info!(tick, %mover, digest = %hex::encode(&plane.digest()[..8]), "tick rendered");

        turns.next_turn(None)?;
    }

    info!("=== Game Over ===");
    game.end(Some("demo finished".to_string()));
    for event in game.take_events() {
        info!(?event, "lifecycle");
    }

    // Idle boards show every object back at its origin
    let report = plane.update(&game, std::iter::empty())?;
    info!(drawn = report.drawn.len(), "idle redraw");
    println!("{}", plane.render());

    Ok(())
}
