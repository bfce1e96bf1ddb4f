//! Headless demo runner: drives the maze with a scripted pointer and prints
//! score and level changes.

use anyhow::Result;
use glam::Vec2;

use marble_maze::{DragControl, LevelSet, MazeGame};
use tilt_engine::{EngineContext, FixedTimestep, Game, GameEvent, InputEvent, InputQueue};

fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ScoreChanged(score) => println!("score: {score}"),
            GameEvent::LevelChanged(level) => println!("level: {level}"),
            GameEvent::EntitySpawned(_) | GameEvent::EntityRemoved(_) => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let levels = LevelSet::embedded()?;
    let mut game = MazeGame::new(levels, Box::new(DragControl::new()))?;
    let config = game.config();

    let mut ctx = EngineContext::with_gravity(config.gravity);
    ctx.physics.set_dt(config.fixed_dt);
    game.init(&mut ctx);
    report(&ctx.events);
    ctx.clear_frame_data();

    // Hold the pointer to the right of the spawn point, then swing it around
    // the board so the ball wanders for a while.
    let waypoints = [
        Vec2::new(400.0, 650.0),
        Vec2::new(700.0, 500.0),
        Vec2::new(500.0, 250.0),
        Vec2::new(200.0, 400.0),
    ];

    let mut input = InputQueue::new();
    input.push(InputEvent::PointerDown { x: waypoints[0].x, y: waypoints[0].y });

    // Emulate a 30 FPS frame callback; the accumulator turns each frame into
    // two fixed steps.
    let mut timestep = FixedTimestep::new(config.fixed_dt);
    let frames: usize = 30 * 30;
    let mut ticks = 0u32;
    for frame in 0..frames {
        if frame > 0 && frame % 150 == 0 {
            let p = waypoints[(frame / 150) % waypoints.len()];
            input.push(InputEvent::PointerMove { x: p.x, y: p.y });
        }

        for _ in 0..timestep.accumulate(1.0 / 30.0) {
            game.update(&mut ctx, &input);
            input.clear();
            ctx.step_physics();

            report(&ctx.events);
            ctx.clear_frame_data();
            ticks += 1;
        }
    }

    println!("final score after {} ticks: {}", ticks, game.score());
    Ok(())
}
