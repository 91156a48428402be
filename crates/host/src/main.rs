#![deny(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result};
use tracing::info;

use bridge::{
    sweep, Body, BodyArgs, CharacterArgs, Constraint, ConstraintSettings, Engine, RayCast, Shape,
    ShapeSettings, Vec4, Vehicle, VehicleArgs, WheelArgs, World, WorldSettings,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Stand-in for a real engine library: resolve the table against the
    // in-process stub. A production embedder supplies real symbol addresses
    // here instead.
    let engine = Engine::load(abi::stub::symbol_address)?;
    let world = World::create(&engine, &WorldSettings::default());
    info!(gravity = ?world.gravity(), "world up");

    let ball_shape: Shape = ShapeSettings::sphere(&engine, 0.5)
        .context("sphere settings rejected")?
        .build()
        .context("sphere build rejected")?;
    let ground_shape = ShapeSettings::boxed(&engine, Vec4::new(50.0, 0.5, 50.0), 0.05)
        .context("ground settings rejected")?
        .build()
        .context("ground build rejected")?;

    let ball = Body::create(
        &world,
        &ball_shape,
        &BodyArgs {
            position: Vec4::new(0.0, 10.0, 0.0),
            ..BodyArgs::default()
        },
    )
    .context("ball creation rejected")?;
    let ground = Body::create(
        &world,
        &ground_shape,
        &BodyArgs {
            position: Vec4::new(0.0, -0.5, 0.0),
            motion_type: bridge::MotionType::Static as u32,
            ..BodyArgs::default()
        },
    )
    .context("ground creation rejected")?;
    world.add_body(&ball, true);
    world.add_body(&ground, false);
    info!(bodies = world.body_count(), "scene populated");

    let dt = 1.0 / 60.0;
    for step in 0..120 {
        if !world.step(dt, 1) {
            anyhow::bail!("step {step} failed");
        }
    }
    info!(position = ?ball.position(), "ball after 120 steps");

    let anchor = ConstraintSettings::point(&engine, Vec4::zero(), Vec4::new(0.0, 10.0, 0.0))
        .context("point settings rejected")?;
    let constraint =
        Constraint::create(&world, &anchor, &ball, &ground).context("constraint rejected")?;
    info!(kind = ?constraint.kind(), "constraint attached");

    let character = bridge::Character::create(&world, &ball_shape, &CharacterArgs::default())
        .context("character rejected")?;
    info!(ground_state = ?character.ground_state(), "character spawned");

    let wheels = [WheelArgs {
        position: Vec4::new(0.0, -0.3, 0.0),
        radius: 0.3,
        width: 0.2,
        suspension_min: 0.1,
        suspension_max: 0.4,
    }; 4];
    let vehicle = Vehicle::create(&world, &ground, &VehicleArgs::default(), &wheels)
        .context("vehicle rejected")?;
    vehicle.set_driver_input(0.5, 0.0, 0.0, 0.0);
    info!(wheels = vehicle.wheel_count(), "vehicle rolling");

    let ray = RayCast::new(Vec4::new(0.0, 10.0, -1.0), Vec4::new(0.0, 0.0, 2.0));
    match ray.cast(&world) {
        Some(hit) => info!(fraction = hit.fraction, "ray hit"),
        None => info!("ray missed"),
    }

    let scene = world.save_scene().context("scene serialization failed")?;
    info!(bytes = scene.len(), "scene saved");

    // Deterministic teardown, then drain whatever was left to the sweep.
    vehicle.release();
    character.release();
    constraint.release();
    ball.release();
    ground.release();
    ball_shape.release();
    ground_shape.release();
    world.release();
    sweep::flush();
    info!(swept = sweep::swept_count(), "shutdown complete");
    Ok(())
}
