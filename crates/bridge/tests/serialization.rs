//! Round trips through the engine's binary settings and scene formats, for
//! bytes and for files.

use abi::{BodyArgs, ConstraintKind, EngineApi, ShapeKind, Vec4, WorldSettings};
use bridge::{
    Body, ConstraintSettings, Engine, RagdollSettings, Shape, ShapeSettings, SoftBodySettings,
    World,
};

fn engine() -> Engine {
    Engine::new(EngineApi::stub())
}

#[test]
fn shape_image_round_trips() {
    let engine = engine();
    let shape = ShapeSettings::capsule(&engine, 0.9, 0.3)
        .unwrap()
        .build()
        .unwrap();

    let image = shape.save().expect("capsule serializes");
    let restored = Shape::restore(&engine, &image).expect("image restores");
    assert_eq!(restored.kind(), ShapeKind::Capsule);
    assert_eq!(restored.save().unwrap(), image);

    assert!(Shape::restore(&engine, b"not a shape").is_none());

    shape.release();
    restored.release();
}

#[test]
fn constraint_settings_image_round_trips() {
    let engine = engine();
    let settings = ConstraintSettings::hinge(
        &engine,
        Vec4::new(0.0, 1.0, 0.0),
        Vec4::new(1.0, 0.0, 0.0),
        -0.7,
        0.7,
    )
    .unwrap();

    let image = settings.save().expect("hinge serializes");
    let restored = ConstraintSettings::restore(&engine, &image).expect("image restores");
    assert_eq!(restored.kind(), ConstraintKind::Hinge);
    assert_eq!(restored.save().unwrap(), image);

    assert!(ConstraintSettings::restore(&engine, &[0u8; 4]).is_none());
}

#[test]
fn ragdoll_settings_image_preserves_parts() {
    let engine = engine();
    let shape = ShapeSettings::sphere(&engine, 0.5).unwrap().build().unwrap();
    let settings = RagdollSettings::create(&engine);
    for i in 0..3u8 {
        settings
            .add_part(&shape, Vec4::new(0.0, f32::from(i), 0.0))
            .unwrap();
    }

    let image = settings.save().expect("skeleton serializes");
    let restored = RagdollSettings::restore(&engine, &image).expect("image restores");
    assert_eq!(restored.save().unwrap(), image);

    assert!(RagdollSettings::restore(&engine, &[1, 0]).is_none());
    shape.release();
}

#[test]
fn soft_body_settings_image_round_trips() {
    let engine = engine();
    let vertices = [
        Vec4::new(0.0, 0.0, 0.0),
        Vec4::new(1.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0),
    ];
    let settings = SoftBodySettings::create(&engine, &vertices).unwrap();

    let image = settings.save().expect("cloud serializes");
    let restored = SoftBodySettings::restore(&engine, &image).expect("image restores");
    assert_eq!(restored.save().unwrap(), image);

    assert!(SoftBodySettings::restore(&engine, &[0u8; 8]).is_none());
}

#[test]
fn scene_restores_bodies_and_gravity() {
    let engine = engine();
    let source = World::create(&engine, &WorldSettings::default());
    source.set_gravity(Vec4::new(0.0, -3.7, 0.0));
    let shape = ShapeSettings::sphere(&engine, 1.0).unwrap().build().unwrap();
    let a = Body::create(
        &source,
        &shape,
        &BodyArgs {
            position: Vec4::new(1.0, 2.0, 3.0),
            ..BodyArgs::default()
        },
    )
    .unwrap();
    let b = Body::create(&source, &shape, &BodyArgs::default()).unwrap();
    source.add_body(&a, true);
    source.add_body(&b, true);

    let image = source.save_scene().expect("scene serializes");

    let target = World::create(&engine, &WorldSettings::default());
    assert!(target.restore_scene(&image));
    assert_eq!(target.body_count(), 2);
    assert_eq!(target.gravity(), Vec4::new(0.0, -3.7, 0.0));

    assert!(!target.restore_scene(&[0u8; 4]));

    a.release();
    b.release();
    shape.release();
    source.release();
    target.release();
}

#[test]
fn scene_round_trips_through_a_file() {
    let engine = engine();
    let source = World::create(&engine, &WorldSettings::default());
    source.set_gravity(Vec4::new(0.0, -1.0, 0.0));

    let path = std::env::temp_dir().join(format!("bridge-scene-{}.bin", std::process::id()));
    assert!(source.save_scene_to_file(&path).unwrap());

    let target = World::create(&engine, &WorldSettings::default());
    assert!(target.restore_scene_from_file(&path).unwrap());
    assert_eq!(target.gravity(), Vec4::new(0.0, -1.0, 0.0));

    std::fs::remove_file(&path).unwrap();
    source.release();
    target.release();
}
