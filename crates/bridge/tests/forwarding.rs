//! Forwarding through the stub engine table: every wrapper family, the
//! sentinel-to-`Option` mapping, and the hard failures on unknown ordinals.

use abi::{
    BodyArgs, CharacterArgs, ConstraintKind, EngineApi, GroundState, MotionType, RawHandle,
    ShapeKind, Vec4, VehicleArgs, WheelArgs, WorldSettings,
};
use bridge::{
    broadphase, Body, Character, Constraint, ConstraintSettings, Contact, Engine, Ragdoll,
    RagdollSettings, RayCast, Shape, ShapeSettings, SoftBodySettings, Vehicle, World,
};

fn engine() -> Engine {
    Engine::new(EngineApi::stub())
}

fn unit_sphere(engine: &Engine) -> Shape {
    ShapeSettings::sphere(engine, 1.0)
        .unwrap()
        .build()
        .unwrap()
}

fn body_at(world: &World, shape: &Shape, position: Vec4) -> Body {
    let args = BodyArgs {
        position,
        ..BodyArgs::default()
    };
    Body::create(world, shape, &args).unwrap()
}

#[test]
fn world_gravity_round_trips() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    assert_eq!(world.gravity(), Vec4::new(0.0, -9.81, 0.0));
    world.set_gravity(Vec4::new(0.0, -1.62, 0.0));
    assert_eq!(world.gravity(), Vec4::new(0.0, -1.62, 0.0));
    world.release();
}

#[test]
fn step_rejects_zero_substeps() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    assert!(world.step(1.0 / 60.0, 1));
    assert!(!world.step(1.0 / 60.0, 0));
    world.release();
}

#[test]
fn bodies_join_and_leave_the_world() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let shape = unit_sphere(&engine);

    let body = body_at(&world, &shape, Vec4::new(0.0, 5.0, 0.0));
    assert_eq!(world.body_count(), 0);
    world.add_body(&body, true);
    assert_eq!(world.body_count(), 1);
    assert!(body.is_active());
    body.deactivate();
    assert!(!body.is_active());

    assert_eq!(body.position(), Vec4::new(0.0, 5.0, 0.0));
    body.set_position(Vec4::new(1.0, 2.0, 3.0));
    assert_eq!(body.position(), Vec4::new(1.0, 2.0, 3.0));
    assert_eq!(body.motion_type(), MotionType::Dynamic);

    let aabb = body.aabb();
    assert!(aabb.contains(body.position()));

    world.remove_body(&body);
    assert_eq!(world.body_count(), 0);

    body.release();
    world.release();
}

#[test]
fn body_limit_maps_to_none() {
    let engine = engine();
    let settings = WorldSettings {
        max_bodies: 1,
        ..WorldSettings::default()
    };
    let world = World::create(&engine, &settings);
    let shape = unit_sphere(&engine);

    let first = body_at(&world, &shape, Vec4::zero());
    world.add_body(&first, true);
    assert!(Body::create(&world, &shape, &BodyArgs::default()).is_none());

    first.release();
    world.release();
}

#[test]
fn shape_references_are_counted() {
    let engine = engine();
    let shape = unit_sphere(&engine);
    assert_eq!(shape.kind(), ShapeKind::Sphere);
    assert_eq!(shape.ref_count(), 1);

    let second = shape.clone();
    assert_eq!(shape.ref_count(), 2);
    second.release();
    assert_eq!(shape.ref_count(), 1);
    shape.release();
}

#[test]
fn body_hands_out_fresh_shape_references() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let shape = unit_sphere(&engine);

    let body = body_at(&world, &shape, Vec4::zero());
    // One for the wrapper, one held by the body itself.
    assert_eq!(shape.ref_count(), 2);

    let view = body.shape().expect("body was built over a shape");
    assert_eq!(view.kind(), ShapeKind::Sphere);
    assert_eq!(shape.ref_count(), 3);
    view.release();
    assert_eq!(shape.ref_count(), 2);

    body.release();
    assert_eq!(shape.ref_count(), 1);
    shape.release();
    world.release();
}

#[test]
fn compound_settings_keep_children_alive() {
    let engine = engine();
    let mut compound = ShapeSettings::compound(&engine).unwrap();
    assert!(compound.build().is_none(), "empty compound must be rejected");

    let child = ShapeSettings::boxed(&engine, Vec4::splat(0.5), 0.05).unwrap();
    compound.add_child(child, Vec4::zero(), abi::Quat::identity());
    let shape = compound.build().unwrap();
    assert_eq!(shape.kind(), ShapeKind::Compound);
    shape.release();
}

#[test]
fn invalid_shape_settings_map_to_none() {
    let engine = engine();
    assert!(ShapeSettings::sphere(&engine, 0.0).is_none());
    assert!(ShapeSettings::boxed(&engine, Vec4::new(1.0, -1.0, 1.0), 0.0).is_none());
    assert!(ShapeSettings::capsule(&engine, 1.0, -0.5).is_none());
}

#[test]
fn constraints_bind_two_bodies() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let shape = unit_sphere(&engine);
    let a = body_at(&world, &shape, Vec4::new(-1.0, 0.0, 0.0));
    let b = body_at(&world, &shape, Vec4::new(1.0, 0.0, 0.0));

    let settings = ConstraintSettings::distance(&engine, 0.5, 2.0).unwrap();
    assert_eq!(settings.kind(), ConstraintKind::Distance);

    let constraint = Constraint::create(&world, &settings, &a, &b).unwrap();
    assert_eq!(constraint.kind(), ConstraintKind::Distance);
    assert!(constraint.is_enabled());
    constraint.set_enabled(false);
    assert!(!constraint.is_enabled());

    // The same body on both sides is refused with the sentinel.
    assert!(Constraint::create(&world, &settings, &a, &a).is_none());
    // An inverted interval is refused at settings construction.
    assert!(ConstraintSettings::distance(&engine, 2.0, 0.5).is_none());

    constraint.release();
    a.release();
    b.release();
    world.release();
}

#[test]
fn hinge_point_and_slider_settings_carry_their_kind() {
    let engine = engine();
    let point = ConstraintSettings::point(&engine, Vec4::zero(), Vec4::zero()).unwrap();
    assert_eq!(point.kind(), ConstraintKind::Point);
    let hinge = ConstraintSettings::hinge(
        &engine,
        Vec4::zero(),
        Vec4::new(0.0, 1.0, 0.0),
        -1.0,
        1.0,
    )
    .unwrap();
    assert_eq!(hinge.kind(), ConstraintKind::Hinge);
    let slider =
        ConstraintSettings::slider(&engine, Vec4::new(1.0, 0.0, 0.0), -0.5, 0.5).unwrap();
    assert_eq!(slider.kind(), ConstraintKind::Slider);
}

#[test]
fn coincident_bodies_report_a_contact() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let shape = unit_sphere(&engine);
    let a = body_at(&world, &shape, Vec4::new(0.0, 1.0, 0.0));
    let b = body_at(&world, &shape, Vec4::new(0.0, 1.0, 0.0));
    let c = body_at(&world, &shape, Vec4::new(9.0, 9.0, 9.0));
    world.add_body(&a, true);
    world.add_body(&b, true);
    world.add_body(&c, true);

    assert!(world.step(1.0 / 60.0, 1));
    let contacts = world.contacts();
    assert_eq!(contacts.len(), 1);
    let contact = Contact::new(contacts[0]);
    assert!(contact.involves(&a));
    assert!(contact.involves(&b));
    assert!(!contact.involves(&c));
    assert!(world.contact(5).is_none());

    a.release();
    b.release();
    c.release();
    world.release();
}

#[test]
fn ray_cast_hits_and_misses() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let shape = unit_sphere(&engine);
    let body = body_at(&world, &shape, Vec4::new(0.0, 0.0, 5.0));
    world.add_body(&body, true);

    let ray = RayCast::new(Vec4::zero(), Vec4::new(0.0, 0.0, 10.0));
    let hit = ray.cast(&world).expect("ray straight through the body");
    assert!(broadphase::hit_is(&hit, &body));
    assert!((ray.point_at(hit.fraction).z - 5.0).abs() < 1e-5);

    let miss = RayCast::new(Vec4::zero(), Vec4::new(0.0, 10.0, 0.0));
    assert!(miss.cast(&world).is_none());

    body.release();
    world.release();
}

#[test]
fn character_reports_ground_state() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let shape = ShapeSettings::capsule(&engine, 0.9, 0.3)
        .unwrap()
        .build()
        .unwrap();

    let grounded = Character::create(
        &world,
        &shape,
        &CharacterArgs {
            position: Vec4::new(0.0, -0.1, 0.0),
            ..CharacterArgs::default()
        },
    )
    .unwrap();
    assert_eq!(grounded.ground_state(), GroundState::OnGround);
    assert_eq!(grounded.position(), Vec4::new(0.0, -0.1, 0.0));
    grounded.set_linear_velocity(Vec4::new(1.0, 0.0, 0.0));

    let airborne = Character::create(
        &world,
        &shape,
        &CharacterArgs {
            position: Vec4::new(0.0, 3.0, 0.0),
            ..CharacterArgs::default()
        },
    )
    .unwrap();
    assert_eq!(airborne.ground_state(), GroundState::InAir);

    grounded.release();
    airborne.release();
    shape.release();
    world.release();
}

#[test]
fn ragdoll_parts_are_borrowed_views() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let shape = unit_sphere(&engine);

    let settings = RagdollSettings::create(&engine);
    assert_eq!(settings.add_part(&shape, Vec4::new(0.0, 1.0, 0.0)), Some(0));
    assert_eq!(settings.add_part(&shape, Vec4::new(0.0, 2.0, 0.0)), Some(1));

    let ragdoll = Ragdoll::create(&world, &settings).unwrap();
    assert_eq!(ragdoll.part_count(), 2);

    let head = ragdoll.part(1).unwrap();
    assert_eq!(head.position(), Vec4::new(0.0, 2.0, 0.0));
    assert!(ragdoll.part(2).is_none());

    // An empty skeleton is refused.
    let empty = RagdollSettings::create(&engine);
    assert!(Ragdoll::create(&world, &empty).is_none());

    ragdoll.release();
    shape.release();
    world.release();
}

#[test]
fn vehicle_forwards_driver_input() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    let chassis_shape = ShapeSettings::boxed(&engine, Vec4::new(1.0, 0.4, 2.2), 0.05)
        .unwrap()
        .build()
        .unwrap();
    let chassis = body_at(&world, &chassis_shape, Vec4::new(0.0, 1.0, 0.0));

    let wheels = [
        WheelArgs {
            position: Vec4::new(-0.9, -0.3, 1.5),
            radius: 0.3,
            width: 0.2,
            suspension_min: 0.1,
            suspension_max: 0.4,
        };
        4
    ];
    let vehicle = Vehicle::create(&world, &chassis, &VehicleArgs::default(), &wheels).unwrap();
    assert_eq!(vehicle.wheel_count(), 4);
    vehicle.set_driver_input(1.0, 0.0, 0.0, 0.0);

    assert!(
        Vehicle::create(&world, &chassis, &VehicleArgs::default(), &[]).is_none(),
        "a vehicle without wheels is refused"
    );

    vehicle.release();
    chassis.release();
    chassis_shape.release();
    world.release();
}

#[test]
fn soft_body_instantiates_as_a_body() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());

    let cloth: Vec<Vec4> = (0u8..9)
        .map(|i| Vec4::new(f32::from(i % 3), 0.0, f32::from(i / 3)))
        .collect();
    let settings = SoftBodySettings::create(&engine, &cloth).unwrap();
    let body = settings
        .instantiate(&world, Vec4::new(0.0, 4.0, 0.0))
        .unwrap();
    assert_eq!(body.position(), Vec4::new(0.0, 4.0, 0.0));
    // A soft body has no standalone shape; the sentinel must surface as
    // `None`, never as a null handle reaching the engine.
    assert!(body.shape().is_none());

    assert!(SoftBodySettings::create(&engine, &[]).is_none());

    body.release();
    world.release();
}

#[test]
#[should_panic(expected = "use of released native handle")]
fn stepping_a_released_world_panics() {
    let engine = engine();
    let world = World::create(&engine, &WorldSettings::default());
    world.release();
    let _ = world.step(1.0 / 60.0, 1);
}

#[test]
#[should_panic(expected = "unknown constraint subtype ordinal 77")]
fn unknown_subtype_tag_is_a_hard_failure() {
    unsafe extern "C" fn bogus_kind(_: RawHandle) -> u32 {
        77
    }

    let mut api = EngineApi::stub();
    api.constraint_settings_kind = bogus_kind;
    let engine = Engine::new(api);

    let image = {
        let stock = Engine::new(EngineApi::stub());
        ConstraintSettings::point(&stock, Vec4::zero(), Vec4::zero())
            .unwrap()
            .save()
            .unwrap()
    };
    let _ = ConstraintSettings::restore(&engine, &image);
}
