//! In-process stand-in for the native engine.
//!
//! Implements every entry point of [`EngineApi`] over boxed bookkeeping
//! structs whose heap address doubles as the handle. State is stored and
//! echoed back; stepping only advances a counter. There is no collision
//! detection, constraint solving, or integration here.
//!
//! Like any native library, the stub trusts its caller: handles must be live
//! and pointers valid for the signature. The layer above is what enforces
//! lifetime discipline.

#![allow(
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use std::sync::atomic::{AtomicU32, Ordering};

use crate::api::EngineApi;
use crate::types::{
    AaBox, BodyArgs, CharacterArgs, ConstraintKind, ContactInfo, GroundState, Quat, RawHandle,
    RayHit, ShapeKind, Vec4, VehicleArgs, WheelArgs, WorldSettings,
};
use crate::API_VERSION;

fn alloc<T>(value: T) -> RawHandle {
    Box::into_raw(Box::new(value)) as usize as RawHandle
}

unsafe fn deref<'a, T>(handle: RawHandle) -> &'a mut T {
    &mut *(handle as usize as *mut T)
}

unsafe fn free<T>(handle: RawHandle) {
    drop(Box::from_raw(handle as usize as *mut T));
}

struct StubWorld {
    gravity: Vec4,
    max_bodies: u32,
    bodies: Vec<RawHandle>,
    // Bodies materialized by world_restore_scene; freed with the world.
    restored: Vec<RawHandle>,
    contacts: Vec<ContactInfo>,
    steps: u64,
}

struct StubBody {
    args: BodyArgs,
    shape: RawHandle,
    active: bool,
}

struct StubShapeSettings {
    kind: u32,
    a: f32,
    b: f32,
    half_extents: Vec4,
    children: Vec<RawHandle>,
}

struct StubShape {
    kind: u32,
    refs: AtomicU32,
    image: Vec<u8>,
}

struct StubConstraintSettings {
    kind: u32,
    params: [f32; 10],
}

struct StubConstraint {
    kind: u32,
    enabled: bool,
    body_a: RawHandle,
    body_b: RawHandle,
}

struct StubCharacter {
    args: CharacterArgs,
    position: Vec4,
    velocity: Vec4,
    shape: RawHandle,
}

struct StubRagdollSettings {
    // (shape handle with a reference held, root offset)
    parts: Vec<(RawHandle, Vec4)>,
}

struct StubRagdoll {
    bodies: Vec<RawHandle>,
}

struct StubVehicle {
    args: VehicleArgs,
    wheels: Vec<WheelArgs>,
    input: [f32; 4],
    body: RawHandle,
}

struct StubSoftBodySettings {
    vertices: Vec<Vec4>,
}

fn shape_retain(shape: RawHandle) {
    if shape != 0 {
        unsafe { deref::<StubShape>(shape) }
            .refs
            .fetch_add(1, Ordering::SeqCst);
    }
}

fn shape_unref(shape: RawHandle) {
    if shape == 0 {
        return;
    }
    let prev = unsafe { deref::<StubShape>(shape) }
        .refs
        .fetch_sub(1, Ordering::SeqCst);
    if prev == 1 {
        unsafe { free::<StubShape>(shape) };
    }
}

/// Copies `payload` into `(buf, cap)` and reports the required size through
/// `written`. Returns 1 on success, 0 when the buffer is absent or too small
/// (the caller re-issues the call with a buffer of the reported size).
unsafe fn write_out(payload: &[u8], buf: *mut u8, cap: u64, written: *mut u64) -> i32 {
    if !written.is_null() {
        *written = payload.len() as u64;
    }
    if buf.is_null() || (cap as usize) < payload.len() {
        return 0;
    }
    std::ptr::copy_nonoverlapping(payload.as_ptr(), buf, payload.len());
    1
}

unsafe fn read_in<'a>(bytes: *const u8, len: u64) -> &'a [u8] {
    if bytes.is_null() {
        &[]
    } else {
        std::slice::from_raw_parts(bytes, len as usize)
    }
}

fn settings_image(kind: u32, a: f32, b: f32, half_extents: Vec4) -> Vec<u8> {
    let mut image = Vec::with_capacity(28);
    image.extend_from_slice(&kind.to_le_bytes());
    image.extend_from_slice(&a.to_le_bytes());
    image.extend_from_slice(&b.to_le_bytes());
    image.extend_from_slice(bytemuck::bytes_of(&half_extents));
    image
}

fn settings_from_image(image: &[u8]) -> Option<StubShapeSettings> {
    if image.len() < 28 {
        return None;
    }
    let kind = u32::from_le_bytes(image[0..4].try_into().ok()?);
    ShapeKind::from_raw(kind)?;
    let a = f32::from_le_bytes(image[4..8].try_into().ok()?);
    let b = f32::from_le_bytes(image[8..12].try_into().ok()?);
    let half_extents = bytemuck::pod_read_unaligned::<Vec4>(&image[12..28]);
    Some(StubShapeSettings { kind, a, b, half_extents, children: Vec::new() })
}

// ---------------------------------------------------------------------------
// Entry points. Signatures must match the table in `api.rs` exactly.
// ---------------------------------------------------------------------------

unsafe extern "C" fn api_version() -> u32 {
    API_VERSION
}

unsafe extern "C" fn world_create(settings: *const WorldSettings) -> RawHandle {
    let settings = if settings.is_null() { WorldSettings::default() } else { *settings };
    alloc(StubWorld {
        gravity: settings.gravity,
        max_bodies: settings.max_bodies,
        bodies: Vec::new(),
        restored: Vec::new(),
        contacts: Vec::new(),
        steps: 0,
    })
}

unsafe extern "C" fn world_destroy(world: RawHandle) {
    let restored = std::mem::take(&mut deref::<StubWorld>(world).restored);
    for body in restored {
        shape_unref(deref::<StubBody>(body).shape);
        free::<StubBody>(body);
    }
    free::<StubWorld>(world);
}

unsafe extern "C" fn world_step(world: RawHandle, _dt: f32, substeps: u32) -> i32 {
    if substeps == 0 {
        return 0;
    }
    let w = deref::<StubWorld>(world);
    w.steps += u64::from(substeps);
    // Synthetic manifolds for coincident bodies; echo only, no narrow phase.
    let mut contacts = Vec::new();
    for (i, &a) in w.bodies.iter().enumerate() {
        for &b in &w.bodies[i + 1..] {
            let pa = deref::<StubBody>(a).args.position;
            let pb = deref::<StubBody>(b).args.position;
            if pa == pb {
                contacts.push(ContactInfo {
                    body_a: a,
                    body_b: b,
                    position: pa,
                    normal: Vec4::new(0.0, 1.0, 0.0),
                    penetration: 0.0,
                    _pad: [0.0; 3],
                });
            }
        }
    }
    w.contacts = contacts;
    1
}

unsafe extern "C" fn world_set_gravity(world: RawHandle, gravity: *const Vec4) {
    deref::<StubWorld>(world).gravity = *gravity;
}

unsafe extern "C" fn world_get_gravity(world: RawHandle, out: *mut Vec4) {
    *out = deref::<StubWorld>(world).gravity;
}

unsafe extern "C" fn world_add_body(world: RawHandle, body: RawHandle, activate: i32) {
    let w = deref::<StubWorld>(world);
    if w.bodies.len() < w.max_bodies as usize && !w.bodies.contains(&body) {
        w.bodies.push(body);
        deref::<StubBody>(body).active = activate != 0;
    }
}

unsafe extern "C" fn world_remove_body(world: RawHandle, body: RawHandle) {
    deref::<StubWorld>(world).bodies.retain(|&b| b != body);
}

unsafe extern "C" fn world_body_count(world: RawHandle) -> u32 {
    let w = deref::<StubWorld>(world);
    (w.bodies.len() + w.restored.len()) as u32
}

unsafe extern "C" fn world_contact_count(world: RawHandle) -> u32 {
    deref::<StubWorld>(world).contacts.len() as u32
}

unsafe extern "C" fn world_get_contact(
    world: RawHandle,
    index: u32,
    out: *mut ContactInfo,
) -> i32 {
    let w = deref::<StubWorld>(world);
    match w.contacts.get(index as usize) {
        Some(contact) => {
            *out = *contact;
            1
        }
        None => 0,
    }
}

unsafe extern "C" fn world_cast_ray(
    world: RawHandle,
    origin: *const Vec4,
    direction: *const Vec4,
    out: *mut RayHit,
) -> i32 {
    let w = deref::<StubWorld>(world);
    let o = *origin;
    let d = *direction;
    let len_sq = d.x * d.x + d.y * d.y + d.z * d.z;
    if len_sq == 0.0 {
        return 0;
    }
    let mut best: Option<(RawHandle, f32)> = None;
    for &body in &w.bodies {
        let p = deref::<StubBody>(body).args.position;
        let t = ((p.x - o.x) * d.x + (p.y - o.y) * d.y + (p.z - o.z) * d.z) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let cx = o.x + t * d.x - p.x;
        let cy = o.y + t * d.y - p.y;
        let cz = o.z + t * d.z - p.z;
        if cx * cx + cy * cy + cz * cz <= 0.25 && best.map_or(true, |(_, bt)| t < bt) {
            best = Some((body, t));
        }
    }
    match best {
        Some((body, fraction)) => {
            *out = RayHit { body, fraction, _pad: 0 };
            1
        }
        None => 0,
    }
}

unsafe extern "C" fn world_save_scene(
    world: RawHandle,
    buf: *mut u8,
    cap: u64,
    written: *mut u64,
) -> i32 {
    let w = deref::<StubWorld>(world);
    let mut payload = Vec::new();
    payload.extend_from_slice(bytemuck::bytes_of(&w.gravity));
    payload.extend_from_slice(&(w.bodies.len() as u32 + w.restored.len() as u32).to_le_bytes());
    for &body in w.bodies.iter().chain(&w.restored) {
        payload.extend_from_slice(bytemuck::bytes_of(&deref::<StubBody>(body).args));
    }
    write_out(&payload, buf, cap, written)
}

unsafe extern "C" fn world_restore_scene(world: RawHandle, bytes: *const u8, len: u64) -> i32 {
    let data = read_in(bytes, len);
    if data.len() < 20 {
        return 0;
    }
    let gravity = bytemuck::pod_read_unaligned::<Vec4>(&data[0..16]);
    let count = u32::from_le_bytes(data[16..20].try_into().unwrap()) as usize;
    let body_size = std::mem::size_of::<BodyArgs>();
    if data.len() < 20 + count * body_size {
        return 0;
    }
    let w = deref::<StubWorld>(world);
    w.gravity = gravity;
    for i in 0..count {
        let start = 20 + i * body_size;
        let args = bytemuck::pod_read_unaligned::<BodyArgs>(&data[start..start + body_size]);
        w.restored.push(alloc(StubBody { args, shape: 0, active: false }));
    }
    1
}

unsafe extern "C" fn body_create(
    world: RawHandle,
    shape: RawHandle,
    args: *const BodyArgs,
) -> RawHandle {
    let w = deref::<StubWorld>(world);
    if shape == 0 || w.bodies.len() + w.restored.len() >= w.max_bodies as usize {
        return 0;
    }
    shape_retain(shape);
    alloc(StubBody { args: *args, shape, active: false })
}

unsafe extern "C" fn body_destroy(world: RawHandle, body: RawHandle) {
    deref::<StubWorld>(world).bodies.retain(|&b| b != body);
    shape_unref(deref::<StubBody>(body).shape);
    free::<StubBody>(body);
}

unsafe extern "C" fn body_get_position(body: RawHandle, out: *mut Vec4) {
    *out = deref::<StubBody>(body).args.position;
}

unsafe extern "C" fn body_set_position(body: RawHandle, position: *const Vec4) {
    deref::<StubBody>(body).args.position = *position;
}

unsafe extern "C" fn body_get_rotation(body: RawHandle, out: *mut Quat) {
    *out = deref::<StubBody>(body).args.rotation;
}

unsafe extern "C" fn body_get_linear_velocity(body: RawHandle, out: *mut Vec4) {
    *out = deref::<StubBody>(body).args.linear_velocity;
}

unsafe extern "C" fn body_set_linear_velocity(body: RawHandle, velocity: *const Vec4) {
    deref::<StubBody>(body).args.linear_velocity = *velocity;
}

unsafe extern "C" fn body_get_aabb(body: RawHandle, out: *mut AaBox) {
    let b = deref::<StubBody>(body);
    let half = if b.shape == 0 {
        Vec4::splat(0.5)
    } else {
        let shape = deref::<StubShape>(b.shape);
        match settings_from_image(&shape.image) {
            Some(s) if s.kind == ShapeKind::Box as u32 => s.half_extents,
            Some(s) if s.kind == ShapeKind::Capsule as u32 => Vec4::new(s.b, s.a + s.b, s.b),
            Some(s) => Vec4::splat(s.a),
            None => Vec4::splat(0.5),
        }
    };
    let p = b.args.position;
    *out = AaBox {
        min: Vec4::new(p.x - half.x, p.y - half.y, p.z - half.z),
        max: Vec4::new(p.x + half.x, p.y + half.y, p.z + half.z),
    };
}

unsafe extern "C" fn body_get_motion_type(body: RawHandle) -> u32 {
    deref::<StubBody>(body).args.motion_type
}

unsafe extern "C" fn body_activate(body: RawHandle) {
    deref::<StubBody>(body).active = true;
}

unsafe extern "C" fn body_deactivate(body: RawHandle) {
    deref::<StubBody>(body).active = false;
}

unsafe extern "C" fn body_is_active(body: RawHandle) -> i32 {
    i32::from(deref::<StubBody>(body).active)
}

unsafe extern "C" fn body_get_shape(body: RawHandle) -> RawHandle {
    let shape = deref::<StubBody>(body).shape;
    shape_retain(shape);
    shape
}

unsafe extern "C" fn shape_settings_sphere(radius: f32) -> RawHandle {
    if radius <= 0.0 {
        return 0;
    }
    alloc(StubShapeSettings {
        kind: ShapeKind::Sphere as u32,
        a: radius,
        b: 0.0,
        half_extents: Vec4::splat(radius),
        children: Vec::new(),
    })
}

unsafe extern "C" fn shape_settings_box(half_extents: *const Vec4, convex_radius: f32) -> RawHandle {
    let he = *half_extents;
    if he.x <= 0.0 || he.y <= 0.0 || he.z <= 0.0 {
        return 0;
    }
    alloc(StubShapeSettings {
        kind: ShapeKind::Box as u32,
        a: convex_radius,
        b: 0.0,
        half_extents: he,
        children: Vec::new(),
    })
}

unsafe extern "C" fn shape_settings_capsule(half_height: f32, radius: f32) -> RawHandle {
    if half_height <= 0.0 || radius <= 0.0 {
        return 0;
    }
    alloc(StubShapeSettings {
        kind: ShapeKind::Capsule as u32,
        a: half_height,
        b: radius,
        half_extents: Vec4::new(radius, half_height + radius, radius),
        children: Vec::new(),
    })
}

unsafe extern "C" fn shape_settings_compound() -> RawHandle {
    alloc(StubShapeSettings {
        kind: ShapeKind::Compound as u32,
        a: 0.0,
        b: 0.0,
        half_extents: Vec4::zero(),
        children: Vec::new(),
    })
}

unsafe extern "C" fn shape_settings_compound_add(
    compound: RawHandle,
    child: RawHandle,
    _position: *const Vec4,
    _rotation: *const Quat,
) {
    deref::<StubShapeSettings>(compound).children.push(child);
}

unsafe extern "C" fn shape_settings_destroy(settings: RawHandle) {
    free::<StubShapeSettings>(settings);
}

unsafe extern "C" fn shape_settings_build(settings: RawHandle) -> RawHandle {
    let s = deref::<StubShapeSettings>(settings);
    if s.kind == ShapeKind::Compound as u32 && s.children.is_empty() {
        return 0;
    }
    let mut image = settings_image(s.kind, s.a, s.b, s.half_extents);
    if s.kind == ShapeKind::Compound as u32 {
        image[4..8].copy_from_slice(&(s.children.len() as f32).to_le_bytes());
    }
    alloc(StubShape { kind: s.kind, refs: AtomicU32::new(1), image })
}

unsafe extern "C" fn shape_add_ref(shape: RawHandle) {
    shape_retain(shape);
}

unsafe extern "C" fn shape_release(shape: RawHandle) {
    shape_unref(shape);
}

unsafe extern "C" fn shape_kind(shape: RawHandle) -> u32 {
    deref::<StubShape>(shape).kind
}

unsafe extern "C" fn shape_ref_count(shape: RawHandle) -> u32 {
    deref::<StubShape>(shape).refs.load(Ordering::SeqCst)
}

unsafe extern "C" fn shape_save(
    shape: RawHandle,
    buf: *mut u8,
    cap: u64,
    written: *mut u64,
) -> i32 {
    let image = deref::<StubShape>(shape).image.clone();
    write_out(&image, buf, cap, written)
}

unsafe extern "C" fn shape_restore(bytes: *const u8, len: u64) -> RawHandle {
    let data = read_in(bytes, len);
    match settings_from_image(data) {
        Some(s) => alloc(StubShape {
            kind: s.kind,
            refs: AtomicU32::new(1),
            image: data.to_vec(),
        }),
        None => 0,
    }
}

fn constraint_settings(kind: ConstraintKind, params: [f32; 10]) -> RawHandle {
    alloc(StubConstraintSettings { kind: kind as u32, params })
}

unsafe extern "C" fn constraint_settings_point(p1: *const Vec4, p2: *const Vec4) -> RawHandle {
    let (a, b) = (*p1, *p2);
    constraint_settings(
        ConstraintKind::Point,
        [a.x, a.y, a.z, b.x, b.y, b.z, 0.0, 0.0, 0.0, 0.0],
    )
}

unsafe extern "C" fn constraint_settings_hinge(
    point: *const Vec4,
    axis: *const Vec4,
    limit_min: f32,
    limit_max: f32,
) -> RawHandle {
    let (p, a) = (*point, *axis);
    constraint_settings(
        ConstraintKind::Hinge,
        [p.x, p.y, p.z, a.x, a.y, a.z, limit_min, limit_max, 0.0, 0.0],
    )
}

unsafe extern "C" fn constraint_settings_slider(
    axis: *const Vec4,
    limit_min: f32,
    limit_max: f32,
) -> RawHandle {
    let a = *axis;
    constraint_settings(
        ConstraintKind::Slider,
        [a.x, a.y, a.z, limit_min, limit_max, 0.0, 0.0, 0.0, 0.0, 0.0],
    )
}

unsafe extern "C" fn constraint_settings_distance(min: f32, max: f32) -> RawHandle {
    if min > max {
        return 0;
    }
    constraint_settings(ConstraintKind::Distance, [min, max, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
}

unsafe extern "C" fn constraint_settings_destroy(settings: RawHandle) {
    free::<StubConstraintSettings>(settings);
}

unsafe extern "C" fn constraint_settings_kind(settings: RawHandle) -> u32 {
    deref::<StubConstraintSettings>(settings).kind
}

unsafe extern "C" fn constraint_settings_save(
    settings: RawHandle,
    buf: *mut u8,
    cap: u64,
    written: *mut u64,
) -> i32 {
    let s = deref::<StubConstraintSettings>(settings);
    let mut payload = Vec::with_capacity(44);
    payload.extend_from_slice(&s.kind.to_le_bytes());
    for p in s.params {
        payload.extend_from_slice(&p.to_le_bytes());
    }
    write_out(&payload, buf, cap, written)
}

unsafe extern "C" fn constraint_settings_restore(bytes: *const u8, len: u64) -> RawHandle {
    let data = read_in(bytes, len);
    if data.len() < 44 {
        return 0;
    }
    let kind = u32::from_le_bytes(data[0..4].try_into().unwrap());
    if ConstraintKind::from_raw(kind).is_none() {
        return 0;
    }
    let mut params = [0.0f32; 10];
    for (i, p) in params.iter_mut().enumerate() {
        let start = 4 + i * 4;
        *p = f32::from_le_bytes(data[start..start + 4].try_into().unwrap());
    }
    alloc(StubConstraintSettings { kind, params })
}

unsafe extern "C" fn constraint_create(
    _world: RawHandle,
    body_a: RawHandle,
    body_b: RawHandle,
    settings: RawHandle,
) -> RawHandle {
    if body_a == 0 || body_b == 0 || body_a == body_b {
        return 0;
    }
    let kind = deref::<StubConstraintSettings>(settings).kind;
    alloc(StubConstraint { kind, enabled: true, body_a, body_b })
}

unsafe extern "C" fn constraint_destroy(_world: RawHandle, constraint: RawHandle) {
    free::<StubConstraint>(constraint);
}

unsafe extern "C" fn constraint_set_enabled(constraint: RawHandle, enabled: i32) {
    deref::<StubConstraint>(constraint).enabled = enabled != 0;
}

unsafe extern "C" fn constraint_is_enabled(constraint: RawHandle) -> i32 {
    i32::from(deref::<StubConstraint>(constraint).enabled)
}

unsafe extern "C" fn constraint_kind(constraint: RawHandle) -> u32 {
    deref::<StubConstraint>(constraint).kind
}

unsafe extern "C" fn character_create(
    _world: RawHandle,
    shape: RawHandle,
    args: *const CharacterArgs,
) -> RawHandle {
    if shape == 0 {
        return 0;
    }
    shape_retain(shape);
    let args = *args;
    alloc(StubCharacter { args, position: args.position, velocity: Vec4::zero(), shape })
}

unsafe extern "C" fn character_destroy(_world: RawHandle, character: RawHandle) {
    shape_unref(deref::<StubCharacter>(character).shape);
    free::<StubCharacter>(character);
}

unsafe extern "C" fn character_ground_state(character: RawHandle) -> u32 {
    let c = deref::<StubCharacter>(character);
    if c.position.y <= 0.0 {
        GroundState::OnGround as u32
    } else {
        GroundState::InAir as u32
    }
}

unsafe extern "C" fn character_set_linear_velocity(character: RawHandle, velocity: *const Vec4) {
    deref::<StubCharacter>(character).velocity = *velocity;
}

unsafe extern "C" fn character_get_position(character: RawHandle, out: *mut Vec4) {
    *out = deref::<StubCharacter>(character).position;
}

unsafe extern "C" fn ragdoll_settings_create() -> RawHandle {
    alloc(StubRagdollSettings { parts: Vec::new() })
}

unsafe extern "C" fn ragdoll_settings_add_part(
    settings: RawHandle,
    shape: RawHandle,
    offset: *const Vec4,
) -> i32 {
    if shape == 0 {
        return -1;
    }
    shape_retain(shape);
    let s = deref::<StubRagdollSettings>(settings);
    s.parts.push((shape, *offset));
    (s.parts.len() - 1) as i32
}

unsafe extern "C" fn ragdoll_settings_destroy(settings: RawHandle) {
    for &(shape, _) in &deref::<StubRagdollSettings>(settings).parts {
        shape_unref(shape);
    }
    free::<StubRagdollSettings>(settings);
}

unsafe extern "C" fn ragdoll_settings_save(
    settings: RawHandle,
    buf: *mut u8,
    cap: u64,
    written: *mut u64,
) -> i32 {
    let s = deref::<StubRagdollSettings>(settings);
    let mut payload = Vec::new();
    payload.extend_from_slice(&(s.parts.len() as u32).to_le_bytes());
    for &(_, offset) in &s.parts {
        payload.extend_from_slice(bytemuck::bytes_of(&offset));
    }
    write_out(&payload, buf, cap, written)
}

unsafe extern "C" fn ragdoll_settings_restore(bytes: *const u8, len: u64) -> RawHandle {
    let data = read_in(bytes, len);
    if data.len() < 4 {
        return 0;
    }
    let count = u32::from_le_bytes(data[0..4].try_into().unwrap()) as usize;
    if data.len() < 4 + count * 16 {
        return 0;
    }
    let mut parts = Vec::with_capacity(count);
    for i in 0..count {
        let start = 4 + i * 16;
        let offset = bytemuck::pod_read_unaligned::<Vec4>(&data[start..start + 16]);
        // Restored parts get a fresh unit sphere; the original shape graph is
        // not part of the ragdoll image.
        let shape = alloc(StubShape {
            kind: ShapeKind::Sphere as u32,
            refs: AtomicU32::new(1),
            image: settings_image(ShapeKind::Sphere as u32, 1.0, 0.0, Vec4::splat(1.0)),
        });
        parts.push((shape, offset));
    }
    alloc(StubRagdollSettings { parts })
}

unsafe extern "C" fn ragdoll_create(world: RawHandle, settings: RawHandle) -> RawHandle {
    let s = deref::<StubRagdollSettings>(settings);
    if s.parts.is_empty() || world == 0 {
        return 0;
    }
    let mut bodies = Vec::with_capacity(s.parts.len());
    for &(shape, offset) in &s.parts {
        shape_retain(shape);
        bodies.push(alloc(StubBody {
            args: BodyArgs { position: offset, ..BodyArgs::default() },
            shape,
            active: true,
        }));
    }
    alloc(StubRagdoll { bodies })
}

unsafe extern "C" fn ragdoll_destroy(_world: RawHandle, ragdoll: RawHandle) {
    for &body in &deref::<StubRagdoll>(ragdoll).bodies {
        shape_unref(deref::<StubBody>(body).shape);
        free::<StubBody>(body);
    }
    free::<StubRagdoll>(ragdoll);
}

unsafe extern "C" fn ragdoll_part_count(ragdoll: RawHandle) -> u32 {
    deref::<StubRagdoll>(ragdoll).bodies.len() as u32
}

unsafe extern "C" fn ragdoll_get_part(ragdoll: RawHandle, index: u32) -> RawHandle {
    deref::<StubRagdoll>(ragdoll)
        .bodies
        .get(index as usize)
        .copied()
        .unwrap_or(0)
}

unsafe extern "C" fn vehicle_create(
    _world: RawHandle,
    body: RawHandle,
    args: *const VehicleArgs,
    wheels: *const WheelArgs,
    wheel_count: u64,
) -> RawHandle {
    if body == 0 || wheel_count == 0 {
        return 0;
    }
    let wheels = std::slice::from_raw_parts(wheels, wheel_count as usize).to_vec();
    alloc(StubVehicle { args: *args, wheels, input: [0.0; 4], body })
}

unsafe extern "C" fn vehicle_destroy(_world: RawHandle, vehicle: RawHandle) {
    free::<StubVehicle>(vehicle);
}

unsafe extern "C" fn vehicle_wheel_count(vehicle: RawHandle) -> u32 {
    deref::<StubVehicle>(vehicle).wheels.len() as u32
}

unsafe extern "C" fn vehicle_set_driver_input(
    vehicle: RawHandle,
    forward: f32,
    right: f32,
    brake: f32,
    hand_brake: f32,
) {
    deref::<StubVehicle>(vehicle).input = [forward, right, brake, hand_brake];
}

unsafe extern "C" fn softbody_settings_create(vertices: *const Vec4, count: u64) -> RawHandle {
    if count == 0 {
        return 0;
    }
    let vertices = std::slice::from_raw_parts(vertices, count as usize).to_vec();
    alloc(StubSoftBodySettings { vertices })
}

unsafe extern "C" fn softbody_settings_destroy(settings: RawHandle) {
    free::<StubSoftBodySettings>(settings);
}

unsafe extern "C" fn softbody_settings_save(
    settings: RawHandle,
    buf: *mut u8,
    cap: u64,
    written: *mut u64,
) -> i32 {
    let s = deref::<StubSoftBodySettings>(settings);
    let mut payload = Vec::new();
    payload.extend_from_slice(&(s.vertices.len() as u64).to_le_bytes());
    payload.extend_from_slice(bytemuck::cast_slice(&s.vertices));
    write_out(&payload, buf, cap, written)
}

unsafe extern "C" fn softbody_settings_restore(bytes: *const u8, len: u64) -> RawHandle {
    let data = read_in(bytes, len);
    if data.len() < 8 {
        return 0;
    }
    let count = u64::from_le_bytes(data[0..8].try_into().unwrap()) as usize;
    if count == 0 || data.len() < 8 + count * 16 {
        return 0;
    }
    let vertices = data[8..8 + count * 16]
        .chunks_exact(16)
        .map(bytemuck::pod_read_unaligned::<Vec4>)
        .collect();
    alloc(StubSoftBodySettings { vertices })
}

unsafe extern "C" fn softbody_create(
    _world: RawHandle,
    settings: RawHandle,
    position: *const Vec4,
) -> RawHandle {
    let s = deref::<StubSoftBodySettings>(settings);
    if s.vertices.is_empty() {
        return 0;
    }
    alloc(StubBody {
        args: BodyArgs { position: *position, ..BodyArgs::default() },
        shape: 0,
        active: true,
    })
}

/// Address of a stub entry point by exported name; zero when unknown.
/// This is the loader the tests and the demo host resolve against.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn symbol_address(name: &str) -> RawHandle {
    macro_rules! table {
        ($($sym:ident),+ $(,)?) => {
            match name {
                $( stringify!($sym) => $sym as usize as RawHandle, )+
                _ => 0,
            }
        };
    }
    table! {
        api_version,
        world_create, world_destroy, world_step,
        world_set_gravity, world_get_gravity,
        world_add_body, world_remove_body, world_body_count,
        world_contact_count, world_get_contact, world_cast_ray,
        world_save_scene, world_restore_scene,
        body_create, body_destroy,
        body_get_position, body_set_position, body_get_rotation,
        body_get_linear_velocity, body_set_linear_velocity,
        body_get_aabb, body_get_motion_type,
        body_activate, body_deactivate, body_is_active, body_get_shape,
        shape_settings_sphere, shape_settings_box, shape_settings_capsule,
        shape_settings_compound, shape_settings_compound_add,
        shape_settings_destroy, shape_settings_build,
        shape_add_ref, shape_release, shape_kind, shape_ref_count,
        shape_save, shape_restore,
        constraint_settings_point, constraint_settings_hinge,
        constraint_settings_slider, constraint_settings_distance,
        constraint_settings_destroy, constraint_settings_kind,
        constraint_settings_save, constraint_settings_restore,
        constraint_create, constraint_destroy,
        constraint_set_enabled, constraint_is_enabled, constraint_kind,
        character_create, character_destroy, character_ground_state,
        character_set_linear_velocity, character_get_position,
        ragdoll_settings_create, ragdoll_settings_add_part,
        ragdoll_settings_destroy, ragdoll_settings_save, ragdoll_settings_restore,
        ragdoll_create, ragdoll_destroy, ragdoll_part_count, ragdoll_get_part,
        vehicle_create, vehicle_destroy, vehicle_wheel_count, vehicle_set_driver_input,
        softbody_settings_create, softbody_settings_destroy,
        softbody_settings_save, softbody_settings_restore, softbody_create,
    }
}

impl EngineApi {
    /// The complete stub table.
    #[must_use]
    pub fn stub() -> Self {
        Self::from_loader(symbol_address).expect("stub table is complete")
    }
}
