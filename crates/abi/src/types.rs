//! Value types that cross the native boundary.
//!
//! Everything here is `#[repr(C)]` and `bytemuck::Pod`: the native side reads
//! and writes these through raw pointers, and the serialization entry points
//! move them as raw bytes. Padding is explicit so the `Pod` derive holds.

/// Opaque native address. Zero is the sentinel for "no object" and for a
/// handle that has already been released.
pub type RawHandle = u64;

/// The released / not-found sentinel.
pub const NULL_HANDLE: RawHandle = 0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v, w: 0.0 }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::splat(0.0)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    #[must_use]
    pub const fn identity() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AaBox {
    pub min: Vec4,
    pub max: Vec4,
}

impl AaBox {
    #[must_use]
    pub fn contains(&self, p: Vec4) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WorldSettings {
    pub gravity: Vec4,
    pub max_bodies: u32,
    pub _pad: [u32; 3],
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: Vec4::new(0.0, -9.81, 0.0),
            max_bodies: 10_240,
            _pad: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyArgs {
    pub position: Vec4,
    pub rotation: Quat,
    pub linear_velocity: Vec4,
    pub motion_type: u32,
    pub _pad: [u32; 3],
}

impl Default for BodyArgs {
    fn default() -> Self {
        Self {
            position: Vec4::zero(),
            rotation: Quat::identity(),
            linear_velocity: Vec4::zero(),
            motion_type: MotionType::Dynamic as u32,
            _pad: [0; 3],
        }
    }
}

/// Result of a broad-phase ray cast. `body` is the zero sentinel on a miss.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RayHit {
    pub body: RawHandle,
    pub fraction: f32,
    pub _pad: u32,
}

/// One contact manifold snapshot, read out after a step.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ContactInfo {
    pub body_a: RawHandle,
    pub body_b: RawHandle,
    pub position: Vec4,
    pub normal: Vec4,
    pub penetration: f32,
    pub _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CharacterArgs {
    pub position: Vec4,
    pub up: Vec4,
    pub mass: f32,
    pub max_slope_angle: f32,
    pub _pad: [f32; 2],
}

impl Default for CharacterArgs {
    fn default() -> Self {
        Self {
            position: Vec4::zero(),
            up: Vec4::new(0.0, 1.0, 0.0),
            mass: 70.0,
            max_slope_angle: 0.8,
            _pad: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WheelArgs {
    pub position: Vec4,
    pub radius: f32,
    pub width: f32,
    pub suspension_min: f32,
    pub suspension_max: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VehicleArgs {
    pub max_engine_torque: f32,
    pub max_steer_angle: f32,
    pub _pad: [f32; 2],
}

impl Default for VehicleArgs {
    fn default() -> Self {
        Self {
            max_engine_torque: 500.0,
            max_steer_angle: 0.6,
            _pad: [0.0; 2],
        }
    }
}

/// How a body moves. Ordinals are fixed by the native engine.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionType {
    Static = 0,
    Kinematic = 1,
    Dynamic = 2,
}

impl MotionType {
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Static),
            1 => Some(Self::Kinematic),
            2 => Some(Self::Dynamic),
            _ => None,
        }
    }
}

/// Shape subtype tag.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Sphere = 0,
    Box = 1,
    Capsule = 2,
    Compound = 3,
}

impl ShapeKind {
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Sphere),
            1 => Some(Self::Box),
            2 => Some(Self::Capsule),
            3 => Some(Self::Compound),
            _ => None,
        }
    }
}

/// Constraint subtype tag.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Point = 0,
    Hinge = 1,
    Slider = 2,
    Distance = 3,
}

impl ConstraintKind {
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Point),
            1 => Some(Self::Hinge),
            2 => Some(Self::Slider),
            3 => Some(Self::Distance),
            _ => None,
        }
    }
}

/// Ground contact state reported for a character.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroundState {
    OnGround = 0,
    OnSteepSlope = 1,
    NotSupported = 2,
    InAir = 3,
}

impl GroundState {
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::OnGround),
            1 => Some(Self::OnSteepSlope),
            2 => Some(Self::NotSupported),
            3 => Some(Self::InAir),
            _ => None,
        }
    }
}
