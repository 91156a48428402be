#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! Safe binding layer over a native rigid- and soft-body physics engine.
//!
//! The engine does all the simulating; this crate does the bookkeeping. Each
//! wrapper type stores a [`Handle`]: a native address plus ownership metadata
//! deciding who frees the allocation behind it. The rules are in
//! [`handle`]:
//!
//! - an owning handle frees its resource exactly once, no matter how many
//!   threads race the release;
//! - a borrowed handle never frees;
//! - a counted handle decrements the engine's intrusive reference count;
//! - a child handle can pin its container so the container's memory outlives
//!   every view into it;
//! - touching a released handle panics instead of touching freed memory.
//!
//! Explicit [`Handle::release`] (or a wrapper's `release()`) is the
//! deterministic path. Wrappers that simply go out of scope are picked up by
//! the background sweep in [`sweep`], which frees them off-thread without
//! ever holding the wrapper itself.
//!
//! Everything else is mechanical forwarding: marshal plain-old-data
//! arguments, call through the [`Engine`]'s entry-point table, wrap returned
//! addresses. Fallible native calls signal with a zero address or a false
//! flag, which the wrappers surface as `Option` and `bool`.

pub mod body;
pub mod broadphase;
pub mod character;
pub mod constraint;
pub mod contact;
pub mod engine;
pub mod handle;
mod marshal;
pub mod ragdoll;
pub mod shape;
pub mod softbody;
pub mod sweep;
pub mod vehicle;
pub mod world;

pub use body::Body;
pub use broadphase::RayCast;
pub use character::Character;
pub use constraint::{Constraint, ConstraintSettings};
pub use contact::Contact;
pub use engine::Engine;
pub use handle::Handle;
pub use ragdoll::{Ragdoll, RagdollSettings};
pub use shape::{Shape, ShapeSettings};
pub use softbody::SoftBodySettings;
pub use vehicle::Vehicle;
pub use world::World;

pub use abi::{
    AaBox, BodyArgs, CharacterArgs, ConstraintKind, ContactInfo, GroundState, MotionType, Quat,
    RawHandle, RayHit, ShapeKind, Vec4, VehicleArgs, WheelArgs, WorldSettings,
};
