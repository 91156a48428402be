#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_safety_doc)]
//! Raw boundary to the native physics engine.
//!
//! This crate defines everything that crosses the native boundary and nothing
//! else: plain-old-data value types, the `u32` ordinals the engine uses for
//! its enumerations, and [`EngineApi`], a table of `extern "C"` function
//! pointers resolved by symbol name from addresses supplied by the embedder.
//!
//! The `stub` feature provides an in-process implementation of the full table
//! backed by plain bookkeeping structs. It allocates, stores, and echoes
//! state so the layers above can be exercised without the real engine; it
//! performs no collision detection or solving of any kind.

use thiserror::Error;

pub mod api;
pub mod types;

#[cfg(feature = "stub")]
pub mod stub;

pub use api::EngineApi;
pub use types::{
    AaBox, BodyArgs, CharacterArgs, ConstraintKind, ContactInfo, GroundState, MotionType, Quat,
    RawHandle, RayHit, ShapeKind, Vec4, VehicleArgs, WheelArgs, WorldSettings, NULL_HANDLE,
};

/// Major version of the entry-point table. Checked against `api_version()`
/// when a table is resolved from a loaded library.
pub const API_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum AbiError {
    #[error("native entry point not found: {0}")]
    MissingSymbol(&'static str),
    #[error("engine reports api version {found}, expected {expected}")]
    VersionMismatch { expected: u32, found: u32 },
}
