//! The engine entry-point table.
//!
//! The native engine is not linked against; the embedder hands us the address
//! of each exported entry point and [`EngineApi::from_loader`] turns those
//! addresses into typed function pointers. Dispatch after that is a plain
//! indirect call through the table.

use crate::types::{
    AaBox, BodyArgs, CharacterArgs, ContactInfo, Quat, RawHandle, RayHit, Vec4, VehicleArgs,
    WheelArgs, WorldSettings,
};
use crate::{AbiError, API_VERSION};

macro_rules! engine_api {
    ($( $(#[$meta:meta])* $name:ident : $fnty:ty ),+ $(,)?) => {
        /// Typed view of the engine's exported entry points.
        ///
        /// Field names are the exported symbol names. All calls are unsafe:
        /// the caller is responsible for passing live handles and valid
        /// pointers, exactly as with a directly linked C library.
        #[derive(Copy, Clone, Debug)]
        pub struct EngineApi {
            $( $(#[$meta])* pub $name: $fnty, )+
        }

        impl EngineApi {
            /// Resolve every entry point through `resolve`, which maps a
            /// symbol name to its address (zero when the symbol is absent).
            ///
            /// # Errors
            ///
            /// [`AbiError::MissingSymbol`] when an entry point is absent and
            /// [`AbiError::VersionMismatch`] when the engine's table version
            /// does not match [`API_VERSION`].
            pub fn from_loader(
                mut resolve: impl FnMut(&str) -> RawHandle,
            ) -> Result<Self, AbiError> {
                let api = Self {
                    $( $name: {
                        let addr = resolve(stringify!($name));
                        if addr == 0 {
                            return Err(AbiError::MissingSymbol(stringify!($name)));
                        }
                        // Address comes from the embedder's symbol lookup for
                        // exactly this signature.
                        let addr = addr as usize;
                        unsafe { std::mem::transmute::<usize, $fnty>(addr) }
                    }, )+
                };
                let found = unsafe { (api.api_version)() };
                if found != API_VERSION {
                    return Err(AbiError::VersionMismatch { expected: API_VERSION, found });
                }
                tracing::debug!(version = found, "resolved engine entry-point table");
                Ok(api)
            }
        }
    };
}

engine_api! {
    api_version: unsafe extern "C" fn() -> u32,

    // World lifecycle and queries.
    world_create: unsafe extern "C" fn(*const WorldSettings) -> RawHandle,
    world_destroy: unsafe extern "C" fn(RawHandle),
    world_step: unsafe extern "C" fn(RawHandle, f32, u32) -> i32,
    world_set_gravity: unsafe extern "C" fn(RawHandle, *const Vec4),
    world_get_gravity: unsafe extern "C" fn(RawHandle, *mut Vec4),
    world_add_body: unsafe extern "C" fn(RawHandle, RawHandle, i32),
    world_remove_body: unsafe extern "C" fn(RawHandle, RawHandle),
    world_body_count: unsafe extern "C" fn(RawHandle) -> u32,
    world_contact_count: unsafe extern "C" fn(RawHandle) -> u32,
    world_get_contact: unsafe extern "C" fn(RawHandle, u32, *mut ContactInfo) -> i32,
    world_cast_ray: unsafe extern "C" fn(RawHandle, *const Vec4, *const Vec4, *mut RayHit) -> i32,
    world_save_scene: unsafe extern "C" fn(RawHandle, *mut u8, u64, *mut u64) -> i32,
    world_restore_scene: unsafe extern "C" fn(RawHandle, *const u8, u64) -> i32,

    // Bodies.
    body_create: unsafe extern "C" fn(RawHandle, RawHandle, *const BodyArgs) -> RawHandle,
    body_destroy: unsafe extern "C" fn(RawHandle, RawHandle),
    body_get_position: unsafe extern "C" fn(RawHandle, *mut Vec4),
    body_set_position: unsafe extern "C" fn(RawHandle, *const Vec4),
    body_get_rotation: unsafe extern "C" fn(RawHandle, *mut Quat),
    body_get_linear_velocity: unsafe extern "C" fn(RawHandle, *mut Vec4),
    body_set_linear_velocity: unsafe extern "C" fn(RawHandle, *const Vec4),
    body_get_aabb: unsafe extern "C" fn(RawHandle, *mut AaBox),
    body_get_motion_type: unsafe extern "C" fn(RawHandle) -> u32,
    body_activate: unsafe extern "C" fn(RawHandle),
    body_deactivate: unsafe extern "C" fn(RawHandle),
    body_is_active: unsafe extern "C" fn(RawHandle) -> i32,
    /// Returns the body's shape with its reference count already incremented.
    body_get_shape: unsafe extern "C" fn(RawHandle) -> RawHandle,

    // Shape settings and built (reference-counted) shapes.
    shape_settings_sphere: unsafe extern "C" fn(f32) -> RawHandle,
    shape_settings_box: unsafe extern "C" fn(*const Vec4, f32) -> RawHandle,
    shape_settings_capsule: unsafe extern "C" fn(f32, f32) -> RawHandle,
    shape_settings_compound: unsafe extern "C" fn() -> RawHandle,
    shape_settings_compound_add:
        unsafe extern "C" fn(RawHandle, RawHandle, *const Vec4, *const Quat),
    shape_settings_destroy: unsafe extern "C" fn(RawHandle),
    /// Builds the shape; the returned handle carries one reference.
    shape_settings_build: unsafe extern "C" fn(RawHandle) -> RawHandle,
    shape_add_ref: unsafe extern "C" fn(RawHandle),
    shape_release: unsafe extern "C" fn(RawHandle),
    shape_kind: unsafe extern "C" fn(RawHandle) -> u32,
    shape_ref_count: unsafe extern "C" fn(RawHandle) -> u32,
    shape_save: unsafe extern "C" fn(RawHandle, *mut u8, u64, *mut u64) -> i32,
    shape_restore: unsafe extern "C" fn(*const u8, u64) -> RawHandle,

    // Constraints.
    constraint_settings_point: unsafe extern "C" fn(*const Vec4, *const Vec4) -> RawHandle,
    constraint_settings_hinge:
        unsafe extern "C" fn(*const Vec4, *const Vec4, f32, f32) -> RawHandle,
    constraint_settings_slider: unsafe extern "C" fn(*const Vec4, f32, f32) -> RawHandle,
    constraint_settings_distance: unsafe extern "C" fn(f32, f32) -> RawHandle,
    constraint_settings_destroy: unsafe extern "C" fn(RawHandle),
    constraint_settings_kind: unsafe extern "C" fn(RawHandle) -> u32,
    constraint_settings_save: unsafe extern "C" fn(RawHandle, *mut u8, u64, *mut u64) -> i32,
    constraint_settings_restore: unsafe extern "C" fn(*const u8, u64) -> RawHandle,
    constraint_create:
        unsafe extern "C" fn(RawHandle, RawHandle, RawHandle, RawHandle) -> RawHandle,
    constraint_destroy: unsafe extern "C" fn(RawHandle, RawHandle),
    constraint_set_enabled: unsafe extern "C" fn(RawHandle, i32),
    constraint_is_enabled: unsafe extern "C" fn(RawHandle) -> i32,
    constraint_kind: unsafe extern "C" fn(RawHandle) -> u32,

    // Characters.
    character_create: unsafe extern "C" fn(RawHandle, RawHandle, *const CharacterArgs) -> RawHandle,
    character_destroy: unsafe extern "C" fn(RawHandle, RawHandle),
    character_ground_state: unsafe extern "C" fn(RawHandle) -> u32,
    character_set_linear_velocity: unsafe extern "C" fn(RawHandle, *const Vec4),
    character_get_position: unsafe extern "C" fn(RawHandle, *mut Vec4),

    // Ragdolls.
    ragdoll_settings_create: unsafe extern "C" fn() -> RawHandle,
    ragdoll_settings_add_part: unsafe extern "C" fn(RawHandle, RawHandle, *const Vec4) -> i32,
    ragdoll_settings_destroy: unsafe extern "C" fn(RawHandle),
    ragdoll_settings_save: unsafe extern "C" fn(RawHandle, *mut u8, u64, *mut u64) -> i32,
    ragdoll_settings_restore: unsafe extern "C" fn(*const u8, u64) -> RawHandle,
    ragdoll_create: unsafe extern "C" fn(RawHandle, RawHandle) -> RawHandle,
    ragdoll_destroy: unsafe extern "C" fn(RawHandle, RawHandle),
    ragdoll_part_count: unsafe extern "C" fn(RawHandle) -> u32,
    /// Returns a part's body handle; the ragdoll retains ownership.
    ragdoll_get_part: unsafe extern "C" fn(RawHandle, u32) -> RawHandle,

    // Vehicles.
    vehicle_create: unsafe extern "C" fn(
        RawHandle,
        RawHandle,
        *const VehicleArgs,
        *const WheelArgs,
        u64,
    ) -> RawHandle,
    vehicle_destroy: unsafe extern "C" fn(RawHandle, RawHandle),
    vehicle_wheel_count: unsafe extern "C" fn(RawHandle) -> u32,
    vehicle_set_driver_input: unsafe extern "C" fn(RawHandle, f32, f32, f32, f32),

    // Soft bodies.
    softbody_settings_create: unsafe extern "C" fn(*const Vec4, u64) -> RawHandle,
    softbody_settings_destroy: unsafe extern "C" fn(RawHandle),
    softbody_settings_save: unsafe extern "C" fn(RawHandle, *mut u8, u64, *mut u64) -> i32,
    softbody_settings_restore: unsafe extern "C" fn(*const u8, u64) -> RawHandle,
    softbody_create: unsafe extern "C" fn(RawHandle, RawHandle, *const Vec4) -> RawHandle,
}
