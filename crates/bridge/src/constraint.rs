//! Constraint settings and live constraints.

use abi::{ConstraintKind, RawHandle, Vec4, NULL_HANDLE};

use crate::body::Body;
use crate::engine::Engine;
use crate::handle::Handle;
use crate::marshal::save_buffer;
use crate::world::World;

/// Description of a constraint between two bodies.
pub struct ConstraintSettings {
    engine: Engine,
    handle: Handle,
    kind: ConstraintKind,
}

impl ConstraintSettings {
    fn wrap(engine: &Engine, addr: RawHandle, kind: ConstraintKind) -> Option<Self> {
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let handle = Handle::owning(addr, move |a| unsafe { (api.constraint_settings_destroy)(a) });
        Some(Self {
            engine: engine.clone(),
            handle,
            kind,
        })
    }

    /// Ball-and-socket joint through two local attachment points.
    #[must_use]
    pub fn point(engine: &Engine, p1: Vec4, p2: Vec4) -> Option<Self> {
        let addr = unsafe { (engine.api().constraint_settings_point)(&p1, &p2) };
        Self::wrap(engine, addr, ConstraintKind::Point)
    }

    /// Hinge around `axis` through `point`, with rotation limits in radians.
    #[must_use]
    pub fn hinge(
        engine: &Engine,
        point: Vec4,
        axis: Vec4,
        limit_min: f32,
        limit_max: f32,
    ) -> Option<Self> {
        let addr =
            unsafe { (engine.api().constraint_settings_hinge)(&point, &axis, limit_min, limit_max) };
        Self::wrap(engine, addr, ConstraintKind::Hinge)
    }

    /// Translation along `axis` between the two limits.
    #[must_use]
    pub fn slider(engine: &Engine, axis: Vec4, limit_min: f32, limit_max: f32) -> Option<Self> {
        let addr = unsafe { (engine.api().constraint_settings_slider)(&axis, limit_min, limit_max) };
        Self::wrap(engine, addr, ConstraintKind::Slider)
    }

    /// Keep the bodies between `min` and `max` apart. `None` when the native
    /// side rejects the interval.
    #[must_use]
    pub fn distance(engine: &Engine, min: f32, max: f32) -> Option<Self> {
        let addr = unsafe { (engine.api().constraint_settings_distance)(min, max) };
        Self::wrap(engine, addr, ConstraintKind::Distance)
    }

    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Serialize to the engine's settings format.
    #[must_use]
    pub fn save(&self) -> Option<Vec<u8>> {
        let api = self.engine.api();
        let addr = self.handle.addr();
        save_buffer(|buf, cap, written| unsafe {
            (api.constraint_settings_save)(addr, buf, cap, written)
        })
    }

    /// Reconstruct settings from a saved image. `None` when the native side
    /// rejects the image.
    ///
    /// # Panics
    ///
    /// Panics when the restored object carries a subtype tag this layer has
    /// no wrapper case for.
    #[must_use]
    pub fn restore(engine: &Engine, bytes: &[u8]) -> Option<Self> {
        let addr = unsafe {
            (engine.api().constraint_settings_restore)(bytes.as_ptr(), bytes.len() as u64)
        };
        if addr == NULL_HANDLE {
            return None;
        }
        let raw_kind = unsafe { (engine.api().constraint_settings_kind)(addr) };
        let kind = match ConstraintKind::from_raw(raw_kind) {
            Some(kind) => kind,
            None => panic!("unknown constraint subtype ordinal {raw_kind}"),
        };
        Self::wrap(engine, addr, kind)
    }

    pub(crate) fn raw(&self) -> RawHandle {
        self.handle.addr()
    }
}

/// A live constraint binding two bodies in a world. Pins both bodies and the
/// world for as long as it exists.
pub struct Constraint {
    engine: Engine,
    handle: Handle,
    // The native constraint dereferences both bodies; keep them alive.
    _bodies: (Handle, Handle),
}

impl Constraint {
    /// Instantiate `settings` between `body_a` and `body_b`. `None` when the
    /// native side refuses the pair (sentinel), for example the same body
    /// twice.
    #[must_use]
    pub fn create(
        world: &World,
        settings: &ConstraintSettings,
        body_a: &Body,
        body_b: &Body,
    ) -> Option<Self> {
        let engine = world.engine().clone();
        let addr = unsafe {
            (engine.api().constraint_create)(
                world.handle().addr(),
                body_a.raw(),
                body_b.raw(),
                settings.raw(),
            )
        };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let world_pin = world.handle().pin();
        let handle = Handle::owning_with_container(addr, world.handle(), move |a| unsafe {
            (api.constraint_destroy)(world_pin.addr(), a);
        });
        Some(Self {
            engine,
            handle,
            _bodies: (body_a.handle().pin(), body_b.handle().pin()),
        })
    }

    pub fn set_enabled(&self, enabled: bool) {
        unsafe {
            (self.engine.api().constraint_set_enabled)(self.handle.addr(), i32::from(enabled));
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        unsafe { (self.engine.api().constraint_is_enabled)(self.handle.addr()) != 0 }
    }

    /// # Panics
    ///
    /// Panics on an unknown subtype ordinal, like settings reconstruction.
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        let raw = unsafe { (self.engine.api().constraint_kind)(self.handle.addr()) };
        match ConstraintKind::from_raw(raw) {
            Some(kind) => kind,
            None => panic!("unknown constraint subtype ordinal {raw}"),
        }
    }

    /// Free the native constraint now instead of waiting for the sweep.
    pub fn release(&self) {
        self.handle.release();
    }
}
