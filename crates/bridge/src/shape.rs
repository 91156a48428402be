//! Shape settings and built shapes.
//!
//! Settings are single-owner objects destroyed like any other allocation.
//! Built shapes are reference-counted inside the engine: every `Shape` holds
//! exactly one count, `clone` takes another, and release decrements. The two
//! disposal strategies never meet on the same handle.

use abi::{Quat, RawHandle, ShapeKind, Vec4, NULL_HANDLE};

use crate::engine::Engine;
use crate::handle::Handle;
use crate::marshal::save_buffer;

/// Mutable description of a shape, consumed by [`ShapeSettings::build`].
pub struct ShapeSettings {
    engine: Engine,
    handle: Handle,
    kind: ShapeKind,
    // A compound reads its children when it is built; keep them alive for at
    // least as long as the compound settings themselves.
    children: Vec<ShapeSettings>,
}

impl ShapeSettings {
    fn wrap(engine: &Engine, addr: RawHandle, kind: ShapeKind) -> Option<Self> {
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let handle = Handle::owning(addr, move |a| unsafe { (api.shape_settings_destroy)(a) });
        Some(Self {
            engine: engine.clone(),
            handle,
            kind,
            children: Vec::new(),
        })
    }

    /// Sphere of `radius`. `None` for a non-positive radius.
    #[must_use]
    pub fn sphere(engine: &Engine, radius: f32) -> Option<Self> {
        let addr = unsafe { (engine.api().shape_settings_sphere)(radius) };
        Self::wrap(engine, addr, ShapeKind::Sphere)
    }

    /// Box with the given half extents.
    #[must_use]
    pub fn boxed(engine: &Engine, half_extents: Vec4, convex_radius: f32) -> Option<Self> {
        let addr = unsafe { (engine.api().shape_settings_box)(&half_extents, convex_radius) };
        Self::wrap(engine, addr, ShapeKind::Box)
    }

    /// Capsule: cylinder of `half_height` capped by spheres of `radius`.
    #[must_use]
    pub fn capsule(engine: &Engine, half_height: f32, radius: f32) -> Option<Self> {
        let addr = unsafe { (engine.api().shape_settings_capsule)(half_height, radius) };
        Self::wrap(engine, addr, ShapeKind::Capsule)
    }

    /// Empty compound; populate with [`Self::add_child`].
    #[must_use]
    pub fn compound(engine: &Engine) -> Option<Self> {
        let addr = unsafe { (engine.api().shape_settings_compound)() };
        Self::wrap(engine, addr, ShapeKind::Compound)
    }

    /// Attach `child` at the given local transform. The compound takes the
    /// child settings over so the native side can read them at build time.
    pub fn add_child(&mut self, child: ShapeSettings, position: Vec4, rotation: Quat) {
        unsafe {
            (self.engine.api().shape_settings_compound_add)(
                self.handle.addr(),
                child.handle.addr(),
                &position,
                &rotation,
            );
        }
        self.children.push(child);
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Build the immutable shape. `None` when the native side rejects the
    /// settings (for example an empty compound).
    #[must_use]
    pub fn build(&self) -> Option<Shape> {
        let addr = unsafe { (self.engine.api().shape_settings_build)(self.handle.addr()) };
        if addr == NULL_HANDLE {
            return None;
        }
        Some(Shape::adopt_counted(&self.engine, addr))
    }
}

/// An immutable, reference-counted shape.
pub struct Shape {
    engine: Engine,
    handle: Handle,
    kind: ShapeKind,
}

impl Shape {
    /// Adopt an address that already carries one reference for us.
    ///
    /// # Panics
    ///
    /// Panics on the null sentinel (callers map it to `None` before adopting)
    /// and when the native side reports a shape subtype this layer has no
    /// wrapper case for — reconstructing the wrong type would be silently
    /// wrong data.
    pub(crate) fn adopt_counted(engine: &Engine, addr: RawHandle) -> Self {
        assert_ne!(addr, NULL_HANDLE, "cannot adopt the null native address");
        let raw_kind = unsafe { (engine.api().shape_kind)(addr) };
        let kind = match ShapeKind::from_raw(raw_kind) {
            Some(kind) => kind,
            None => panic!("unknown shape subtype ordinal {raw_kind}"),
        };
        let api = engine.api_arc();
        let handle = Handle::counted(addr, move |a| unsafe { (api.shape_release)(a) });
        Self {
            engine: engine.clone(),
            handle,
            kind,
        }
    }

    pub(crate) fn raw(&self) -> RawHandle {
        self.handle.addr()
    }

    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The intrusive reference count, as the engine reports it.
    #[must_use]
    pub fn ref_count(&self) -> u32 {
        unsafe { (self.engine.api().shape_ref_count)(self.handle.addr()) }
    }

    /// Serialize to the engine's shape format.
    #[must_use]
    pub fn save(&self) -> Option<Vec<u8>> {
        let api = self.engine.api();
        let addr = self.handle.addr();
        save_buffer(|buf, cap, written| unsafe { (api.shape_save)(addr, buf, cap, written) })
    }

    /// Reconstruct a shape from [`Self::save`] output. `None` when the image
    /// is rejected.
    #[must_use]
    pub fn restore(engine: &Engine, bytes: &[u8]) -> Option<Self> {
        let addr = unsafe { (engine.api().shape_restore)(bytes.as_ptr(), bytes.len() as u64) };
        if addr == NULL_HANDLE {
            return None;
        }
        Some(Self::adopt_counted(engine, addr))
    }

    /// Drop this reference now instead of waiting for the sweep.
    pub fn release(&self) {
        self.handle.release();
    }
}

impl Clone for Shape {
    /// Take a new reference on the same native shape.
    fn clone(&self) -> Self {
        let addr = self.handle.addr();
        unsafe { (self.engine.api().shape_add_ref)(addr) };
        let api = self.engine.api_arc();
        Self {
            engine: self.engine.clone(),
            handle: Handle::counted(addr, move |a| unsafe { (api.shape_release)(a) }),
            kind: self.kind,
        }
    }
}
