//! Rigid body wrapper.

use abi::{AaBox, BodyArgs, MotionType, Quat, RawHandle, Vec4, NULL_HANDLE};
use bytemuck::Zeroable;

use crate::engine::Engine;
use crate::handle::Handle;
use crate::shape::Shape;
use crate::world::World;

/// A rigid body. Owning bodies free themselves through the world that made
/// them and pin that world until they are released; borrowed bodies (for
/// example ragdoll parts) are views into memory their container owns.
pub struct Body {
    engine: Engine,
    handle: Handle,
}

impl Body {
    /// Create a body over `shape`. `None` when the native side refuses (zero
    /// sentinel), for example when the world is at its body limit.
    #[must_use]
    pub fn create(world: &World, shape: &Shape, args: &BodyArgs) -> Option<Self> {
        let engine = world.engine().clone();
        let addr = unsafe { (engine.api().body_create)(world.handle().addr(), shape.raw(), args) };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let world_pin = world.handle().pin();
        let handle = Handle::owning_with_container(addr, world.handle(), move |a| unsafe {
            (api.body_destroy)(world_pin.addr(), a);
        });
        Some(Self { engine, handle })
    }

    /// Wrap a body address owned by `container` (never freed by this handle).
    pub(crate) fn borrowed(engine: &Engine, addr: RawHandle, container: &Handle) -> Self {
        Self {
            engine: engine.clone(),
            handle: Handle::borrowed_with_container(addr, container),
        }
    }

    /// Adopt an owning body address scoped to `world` (used by soft-body
    /// instantiation, which returns a fresh body).
    pub(crate) fn owned(engine: &Engine, addr: RawHandle, world: &World) -> Self {
        let api = engine.api_arc();
        let world_pin = world.handle().pin();
        let handle = Handle::owning_with_container(addr, world.handle(), move |a| unsafe {
            (api.body_destroy)(world_pin.addr(), a);
        });
        Self {
            engine: engine.clone(),
            handle,
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
    pub fn position(&self) -> Vec4 {
        let mut out = Vec4::zero();
        unsafe { (self.engine.api().body_get_position)(self.handle.addr(), &mut out) };
        out
    }

    pub fn set_position(&self, position: Vec4) {
        unsafe { (self.engine.api().body_set_position)(self.handle.addr(), &position) };
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        let mut out = Quat::identity();
        unsafe { (self.engine.api().body_get_rotation)(self.handle.addr(), &mut out) };
        out
    }

    #[must_use]
    pub fn linear_velocity(&self) -> Vec4 {
        let mut out = Vec4::zero();
        unsafe { (self.engine.api().body_get_linear_velocity)(self.handle.addr(), &mut out) };
        out
    }

    pub fn set_linear_velocity(&self, velocity: Vec4) {
        unsafe { (self.engine.api().body_set_linear_velocity)(self.handle.addr(), &velocity) };
    }

    #[must_use]
    pub fn aabb(&self) -> AaBox {
        let mut out = AaBox::zeroed();
        unsafe { (self.engine.api().body_get_aabb)(self.handle.addr(), &mut out) };
        out
    }

    /// The body's motion type.
    ///
    /// # Panics
    ///
    /// Panics when the native side reports an ordinal this layer does not
    /// know — guessing a motion type would be silently wrong data.
    #[must_use]
    pub fn motion_type(&self) -> MotionType {
        let raw = unsafe { (self.engine.api().body_get_motion_type)(self.handle.addr()) };
        match MotionType::from_raw(raw) {
            Some(mt) => mt,
            None => panic!("unknown motion type ordinal {raw}"),
        }
    }

    pub fn activate(&self) {
        unsafe { (self.engine.api().body_activate)(self.handle.addr()) };
    }

    pub fn deactivate(&self) {
        unsafe { (self.engine.api().body_deactivate)(self.handle.addr()) };
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        unsafe { (self.engine.api().body_is_active)(self.handle.addr()) != 0 }
    }

    /// The body's shape, as a fresh counted reference: the native side
    /// increments the shape's reference count and this wrapper's release
    /// decrements it. `None` when the body has no shape (zero sentinel), as
    /// for instantiated soft bodies.
    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        let addr = unsafe { (self.engine.api().body_get_shape)(self.handle.addr()) };
        if addr == NULL_HANDLE {
            return None;
        }
        Some(Shape::adopt_counted(&self.engine, addr))
    }

    /// Free the native body now instead of waiting for the sweep.
    pub fn release(&self) {
        self.handle.release();
    }
}
