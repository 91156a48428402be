//! Ragdoll settings and instantiated ragdolls.

use abi::{Vec4, NULL_HANDLE};

use crate::body::Body;
use crate::engine::Engine;
use crate::handle::Handle;
use crate::marshal::save_buffer;
use crate::shape::Shape;
use crate::world::World;

/// A ragdoll skeleton description: parts with shapes and root offsets.
pub struct RagdollSettings {
    engine: Engine,
    handle: Handle,
}

impl RagdollSettings {
    #[must_use]
    pub fn create(engine: &Engine) -> Self {
        let addr = unsafe { (engine.api().ragdoll_settings_create)() };
        let api = engine.api_arc();
        let handle = Handle::owning(addr, move |a| unsafe { (api.ragdoll_settings_destroy)(a) });
        Self {
            engine: engine.clone(),
            handle,
        }
    }

    /// Add a part with `shape` at `offset` from the root. Returns the part
    /// index, or `None` when the native side refuses. The native settings
    /// take their own reference on the shape.
    #[must_use]
    pub fn add_part(&self, shape: &Shape, offset: Vec4) -> Option<u32> {
        let index = unsafe {
            (self.engine.api().ragdoll_settings_add_part)(self.handle.addr(), shape.raw(), &offset)
        };
        u32::try_from(index).ok()
    }

    /// Serialize to the engine's settings format.
    #[must_use]
    pub fn save(&self) -> Option<Vec<u8>> {
        let api = self.engine.api();
        let addr = self.handle.addr();
        save_buffer(|buf, cap, written| unsafe {
            (api.ragdoll_settings_save)(addr, buf, cap, written)
        })
    }

    /// Reconstruct settings from a saved image.
    #[must_use]
    pub fn restore(engine: &Engine, bytes: &[u8]) -> Option<Self> {
        let addr =
            unsafe { (engine.api().ragdoll_settings_restore)(bytes.as_ptr(), bytes.len() as u64) };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let handle = Handle::owning(addr, move |a| unsafe { (api.ragdoll_settings_destroy)(a) });
        Some(Self {
            engine: engine.clone(),
            handle,
        })
    }

    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }
}

/// An instantiated ragdoll. Pins its settings (the native ragdoll reads them)
/// and the world; parts are borrowed views that in turn pin the ragdoll.
pub struct Ragdoll {
    engine: Engine,
    handle: Handle,
    _world: Handle,
}

impl Ragdoll {
    /// Instantiate `settings` in `world`. `None` when the settings are empty
    /// or otherwise rejected.
    #[must_use]
    pub fn create(world: &World, settings: &RagdollSettings) -> Option<Self> {
        let engine = world.engine().clone();
        let addr = unsafe {
            (engine.api().ragdoll_create)(world.handle().addr(), settings.handle().addr())
        };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let world_pin = world.handle().pin();
        let handle = Handle::owning_with_container(addr, settings.handle(), move |a| unsafe {
            (api.ragdoll_destroy)(world_pin.addr(), a);
        });
        Some(Self {
            engine,
            handle,
            _world: world.handle().pin(),
        })
    }

    #[must_use]
    pub fn part_count(&self) -> u32 {
        unsafe { (self.engine.api().ragdoll_part_count)(self.handle.addr()) }
    }

    /// The body of part `index`, as a borrowed view pinning this ragdoll.
    /// `None` past the end (native sentinel).
    #[must_use]
    pub fn part(&self, index: u32) -> Option<Body> {
        let addr = unsafe { (self.engine.api().ragdoll_get_part)(self.handle.addr(), index) };
        if addr == NULL_HANDLE {
            return None;
        }
        Some(Body::borrowed(&self.engine, addr, &self.handle))
    }

    /// Free the native ragdoll now instead of waiting for the sweep.
    pub fn release(&self) {
        self.handle.release();
    }
}
