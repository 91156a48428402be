//! Soft body settings and instantiation.

use abi::{Vec4, NULL_HANDLE};

use crate::body::Body;
use crate::engine::Engine;
use crate::handle::Handle;
use crate::marshal::save_buffer;
use crate::world::World;

/// A deformable body description: its vertex cloud.
pub struct SoftBodySettings {
    engine: Engine,
    handle: Handle,
}

impl SoftBodySettings {
    /// `None` for an empty vertex cloud.
    #[must_use]
    pub fn create(engine: &Engine, vertices: &[Vec4]) -> Option<Self> {
        let addr = unsafe {
            (engine.api().softbody_settings_create)(vertices.as_ptr(), vertices.len() as u64)
        };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let handle = Handle::owning(addr, move |a| unsafe { (api.softbody_settings_destroy)(a) });
        Some(Self {
            engine: engine.clone(),
            handle,
        })
    }

    /// Serialize to the engine's settings format.
    #[must_use]
    pub fn save(&self) -> Option<Vec<u8>> {
        let api = self.engine.api();
        let addr = self.handle.addr();
        save_buffer(|buf, cap, written| unsafe {
            (api.softbody_settings_save)(addr, buf, cap, written)
        })
    }

    /// Reconstruct settings from a saved image.
    #[must_use]
    pub fn restore(engine: &Engine, bytes: &[u8]) -> Option<Self> {
        let addr = unsafe {
            (engine.api().softbody_settings_restore)(bytes.as_ptr(), bytes.len() as u64)
        };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let handle = Handle::owning(addr, move |a| unsafe { (api.softbody_settings_destroy)(a) });
        Some(Self {
            engine: engine.clone(),
            handle,
        })
    }

    /// Instantiate at `position`; the result is an ordinary owned body.
    #[must_use]
    pub fn instantiate(&self, world: &World, position: Vec4) -> Option<Body> {
        let addr = unsafe {
            (self.engine.api().softbody_create)(
                world.handle().addr(),
                self.handle.addr(),
                &position,
            )
        };
        if addr == NULL_HANDLE {
            return None;
        }
        Some(Body::owned(&self.engine, addr, world))
    }
}
