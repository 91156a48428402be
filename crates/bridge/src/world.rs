//! The physics world wrapper.

use std::path::Path;

use abi::{ContactInfo, RayHit, Vec4, WorldSettings};
use bytemuck::Zeroable;

use crate::body::Body;
use crate::engine::Engine;
use crate::handle::Handle;
use crate::marshal::save_buffer;

/// One simulation world. Owns its native allocation; bodies, constraints,
/// characters, and so on are created against it and pin it for as long as
/// they live.
pub struct World {
    engine: Engine,
    handle: Handle,
}

impl World {
    /// Create a world with the given settings.
    #[must_use]
    pub fn create(engine: &Engine, settings: &WorldSettings) -> Self {
        let addr = unsafe { (engine.api().world_create)(settings) };
        let api = engine.api_arc();
        let handle = Handle::owning(addr, move |a| unsafe { (api.world_destroy)(a) });
        tracing::debug!(addr, "created world");
        Self {
            engine: engine.clone(),
            handle,
        }
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Advance the simulation. Returns `false` when the native step reports
    /// failure (for example a zero substep count).
    pub fn step(&self, dt: f32, substeps: u32) -> bool {
        unsafe { (self.engine.api().world_step)(self.handle.addr(), dt, substeps) != 0 }
    }

    pub fn set_gravity(&self, gravity: Vec4) {
        unsafe { (self.engine.api().world_set_gravity)(self.handle.addr(), &gravity) };
    }

    #[must_use]
    pub fn gravity(&self) -> Vec4 {
        let mut out = Vec4::zero();
        unsafe { (self.engine.api().world_get_gravity)(self.handle.addr(), &mut out) };
        out
    }

    pub fn add_body(&self, body: &Body, activate: bool) {
        unsafe {
            (self.engine.api().world_add_body)(
                self.handle.addr(),
                body.raw(),
                i32::from(activate),
            );
        }
    }

    pub fn remove_body(&self, body: &Body) {
        unsafe { (self.engine.api().world_remove_body)(self.handle.addr(), body.raw()) };
    }

    #[must_use]
    pub fn body_count(&self) -> u32 {
        unsafe { (self.engine.api().world_body_count)(self.handle.addr()) }
    }

    #[must_use]
    pub fn contact_count(&self) -> u32 {
        unsafe { (self.engine.api().world_contact_count)(self.handle.addr()) }
    }

    /// Contact manifold at `index`, or `None` past the end.
    #[must_use]
    pub fn contact(&self, index: u32) -> Option<ContactInfo> {
        let mut out = ContactInfo::zeroed();
        let found =
            unsafe { (self.engine.api().world_get_contact)(self.handle.addr(), index, &mut out) };
        (found != 0).then_some(out)
    }

    /// All manifolds recorded by the last step.
    #[must_use]
    pub fn contacts(&self) -> Vec<ContactInfo> {
        (0..self.contact_count())
            .filter_map(|i| self.contact(i))
            .collect()
    }

    /// Cast a ray; `None` on a miss (the native sentinel).
    #[must_use]
    pub fn cast_ray(&self, origin: Vec4, direction: Vec4) -> Option<RayHit> {
        let mut out = RayHit::zeroed();
        let hit = unsafe {
            (self.engine.api().world_cast_ray)(self.handle.addr(), &origin, &direction, &mut out)
        };
        (hit != 0).then_some(out)
    }

    /// Serialize the scene to the engine's binary state format.
    #[must_use]
    pub fn save_scene(&self) -> Option<Vec<u8>> {
        let api = self.engine.api();
        let addr = self.handle.addr();
        save_buffer(|buf, cap, written| unsafe { (api.world_save_scene)(addr, buf, cap, written) })
    }

    /// Restore a scene image produced by [`Self::save_scene`]. Returns the
    /// native success flag.
    pub fn restore_scene(&self, bytes: &[u8]) -> bool {
        unsafe {
            (self.engine.api().world_restore_scene)(
                self.handle.addr(),
                bytes.as_ptr(),
                bytes.len() as u64,
            ) != 0
        }
    }

    /// Serialize the scene straight to a file.
    ///
    /// # Errors
    ///
    /// I/O errors from writing `path`. A native-side serialization failure is
    /// reported as `Ok(false)`.
    pub fn save_scene_to_file(&self, path: &Path) -> std::io::Result<bool> {
        match self.save_scene() {
            Some(bytes) => {
                std::fs::write(path, bytes)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Restore a scene from a file written by [`Self::save_scene_to_file`].
    ///
    /// # Errors
    ///
    /// I/O errors from reading `path`.
    pub fn restore_scene_from_file(&self, path: &Path) -> std::io::Result<bool> {
        let bytes = std::fs::read(path)?;
        Ok(self.restore_scene(&bytes))
    }

    /// Free the native world now instead of waiting for the sweep.
    pub fn release(&self) {
        self.handle.release();
    }
}
