//! Character controller wrapper.

use abi::{CharacterArgs, GroundState, Vec4, NULL_HANDLE};

use crate::engine::Engine;
use crate::handle::Handle;
use crate::shape::Shape;
use crate::world::World;

/// A character moving through a world. The native side retains the shape for
/// the character's lifetime; the wrapper pins the world.
pub struct Character {
    engine: Engine,
    handle: Handle,
}

impl Character {
    /// `None` when the native side rejects the arguments.
    #[must_use]
    pub fn create(world: &World, shape: &Shape, args: &CharacterArgs) -> Option<Self> {
        let engine = world.engine().clone();
        let addr = unsafe {
            (engine.api().character_create)(world.handle().addr(), shape.raw(), args)
        };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let world_pin = world.handle().pin();
        let handle = Handle::owning_with_container(addr, world.handle(), move |a| unsafe {
            (api.character_destroy)(world_pin.addr(), a);
        });
        Some(Self { engine, handle })
    }

    /// Ground contact classification.
    ///
    /// # Panics
    ///
    /// Panics when the native side reports an ordinal this layer does not
    /// know.
    #[must_use]
    pub fn ground_state(&self) -> GroundState {
        let raw = unsafe { (self.engine.api().character_ground_state)(self.handle.addr()) };
        match GroundState::from_raw(raw) {
            Some(state) => state,
            None => panic!("unknown ground state ordinal {raw}"),
        }
    }

    pub fn set_linear_velocity(&self, velocity: Vec4) {
        unsafe {
            (self.engine.api().character_set_linear_velocity)(self.handle.addr(), &velocity);
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec4 {
        let mut out = Vec4::zero();
        unsafe { (self.engine.api().character_get_position)(self.handle.addr(), &mut out) };
        out
    }

    /// Free the native character now instead of waiting for the sweep.
    pub fn release(&self) {
        self.handle.release();
    }
}
