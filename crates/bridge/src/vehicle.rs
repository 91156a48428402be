//! Vehicle constraint wrapper.

use abi::{VehicleArgs, WheelArgs, NULL_HANDLE};

use crate::body::Body;
use crate::engine::Engine;
use crate::handle::Handle;
use crate::world::World;

/// A wheeled vehicle built over a chassis body. Pins the chassis and the
/// world; the controller state machine runs entirely inside the engine.
pub struct Vehicle {
    engine: Engine,
    handle: Handle,
}

impl Vehicle {
    /// `None` when the native side refuses (no wheels, dead chassis).
    #[must_use]
    pub fn create(
        world: &World,
        chassis: &Body,
        args: &VehicleArgs,
        wheels: &[WheelArgs],
    ) -> Option<Self> {
        let engine = world.engine().clone();
        let addr = unsafe {
            (engine.api().vehicle_create)(
                world.handle().addr(),
                chassis.handle().addr(),
                args,
                wheels.as_ptr(),
                wheels.len() as u64,
            )
        };
        if addr == NULL_HANDLE {
            return None;
        }
        let api = engine.api_arc();
        let world_pin = world.handle().pin();
        let handle = Handle::owning_with_container(addr, chassis.handle(), move |a| unsafe {
            (api.vehicle_destroy)(world_pin.addr(), a);
        });
        Some(Self { engine, handle })
    }

    #[must_use]
    pub fn wheel_count(&self) -> u32 {
        unsafe { (self.engine.api().vehicle_wheel_count)(self.handle.addr()) }
    }

    /// Forward the driver's input for the next steps.
    pub fn set_driver_input(&self, forward: f32, right: f32, brake: f32, hand_brake: f32) {
        unsafe {
            (self.engine.api().vehicle_set_driver_input)(
                self.handle.addr(),
                forward,
                right,
                brake,
                hand_brake,
            );
        }
    }

    /// Free the native vehicle now instead of waiting for the sweep.
    pub fn release(&self) {
        self.handle.release();
    }
}
