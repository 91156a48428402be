//! Broad-phase queries.

use abi::{RayHit, Vec4};

use crate::body::Body;
use crate::world::World;

/// A ray segment: `origin` to `origin + direction`.
#[derive(Copy, Clone, Debug)]
pub struct RayCast {
    pub origin: Vec4,
    pub direction: Vec4,
}

impl RayCast {
    #[must_use]
    pub const fn new(origin: Vec4, direction: Vec4) -> Self {
        Self { origin, direction }
    }

    /// Run the query against a world's broad phase. `None` on a miss.
    #[must_use]
    pub fn cast(&self, world: &World) -> Option<RayHit> {
        world.cast_ray(self.origin, self.direction)
    }

    /// World-space point at `fraction` along the segment.
    #[must_use]
    pub fn point_at(&self, fraction: f32) -> Vec4 {
        Vec4::new(
            self.origin.x + fraction * self.direction.x,
            self.origin.y + fraction * self.direction.y,
            self.origin.z + fraction * self.direction.z,
        )
    }
}

/// Whether `hit` refers to `body`.
#[must_use]
pub fn hit_is(hit: &RayHit, body: &Body) -> bool {
    hit.body == body.handle().addr()
}
