#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::Vec2;
use crate::spatial::SpatialGrid;

use super::arena::BodyArena;
use super::body::Body;

/// Semi-implicit Euler: velocity first, then position from the new velocity.
#[inline]
pub(super) fn integrate_body(body: &mut Body, gravity: Vec2, dt: f32) {
    if body.is_static {
        return;
    }
    body.velocity += (body.acceleration + gravity) * dt;
    body.position += body.velocity * dt;
}

/// Advance every dynamic body and re-index it before anything queries the grid.
///
/// Returns the number of dynamic bodies moved.
pub(super) fn integrate(bodies: &mut BodyArena, grid: &mut SpatialGrid, gravity: Vec2, dt: f32) -> u32 {
    // Bodies are independent here, so the parallel pass gives the same result.
    #[cfg(feature = "parallel")]
    bodies
        .par_bodies_mut()
        .for_each(|body| integrate_body(body, gravity, dt));

    #[cfg(not(feature = "parallel"))]
    for (_, body) in bodies.iter_mut() {
        integrate_body(body, gravity, dt);
    }

    let mut moved = 0;
    for (handle, body) in bodies.iter() {
        if !body.is_static {
            grid.insert(handle, &body.aabb());
            moved += 1;
        }
    }
    moved
}
