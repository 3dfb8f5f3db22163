use crate::core::Rect;
use crate::spatial::SpatialGrid;

use super::arena::BodyArena;
use super::body::Body;

/// Keep a dynamic body inside `bounds`, bouncing off the edge it crossed.
///
/// The reflected component always points back into the world, scaled by the
/// body's restitution. Returns true if the body was clamped.
pub(super) fn clamp_body(body: &mut Body, bounds: &Rect) -> bool {
    if body.is_static {
        return false;
    }
    let mut clamped = false;
    let e = body.restitution;

    if body.position.x < bounds.left() {
        body.position.x = bounds.left();
        body.velocity.x = body.velocity.x.abs() * e;
        clamped = true;
    } else if body.position.x + body.width > bounds.right() {
        body.position.x = bounds.right() - body.width;
        body.velocity.x = -body.velocity.x.abs() * e;
        clamped = true;
    }

    if body.position.y < bounds.top() {
        body.position.y = bounds.top();
        body.velocity.y = body.velocity.y.abs() * e;
        clamped = true;
    } else if body.position.y + body.height > bounds.bottom() {
        body.position.y = bounds.bottom() - body.height;
        body.velocity.y = -body.velocity.y.abs() * e;
        clamped = true;
    }

    clamped
}

/// Clamp every dynamic body and re-index the ones that moved.
pub(super) fn clamp_to_bounds(bodies: &mut BodyArena, grid: &mut SpatialGrid, bounds: &Rect) -> u32 {
    let mut count = 0;
    for (handle, body) in bodies.iter_mut() {
        if clamp_body(body, bounds) {
            grid.insert(handle, &body.aabb());
            count += 1;
        }
    }
    count
}
