//! Narrow phase and contact resolution.
//!
//! Contacts are resolved along the axis of least penetration. `Contact::normal`
//! points from `b` toward `a`, i.e. the direction `a` has to move to separate.

use std::collections::HashSet;

use crate::core::{Rect, Vec2};
use crate::spatial::SpatialGrid;

use super::arena::BodyArena;
use super::body::{Body, BodyHandle};
use super::events::CollisionEvent;
use super::perf::StepStats;

/// Below this tangential speed friction is skipped
const TANGENT_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Contact {
    pub normal: Vec2,
    pub depth: f32,
}

/// Minimum-translation contact between two AABBs, if they penetrate.
pub(super) fn contact(a: &Rect, b: &Rect) -> Option<Contact> {
    let overlap = a.overlap(b);
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }
    let (ca, cb) = (a.center(), b.center());
    if overlap.x < overlap.y {
        let normal = if ca.x < cb.x { Vec2::LEFT } else { Vec2::RIGHT };
        Some(Contact { normal, depth: overlap.x })
    } else {
        let normal = if ca.y < cb.y { Vec2::UP } else { Vec2::DOWN };
        Some(Contact { normal, depth: overlap.y })
    }
}

/// Push the pair apart, then exchange normal and friction impulses.
///
/// Returns the normal impulse magnitude (0 when no impulse was applied).
pub(super) fn resolve(a: &mut Body, b: &mut Body, contact: Contact) -> f32 {
    let n = contact.normal;
    let depth = contact.depth;

    match (a.is_static, b.is_static) {
        (true, true) => return 0.0,
        (false, true) => a.position += n * depth,
        (true, false) => b.position -= n * depth,
        (false, false) => {
            let total = a.mass + b.mass;
            a.position += n * (depth * (b.mass / total));
            b.position -= n * (depth * (a.mass / total));
        }
    }

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return 0.0;
    }

    let rel = a.velocity - b.velocity;
    let vel_along_normal = rel.dot(n);
    // Already separating: leave velocities alone.
    if vel_along_normal > 0.0 {
        return 0.0;
    }

    let e = a.restitution.min(b.restitution);
    let j = -(1.0 + e) * vel_along_normal / inv_sum;
    a.velocity += n * (j * inv_a);
    b.velocity -= n * (j * inv_b);

    let tangent = rel - n * vel_along_normal;
    let tangent_speed = tangent.length();
    if tangent_speed > TANGENT_EPSILON {
        let t = tangent * (1.0 / tangent_speed);
        let mu = (a.friction + b.friction) * 0.5;
        let jt = (mu * j).min(tangent_speed);
        a.velocity -= t * (jt * inv_a);
        b.velocity += t * (jt * inv_b);
    }

    j
}

/// Broad phase through the grid, then narrow phase and resolution.
///
/// Bodies are visited in insertion order and candidates in handle order;
/// each unordered pair is looked at once per call.
pub(super) fn resolve_contacts(
    bodies: &mut BodyArena,
    grid: &mut SpatialGrid,
    pairs: &mut HashSet<(BodyHandle, BodyHandle)>,
    events: &mut Vec<CollisionEvent>,
    stats: &mut StepStats,
) {
    pairs.clear();
    let order: Vec<BodyHandle> = bodies.order().to_vec();

    for ha in order {
        let Some(body_a) = bodies.get(ha) else {
            continue;
        };
        let candidates = grid.candidates(ha, &body_a.aabb());
        stats.candidate_checks += candidates.len() as u32;

        for hb in candidates {
            let key = if ha < hb { (ha, hb) } else { (hb, ha) };
            if !pairs.insert(key) {
                continue;
            }
            let Some((a, b)) = bodies.get2_mut(ha, hb) else {
                continue;
            };
            if a.is_static && b.is_static {
                continue;
            }
            if !a.interacts_with(b) {
                continue;
            }
            stats.pairs_tested += 1;

            let Some(c) = contact(&a.aabb(), &b.aabb()) else {
                continue;
            };
            resolve(a, b, c);
            stats.contacts_resolved += 1;

            if a.collision_events {
                events.push(CollisionEvent {
                    body: ha,
                    other: hb,
                    body_id: a.id.clone(),
                    other_id: b.id.clone(),
                    normal: -c.normal,
                });
                stats.events_emitted += 1;
            }
            if b.collision_events {
                events.push(CollisionEvent {
                    body: hb,
                    other: ha,
                    body_id: b.id.clone(),
                    other_id: a.id.clone(),
                    normal: c.normal,
                });
                stats.events_emitted += 1;
            }

            let (aabb_a, aabb_b) = (a.aabb(), b.aabb());
            grid.insert(ha, &aabb_a);
            grid.insert(hb, &aabb_b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn contact_picks_the_shallower_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(8.0, 1.0, 10.0, 10.0);
        let c = contact(&a, &b).unwrap();
        assert_eq!(c, Contact { normal: Vec2::LEFT, depth: 2.0 });

        // Same pair seen from the other side flips the normal.
        assert_eq!(contact(&b, &a).unwrap().normal, Vec2::RIGHT);

        let below = Rect::new(1.0, 9.0, 8.0, 10.0);
        assert_eq!(contact(&a, &below).unwrap(), Contact { normal: Vec2::UP, depth: 1.0 });

        assert!(contact(&a, &Rect::new(10.0, 0.0, 5.0, 5.0)).is_none());
    }

    #[test]
    fn elastic_equal_masses_swap_velocities() {
        let mut a = Body::new("a", 5.0, 0.0, 10.0, 10.0).with_velocity(5.0, 0.0).with_restitution(1.0);
        let mut b = Body::new("b", 8.0, 0.0, 10.0, 10.0).with_restitution(1.0);
        let c = contact(&a.aabb(), &b.aabb()).unwrap();
        let j = resolve(&mut a, &mut b, c);

        assert!(approx(j, 5.0));
        assert!(approx(a.velocity.x, 0.0));
        assert!(approx(b.velocity.x, 5.0));
        // 7 units of overlap split evenly.
        assert!(approx(a.position.x, 1.5));
        assert!(approx(b.position.x, 11.5));
    }

    #[test]
    fn heavier_body_moves_less() {
        let mut a = Body::new("a", 0.0, 0.0, 10.0, 10.0).with_mass(3.0);
        let mut b = Body::new("b", 6.0, 0.0, 10.0, 10.0).with_mass(1.0);
        let c = contact(&a.aabb(), &b.aabb()).unwrap();
        resolve(&mut a, &mut b, c);
        assert!(approx(a.position.x, -1.0));
        assert!(approx(b.position.x, 9.0));
    }

    #[test]
    fn static_body_takes_no_displacement_or_impulse() {
        let mut floor = Body::new_static("floor", 0.0, 10.0, 100.0, 10.0);
        let mut ball = Body::new("ball", 10.0, 8.0, 4.0, 4.0).with_velocity(0.0, 3.0).with_restitution(0.5);
        let c = contact(&ball.aabb(), &floor.aabb()).unwrap();
        resolve(&mut ball, &mut floor, c);

        assert_eq!(floor.position, Vec2::new(0.0, 10.0));
        assert_eq!(floor.velocity, Vec2::zero());
        assert!(approx(ball.position.y, 6.0));
        // min(0.5, 0.0) restitution against the floor: velocity along y is cancelled.
        assert!(approx(ball.velocity.y, 0.0));
    }

    #[test]
    fn separating_pair_keeps_its_velocities() {
        let mut a = Body::new("a", 0.0, 0.0, 10.0, 10.0).with_velocity(-3.0, 1.0).with_friction(1.0);
        let mut b = Body::new("b", 8.0, 0.0, 10.0, 10.0).with_velocity(2.0, 0.0).with_friction(1.0);
        let c = contact(&a.aabb(), &b.aabb()).unwrap();
        assert_eq!(resolve(&mut a, &mut b, c), 0.0);
        assert_eq!(a.velocity, Vec2::new(-3.0, 1.0));
        assert_eq!(b.velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn friction_opposes_sliding_and_never_reverses_it() {
        let mut floor = Body::new_static("floor", 0.0, 10.0, 100.0, 10.0).with_friction(1.0);
        let mut block = Body::new("block", 10.0, 1.0, 10.0, 10.0)
            .with_velocity(4.0, 2.0)
            .with_friction(1.0);
        let c = contact(&block.aabb(), &floor.aabb()).unwrap();
        let j = resolve(&mut block, &mut floor, c);

        assert!(approx(j, 2.0));
        // Friction impulse min(1.0 * 2.0, 4.0) = 2 against +x.
        assert!(approx(block.velocity.x, 2.0));
        assert!(block.velocity.x >= 0.0);
        assert!(approx(block.velocity.y, 0.0));
    }
}
