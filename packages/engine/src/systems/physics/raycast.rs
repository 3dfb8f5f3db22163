use crate::core::{Rect, Vec2};

use super::arena::BodyArena;
use super::body::BodyHandle;

/// Directions shorter than this are treated as zero
const MIN_DIRECTION_LENGTH: f32 = 1e-6;
/// Rays this close to parallel with an axis are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-9;

/// Nearest body struck by a ray.
#[derive(Clone, Debug, PartialEq)]
pub struct RaycastHit {
    pub handle: BodyHandle,
    pub body_id: String,
    /// World-space intersection point
    pub point: Vec2,
    /// Distance from the ray origin (the direction is normalized first)
    pub distance: f32,
    /// Outward normal of the face that was hit
    pub normal: Vec2,
}

/// Slab test against one AABB. `dir` must be unit length.
///
/// Returns the hit distance: the entry point, or the exit point when the
/// origin starts inside the box.
pub(super) fn ray_aabb(origin: Vec2, dir: Vec2, rect: &Rect, max_distance: f32) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for (o, d, lo, hi) in [
        (origin.x, dir.x, rect.left(), rect.right()),
        (origin.y, dir.y, rect.top(), rect.bottom()),
    ] {
        if d.abs() < PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let t1 = (lo - o) * inv;
        let t2 = (hi - o) * inv;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_max < 0.0 || t_min > t_max {
        return None;
    }
    let t = if t_min >= 0.0 { t_min } else { t_max };
    if t > max_distance {
        return None;
    }
    Some(t)
}

/// Outward normal of the face nearest to `point`. Ties go left, right, top, bottom.
pub(super) fn face_normal(rect: &Rect, point: Vec2) -> Vec2 {
    let faces = [
        ((point.x - rect.left()).abs(), Vec2::LEFT),
        ((point.x - rect.right()).abs(), Vec2::RIGHT),
        ((point.y - rect.top()).abs(), Vec2::UP),
        ((point.y - rect.bottom()).abs(), Vec2::DOWN),
    ];
    let mut best = faces[0];
    for face in &faces[1..] {
        if face.0 < best.0 {
            best = *face;
        }
    }
    best.1
}

/// Nearest hit among bodies whose layer matches `mask`.
///
/// Bodies are tested in insertion order and only a strictly closer hit
/// replaces the current one, so exact ties go to the earliest-inserted body.
pub(super) fn cast(
    bodies: &BodyArena,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    mask: u32,
) -> Option<RaycastHit> {
    let len = direction.length();
    if !(len >= MIN_DIRECTION_LENGTH) || !origin.is_finite() || max_distance.is_nan() || max_distance < 0.0 {
        return None;
    }
    let dir = direction * (1.0 / len);

    let mut best: Option<(BodyHandle, f32)> = None;
    for (handle, body) in bodies.iter() {
        if body.collision_layer & mask == 0 {
            continue;
        }
        if let Some(t) = ray_aabb(origin, dir, &body.aabb(), max_distance) {
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((handle, t));
            }
        }
    }

    let (handle, distance) = best?;
    let body = bodies.get(handle)?;
    let point = origin + dir * distance;
    Some(RaycastHit {
        handle,
        body_id: body.id.clone(),
        point,
        distance,
        normal: face_normal(&body.aabb(), point),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::{Body, ALL_LAYERS};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn slab_hits_front_face() {
        let rect = Rect::new(50.0, -5.0, 10.0, 10.0);
        let t = ray_aabb(Vec2::zero(), Vec2::RIGHT, &rect, 100.0).unwrap();
        assert!(approx(t, 50.0));
        assert!(ray_aabb(Vec2::zero(), Vec2::RIGHT, &rect, 49.0).is_none());
        assert!(ray_aabb(Vec2::zero(), Vec2::LEFT, &rect, 100.0).is_none());
        assert!(ray_aabb(Vec2::new(0.0, 20.0), Vec2::RIGHT, &rect, 100.0).is_none());
    }

    #[test]
    fn origin_inside_reports_exit_point() {
        let rect = Rect::new(-5.0, -5.0, 10.0, 10.0);
        let t = ray_aabb(Vec2::zero(), Vec2::UP, &rect, 100.0).unwrap();
        assert!(approx(t, 5.0));
        assert_eq!(face_normal(&rect, Vec2::new(0.0, -5.0)), Vec2::UP);
    }

    #[test]
    fn diagonal_ray_hits_the_face_it_enters() {
        let rect = Rect::new(10.0, 0.0, 10.0, 10.0);
        let dir = Vec2::new(1.0, 0.5).normalize();
        let t = ray_aabb(Vec2::new(0.0, -2.0), dir, &rect, 100.0).unwrap();
        let p = Vec2::new(0.0, -2.0) + dir * t;
        assert!(approx(p.x, 10.0));
        assert!(approx(p.y, 3.0));
        assert_eq!(face_normal(&rect, p), Vec2::LEFT);
    }

    #[test]
    fn cast_picks_nearest_and_breaks_ties_by_insertion() {
        let mut arena = BodyArena::new();
        let far = arena.insert(
            Body::new_static("far", 80.0, -5.0, 10.0, 10.0).with_layers(0b10, ALL_LAYERS),
        );
        let tie_a = arena.insert(Body::new_static("tie-a", 40.0, -5.0, 10.0, 10.0));
        arena.insert(Body::new_static("tie-b", 40.0, -1.0, 10.0, 10.0));

        let hit = cast(&arena, Vec2::zero(), Vec2::new(2.0, 0.0), 100.0, ALL_LAYERS).unwrap();
        assert_eq!(hit.handle, tie_a);
        assert_eq!(hit.body_id, "tie-a");
        assert!(approx(hit.distance, 40.0));
        assert_eq!(hit.normal, Vec2::LEFT);

        // Masking out the near layer exposes the far body.
        let hit = cast(&arena, Vec2::zero(), Vec2::RIGHT, 100.0, 0b10).unwrap();
        assert_eq!(hit.handle, far);
        assert!(approx(hit.distance, 80.0));
        assert!(cast(&arena, Vec2::zero(), Vec2::RIGHT, 100.0, 0).is_none());
    }

    #[test]
    fn zero_direction_never_hits() {
        let mut arena = BodyArena::new();
        arena.insert(Body::new("b", -1.0, -1.0, 2.0, 2.0));
        assert!(cast(&arena, Vec2::zero(), Vec2::zero(), 100.0, ALL_LAYERS).is_none());
    }
}
