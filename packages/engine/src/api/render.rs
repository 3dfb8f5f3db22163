use crate::physics::PhysicsEngine;

/// Floats written per body: x, y, width, height
pub const FLOATS_PER_BODY: usize = 4;

/// Flat snapshot of body rectangles for the JS renderer.
///
/// Layout is `[x, y, width, height]` per body in insertion order, with
/// `ids[i]` naming the body at `data[i * 4..i * 4 + 4]`. The buffers are
/// reused between frames, so the pointer is only valid until the next
/// `extract`.
#[derive(Clone, Debug, Default)]
pub struct RenderBuffer {
    data: Vec<f32>,
    ids: Vec<String>,
    /// Id list is rebuilt only when membership changes
    ids_dirty: bool,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            ids_dirty: true,
            ..Self::default()
        }
    }

    /// Mark the id list stale (after adds or removes).
    pub fn invalidate_ids(&mut self) {
        self.ids_dirty = true;
    }

    pub fn extract(&mut self, engine: &PhysicsEngine) {
        self.data.clear();
        self.data.reserve(engine.body_count() * FLOATS_PER_BODY);
        for body in engine.bodies() {
            self.data.extend_from_slice(&[body.position.x, body.position.y, body.width, body.height]);
        }

        if self.ids_dirty || self.ids.len() != engine.body_count() {
            self.ids.clear();
            self.ids.extend(engine.bodies().map(|b| b.id.clone()));
            self.ids_dirty = false;
        }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    /// Length in f32 elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Body, WorldConfig};

    #[test]
    fn extract_packs_rects_in_insertion_order() {
        let mut engine = PhysicsEngine::new(WorldConfig::default()).unwrap();
        engine.add_body(Body::new("b", 1.0, 2.0, 3.0, 4.0)).unwrap();
        engine.add_body(Body::new_static("a", 5.0, 6.0, 7.0, 8.0)).unwrap();

        let mut buf = RenderBuffer::new();
        buf.extract(&engine);
        assert_eq!(buf.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(buf.ids(), &["b".to_string(), "a".to_string()]);
        assert_eq!(buf.len(), 2 * FLOATS_PER_BODY);
    }

    #[test]
    fn ids_follow_removals() {
        let mut engine = PhysicsEngine::new(WorldConfig::default()).unwrap();
        engine.add_body(Body::new("x", 0.0, 0.0, 1.0, 1.0)).unwrap();
        engine.add_body(Body::new("y", 0.0, 0.0, 1.0, 1.0)).unwrap();
        let mut buf = RenderBuffer::new();
        buf.extract(&engine);

        engine.remove_body("x");
        engine.add_body(Body::new("z", 9.0, 0.0, 1.0, 1.0)).unwrap();
        buf.invalidate_ids();
        buf.extract(&engine);
        assert_eq!(buf.ids(), &["y".to_string(), "z".to_string()]);
        assert_eq!(buf.data()[4], 9.0);
    }
}
