use wasm_bindgen::prelude::*;

use crate::api::render::RenderBuffer;
use crate::core::{Rect, Vec2};
use crate::physics::{events_to_json, Body, PhysicsEngine, RaycastHit, StepStats, WorldConfig};

use super::js_error;

/// Result of [`PhysicsWorld::raycast`].
#[wasm_bindgen]
pub struct RaycastResult {
    body_id: String,
    x: f32,
    y: f32,
    distance: f32,
    normal_x: f32,
    normal_y: f32,
}

#[wasm_bindgen]
impl RaycastResult {
    #[wasm_bindgen(getter)]
    pub fn body_id(&self) -> String { self.body_id.clone() }
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f32 { self.x }
    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f32 { self.y }
    #[wasm_bindgen(getter)]
    pub fn distance(&self) -> f32 { self.distance }
    #[wasm_bindgen(getter)]
    pub fn normal_x(&self) -> f32 { self.normal_x }
    #[wasm_bindgen(getter)]
    pub fn normal_y(&self) -> f32 { self.normal_y }
}

impl From<RaycastHit> for RaycastResult {
    fn from(hit: RaycastHit) -> Self {
        Self {
            body_id: hit.body_id,
            x: hit.point.x,
            y: hit.point.y,
            distance: hit.distance,
            normal_x: hit.normal.x,
            normal_y: hit.normal.y,
        }
    }
}

/// Physics world handle for JS. Bodies are addressed by their string id.
#[wasm_bindgen]
pub struct PhysicsWorld {
    engine: PhysicsEngine,
    render: RenderBuffer,
}

impl PhysicsWorld {
    fn with_engine(engine: PhysicsEngine) -> Self {
        let mut world = Self {
            engine,
            render: RenderBuffer::new(),
        };
        world.render.extract(&world.engine);
        world
    }

    fn body_changed(&mut self) {
        self.render.invalidate_ids();
        self.render.extract(&self.engine);
    }
}

#[wasm_bindgen]
impl PhysicsWorld {
    /// Create a world with the given gravity and grid cell size and no bounds.
    #[wasm_bindgen(constructor)]
    pub fn new(gravity_x: f32, gravity_y: f32, cell_size: f32) -> Result<PhysicsWorld, JsValue> {
        let config = WorldConfig::default()
            .with_gravity(gravity_x, gravity_y)
            .with_cell_size(cell_size);
        let engine = PhysicsEngine::new(config).map_err(js_error)?;
        Ok(Self::with_engine(engine))
    }

    /// Create a world from a JSON `WorldConfig`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: String) -> Result<PhysicsWorld, JsValue> {
        let engine = PhysicsEngine::from_json(&json).map_err(js_error)?;
        Ok(Self::with_engine(engine))
    }

    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> usize { self.engine.body_count() }

    #[wasm_bindgen(getter)]
    pub fn step_count(&self) -> u64 { self.engine.step_count() }

    pub fn set_gravity(&mut self, x: f32, y: f32) -> Result<(), JsValue> {
        self.engine.set_gravity(x, y).map_err(js_error)
    }

    pub fn set_bounds(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), JsValue> {
        self.engine
            .set_bounds(Some(Rect::new(x, y, width, height)))
            .map_err(js_error)
    }

    pub fn clear_bounds(&mut self) {
        // Removing bounds cannot fail validation.
        let _ = self.engine.set_bounds(None);
    }

    /// Add a body from its JSON description (see `BodyDesc`).
    pub fn add_body(&mut self, json: String) -> Result<(), JsValue> {
        self.engine.add_body_json(&json).map_err(js_error)?;
        self.body_changed();
        Ok(())
    }

    /// Add a plain box with default material.
    pub fn add_box(
        &mut self,
        id: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        is_static: bool,
    ) -> Result<(), JsValue> {
        let mut body = Body::new(id, x, y, width, height);
        body.is_static = is_static;
        self.engine.add_body(body).map_err(js_error)?;
        self.body_changed();
        Ok(())
    }

    /// Remove a body. Returns false for unknown ids.
    pub fn remove_body(&mut self, id: &str) -> bool {
        let removed = self.engine.remove_body(id).is_some();
        if removed {
            self.body_changed();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.engine.clear();
        self.body_changed();
    }

    pub fn set_position(&mut self, id: &str, x: f32, y: f32) -> bool {
        match self.engine.handle_of(id) {
            Some(h) => self.engine.set_position(h, x, y),
            None => false,
        }
    }

    pub fn set_velocity(&mut self, id: &str, vx: f32, vy: f32) -> bool {
        match self.engine.handle_of(id) {
            Some(h) => self.engine.set_velocity(h, vx, vy),
            None => false,
        }
    }

    pub fn set_acceleration(&mut self, id: &str, ax: f32, ay: f32) -> bool {
        match self.engine.handle_of(id) {
            Some(h) => self.engine.set_acceleration(h, ax, ay),
            None => false,
        }
    }

    pub fn apply_impulse(&mut self, id: &str, ix: f32, iy: f32) -> bool {
        match self.engine.handle_of(id) {
            Some(h) => self.engine.apply_impulse(h, ix, iy),
            None => false,
        }
    }

    /// `[vx, vy]` of a body, or undefined for unknown ids.
    pub fn velocity(&self, id: &str) -> Option<Vec<f32>> {
        self.engine.get_body(id).map(|b| vec![b.velocity.x, b.velocity.y])
    }

    /// Advance one fixed step of `dt` seconds and refresh the render buffer.
    pub fn step(&mut self, dt: f32) {
        self.engine.update(dt);
        self.render.extract(&self.engine);
    }

    /// Pointer to `[x, y, width, height]` per body (insertion order).
    pub fn render_ptr(&self) -> *const f32 {
        self.render.as_ptr()
    }

    /// Render buffer length in f32 elements
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Body ids matching the render buffer order
    pub fn body_ids(&self) -> Vec<String> {
        self.render.ids().to_vec()
    }

    pub fn raycast(&self, ox: f32, oy: f32, dx: f32, dy: f32, max_distance: f32) -> Option<RaycastResult> {
        self.engine
            .raycast(Vec2::new(ox, oy), Vec2::new(dx, dy), max_distance)
            .map(RaycastResult::from)
    }

    pub fn raycast_masked(
        &self,
        ox: f32,
        oy: f32,
        dx: f32,
        dy: f32,
        max_distance: f32,
        mask: u32,
    ) -> Option<RaycastResult> {
        self.engine
            .raycast_masked(Vec2::new(ox, oy), Vec2::new(dx, dy), max_distance, mask)
            .map(RaycastResult::from)
    }

    /// Drain pending collision events as a JSON array.
    pub fn drain_events_json(&mut self) -> String {
        events_to_json(&self.engine.drain_collision_events())
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.engine.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> StepStats {
        self.engine.perf_stats()
    }
}
