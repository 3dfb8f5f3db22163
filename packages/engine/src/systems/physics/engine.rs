use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::core::clock::PerfTimer;
use crate::core::{BodyError, ConfigError, Rect, Vec2};
use crate::spatial::SpatialGrid;

use super::arena::BodyArena;
use super::body::{Body, BodyDesc, BodyHandle, ALL_LAYERS};
use super::bounds::clamp_to_bounds;
use super::collision::resolve_contacts;
use super::config::{validate_bounds, WorldConfig};
use super::events::CollisionEvent;
use super::integrate::integrate;
use super::perf::StepStats;
use super::raycast::{cast, RaycastHit};

/// Owns all bodies and advances them one fixed step at a time.
pub struct PhysicsEngine {
    config: WorldConfig,
    bodies: BodyArena,
    grid: SpatialGrid,
    /// Reused between steps to avoid reallocating
    pairs: HashSet<(BodyHandle, BodyHandle)>,
    events: Vec<CollisionEvent>,
    step_count: u64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: StepStats,
}

impl PhysicsEngine {
    /// Create an empty world. Invalid settings are rejected here, before any body exists.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = SpatialGrid::new(config.cell_size)?;
        debug!(
            "physics engine created: gravity=({}, {}) cell_size={} bounds={:?}",
            config.gravity.x, config.gravity.y, config.cell_size, config.bounds
        );
        Ok(Self {
            config,
            bodies: BodyArena::new(),
            grid,
            pairs: HashSet::new(),
            events: Vec::new(),
            step_count: 0,
            perf_enabled: false,
            perf_stats: StepStats::default(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(WorldConfig::from_json(json)?)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) -> Result<(), ConfigError> {
        let gravity = Vec2::new(x, y);
        if !gravity.is_finite() {
            return Err(ConfigError::InvalidGravity(x, y));
        }
        self.config.gravity = gravity;
        Ok(())
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.config.bounds
    }

    /// Replace (or with `None`, remove) the world bounds.
    pub fn set_bounds(&mut self, bounds: Option<Rect>) -> Result<(), ConfigError> {
        if let Some(b) = &bounds {
            validate_bounds(b)?;
        }
        self.config.bounds = bounds;
        Ok(())
    }

    /// Number of simulation steps taken so far
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    // === BODY REGISTRY ===

    /// Register a body and index it in the grid.
    pub fn add_body(&mut self, mut body: Body) -> Result<BodyHandle, BodyError> {
        if let Err(e) = body.validate() {
            warn!("rejected body: {}", e);
            return Err(e);
        }
        if self.bodies.contains_id(&body.id) {
            warn!("rejected body: duplicate id `{}`", body.id);
            return Err(BodyError::DuplicateId(body.id));
        }
        let aabb = body.aabb();
        let handle = self.bodies.insert(body);
        self.grid.insert(handle, &aabb);
        if let Some(b) = self.bodies.get(handle) {
            debug!("added body `{}` at ({}, {}) static={}", b.id, b.position.x, b.position.y, b.is_static);
        }
        Ok(handle)
    }

    /// Register a body from its JSON description.
    pub fn add_body_json(&mut self, json: &str) -> Result<BodyHandle, BodyError> {
        let desc = BodyDesc::from_json(json)?;
        self.add_body(desc.into())
    }

    /// Remove a body by id. Unknown ids are ignored.
    pub fn remove_body(&mut self, id: &str) -> Option<Body> {
        let handle = self.bodies.handle_of(id)?;
        self.remove_handle(handle)
    }

    /// Remove a body by handle. Stale handles are ignored.
    pub fn remove_handle(&mut self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.remove(handle)?;
        self.grid.remove(handle);
        debug!("removed body `{}`", body.id);
        Some(body)
    }

    /// Remove every body and drop pending events.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.grid.clear();
        self.events.clear();
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn handle_of(&self, id: &str) -> Option<BodyHandle> {
        self.bodies.handle_of(id)
    }

    pub fn get_body(&self, id: &str) -> Option<&Body> {
        self.bodies.get(self.bodies.handle_of(id)?)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// All bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().map(|(_, b)| b)
    }

    /// All bodies with their handles, in insertion order.
    pub fn bodies_with_handles(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    /// Broad-phase index (read-only)
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    // === BODY MUTATION ===

    /// Teleport a body. The grid is updated right away.
    pub fn set_position(&mut self, handle: BodyHandle, x: f32, y: f32) -> bool {
        let position = Vec2::new(x, y);
        if !position.is_finite() {
            return false;
        }
        let Some(body) = self.bodies.get_mut(handle) else {
            return false;
        };
        body.position = position;
        let aabb = body.aabb();
        self.grid.insert(handle, &aabb);
        true
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, vx: f32, vy: f32) -> bool {
        let velocity = Vec2::new(vx, vy);
        match self.bodies.get_mut(handle) {
            Some(body) if velocity.is_finite() => {
                body.velocity = velocity;
                true
            }
            _ => false,
        }
    }

    pub fn set_acceleration(&mut self, handle: BodyHandle, ax: f32, ay: f32) -> bool {
        let acceleration = Vec2::new(ax, ay);
        match self.bodies.get_mut(handle) {
            Some(body) if acceleration.is_finite() => {
                body.acceleration = acceleration;
                true
            }
            _ => false,
        }
    }

    /// Instant velocity change of `impulse / mass`. Static bodies ignore impulses.
    pub fn apply_impulse(&mut self, handle: BodyHandle, ix: f32, iy: f32) -> bool {
        let impulse = Vec2::new(ix, iy);
        match self.bodies.get_mut(handle) {
            Some(body) if impulse.is_finite() => {
                if !body.is_static {
                    body.velocity += impulse * body.inverse_mass();
                }
                true
            }
            _ => false,
        }
    }

    // === SIMULATION ===

    /// Advance the world by one fixed step of `dt` seconds.
    ///
    /// Order: integrate and re-index, resolve contacts (each pair at most
    /// once), then clamp to world bounds.
    pub fn update(&mut self, dt: f32) {
        let perf_on = self.perf_enabled;
        if perf_on {
            self.perf_stats.reset();
            self.perf_stats.bodies = self.bodies.len() as u32;
        }
        let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

        let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
        let moved = integrate(&mut self.bodies, &mut self.grid, self.config.gravity, dt);
        if let Some(t0) = t0 {
            self.perf_stats.integrate_ms = t0.elapsed_ms();
            self.perf_stats.dynamic_bodies = moved;
        }

        let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
        // Counters are cheap; they are gathered every step and only kept when perf is on.
        let mut stats = StepStats::default();
        resolve_contacts(
            &mut self.bodies,
            &mut self.grid,
            &mut self.pairs,
            &mut self.events,
            &mut stats,
        );
        if let Some(t0) = t0 {
            self.perf_stats.collide_ms = t0.elapsed_ms();
            self.perf_stats.candidate_checks = stats.candidate_checks;
            self.perf_stats.pairs_tested = stats.pairs_tested;
            self.perf_stats.contacts_resolved = stats.contacts_resolved;
            self.perf_stats.events_emitted = stats.events_emitted;
        }

        if let Some(bounds) = self.config.bounds {
            let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
            let clamped = clamp_to_bounds(&mut self.bodies, &mut self.grid, &bounds);
            if let Some(t0) = t0 {
                self.perf_stats.bounds_ms = t0.elapsed_ms();
                self.perf_stats.bounds_clamps = clamped;
            }
        }

        if let Some(t) = step_start {
            self.perf_stats.step_ms = t.elapsed_ms();
        }
        self.step_count += 1;
        trace!(
            "step {}: {} bodies, {} contacts, {} events pending",
            self.step_count,
            self.bodies.len(),
            stats.contacts_resolved,
            self.events.len()
        );
    }

    /// Nearest body hit by a ray, or `None`. A zero-length direction never hits.
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RaycastHit> {
        cast(&self.bodies, origin, direction, max_distance, ALL_LAYERS)
    }

    /// Like [`raycast`](Self::raycast), limited to bodies whose layer intersects `mask`.
    pub fn raycast_masked(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: u32,
    ) -> Option<RaycastHit> {
        cast(&self.bodies, origin, direction, max_distance, mask)
    }

    // === EVENTS ===

    /// Events produced since the last drain, in resolution order.
    pub fn pending_events(&self) -> &[CollisionEvent] {
        &self.events
    }

    pub fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    // === PERF ===

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.perf_stats.reset();
        }
    }

    /// Last step perf snapshot (zeros when perf disabled)
    pub fn perf_stats(&self) -> StepStats {
        self.perf_stats.clone()
    }
}
