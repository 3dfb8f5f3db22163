use serde::Deserialize;

use crate::core::{BodyError, Rect, Vec2};

/// Layer assigned to bodies that do not pick one.
pub const DEFAULT_LAYER: u32 = 0x0001;
/// Mask that accepts every layer.
pub const ALL_LAYERS: u32 = 0xFFFF_FFFF;

/// Stable reference to a body owned by a [`PhysicsEngine`](super::PhysicsEngine).
///
/// Handles are generational: once a body is removed, its handle never
/// resolves again, even after the slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Axis-aligned rigid body. Translation only, no rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Host-facing identifier, unique within an engine
    pub id: String,

    // === Geometry ===
    /// Top-left corner
    pub position: Vec2,
    pub width: f32,
    pub height: f32,

    // === Motion ===
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Ignored for static bodies
    pub mass: f32,
    /// Static bodies collide but are never integrated or displaced
    pub is_static: bool,

    // === Material ===
    /// Bounciness (0.0 = no bounce, 1.0 = fully elastic)
    pub restitution: f32,
    /// Tangential damping coefficient
    pub friction: f32,

    // === Filtering ===
    pub collision_layer: u32,
    pub collision_mask: u32,
    /// Emit a [`CollisionEvent`](super::CollisionEvent) for every contact this body takes part in
    pub collision_events: bool,
}

impl Body {
    /// Create a dynamic body with unit mass and default material.
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            position: Vec2::new(x, y),
            width,
            height,
            velocity: Vec2::zero(),
            acceleration: Vec2::zero(),
            mass: 1.0,
            is_static: false,
            restitution: 0.0,
            friction: 0.0,
            collision_layer: DEFAULT_LAYER,
            collision_mask: ALL_LAYERS,
            collision_events: false,
        }
    }

    /// Create a static body (walls, floors, platforms).
    pub fn new_static(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(id, x, y, width, height).as_static()
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    pub fn with_acceleration(mut self, ax: f32, ay: f32) -> Self {
        self.acceleration = Vec2::new(ax, ay);
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.set_restitution(restitution);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.set_friction(friction);
        self
    }

    pub fn with_layers(mut self, layer: u32, mask: u32) -> Self {
        self.collision_layer = layer;
        self.collision_mask = mask;
        self
    }

    pub fn with_collision_events(mut self) -> Self {
        self.collision_events = true;
        self
    }

    /// Set restitution (bounciness)
    pub fn set_restitution(&mut self, r: f32) {
        self.restitution = r.clamp(0.0, 1.0);
    }

    pub fn set_friction(&mut self, f: f32) {
        self.friction = f.max(0.0);
    }

    #[inline]
    pub fn aabb(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.aabb().center()
    }

    /// Zero for static bodies so they absorb any impulse.
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Layer filter. Symmetric: either side accepting the other is enough.
    #[inline]
    pub fn interacts_with(&self, other: &Body) -> bool {
        (self.collision_layer & other.collision_mask) != 0
            || (other.collision_layer & self.collision_mask) != 0
    }

    /// Reject state the solver cannot handle, and normalize material values.
    pub(crate) fn validate(&mut self) -> Result<(), BodyError> {
        if self.id.is_empty() {
            return Err(BodyError::EmptyId);
        }
        let size_ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if !size_ok {
            return Err(BodyError::InvalidSize {
                id: self.id.clone(),
                width: self.width,
                height: self.height,
            });
        }
        if !self.position.is_finite() || !self.velocity.is_finite() || !self.acceleration.is_finite() {
            return Err(BodyError::NonFiniteState(self.id.clone()));
        }
        if !self.is_static && !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(BodyError::InvalidMass {
                id: self.id.clone(),
                mass: self.mass,
            });
        }
        let restitution = if self.restitution.is_finite() { self.restitution } else { 0.0 };
        self.set_restitution(restitution);
        let friction = if self.friction.is_finite() { self.friction } else { 0.0 };
        self.set_friction(friction);
        Ok(())
    }
}

/// JSON body description sent by the host.
///
/// ```json
/// { "id": "crate-1", "x": 10, "y": 0, "width": 16, "height": 16,
///   "vx": 2, "mass": 3, "restitution": 0.4, "collisionEvents": true }
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyDesc {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    #[serde(default)]
    pub ax: f32,
    #[serde(default)]
    pub ay: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default, rename = "static", alias = "isStatic")]
    pub is_static: bool,
    #[serde(default)]
    pub restitution: f32,
    #[serde(default)]
    pub friction: f32,
    #[serde(default = "default_layer")]
    pub collision_layer: u32,
    #[serde(default = "all_layers")]
    pub collision_mask: u32,
    #[serde(default)]
    pub collision_events: bool,
}

fn default_mass() -> f32 {
    1.0
}

fn default_layer() -> u32 {
    DEFAULT_LAYER
}

fn all_layers() -> u32 {
    ALL_LAYERS
}

impl BodyDesc {
    pub fn from_json(json: &str) -> Result<Self, BodyError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<BodyDesc> for Body {
    fn from(d: BodyDesc) -> Self {
        Body {
            id: d.id,
            position: Vec2::new(d.x, d.y),
            width: d.width,
            height: d.height,
            velocity: Vec2::new(d.vx, d.vy),
            acceleration: Vec2::new(d.ax, d.ay),
            mass: d.mass,
            is_static: d.is_static,
            restitution: d.restitution,
            friction: d.friction,
            collision_layer: d.collision_layer,
            collision_mask: d.collision_mask,
            collision_events: d.collision_events,
        }
    }
}
