//! PhysicsEngine - AABB rigid bodies with impulse resolution
//!
//! One `update(dt)` runs three phases in a fixed order:
//! - integrate: semi-implicit Euler on every dynamic body, then re-index in the grid
//! - collide: broad phase through the spatial grid, MTV narrow phase, impulse solver
//! - bounds: clamp dynamic bodies into the world rectangle and reflect their velocity
//!
//! Bodies live in a generational arena owned by the engine. Callers hold
//! [`BodyHandle`]s or string ids, never references that outlive a step.
//! Contacts are reported through an event queue the host drains after stepping.

mod arena;
pub mod body;
mod bounds;
mod collision;
mod config;
mod engine;
mod events;
mod integrate;
mod perf;
mod raycast;

pub use body::{Body, BodyDesc, BodyHandle, ALL_LAYERS, DEFAULT_LAYER};
pub use config::WorldConfig;
pub use engine::PhysicsEngine;
pub use events::{events_to_json, CollisionEvent};
pub use perf::StepStats;
pub use raycast::RaycastHit;
