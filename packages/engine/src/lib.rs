//! Playfield Engine - fixed-timestep loop and AABB physics in WASM
//!
//! Architecture:
//! - core/        - math types, errors, clock, logging
//! - spatial/     - broad-phase spatial grid
//! - systems/     - physics engine (integration, collision, raycast)
//! - simulation/  - fixed-timestep loop driver
//! - api/         - render extraction and wasm-bindgen facade
//!
//! Native code drives `PhysicsEngine` and `FixedStepLoop` directly; the
//! browser host goes through `PhysicsWorld` and `GameLoop`.

pub mod core;
pub mod spatial;
pub mod systems;
pub mod simulation;
pub mod api;

// Short paths used throughout the crate
pub use spatial::grid;
pub use systems::physics;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook and console logging at `info`.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::logging::init_logging(log::LevelFilter::Info);
    log::info!("Playfield engine {} initialized", version());
}

/// Change the log filter ("error", "warn", "info", "debug", "trace", "off").
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    log::set_max_level(crate::core::logging::parse_level(level));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::api::wasm::{GameLoop, PhysicsWorld, RaycastResult};
pub use crate::core::{BodyError, ConfigError, Rect, Vec2};
pub use crate::physics::{
    Body, BodyDesc, BodyHandle, CollisionEvent, PhysicsEngine, RaycastHit, StepStats, WorldConfig,
};
pub use crate::simulation::{FixedStepLoop, FrameReport, LoopConfig, LoopHandler, LoopState};
pub use crate::spatial::SpatialGrid;
