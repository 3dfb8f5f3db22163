//! Fixed-timestep game loop
//!
//! Decouples simulation rate from display rate: every host frame feeds its
//! elapsed time into an accumulator, whole steps are drained out of it, and
//! the remainder becomes the render interpolation fraction.
//!
//! Timing lives in timing/; the loop never touches physics directly. Hosts
//! call `PhysicsEngine::update` from their `LoopHandler::update`.

#[path = "timing/fixed_step.rs"]
pub mod fixed_step;
#[path = "timing/fps.rs"]
pub mod fps;

pub use fixed_step::{
    FixedStepLoop, FrameReport, LoopConfig, LoopHandler, LoopState, DEFAULT_FPS_WINDOW_MS,
    DEFAULT_MAX_FRAME_MS, DEFAULT_STEP_MS, STEP_TOLERANCE_MS,
};
pub use fps::FpsCounter;

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
