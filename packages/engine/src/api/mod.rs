//! Host-facing surface: render extraction and the wasm-bindgen bindings.

pub mod render;
pub mod wasm;

pub use render::{RenderBuffer, FLOATS_PER_BODY};
