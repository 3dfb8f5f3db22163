//! wasm-bindgen bindings. Errors cross the boundary as JS strings.

mod game_loop;
mod world;

pub use game_loop::GameLoop;
pub use world::{PhysicsWorld, RaycastResult};

use wasm_bindgen::JsValue;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
