//! Engine-wide primitives: math types, errors, time and logging.

pub mod clock;
pub mod error;
pub mod logging;
pub mod rect;
pub mod vec2;

pub use error::{BodyError, ConfigError};
pub use rect::Rect;
pub use vec2::Vec2;
