//! Error types for configuration and body registration.
//!
//! Stepping, queries and removals never fail; only inputs that would leave the
//! engine in an undefined state are rejected, and they are rejected up front.

use thiserror::Error;

/// Rejected world or loop configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),
    #[error("gravity must be finite, got ({0}, {1})")]
    InvalidGravity(f32, f32),
    #[error("world bounds must have a finite origin and positive finite size")]
    InvalidBounds,
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidTiming { name: &'static str, value: f64 },
    #[error("malformed config json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e.to_string())
    }
}

/// Rejected body registration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    #[error("body id must not be empty")]
    EmptyId,
    #[error("body id `{0}` is already registered")]
    DuplicateId(String),
    #[error("body `{id}` has invalid size {width}x{height}")]
    InvalidSize { id: String, width: f32, height: f32 },
    #[error("dynamic body `{id}` must have a positive finite mass, got {mass}")]
    InvalidMass { id: String, mass: f32 },
    #[error("body `{0}` has a non-finite position or velocity")]
    NonFiniteState(String),
    #[error("malformed body json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for BodyError {
    fn from(e: serde_json::Error) -> Self {
        BodyError::Json(e.to_string())
    }
}
