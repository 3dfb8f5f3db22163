use serde::Serialize;

use crate::core::Vec2;

use super::body::BodyHandle;

/// One side of a resolved contact.
///
/// `normal` is a unit axis vector pointing from `body` toward `other`.
/// A resolved pair produces one event per participant that opted in with
/// `collision_events`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionEvent {
    #[serde(skip)]
    pub body: BodyHandle,
    #[serde(skip)]
    pub other: BodyHandle,
    pub body_id: String,
    pub other_id: String,
    pub normal: Vec2,
}

/// Serialize a batch of events for the JS host.
pub fn events_to_json(events: &[CollisionEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| "[]".to_string())
}
