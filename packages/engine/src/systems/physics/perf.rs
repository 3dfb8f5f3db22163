use wasm_bindgen::prelude::*;

/// Per-step counters and phase timings. Zeros unless perf metrics are enabled.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub(crate) step_ms: f64,
    pub(crate) integrate_ms: f64,
    pub(crate) collide_ms: f64,
    pub(crate) bounds_ms: f64,
    pub(crate) bodies: u32,
    pub(crate) dynamic_bodies: u32,
    pub(crate) candidate_checks: u32,
    pub(crate) pairs_tested: u32,
    pub(crate) contacts_resolved: u32,
    pub(crate) bounds_clamps: u32,
    pub(crate) events_emitted: u32,
}

impl StepStats {
    pub(crate) fn reset(&mut self) {
        *self = StepStats::default();
    }
}

#[wasm_bindgen]
impl StepStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    #[wasm_bindgen(getter)]
    pub fn collide_ms(&self) -> f64 { self.collide_ms }
    #[wasm_bindgen(getter)]
    pub fn bounds_ms(&self) -> f64 { self.bounds_ms }
    #[wasm_bindgen(getter)]
    pub fn bodies(&self) -> u32 { self.bodies }
    #[wasm_bindgen(getter)]
    pub fn dynamic_bodies(&self) -> u32 { self.dynamic_bodies }
    /// Candidate entries returned by the grid, before pair dedup
    #[wasm_bindgen(getter)]
    pub fn candidate_checks(&self) -> u32 { self.candidate_checks }
    /// Unique pairs that reached the narrow phase
    #[wasm_bindgen(getter)]
    pub fn pairs_tested(&self) -> u32 { self.pairs_tested }
    #[wasm_bindgen(getter)]
    pub fn contacts_resolved(&self) -> u32 { self.contacts_resolved }
    #[wasm_bindgen(getter)]
    pub fn bounds_clamps(&self) -> u32 { self.bounds_clamps }
    #[wasm_bindgen(getter)]
    pub fn events_emitted(&self) -> u32 { self.events_emitted }
}
