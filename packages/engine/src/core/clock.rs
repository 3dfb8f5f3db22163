//! Millisecond clock shared by the loop driver and perf timings.
//!
//! wasm32 has no `Instant`, so the browser build reads `Date.now()`.

#[cfg(target_arch = "wasm32")]
use js_sys;

/// Milliseconds since an arbitrary, monotonic-enough origin.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        native_origin().elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn native_origin() -> std::time::Instant {
    use std::sync::OnceLock;
    static ORIGIN: OnceLock<std::time::Instant> = OnceLock::new();
    *ORIGIN.get_or_init(std::time::Instant::now)
}

/// Wall-clock stopwatch for per-phase perf metrics.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PerfTimer {
    start_ms: f64,
}

impl PerfTimer {
    pub(crate) fn start() -> Self {
        PerfTimer { start_ms: now_ms() }
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        (now_ms() - self.start_ms).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_does_not_run_backwards() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
        assert!(PerfTimer::start().elapsed_ms() >= 0.0);
    }
}
