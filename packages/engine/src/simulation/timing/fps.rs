/// Frames-per-second over fixed windows of host time.
///
/// A window closes on the first frame at least `window_ms` after it opened;
/// the reported rate is `frames * 1000 / actual window length`.
#[derive(Clone, Debug, PartialEq)]
pub struct FpsCounter {
    window_ms: f64,
    window_start: Option<f64>,
    frames: u32,
    current: f64,
}

impl FpsCounter {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start: None,
            frames: 0,
            current: 0.0,
        }
    }

    /// Start a fresh window at `now_ms`. The last reported value is kept.
    pub fn reset(&mut self, now_ms: f64) {
        self.window_start = Some(now_ms);
        self.frames = 0;
    }

    /// Count one frame. Returns the new rate when a window closes.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<f64> {
        let Some(start) = self.window_start else {
            self.reset(now_ms);
            self.frames = 1;
            return None;
        };
        self.frames += 1;
        let span = now_ms - start;
        if span < self.window_ms || span <= 0.0 {
            return None;
        }
        self.current = f64::from(self.frames) * 1000.0 / span;
        self.window_start = Some(now_ms);
        self.frames = 0;
        Some(self.current)
    }

    /// Most recently reported rate (0 until the first window closes)
    pub fn current(&self) -> f64 {
        self.current
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(super::DEFAULT_FPS_WINDOW_MS)
    }
}
