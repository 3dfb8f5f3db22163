use serde::Deserialize;

use crate::core::clock::now_ms;
use crate::core::ConfigError;

use super::fps::FpsCounter;

/// 60 Hz
pub const DEFAULT_STEP_MS: f64 = 1000.0 / 60.0;
/// Longest host frame fed into the accumulator; longer gaps are dropped.
pub const DEFAULT_MAX_FRAME_MS: f64 = 250.0;
pub const DEFAULT_FPS_WINDOW_MS: f64 = 1000.0;
/// Accumulated time within this much of a full step still runs the step.
pub const STEP_TOLERANCE_MS: f64 = 1e-6;

/// Loop timing settings. JSON keys are camelCase and all optional:
///
/// ```json
/// { "stepMs": 16.667, "maxFrameMs": 250, "fpsWindowMs": 1000 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoopConfig {
    /// Fixed simulation step in milliseconds
    pub step_ms: f64,
    pub max_frame_ms: f64,
    pub fps_window_ms: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            step_ms: DEFAULT_STEP_MS,
            max_frame_ms: DEFAULT_MAX_FRAME_MS,
            fps_window_ms: DEFAULT_FPS_WINDOW_MS,
        }
    }
}

impl LoopConfig {
    /// Step at `hz` simulation updates per second.
    pub fn from_rate(hz: f64) -> Result<Self, ConfigError> {
        check_positive("rate", hz)?;
        let config = Self {
            step_ms: 1000.0 / hz,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LoopConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_step_ms(mut self, step_ms: f64) -> Self {
        self.step_ms = step_ms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("stepMs", self.step_ms)?;
        check_positive("maxFrameMs", self.max_frame_ms)?;
        check_positive("fpsWindowMs", self.fps_window_ms)
    }

    /// Fixed step handed to [`LoopHandler::update`], in seconds
    pub fn step_secs(&self) -> f64 {
        self.step_ms / 1000.0
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTiming { name, value })
    }
}

/// Receives the loop's callbacks.
pub trait LoopHandler {
    /// One fixed simulation step of `dt` seconds.
    fn update(&mut self, dt: f64);

    /// Called once per host frame. `interpolation` is in `[0, 1)`.
    fn render(&mut self, interpolation: f64);

    /// Called whenever an FPS window closes.
    fn fps(&mut self, _fps: f64) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// What one host frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed steps run this frame
    pub steps: u32,
    /// Value passed to [`LoopHandler::render`] (0 when no frame ran)
    pub interpolation: f64,
    /// Host time consumed after clamping
    pub elapsed_ms: f64,
}

/// Fixed-timestep driver: runs whole simulation steps out of accumulated host
/// time and renders once per host frame.
///
/// The loop never reads a clock on its own except through [`tick`](Self::tick);
/// hosts pass frame timestamps in, which keeps it deterministic under test.
#[derive(Clone, Debug)]
pub struct FixedStepLoop {
    config: LoopConfig,
    state: LoopState,
    accumulator_ms: f64,
    last_frame_ms: f64,
    total_steps: u64,
    fps: FpsCounter,
}

impl FixedStepLoop {
    pub fn new(config: LoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fps = FpsCounter::new(config.fps_window_ms);
        Ok(Self {
            config,
            state: LoopState::Stopped,
            accumulator_ms: 0.0,
            last_frame_ms: 0.0,
            total_steps: 0,
            fps,
        })
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Time carried over to the next frame
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Fixed steps run since construction
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn current_fps(&self) -> f64 {
        self.fps.current()
    }

    /// Begin running with `now_ms` as the timing baseline. No-op while
    /// running; a paused loop resumes.
    pub fn start(&mut self, now_ms: f64) {
        match self.state {
            LoopState::Running => {}
            LoopState::Paused => self.resume(now_ms),
            LoopState::Stopped => {
                self.state = LoopState::Running;
                self.accumulator_ms = 0.0;
                self.last_frame_ms = now_ms;
                self.fps.reset(now_ms);
                log::debug!("loop started: step {:.3} ms", self.config.step_ms);
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            log::debug!("loop stopped after {} steps", self.total_steps);
        }
        self.state = LoopState::Stopped;
        self.accumulator_ms = 0.0;
    }

    /// Suspend stepping. Pending partial-step time is discarded.
    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
            self.accumulator_ms = 0.0;
        }
    }

    /// Continue after [`pause`](Self::pause) from a fresh baseline, so the
    /// paused interval is never simulated.
    pub fn resume(&mut self, now_ms: f64) {
        if self.state == LoopState::Paused {
            self.state = LoopState::Running;
            self.last_frame_ms = now_ms;
            self.fps.reset(now_ms);
        }
    }

    /// Process one host frame at host time `now_ms`.
    pub fn frame(&mut self, now_ms: f64, handler: &mut impl LoopHandler) -> FrameReport {
        if !self.is_running() {
            return FrameReport::default();
        }
        let elapsed = now_ms - self.last_frame_ms;
        self.last_frame_ms = now_ms;
        self.run_frame(elapsed, now_ms, handler)
    }

    /// Process one host frame for a host that measured `elapsed_ms` itself.
    pub fn advance(&mut self, elapsed_ms: f64, handler: &mut impl LoopHandler) -> FrameReport {
        if !self.is_running() {
            return FrameReport::default();
        }
        let now_ms = self.last_frame_ms + elapsed_ms.max(0.0);
        self.last_frame_ms = now_ms;
        self.run_frame(elapsed_ms, now_ms, handler)
    }

    /// [`frame`](Self::frame) at the current clock time.
    pub fn tick(&mut self, handler: &mut impl LoopHandler) -> FrameReport {
        self.frame(now_ms(), handler)
    }

    fn run_frame(&mut self, elapsed_ms: f64, now_ms: f64, handler: &mut impl LoopHandler) -> FrameReport {
        // NaN and clock jumps backwards count as no time.
        let elapsed = if elapsed_ms.is_nan() {
            0.0
        } else {
            elapsed_ms.clamp(0.0, self.config.max_frame_ms)
        };
        if elapsed < elapsed_ms {
            log::debug!("frame of {:.1} ms clamped to {:.1} ms", elapsed_ms, elapsed);
        }
        self.accumulator_ms += elapsed;

        let step = self.config.step_ms;
        let dt = self.config.step_secs();
        let mut steps = 0;
        while self.accumulator_ms + STEP_TOLERANCE_MS >= step {
            handler.update(dt);
            self.accumulator_ms -= step;
            steps += 1;
        }
        self.accumulator_ms = self.accumulator_ms.max(0.0);
        self.total_steps += u64::from(steps);

        let interpolation = (self.accumulator_ms / step).clamp(0.0, 1.0);
        handler.render(interpolation);

        if let Some(fps) = self.fps.record_frame(now_ms) {
            log::trace!("fps {:.1}", fps);
            handler.fps(fps);
        }

        FrameReport {
            steps,
            interpolation,
            elapsed_ms: elapsed,
        }
    }
}
