use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::simulation::{FixedStepLoop, LoopConfig, LoopHandler, LoopState};

use super::js_error;

/// Forwards loop callbacks to JS functions. The first thrown error is kept
/// and the remaining callbacks of that frame are skipped.
struct JsHandler<'a> {
    on_update: &'a Function,
    on_render: &'a Function,
    on_fps: Option<&'a Function>,
    error: Option<JsValue>,
}

impl JsHandler<'_> {
    fn call(&mut self, f: &Function, arg: f64) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_f64(arg)) {
            self.error = Some(e);
        }
    }
}

impl LoopHandler for JsHandler<'_> {
    fn update(&mut self, dt: f64) {
        let f = self.on_update;
        self.call(f, dt);
    }

    fn render(&mut self, interpolation: f64) {
        let f = self.on_render;
        self.call(f, interpolation);
    }

    fn fps(&mut self, fps: f64) {
        if let Some(f) = self.on_fps {
            self.call(f, fps);
        }
    }
}

/// Fixed-timestep loop driven from `requestAnimationFrame`.
///
/// ```js
/// const loop = new GameLoop(60, dt => world.step(dt), alpha => draw(alpha));
/// loop.start(performance.now());
/// requestAnimationFrame(function raf(t) { loop.frame(t); requestAnimationFrame(raf); });
/// ```
#[wasm_bindgen]
pub struct GameLoop {
    inner: FixedStepLoop,
    on_update: Function,
    on_render: Function,
    on_fps: Option<Function>,
}

impl GameLoop {
    fn build(
        config: LoopConfig,
        on_update: Function,
        on_render: Function,
        on_fps: Option<Function>,
    ) -> Result<GameLoop, JsValue> {
        let inner = FixedStepLoop::new(config).map_err(js_error)?;
        Ok(GameLoop {
            inner,
            on_update,
            on_render,
            on_fps,
        })
    }

    fn run(&mut self, now_ms: Option<f64>) -> Result<u32, JsValue> {
        let mut handler = JsHandler {
            on_update: &self.on_update,
            on_render: &self.on_render,
            on_fps: self.on_fps.as_ref(),
            error: None,
        };
        let report = match now_ms {
            Some(t) => self.inner.frame(t, &mut handler),
            None => self.inner.tick(&mut handler),
        };
        match handler.error {
            Some(e) => Err(e),
            None => Ok(report.steps),
        }
    }
}

#[wasm_bindgen]
impl GameLoop {
    /// `rate_hz` fixed steps per second; `on_update(dtSeconds)`,
    /// `on_render(interpolation)`, optional `on_fps(fps)`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        rate_hz: f64,
        on_update: Function,
        on_render: Function,
        on_fps: Option<Function>,
    ) -> Result<GameLoop, JsValue> {
        let config = LoopConfig::from_rate(rate_hz).map_err(js_error)?;
        Self::build(config, on_update, on_render, on_fps)
    }

    /// Same as the constructor, with a JSON `LoopConfig`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(
        json: String,
        on_update: Function,
        on_render: Function,
        on_fps: Option<Function>,
    ) -> Result<GameLoop, JsValue> {
        let config = LoopConfig::from_json(&json).map_err(js_error)?;
        Self::build(config, on_update, on_render, on_fps)
    }

    pub fn start(&mut self, now_ms: f64) {
        self.inner.start(now_ms);
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    pub fn resume(&mut self, now_ms: f64) {
        self.inner.resume(now_ms);
    }

    /// Run one host frame at `now_ms`. Returns the number of fixed steps taken.
    pub fn frame(&mut self, now_ms: f64) -> Result<u32, JsValue> {
        self.run(Some(now_ms))
    }

    /// Run one host frame at the current time.
    pub fn tick(&mut self) -> Result<u32, JsValue> {
        self.run(None)
    }

    #[wasm_bindgen(getter)]
    pub fn is_running(&self) -> bool { self.inner.is_running() }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            LoopState::Stopped => "stopped",
            LoopState::Running => "running",
            LoopState::Paused => "paused",
        }
        .to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn current_fps(&self) -> f64 { self.inner.current_fps() }

    #[wasm_bindgen(getter)]
    pub fn total_steps(&self) -> u64 { self.inner.total_steps() }
}
