use super::*;
use crate::core::ConfigError;

/// Records every callback the loop makes.
#[derive(Default)]
struct Recorder {
    updates: Vec<f64>,
    renders: Vec<f64>,
    fps: Vec<f64>,
}

impl LoopHandler for Recorder {
    fn update(&mut self, dt: f64) {
        self.updates.push(dt);
    }

    fn render(&mut self, interpolation: f64) {
        self.renders.push(interpolation);
    }

    fn fps(&mut self, fps: f64) {
        self.fps.push(fps);
    }
}

fn running(config: LoopConfig) -> FixedStepLoop {
    let mut game_loop = FixedStepLoop::new(config).unwrap();
    game_loop.start(0.0);
    game_loop
}

#[test]
fn fifty_ms_at_sixty_hz_runs_three_steps_and_one_render() {
    let mut game_loop = running(LoopConfig::from_rate(60.0).unwrap());
    let mut rec = Recorder::default();

    let report = game_loop.frame(50.0, &mut rec);

    assert_eq!(report.steps, 3);
    assert_eq!(rec.updates.len(), 3);
    assert!(rec.updates.iter().all(|dt| (dt - 1.0 / 60.0).abs() < 1e-12));
    assert_eq!(rec.renders.len(), 1);
    assert!(rec.renders[0] >= 0.0 && rec.renders[0] < 0.001);
    assert_eq!(report.interpolation, rec.renders[0]);
}

#[test]
fn partial_steps_carry_over_as_interpolation() {
    let mut game_loop = running(LoopConfig::default().with_step_ms(10.0));
    let mut rec = Recorder::default();

    assert_eq!(game_loop.frame(4.0, &mut rec).steps, 0);
    assert!((rec.renders[0] - 0.4).abs() < 1e-9);

    // 4 + 13 = 17 -> one step, 7 left over.
    assert_eq!(game_loop.frame(17.0, &mut rec).steps, 1);
    assert!((game_loop.accumulator_ms() - 7.0).abs() < 1e-9);
    assert!((rec.renders[1] - 0.7).abs() < 1e-9);
    assert_eq!(game_loop.total_steps(), 1);
}

#[test]
fn long_frames_are_clamped() {
    let mut game_loop = running(LoopConfig::default().with_step_ms(10.0));
    let mut rec = Recorder::default();

    let report = game_loop.frame(5_000.0, &mut rec);
    assert_eq!(report.elapsed_ms, DEFAULT_MAX_FRAME_MS);
    assert_eq!(report.steps, 25);

    // Clock running backwards adds nothing.
    let report = game_loop.frame(4_000.0, &mut rec);
    assert_eq!(report.steps, 0);
    assert_eq!(report.elapsed_ms, 0.0);
}

#[test]
fn advance_uses_host_measured_time() {
    let mut game_loop = running(LoopConfig::default().with_step_ms(10.0));
    let mut rec = Recorder::default();
    assert_eq!(game_loop.advance(35.0, &mut rec).steps, 3);
    assert_eq!(game_loop.advance(f64::NAN, &mut rec).steps, 0);
    assert_eq!(game_loop.advance(5.0, &mut rec).steps, 1);
}

#[test]
fn state_machine_transitions() {
    let mut game_loop = FixedStepLoop::new(LoopConfig::default().with_step_ms(10.0)).unwrap();
    let mut rec = Recorder::default();
    assert_eq!(game_loop.state(), LoopState::Stopped);

    // Frames before start do nothing at all.
    assert_eq!(game_loop.frame(100.0, &mut rec), FrameReport::default());
    assert!(rec.renders.is_empty());

    game_loop.start(100.0);
    assert_eq!(game_loop.state(), LoopState::Running);
    game_loop.frame(115.0, &mut rec);
    assert!((game_loop.accumulator_ms() - 5.0).abs() < 1e-9);

    // Second start keeps the baseline.
    game_loop.start(1_000.0);
    assert_eq!(game_loop.frame(120.0, &mut rec).steps, 1);

    game_loop.pause();
    assert_eq!(game_loop.state(), LoopState::Paused);
    assert_eq!(game_loop.accumulator_ms(), 0.0);
    assert_eq!(game_loop.frame(200.0, &mut rec).steps, 0);

    // The paused interval is not simulated.
    game_loop.resume(5_000.0);
    assert_eq!(game_loop.frame(5_010.0, &mut rec).steps, 1);

    game_loop.resume(9_000.0);
    assert_eq!(game_loop.frame(5_020.0, &mut rec).steps, 1);

    game_loop.stop();
    assert_eq!(game_loop.state(), LoopState::Stopped);
    game_loop.resume(6_000.0);
    assert_eq!(game_loop.state(), LoopState::Stopped);
    assert_eq!(game_loop.frame(6_100.0, &mut rec).steps, 0);
}

#[test]
fn fps_is_reported_once_per_window() {
    let mut game_loop = running(LoopConfig::from_rate(60.0).unwrap());
    let mut rec = Recorder::default();
    let frame = 1000.0 / 60.0;

    for i in 1..=59 {
        game_loop.frame(frame * i as f64, &mut rec);
    }
    assert!(rec.fps.is_empty());

    game_loop.frame(frame * 60.0 + 0.01, &mut rec);
    assert_eq!(rec.fps.len(), 1);
    assert!((rec.fps[0] - 60.0).abs() < 0.1);
    assert_eq!(game_loop.current_fps(), rec.fps[0]);
}

#[test]
fn fps_counter_uses_actual_window_length() {
    let mut counter = FpsCounter::new(1000.0);
    counter.reset(0.0);
    for t in [250.0, 500.0, 750.0] {
        assert_eq!(counter.record_frame(t), None);
    }
    assert_eq!(counter.record_frame(1250.0), Some(4.0 * 1000.0 / 1250.0));
    assert_eq!(counter.current(), 3.2);
}

#[test]
fn invalid_timing_is_rejected() {
    assert!(matches!(
        LoopConfig::from_rate(0.0),
        Err(ConfigError::InvalidTiming { name: "rate", .. })
    ));
    assert!(FixedStepLoop::new(LoopConfig::default().with_step_ms(f64::NAN)).is_err());

    let config = LoopConfig::from_json(r#"{"stepMs":20}"#).unwrap();
    assert_eq!(config.step_ms, 20.0);
    assert_eq!(config.max_frame_ms, DEFAULT_MAX_FRAME_MS);
    assert!(matches!(
        LoopConfig::from_json(r#"{"maxFrameMs":-1}"#),
        Err(ConfigError::InvalidTiming { name: "maxFrameMs", .. })
    ));
}
