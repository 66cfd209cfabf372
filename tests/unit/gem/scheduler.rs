use super::*;
use crate::foundation::pace::RecordingPacer;
use crate::strip::sink::MemoryStrip;

/// Requests a stop after a fixed number of presents, as a signal arriving mid-fade would.
struct StopAfter {
    inner: MemoryStrip,
    stop: StopHandle,
    after: u64,
}

impl PixelSink for StopAfter {
    fn pixel_count(&self) -> usize {
        self.inner.pixel_count()
    }

    fn initialize(&mut self) -> GemResult<()> {
        self.inner.initialize()
    }

    fn set_pixel_color(&mut self, index: usize, color: Rgb) -> GemResult<()> {
        self.inner.set_pixel_color(index, color)
    }

    fn present(&mut self) -> GemResult<()> {
        self.inner.present()?;
        if self.inner.present_count() == self.after {
            self.stop.request_stop();
        }
        Ok(())
    }
}

struct FailingSink;

impl PixelSink for FailingSink {
    fn pixel_count(&self) -> usize {
        60
    }

    fn initialize(&mut self) -> GemResult<()> {
        Ok(())
    }

    fn set_pixel_color(&mut self, _index: usize, _color: Rgb) -> GemResult<()> {
        Ok(())
    }

    fn present(&mut self) -> GemResult<()> {
        Err(GemError::sink("spi bus gone"))
    }
}

fn fast_config(mode: Mode) -> GemConfig {
    GemConfig {
        mode,
        drift_ms: 40,
        dart_ms: 20,
        fade_steps: 4,
        wheel_frame_ms: 1,
        wheel_pause_max_ms: 50,
        spawn: crate::animation::soul::Spawn::Usable,
        ..GemConfig::default()
    }
}

fn gem(config: GemConfig, seed: u64) -> Gem<MemoryStrip, RecordingPacer, StdRng> {
    let strip = MemoryStrip::new(config.strip_len);
    Gem::new(
        config,
        strip,
        RecordingPacer::new(),
        StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

#[test]
fn dance_starts_from_ambient_usable_range() {
    let mut g = gem(fast_config(Mode::Dance), 1);
    g.run_for(Some(0)).unwrap();

    let strip = g.sink();
    assert!(strip.is_initialized());
    // Initial frame, then the clear on the way out.
    assert_eq!(strip.frames().len(), 2);
    let first = &strip.frames()[0];
    assert!(first[..10].iter().all(|c| *c == Rgb::OFF));
    assert!(first[10..].iter().all(|c| *c == Rgb::new(5, 0, 10)));
    assert!(strip.frames()[1].iter().all(|c| *c == Rgb::OFF));
}

#[test]
fn stop_waits_for_every_soul_to_finish_its_action() {
    let config = GemConfig {
        souls: 2,
        dart_odds: 1,
        dart_hops: 2,
        ..fast_config(Mode::Dance)
    };
    let stop = StopHandle::default();
    let sink = StopAfter {
        inner: MemoryStrip::new(config.strip_len),
        stop: stop.clone(),
        after: 3,
    };
    let mut g = Gem::new(
        config,
        sink,
        RecordingPacer::new(),
        StdRng::seed_from_u64(8),
    )
    .unwrap()
    .with_stop_handle(stop);

    g.run_for(None).unwrap();

    assert_eq!(g.iterations(), 1);
    // 1 ambient frame + 2 souls x 2 hops x (4 steps + exact frame) + 1 clear.
    assert_eq!(g.sink().inner.present_count(), 22);
    assert!(g.sink().inner.pixels().iter().all(|c| *c == Rgb::OFF));
}

#[test]
fn bounded_run_counts_iterations_and_clears() {
    let mut g = gem(fast_config(Mode::Dance), 2);
    g.run_for(Some(3)).unwrap();

    assert_eq!(g.iterations(), 3);
    assert!(g.sink().pixels().iter().all(|c| *c == Rgb::OFF));
    for soul in g.souls() {
        assert!(soul.current_pixel() >= 10 && soul.current_pixel() < 60);
    }
}

#[test]
fn dance_moves_are_drift_or_dart_sized() {
    let config = fast_config(Mode::Dance);
    let mut g = gem(config.clone(), 3);
    g.run_for(Some(1)).unwrap();

    // A drift is 5 presents, a dart 3 x 5; plus the opening and closing frames.
    let moves = g.sink().present_count() - 2;
    assert!(moves == 5 || moves == 15, "unexpected present count {moves}");
    let paused = g.pacer().total();
    assert!(
        paused == Duration::from_millis(config.drift_ms)
            || paused == Duration::from_millis(config.dart_ms * 3)
    );
}

#[test]
fn cycle_paints_one_wheel_turn_per_iteration() {
    let config = fast_config(Mode::Cycle);
    let wheel = config.wheel();
    let mut g = gem(config, 4);
    g.run_for(Some(1)).unwrap();

    let frames = g.sink().frames();
    assert_eq!(frames.len(), WHEEL_PERIOD + 1);
    for (j, frame) in frames[..WHEEL_PERIOD].iter().enumerate() {
        assert!(frame[..10].iter().all(|c| *c == Rgb::OFF));
        for i in 10..60 {
            assert_eq!(frame[i], wheel.color_at(i + j));
        }
    }

    let pauses = g.pacer().pauses();
    assert_eq!(pauses.len(), WHEEL_PERIOD + 1);
    assert!(pauses[..WHEEL_PERIOD].iter().all(|d| *d == Duration::from_millis(1)));
    assert!(pauses[WHEEL_PERIOD] <= Duration::from_millis(50));
}

#[test]
fn cycle_stop_lands_after_the_full_pass() {
    let config = fast_config(Mode::Cycle);
    let stop = StopHandle::default();
    let sink = StopAfter {
        inner: MemoryStrip::new(config.strip_len),
        stop: stop.clone(),
        after: 5,
    };
    let mut g = Gem::new(config, sink, RecordingPacer::new(), StdRng::seed_from_u64(0))
        .unwrap()
        .with_stop_handle(stop);
    g.start().unwrap();

    assert_eq!(g.iterations(), 1);
    assert_eq!(g.sink().inner.present_count(), WHEEL_PERIOD as u64 + 1);
}

#[test]
fn explicit_stop_clears_and_prevents_further_iterations() {
    let mut g = gem(fast_config(Mode::Dance), 5);
    g.stop().unwrap();
    assert!(g.stop_handle().is_stop_requested());
    assert!(g.sink().pixels().iter().all(|c| *c == Rgb::OFF));

    g.run_for(None).unwrap();
    assert_eq!(g.iterations(), 0);
}

#[test]
fn same_seed_same_show() {
    let mut a = gem(fast_config(Mode::Dance), 77);
    let mut b = gem(fast_config(Mode::Dance), 77);
    a.run_for(Some(4)).unwrap();
    b.run_for(Some(4)).unwrap();
    assert_eq!(a.sink().frames(), b.sink().frames());
    assert_eq!(a.souls(), b.souls());
}

#[test]
fn short_strip_is_rejected() {
    let err = Gem::new(
        GemConfig::default(),
        MemoryStrip::new(30),
        RecordingPacer::new(),
        StdRng::seed_from_u64(0),
    )
    .err()
    .unwrap();
    assert!(matches!(err, GemError::Validation(_)));
}

#[test]
fn strip_failures_are_fatal() {
    let mut g = Gem::new(
        fast_config(Mode::Dance),
        FailingSink,
        RecordingPacer::new(),
        StdRng::seed_from_u64(0),
    )
    .unwrap();
    let err = g.run_for(Some(1)).unwrap_err();
    assert!(matches!(err, GemError::Sink(_)));
    assert_eq!(g.iterations(), 0);
}

#[test]
fn souls_are_spawned_per_config() {
    let config = GemConfig {
        souls: 4,
        spawn: crate::animation::soul::Spawn::FullStrip,
        ..GemConfig::default()
    };
    let g = gem(config, 6);
    assert_eq!(g.souls().len(), 4);
    assert!(g.souls().iter().all(|s| s.current_pixel() < 60));
}

#[test]
fn reserved_pixels_stay_dark_whatever_the_spawn() {
    for seed in 0..30 {
        let config = GemConfig {
            spawn: crate::animation::soul::Spawn::FullStrip,
            ..fast_config(Mode::Dance)
        };
        let mut g = gem(config, seed);
        let spawned = g.souls()[0].current_pixel();
        g.run_for(Some(3)).unwrap();

        for frame in g.sink().frames() {
            assert!(
                frame[..10].iter().all(|c| *c == Rgb::OFF),
                "seed {seed} spawned at {spawned} lit a reserved pixel"
            );
        }
        let soul = &g.souls()[0];
        assert!(
            (10..60).contains(&soul.current_pixel()),
            "seed {seed} spawned at {spawned} never entered the range"
        );
    }
}

#[test]
fn chase_iteration_is_one_pass_over_the_usable_range() {
    let config = GemConfig {
        chase_ms: 3,
        ..fast_config(Mode::Chase)
    };
    let mut g = gem(config, 10);
    g.run_for(Some(2)).unwrap();

    // Two passes of 50 positions, then the clear.
    let frames = g.sink().frames();
    assert_eq!(frames.len(), 101);
    assert_eq!(frames[0][10], Rgb::new(70, 0, 150));
    assert_eq!(frames[49][59], Rgb::new(70, 0, 150));
    assert!(frames[..100].iter().all(|f| f[..10].iter().all(|c| *c == Rgb::OFF)));
    assert_eq!(g.pacer().total(), Duration::from_millis(300));
}

#[test]
fn breathe_defaults_to_the_middle_pixel() {
    let config = GemConfig {
        breathe_steps: 5,
        ..fast_config(Mode::Breathe)
    };
    let mut g = gem(config, 11);
    g.run_for(Some(1)).unwrap();

    let frames = g.sink().frames();
    assert_eq!(frames.len(), 11);
    assert_eq!(frames[4][34], Rgb::new(70, 0, 150));
    assert_eq!(frames[9][34], Rgb::OFF);
    assert!(frames.iter().all(|f| f[33] == Rgb::OFF && f[35] == Rgb::OFF));
}

#[test]
fn traverse_stop_lands_after_the_full_pass() {
    let config = GemConfig {
        strip_len: 14,
        fade_steps: 2,
        traverse_ms: 10,
        ..fast_config(Mode::Traverse)
    };
    let stop = StopHandle::default();
    let sink = StopAfter {
        inner: MemoryStrip::new(config.strip_len),
        stop: stop.clone(),
        after: 1,
    };
    let mut g = Gem::new(config, sink, RecordingPacer::new(), StdRng::seed_from_u64(0))
        .unwrap()
        .with_stop_handle(stop);
    g.start().unwrap();

    assert_eq!(g.iterations(), 1);
    // 6 hops out and back over 4 usable pixels, 3 presents each, plus the clear.
    assert_eq!(g.sink().inner.present_count(), 19);
    assert!(g.sink().inner.pixels().iter().all(|c| *c == Rgb::OFF));
}
