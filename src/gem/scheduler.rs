use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::fade::FadeEngine;
use crate::animation::pattern::{Breathe, Chase, Traverse};
use crate::animation::soul::{Soul, Stage};
use crate::animation::wheel::{ColorWheel, WHEEL_PERIOD};
use crate::foundation::color::Rgb;
use crate::foundation::error::{GemError, GemResult};
use crate::foundation::pace::{Pacer, ThreadPacer};
use crate::foundation::range::UsableRange;
use crate::gem::config::{GemConfig, Mode};
use crate::strip::sink::{self, PixelSink};

/// Cloneable handle for requesting a cooperative stop from another thread or a signal handler.
///
/// The loop checks the flag once per outer iteration, so a request lands only after the souls'
/// in-flight moves (or the current wheel pass) finish.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Ask the loop to stop after the current iteration.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The raw flag, for APIs such as `signal_hook::flag::register` that set it directly.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Top-level controller: owns the strip, the souls and the loop state.
pub struct Gem<S, P, R> {
    config: GemConfig,
    range: UsableRange,
    sink: S,
    fade: FadeEngine<P>,
    rng: R,
    souls: Vec<Soul>,
    wheel: ColorWheel,
    stop: StopHandle,
    iterations: u64,
    initialized: bool,
}

impl<S: PixelSink> Gem<S, ThreadPacer, StdRng> {
    /// Real-time gem: sleeps between frames and seeds from `config.seed` or OS entropy.
    pub fn from_config(config: GemConfig, sink: S) -> GemResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, sink, ThreadPacer, rng)
    }
}

impl<S: PixelSink, P: Pacer, R: Rng> Gem<S, P, R> {
    /// Validate `config`, check the strip is long enough and spawn the souls from `rng`.
    pub fn new(config: GemConfig, sink: S, pacer: P, mut rng: R) -> GemResult<Self> {
        config.validate()?;
        let range = config.usable_range()?;
        if sink.pixel_count() < config.strip_len {
            return Err(GemError::validation(format!(
                "strip has {} pixels but config expects {}",
                sink.pixel_count(),
                config.strip_len
            )));
        }

        let params = config.soul_params();
        let souls = (0..config.souls)
            .map(|_| Soul::spawn(params, range, config.spawn, &mut rng))
            .collect();

        Ok(Self {
            wheel: config.wheel(),
            config,
            range,
            sink,
            fade: FadeEngine::new(pacer),
            rng,
            souls,
            stop: StopHandle::default(),
            iterations: 0,
            initialized: false,
        })
    }

    /// Share an existing stop flag, e.g. one already wired to signal handlers.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// A handle sharing this gem's stop flag.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The validated configuration.
    pub fn config(&self) -> &GemConfig {
        &self.config
    }

    /// Animation selected at construction.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Souls in their current positions.
    pub fn souls(&self) -> &[Soul] {
        &self.souls
    }

    /// The strip being drawn on.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The frame pacer.
    pub fn pacer(&self) -> &P {
        self.fade.pacer()
    }

    /// Completed outer loop iterations.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Tear down the gem and give back the strip.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run until a stop is requested, then clear the strip.
    pub fn start(&mut self) -> GemResult<()> {
        self.run_for(None)
    }

    /// Run at most `limit` outer iterations (unbounded for `None`), stopping early on request.
    /// The strip is cleared on the way out; errors from the strip skip the clear.
    #[tracing::instrument(skip_all, fields(mode = ?self.config.mode, souls = self.souls.len()))]
    pub fn run_for(&mut self, limit: Option<u64>) -> GemResult<()> {
        self.initialize()?;
        tracing::info!(?limit, "animation started");

        while !self.stop.is_stop_requested() && limit.is_none_or(|l| self.iterations < l) {
            match self.config.mode {
                Mode::Dance => self.dance_iteration()?,
                Mode::Cycle => self.cycle_iteration()?,
                Mode::Chase => self.chase().play(&mut self.sink, &mut self.fade)?,
                Mode::Breathe => self.breathe().play(&mut self.sink, &mut self.fade)?,
                Mode::Traverse => self.traverse().play(&mut self.sink, &mut self.fade)?,
            }
            self.iterations += 1;
        }

        tracing::info!(iterations = self.iterations, "animation stopped");
        sink::clear(&mut self.sink)
    }

    /// Request a stop and blank the strip immediately.
    pub fn stop(&mut self) -> GemResult<()> {
        self.stop.request_stop();
        sink::clear(&mut self.sink)
    }

    fn initialize(&mut self) -> GemResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.sink.initialize()?;
        self.initialized = true;

        if self.config.mode == Mode::Dance {
            for i in 0..self.range.strip_len() {
                let color = if i < self.range.offset {
                    Rgb::OFF
                } else {
                    self.config.ambient_color
                };
                self.sink.set_pixel_color(i, color)?;
            }
            self.sink.present()?;
        }
        Ok(())
    }

    /// One pass over every soul: mostly drifts, a dart one roll in `dart_odds`.
    fn dance_iteration(&mut self) -> GemResult<()> {
        let cfg = &self.config;
        for soul in &mut self.souls {
            let mut stage = Stage {
                sink: &mut self.sink,
                fade: &mut self.fade,
                ambient: cfg.ambient_color,
                steps: cfg.fade_steps,
            };
            if self.rng.gen_range(0..cfg.dart_odds) == 0 {
                soul.dart(&mut stage, &mut self.rng, cfg.dart_hops, cfg.dart_ms)?;
            } else {
                soul.drift(&mut stage, &mut self.rng, cfg.drift_ms)?;
            }
        }
        Ok(())
    }

    /// One full wheel turn across the usable range, then a short random pause.
    fn cycle_iteration(&mut self) -> GemResult<()> {
        let frame = Duration::from_millis(self.config.wheel_frame_ms);
        for j in 0..WHEEL_PERIOD {
            for i in self.range.iter() {
                self.sink.set_pixel_color(i, self.wheel.color_at(i + j))?;
            }
            self.sink.present()?;
            self.fade.pause(frame);
        }

        let rest = self.rng.gen_range(0..=self.config.wheel_pause_max_ms);
        tracing::trace!(rest_ms = rest, "wheel pass done");
        self.fade.pause(Duration::from_millis(rest));
        Ok(())
    }
}

impl<S, P, R> Gem<S, P, R> {
    fn chase(&self) -> Chase {
        Chase {
            range: self.range,
            color: self.config.bright_color,
            frame_ms: self.config.chase_ms,
            reverse: self.config.chase_reverse,
        }
    }

    fn breathe(&self) -> Breathe {
        Breathe {
            pixel: self.config.breathe_pixel.unwrap_or(self.range.middle()),
            color: self.config.bright_color,
            steps: self.config.breathe_steps,
            frame_ms: self.config.breathe_ms,
        }
    }

    fn traverse(&self) -> Traverse {
        Traverse {
            range: self.range,
            color: self.config.bright_color,
            hop_ms: self.config.traverse_ms,
            steps: self.config.fade_steps,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gem/scheduler.rs"]
mod tests;
