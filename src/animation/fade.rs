use crate::foundation::color::Rgb;
use crate::foundation::error::{GemError, GemResult};
use crate::foundation::pace::{Pacer, frame_interval};
use crate::strip::sink::PixelSink;

/// One light handoff between two pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crossfade {
    /// Pixel the light leaves; ends at `vacated`.
    pub from: usize,
    /// Pixel the light arrives at; ends at `target`.
    pub to: usize,
    /// Color carried by the light.
    pub target: Rgb,
    /// Starting color of `to`.
    pub ambient: Rgb,
    /// Starting color of `from`. Usually `target`; off when the light was never shown there.
    pub departing: Rgb,
    /// Color `from` settles at. Usually `ambient`; off for a reserved pixel.
    pub vacated: Rgb,
    /// Total fade time, split evenly across `steps`.
    pub duration_ms: u64,
    /// Intermediate frames, not counting the final exact one.
    pub steps: u32,
}

impl Crossfade {
    /// Colors written at step `n` (`1..=steps`) as `(from, to)`.
    ///
    /// `from` runs `departing -> vacated` while `to` runs `ambient -> target`. For an ordinary
    /// move (`departing == target`, `vacated == ambient`) both pixels trace the same curve in
    /// opposite directions.
    pub fn colors_at(&self, n: u32) -> (Rgb, Rgb) {
        let steps = f64::from(self.steps.max(1));
        let n = n.min(self.steps);
        let rising = f64::from(n) / steps;
        let falling = f64::from(self.steps - n) / steps;
        (
            self.vacated.lerp(self.departing, falling),
            self.ambient.lerp(self.target, rising),
        )
    }
}

/// Renders soul moves as time-stepped crossfades.
///
/// Every frame is a write pair, one `present`, then a blocking pause of `duration / steps`.
/// After the last step a final frame pins both pixels to their exact terminal colors.
#[derive(Debug)]
pub struct FadeEngine<P> {
    pacer: P,
}

impl<P: Pacer> FadeEngine<P> {
    /// Engine that waits between frames with `pacer`.
    pub fn new(pacer: P) -> Self {
        Self { pacer }
    }

    /// The pacer, e.g. to inspect a [`crate::RecordingPacer`] after a run.
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Render `fade` into `sink`: `steps` paced frames, then the exact terminal frame.
    ///
    /// Zero steps is a validation error and writes nothing.
    pub fn crossfade<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        fade: &Crossfade,
    ) -> GemResult<()> {
        if fade.steps == 0 {
            return Err(GemError::validation("crossfade steps must be > 0"));
        }
        let interval = frame_interval(fade.duration_ms, fade.steps);
        tracing::trace!(
            from = fade.from,
            to = fade.to,
            steps = fade.steps,
            ?interval,
            "crossfade"
        );

        for n in 1..=fade.steps {
            let (leaving, arriving) = fade.colors_at(n);
            sink.set_pixel_color(fade.from, leaving)?;
            sink.set_pixel_color(fade.to, arriving)?;
            sink.present()?;
            self.pacer.pause(interval);
        }

        sink.set_pixel_color(fade.from, fade.vacated)?;
        sink.set_pixel_color(fade.to, fade.target)?;
        sink.present()
    }

    /// Spend `duration_ms` without touching the strip.
    pub fn hold(&mut self, duration_ms: u64) {
        self.pacer.pause(frame_interval(duration_ms, 1));
    }

    /// Pause for an arbitrary interval between frames.
    pub fn pause(&mut self, d: std::time::Duration) {
        self.pacer.pause(d);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/fade.rs"]
mod tests;
