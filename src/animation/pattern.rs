use std::time::Duration;

use crate::animation::fade::{Crossfade, FadeEngine};
use crate::foundation::color::Rgb;
use crate::foundation::error::{GemError, GemResult};
use crate::foundation::pace::Pacer;
use crate::foundation::range::UsableRange;
use crate::strip::sink::PixelSink;

/// A single lit pixel running across the usable range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chase {
    /// Pixels the light runs over.
    pub range: UsableRange,
    /// Color of the lit pixel.
    pub color: Rgb,
    /// Delay after each position.
    pub frame_ms: u64,
    /// Run from the last usable pixel back to the offset.
    pub reverse: bool,
}

impl Chase {
    /// One pass: a frame per usable pixel, every other usable pixel off.
    pub fn play<S, P>(&self, sink: &mut S, fade: &mut FadeEngine<P>) -> GemResult<()>
    where
        S: PixelSink + ?Sized,
        P: Pacer,
    {
        let frame = Duration::from_millis(self.frame_ms);
        let width = self.range.width();
        for k in 0..width {
            let lit = if self.reverse {
                self.range.end - 1 - k
            } else {
                self.range.offset + k
            };
            for i in self.range.iter() {
                let color = if i == lit { self.color } else { Rgb::OFF };
                sink.set_pixel_color(i, color)?;
            }
            sink.present()?;
            fade.pause(frame);
        }
        Ok(())
    }
}

/// One pixel breathing in from off to full color and back out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breathe {
    /// Pixel that breathes.
    pub pixel: usize,
    /// Color at the top of the breath.
    pub color: Rgb,
    /// Frames per half breath.
    pub steps: u32,
    /// Delay after each frame.
    pub frame_ms: u64,
}

impl Breathe {
    /// Level of the pixel at frame `n` of `2 * steps`, counted from 1.
    ///
    /// Frames `1..=steps` rise to `color`; the rest fall back to off.
    pub fn color_at(&self, n: u32) -> Rgb {
        let steps = self.steps.max(1);
        let n = n.min(2 * steps);
        let level = if n <= steps { n } else { 2 * steps - n };
        Rgb::OFF.lerp(self.color, f64::from(level) / f64::from(steps))
    }

    /// One full breath: `2 * steps` paced frames ending with the pixel off.
    pub fn play<S, P>(&self, sink: &mut S, fade: &mut FadeEngine<P>) -> GemResult<()>
    where
        S: PixelSink + ?Sized,
        P: Pacer,
    {
        if self.steps == 0 {
            return Err(GemError::validation("breathe steps must be > 0"));
        }
        let frame = Duration::from_millis(self.frame_ms);
        for n in 1..=2 * self.steps {
            sink.set_pixel_color(self.pixel, self.color_at(n))?;
            sink.present()?;
            fade.pause(frame);
        }
        Ok(())
    }
}

/// The bright color handed pixel to pixel along the usable range and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Traverse {
    /// Pixels the light walks over.
    pub range: UsableRange,
    /// Color carried along.
    pub color: Rgb,
    /// Crossfade duration per hop.
    pub hop_ms: u64,
    /// Crossfade frames per hop.
    pub steps: u32,
}

impl Traverse {
    /// Hops of one pass as `(from, to)`: offset to strip end, then back again.
    pub fn hops(&self) -> Vec<(usize, usize)> {
        let (first, last) = (self.range.offset, self.range.end - 1);
        let forward = (first..last).map(|i| (i, i + 1));
        let back = (first + 1..=last).rev().map(|i| (i, i - 1));
        forward.chain(back).collect()
    }

    /// One pass over [`Traverse::hops`], each rendered as a crossfade over an unlit strip.
    ///
    /// A one-pixel range has no hops; the pixel is lit and held for one hop instead.
    pub fn play<S, P>(&self, sink: &mut S, fade: &mut FadeEngine<P>) -> GemResult<()>
    where
        S: PixelSink + ?Sized,
        P: Pacer,
    {
        let hops = self.hops();
        if hops.is_empty() {
            sink.set_pixel_color(self.range.offset, self.color)?;
            sink.present()?;
            fade.hold(self.hop_ms);
            return Ok(());
        }
        for (from, to) in hops {
            fade.crossfade(
                &mut *sink,
                &Crossfade {
                    from,
                    to,
                    target: self.color,
                    ambient: Rgb::OFF,
                    departing: self.color,
                    vacated: Rgb::OFF,
                    duration_ms: self.hop_ms,
                    steps: self.steps,
                },
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/pattern.rs"]
mod tests;
