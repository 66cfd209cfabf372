use rand::Rng;

use crate::animation::fade::{Crossfade, FadeEngine};
use crate::foundation::color::{Rgb, clamp_channel_i32};
use crate::foundation::error::GemResult;
use crate::foundation::pace::Pacer;
use crate::foundation::range::UsableRange;
use crate::strip::sink::PixelSink;

/// Where a soul is placed when it is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spawn {
    /// Anywhere on the strip, reserved pixels included.
    #[default]
    FullStrip,
    /// Only inside the usable range.
    Usable,
}

/// Static look and reach of a soul.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoulParams {
    /// Base color, fixed for the soul's lifetime.
    pub color: Rgb,
    /// Per-channel jitter bound applied on every move.
    pub color_variation: u16,
    /// Distance from the current pixel to the outer anchors of the neighbor search.
    pub circumference: usize,
}

impl Default for SoulParams {
    fn default() -> Self {
        Self {
            color: Rgb::new(70, 0, 150),
            color_variation: 5,
            circumference: 5,
        }
    }
}

/// Everything a move draws with: the strip, the fade renderer and the resting color.
pub struct Stage<'a, S: ?Sized, P> {
    /// Strip the move is drawn on.
    pub sink: &'a mut S,
    /// Paced crossfade renderer.
    pub fade: &'a mut FadeEngine<P>,
    /// Color a usable pixel returns to once the soul leaves.
    pub ambient: Rgb,
    /// Crossfade frames per move.
    pub steps: u32,
}

/// A wandering light.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Soul {
    current: usize,
    params: SoulParams,
    range: UsableRange,
}

impl Soul {
    /// Place a soul at a random pixel chosen according to `spawn`.
    pub fn spawn<R: Rng + ?Sized>(
        params: SoulParams,
        range: UsableRange,
        spawn: Spawn,
        rng: &mut R,
    ) -> Self {
        let current = match spawn {
            Spawn::FullStrip => rng.gen_range(0..range.strip_len()),
            Spawn::Usable => rng.gen_range(range.iter()),
        };
        Self::at(current, params, range)
    }

    /// Place a soul at a known pixel.
    pub fn at(current: usize, params: SoulParams, range: UsableRange) -> Self {
        Self {
            current,
            params,
            range,
        }
    }

    /// Pixel the soul currently lights.
    pub fn current_pixel(&self) -> usize {
        self.current
    }

    /// Look and reach this soul was created with.
    pub fn params(&self) -> &SoulParams {
        &self.params
    }

    /// Move targets around the three anchors `current - circ`, `current`, `current + circ`.
    ///
    /// Each anchor contributes itself and its two direct neighbors. Candidates outside the usable
    /// range, duplicates and the current pixel are dropped; first-seen order is kept.
    pub fn candidate_pool(&self) -> Vec<usize> {
        let cur = self.current as i64;
        let circ = self.params.circumference as i64;

        let mut pool = Vec::with_capacity(9);
        for anchor in [cur - circ, cur, cur + circ] {
            for c in [anchor - 1, anchor, anchor + 1] {
                if c == cur || !self.range.contains(c) {
                    continue;
                }
                // contains() guarantees c is a non-negative in-range index.
                let c = c as usize;
                if !pool.contains(&c) {
                    pool.push(c);
                }
            }
        }
        pool
    }

    /// Uniform pick from [`Soul::candidate_pool`], never the current pixel.
    ///
    /// A soul stranded on a reserved pixel with an empty pool re-enters at the nearest usable
    /// pixel. `None` only when a soul inside the range has no other pixel within reach, i.e.
    /// the usable range is too small for the configured circumference.
    pub fn select_next_pixel<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let pool = self.candidate_pool();
        if pool.is_empty() {
            if self.in_range() {
                return None;
            }
            return Some(self.range.nearest(self.current));
        }
        loop {
            let pick = pool[rng.gen_range(0..pool.len())];
            if pick != self.current {
                return Some(pick);
            }
        }
    }

    /// Base color with every channel nudged by up to `color_variation`, kept within `[1, 255]`.
    pub fn jitter_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        let v = i32::from(self.params.color_variation);
        let mut out = self.params.color.channels();
        for c in &mut out {
            let delta = rng.gen_range(-v..=v);
            *c = clamp_channel_i32(i32::from(*c) + delta, 1, 255);
        }
        Rgb::from_channels(out)
    }

    /// One move rendered over `duration_ms`. Returns the new pixel, or `None` if the soul
    /// had nowhere to go and held still for the duration instead.
    pub fn step<S, P, R>(
        &mut self,
        stage: &mut Stage<'_, S, P>,
        rng: &mut R,
        duration_ms: u64,
    ) -> GemResult<Option<usize>>
    where
        S: PixelSink + ?Sized,
        P: Pacer,
        R: Rng + ?Sized,
    {
        let Some(next) = self.select_next_pixel(rng) else {
            tracing::warn!(
                pixel = self.current,
                circumference = self.params.circumference,
                "soul has no reachable neighbors, holding position"
            );
            stage.fade.hold(duration_ms);
            return Ok(None);
        };

        let color = self.jitter_color(rng);
        // A soul on a reserved pixel was never shown there; that pixel stays dark.
        let (departing, vacated) = if self.in_range() {
            (color, stage.ambient)
        } else {
            (Rgb::OFF, Rgb::OFF)
        };
        tracing::debug!(from = self.current, to = next, ?color, duration_ms, "soul move");
        stage.fade.crossfade(
            &mut *stage.sink,
            &Crossfade {
                from: self.current,
                to: next,
                target: color,
                ambient: stage.ambient,
                departing,
                vacated,
                duration_ms,
                steps: stage.steps,
            },
        )?;
        self.current = next;
        Ok(Some(next))
    }

    /// A single slow move.
    pub fn drift<S, P, R>(
        &mut self,
        stage: &mut Stage<'_, S, P>,
        rng: &mut R,
        duration_ms: u64,
    ) -> GemResult<()>
    where
        S: PixelSink + ?Sized,
        P: Pacer,
        R: Rng + ?Sized,
    {
        self.step(stage, rng, duration_ms).map(|_| ())
    }

    /// `hops` quick consecutive moves.
    pub fn dart<S, P, R>(
        &mut self,
        stage: &mut Stage<'_, S, P>,
        rng: &mut R,
        hops: u32,
        step_ms: u64,
    ) -> GemResult<()>
    where
        S: PixelSink + ?Sized,
        P: Pacer,
        R: Rng + ?Sized,
    {
        for _ in 0..hops {
            self.step(stage, rng, step_ms)?;
        }
        Ok(())
    }

    fn in_range(&self) -> bool {
        i64::try_from(self.current).is_ok_and(|c| self.range.contains(c))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/soul.rs"]
mod tests;
