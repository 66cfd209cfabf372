use std::io::Read;
use std::path::Path;

use crate::animation::soul::{SoulParams, Spawn};
use crate::animation::wheel::ColorWheel;
use crate::foundation::color::Rgb;
use crate::foundation::error::{GemError, GemResult};
use crate::foundation::range::UsableRange;

/// Animation selected once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Souls wander over an ambient-lit strip.
    #[default]
    Dance,
    /// Traveling color-wheel gradient over the whole usable range.
    Cycle,
    /// A single lit pixel running across the usable range.
    Chase,
    /// One pixel breathing in and out.
    Breathe,
    /// The bright color crossfading pixel by pixel to the strip end and back.
    Traverse,
}

/// Full gem configuration. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GemConfig {
    /// Pixels on the strip.
    pub strip_len: usize,
    /// Leading pixels reserved for wiring; never lit by any animation.
    pub offset: usize,
    /// Animation to run.
    pub mode: Mode,
    /// Souls in dance mode.
    pub souls: usize,
    /// Soul base color, wheel baseline and pattern color.
    pub bright_color: Rgb,
    /// Resting color of usable pixels in dance mode.
    pub ambient_color: Rgb,
    /// Per-channel jitter bound for soul colors.
    pub color_variation: u16,
    /// Neighbor search radius.
    pub circumference: usize,
    /// Duration of a single drift.
    pub drift_ms: u64,
    /// Moves per dart.
    pub dart_hops: u32,
    /// Duration of each dart hop.
    pub dart_ms: u64,
    /// One in `dart_odds` rolls darts; the rest drift.
    pub dart_odds: u32,
    /// Frames per crossfade.
    pub fade_steps: u32,
    /// ColorWheel amplitude.
    pub wheel_variation: u8,
    /// Delay per wheel frame.
    pub wheel_frame_ms: u64,
    /// Upper bound of the random rest after each wheel turn.
    pub wheel_pause_max_ms: u64,
    /// Delay per chase position.
    pub chase_ms: u64,
    /// Chase from the strip end back toward the offset.
    pub chase_reverse: bool,
    /// Pixel that breathes; the middle of the usable range when unset.
    pub breathe_pixel: Option<usize>,
    /// Frames per half breath.
    pub breathe_steps: u32,
    /// Delay per breathe frame.
    pub breathe_ms: u64,
    /// Crossfade duration per traverse hop.
    pub traverse_ms: u64,
    /// RNG seed; OS entropy when unset.
    pub seed: Option<u64>,
    /// Initial soul placement.
    pub spawn: Spawn,
}

impl Default for GemConfig {
    fn default() -> Self {
        Self {
            strip_len: 60,
            offset: 10,
            mode: Mode::Dance,
            souls: 1,
            bright_color: Rgb::new(70, 0, 150),
            ambient_color: Rgb::new(5, 0, 10),
            color_variation: 5,
            circumference: 5,
            drift_ms: 5000,
            dart_hops: 3,
            dart_ms: 750,
            dart_odds: 6,
            fade_steps: 60,
            wheel_variation: ColorWheel::DEFAULT_VARIATION,
            wheel_frame_ms: 20,
            wheel_pause_max_ms: 1000,
            chase_ms: 50,
            chase_reverse: false,
            breathe_pixel: None,
            breathe_steps: 20,
            breathe_ms: 200,
            traverse_ms: 1000,
            seed: None,
            spawn: Spawn::FullStrip,
        }
    }
}

impl GemConfig {
    /// Parse JSON and validate it.
    pub fn from_reader<R: Read>(reader: R) -> GemResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| GemError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: &Path) -> GemResult<Self> {
        let f = std::fs::File::open(path).map_err(|e| {
            GemError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Reject configurations the animation loop cannot run.
    pub fn validate(&self) -> GemResult<()> {
        let range = UsableRange::new(self.offset, self.strip_len)?;
        if self.souls == 0 {
            return Err(GemError::validation("souls must be > 0"));
        }
        if self.fade_steps == 0 {
            return Err(GemError::validation("fade_steps must be > 0"));
        }
        if self.dart_odds == 0 {
            return Err(GemError::validation("dart_odds must be > 0"));
        }
        if self.dart_hops == 0 {
            return Err(GemError::validation("dart_hops must be > 0"));
        }
        if self.breathe_steps == 0 {
            return Err(GemError::validation("breathe_steps must be > 0"));
        }
        if let Some(pixel) = self.breathe_pixel
            && !range.iter().contains(&pixel)
        {
            return Err(GemError::validation(format!(
                "breathe_pixel {pixel} is outside the usable range {}..{}",
                range.offset, range.end
            )));
        }
        Ok(())
    }

    /// `[offset, strip_len)`.
    pub fn usable_range(&self) -> GemResult<UsableRange> {
        UsableRange::new(self.offset, self.strip_len)
    }

    /// Look and reach shared by every soul.
    pub fn soul_params(&self) -> SoulParams {
        SoulParams {
            color: self.bright_color,
            color_variation: self.color_variation,
            circumference: self.circumference,
        }
    }

    /// Wheel for cycle mode.
    pub fn wheel(&self) -> ColorWheel {
        ColorWheel::new(self.bright_color, self.wheel_variation)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gem/config.rs"]
mod tests;
