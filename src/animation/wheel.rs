use crate::foundation::color::{Rgb, clamp_channel_i32};

/// Number of wheel positions; phases wrap modulo this.
pub const WHEEL_PERIOD: usize = 128;
const HALF: usize = WHEEL_PERIOD / 2;

/// Red/blue hue sway around a third of the bright color.
///
/// The first half of the wheel shifts weight from red to blue, the second half shifts it back,
/// so walking the whole period traces a closed arc. Green is always off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorWheel {
    base_r: i32,
    base_b: i32,
    variation: i32,
}

impl ColorWheel {
    /// Sway amplitude used when the config does not set one.
    pub const DEFAULT_VARIATION: u8 = 10;

    /// Wheel centered on a third of `bright`'s red and blue, swaying by `variation`.
    pub fn new(bright: Rgb, variation: u8) -> Self {
        Self {
            base_r: i32::from(bright.r) / 3,
            base_b: i32::from(bright.b) / 3,
            variation: i32::from(variation),
        }
    }

    /// Color at `phase`, taken modulo [`WHEEL_PERIOD`].
    pub fn color_at(&self, phase: usize) -> Rgb {
        let phase = phase % WHEEL_PERIOD;
        let (p, toward_blue) = if phase < HALF {
            (phase, true)
        } else {
            (phase - HALF, false)
        };

        // Offset sweeps +variation .. -variation across one half.
        let span = 2 * self.variation;
        let sweep = self.variation - (span * p as i32) / (HALF as i32 - 1);
        let (dr, db) = if toward_blue {
            (sweep, -sweep)
        } else {
            (-sweep, sweep)
        };

        Rgb::new(
            clamp_channel_i32(self.base_r + dr, 0, 255),
            0,
            clamp_channel_i32(self.base_b + db, 0, 255),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/wheel.rs"]
mod tests;
