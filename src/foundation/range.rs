use crate::foundation::error::{GemError, GemResult};

/// Contiguous pixel span `[offset, strip_len)` that souls may occupy.
///
/// Leading pixels below `offset` are reserved for wiring and mounting and are never
/// chosen as move targets. A range always holds at least one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UsableRange {
    /// First usable pixel.
    pub offset: usize,
    /// One past the last usable pixel; equals the strip length.
    pub end: usize,
}

impl UsableRange {
    /// Validated constructor; `offset >= strip_len` would leave nothing to light.
    pub fn new(offset: usize, strip_len: usize) -> GemResult<Self> {
        if offset >= strip_len {
            return Err(GemError::validation(format!(
                "usable range is empty: offset {offset} must be < strip length {strip_len}"
            )));
        }
        Ok(Self {
            offset,
            end: strip_len,
        })
    }

    /// Number of usable pixels (never zero).
    pub fn width(self) -> usize {
        self.end - self.offset
    }

    /// Total pixels on the strip, reserved ones included.
    pub fn strip_len(self) -> usize {
        self.end
    }

    /// Accepts signed input so neighbor arithmetic can go below zero without wrapping.
    pub fn contains(self, pixel: i64) -> bool {
        usize::try_from(pixel).is_ok_and(|p| self.offset <= p && p < self.end)
    }

    /// The usable pixel closest to `pixel`.
    pub fn nearest(self, pixel: usize) -> usize {
        pixel.clamp(self.offset, self.end - 1)
    }

    /// Pixel in the middle of the range, rounding down.
    pub fn middle(self) -> usize {
        self.offset + (self.width() - 1) / 2
    }

    /// Usable pixel indices in ascending order.
    pub fn iter(self) -> std::ops::Range<usize> {
        self.offset..self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/range.rs"]
mod tests;
