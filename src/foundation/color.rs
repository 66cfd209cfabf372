use serde::{Deserialize, Serialize};

/// Straight 8-bit RGB, the only color format the strip understands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// All channels zero.
    pub const OFF: Self = Self::new(0, 0, 0);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from an `[r, g, b]` array.
    pub fn from_channels([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }

    /// Channels as `[r, g, b]`.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear blend from `self` (`t = 0`) to `other` (`t = 1`).
    ///
    /// Channels are computed in `f64` and only clamped/rounded on the way out.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let [r, g, b] = lerp_channels(self.channels(), other.channels(), t);
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    /// Largest per-channel absolute difference.
    pub fn distance(self, other: Self) -> u8 {
        self.channels()
            .into_iter()
            .zip(other.channels())
            .map(|(a, b)| a.abs_diff(b))
            .max()
            .unwrap_or(0)
    }
}

/// Unclamped per-channel `from + (to - from) * t`.
pub fn lerp_channels(from: [u8; 3], to: [u8; 3], t: f64) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let a = f64::from(from[c]);
        let b = f64::from(to[c]);
        *slot = a + (b - a) * t;
    }
    out
}

/// Round and clamp a real-valued channel into `[0, 255]`. Non-finite input maps to 0.
pub fn clamp_channel(v: f64) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Clamp an integer channel into `[lo, hi]`.
pub fn clamp_channel_i32(v: i32, lo: u8, hi: u8) -> u8 {
    v.clamp(i32::from(lo), i32::from(hi)) as u8
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.channels().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj { r: i64, g: i64, b: i64 },
            Arr(Vec<i64>),
        }

        fn from_ints(r: i64, g: i64, b: i64) -> Result<Rgb, String> {
            fn channel(v: i64) -> Result<u8, String> {
                u8::try_from(v).map_err(|_| format!("color channel {v} is outside 0..=255"))
            }
            Ok(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
        }

        let parsed = match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s),
            Repr::Obj { r, g, b } => from_ints(r, g, b),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => from_ints(*r, *g, *b),
                _ => Err("rgb array must have len 3 ([r,g,b])".to_owned()),
            },
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> Result<Rgb, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }

    Ok(Rgb::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
