use crate::foundation::color::Rgb;
use crate::foundation::error::{GemError, GemResult};

/// Addressable pixel buffer the animation engine draws into.
///
/// Ordering contract: writes are buffered until [`PixelSink::present`], which must make every
/// prior [`PixelSink::set_pixel_color`] visible at once. The engine only ever calls
/// `set_pixel_color` with `index < pixel_count()`.
pub trait PixelSink {
    /// Total addressable pixels.
    fn pixel_count(&self) -> usize;
    /// One-time setup, called before the animation loop begins.
    fn initialize(&mut self) -> GemResult<()>;
    /// Buffer a color write.
    fn set_pixel_color(&mut self, index: usize, color: Rgb) -> GemResult<()>;
    /// Flush buffered writes to the display. May block on hardware timing.
    fn present(&mut self) -> GemResult<()>;
}

impl<S: PixelSink + ?Sized> PixelSink for &mut S {
    fn pixel_count(&self) -> usize {
        (**self).pixel_count()
    }

    fn initialize(&mut self) -> GemResult<()> {
        (**self).initialize()
    }

    fn set_pixel_color(&mut self, index: usize, color: Rgb) -> GemResult<()> {
        (**self).set_pixel_color(index, color)
    }

    fn present(&mut self) -> GemResult<()> {
        (**self).present()
    }
}

impl<S: PixelSink + ?Sized> PixelSink for Box<S> {
    fn pixel_count(&self) -> usize {
        (**self).pixel_count()
    }

    fn initialize(&mut self) -> GemResult<()> {
        (**self).initialize()
    }

    fn set_pixel_color(&mut self, index: usize, color: Rgb) -> GemResult<()> {
        (**self).set_pixel_color(index, color)
    }

    fn present(&mut self) -> GemResult<()> {
        (**self).present()
    }
}

/// Write `color` to every pixel in `pixels` and present once.
pub fn fill<S, I>(sink: &mut S, pixels: I, color: Rgb) -> GemResult<()>
where
    S: PixelSink + ?Sized,
    I: IntoIterator<Item = usize>,
{
    for i in pixels {
        sink.set_pixel_color(i, color)?;
    }
    sink.present()
}

/// Turn the whole strip off, reserved pixels included.
pub fn clear<S: PixelSink + ?Sized>(sink: &mut S) -> GemResult<()> {
    let n = sink.pixel_count();
    fill(sink, 0..n, Rgb::OFF)
}

/// In-memory strip for tests, dry runs and debugging.
#[derive(Clone, Debug)]
pub struct MemoryStrip {
    pixels: Vec<Rgb>,
    history: Option<Vec<Vec<Rgb>>>,
    presents: u64,
    initialized: bool,
}

impl MemoryStrip {
    /// Create a strip that keeps every presented frame.
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::OFF; len],
            history: Some(Vec::new()),
            presents: 0,
            initialized: false,
        }
    }

    /// Create a strip that only counts presents. Suitable for long unattended runs.
    pub fn without_history(len: usize) -> Self {
        Self {
            history: None,
            ..Self::new(len)
        }
    }

    /// Current (possibly not yet presented) buffer contents.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Buffered color of one pixel, `None` past the end.
    pub fn pixel(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    /// Presented frames in order. Empty when created with [`MemoryStrip::without_history`].
    pub fn frames(&self) -> &[Vec<Rgb>] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// Number of presents so far.
    pub fn present_count(&self) -> u64 {
        self.presents
    }

    /// Whether [`PixelSink::initialize`] has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl PixelSink for MemoryStrip {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn initialize(&mut self) -> GemResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn set_pixel_color(&mut self, index: usize, color: Rgb) -> GemResult<()> {
        let len = self.pixels.len();
        let slot = self
            .pixels
            .get_mut(index)
            .ok_or_else(|| GemError::sink(format!("pixel {index} out of range (len {len})")))?;
        *slot = color;
        Ok(())
    }

    fn present(&mut self) -> GemResult<()> {
        self.presents += 1;
        if let Some(history) = self.history.as_mut() {
            history.push(self.pixels.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/sink.rs"]
mod tests;
