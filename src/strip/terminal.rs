use std::io::Write;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};

use crate::foundation::color::Rgb;
use crate::foundation::error::{GemError, GemResult};
use crate::strip::sink::PixelSink;

/// How each presented frame is laid out on the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TerminalLayout {
    /// Redraw the same line in place from column 0.
    #[default]
    Inline,
    /// One line per frame. Handy when piping to a file.
    Scroll,
}

/// Simulated strip that paints each pixel as a two-column truecolor cell.
pub struct TerminalStrip<W: Write> {
    out: W,
    pixels: Vec<Rgb>,
    layout: TerminalLayout,
}

impl<W: Write> TerminalStrip<W> {
    /// A dark strip of `len` pixels drawing to `out`.
    pub fn new(out: W, len: usize, layout: TerminalLayout) -> Self {
        Self {
            out,
            pixels: vec![Rgb::OFF; len],
            layout,
        }
    }

    /// Give back the writer, e.g. to finish the inline line.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn queue_frame(&mut self) -> std::io::Result<()> {
        if self.layout == TerminalLayout::Inline {
            queue!(self.out, cursor::MoveToColumn(0))?;
        }
        for px in &self.pixels {
            queue!(
                self.out,
                SetBackgroundColor(Color::Rgb {
                    r: px.r,
                    g: px.g,
                    b: px.b
                }),
                Print("  ")
            )?;
        }
        queue!(self.out, ResetColor)?;
        if self.layout == TerminalLayout::Scroll {
            queue!(self.out, Print('\n'))?;
        }
        Ok(())
    }
}

impl<W: Write> PixelSink for TerminalStrip<W> {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn initialize(&mut self) -> GemResult<()> {
        tracing::debug!(pixels = self.pixels.len(), layout = ?self.layout, "terminal strip ready");
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
        self.queue_frame()?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/terminal.rs"]
mod tests;
