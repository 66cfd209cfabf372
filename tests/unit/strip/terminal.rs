use super::*;

#[test]
fn scroll_layout_writes_one_line_per_present() {
    let mut strip = TerminalStrip::new(Vec::new(), 2, TerminalLayout::Scroll);
    strip.set_pixel_color(1, Rgb::new(70, 0, 150)).unwrap();
    strip.present().unwrap();
    strip.present().unwrap();

    let out = String::from_utf8(strip.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "\x1b[48;2;0;0;0m  \x1b[48;2;70;0;150m  \x1b[0m"
    );
}

#[test]
fn inline_layout_returns_to_column_zero() {
    let mut strip = TerminalStrip::new(Vec::new(), 1, TerminalLayout::Inline);
    strip.set_pixel_color(0, Rgb::new(5, 0, 10)).unwrap();
    strip.present().unwrap();
    strip.present().unwrap();

    let out = String::from_utf8(strip.into_inner()).unwrap();
    let frame = "\x1b[1G\x1b[48;2;5;0;10m  \x1b[0m";
    assert_eq!(out, frame.repeat(2));
    assert!(!out.contains('\n'));
}

#[test]
fn out_of_range_write_fails() {
    let mut strip = TerminalStrip::new(Vec::new(), 1, TerminalLayout::Inline);
    assert!(strip.set_pixel_color(1, Rgb::OFF).is_err());
}

struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failures_surface_as_strip_errors() {
    let mut strip = TerminalStrip::new(BrokenPipe, 1, TerminalLayout::Scroll);
    let err = strip.present().unwrap_err();
    assert!(matches!(err, GemError::Sink(_)));
}
