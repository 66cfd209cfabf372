use std::time::Duration;

/// Blocking frame delay between strip writes.
///
/// Animation pacing is nothing more than a sequence of these pauses; there is no timer
/// or event loop behind it.
pub trait Pacer {
    /// Block for `d`.
    fn pause(&mut self, d: Duration);
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self, d: Duration) {
        (**self).pause(d);
    }
}

/// Sleeps the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// Records requested pauses without sleeping. Used by tests and dry runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingPacer {
    pauses: Vec<Duration>,
}

impl RecordingPacer {
    /// Pacer with no pauses recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested pause, in order.
    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }

    /// Sum of all requested pauses.
    pub fn total(&self) -> Duration {
        self.pauses.iter().sum()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, d: Duration) {
        self.pauses.push(d);
    }
}

/// Split `total_ms` into `steps` equal frame intervals.
pub fn frame_interval(total_ms: u64, steps: u32) -> Duration {
    if steps == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(total_ms) / steps
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pace.rs"]
mod tests;
