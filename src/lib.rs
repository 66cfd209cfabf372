//! Soulgem drives procedural lighting on an addressable LED strip.
//!
//! The animation is chosen once at startup:
//!
//! - **Dance**: one or more souls wander over an ambient-lit strip. Each move picks a nearby
//!   pixel, jitters the soul's color and renders the handoff as a dual-pixel crossfade.
//! - **Cycle**: a traveling red/blue gradient derived from the bright color.
//! - **Chase**, **Breathe**, **Traverse**: single-light patterns confined to the usable range.
//!
//! The engine only talks to hardware through [`PixelSink`]. Frame pacing is a plain blocking
//! delay ([`Pacer`]), and randomness is an owned [`rand::Rng`], so both can be swapped for
//! deterministic stand-ins in tests.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod foundation;
mod gem;
mod strip;

pub use animation::fade::{Crossfade, FadeEngine};
pub use animation::pattern::{Breathe, Chase, Traverse};
pub use animation::soul::{Soul, SoulParams, Spawn, Stage};
pub use animation::wheel::{ColorWheel, WHEEL_PERIOD};
pub use foundation::color::{Rgb, clamp_channel, clamp_channel_i32, lerp_channels};
pub use foundation::error::{GemError, GemResult};
pub use foundation::pace::{Pacer, RecordingPacer, ThreadPacer, frame_interval};
pub use foundation::range::UsableRange;
pub use gem::config::{GemConfig, Mode};
pub use gem::scheduler::{Gem, StopHandle};
pub use strip::sink::{MemoryStrip, PixelSink, clear, fill};
pub use strip::terminal::{TerminalLayout, TerminalStrip};
