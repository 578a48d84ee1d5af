//! The boundary between the frame engine and the hardware that shifts bits
//! onto the strip's data line.
//!
//! A [`Transport`] is deliberately narrow: bind, submit a frame, wait for it
//! to finish, release. Status codes are opaque `i32`s passed through to the
//! caller untouched.

use crate::{Color, StripConfig};
use std::thread;
use std::time::Duration;

/// Opaque status code reported by a transport (non-zero means failure).
pub type Status = i32;

/// Reset/latch time the strip needs after the last bit of a frame.
pub const LATCH_TIME: Duration = Duration::from_micros(50);

/// Hardware (or simulated) frame transmission.
///
/// # Rust concept: traits as seams
/// The device is generic over `T: Transport`, so tests swap in a scripted
/// fake and hosts without a Pi use [`SimulatedTransport`], with no change
/// to the device or animation code.
pub trait Transport {
    /// Bind to the GPIO/DMA resources described by `config`.
    fn init(&mut self, config: &StripConfig) -> Result<(), Status>;

    /// Submit one full frame for transmission. `frame` is already gamma corrected.
    fn render(&mut self, frame: &[Color]) -> Result<(), Status>;

    /// Block until the last submitted frame has been shifted out.
    fn wait(&mut self) -> Result<(), Status>;

    /// Release hardware bindings. Must tolerate being called more than once.
    fn fini(&mut self);
}

/// How long one frame takes on the wire: 24 bits per pixel at the signal
/// frequency, plus the latch time.
pub fn frame_duration(config: &StripConfig) -> Duration {
    if config.frequency == 0 {
        return LATCH_TIME;
    }
    let bits = config.pixel_count as u64 * 8 * 3;
    let nanos = bits * 1_000_000_000 / u64::from(config.frequency);
    Duration::from_nanos(nanos) + LATCH_TIME
}

// ── Simulated transport ──────────────────────────────────────────────

/// A transport with no hardware behind it.
///
/// Keeps the most recent frame and a count of submitted frames. With pacing
/// enabled, `wait` sleeps for [`frame_duration`] so animations run at the
/// same speed as on a real strip.
#[derive(Debug, Default)]
pub struct SimulatedTransport {
    pace: bool,
    bound: bool,
    frame_time: Duration,
    pending: bool,
    frames_rendered: usize,
    last_frame: Vec<Color>,
}

impl SimulatedTransport {
    /// A transport that returns from `wait` immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose `wait` takes as long as the real wire would.
    pub fn paced() -> Self {
        Self {
            pace: true,
            ..Self::default()
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    /// The most recently submitted frame.
    pub fn last_frame(&self) -> &[Color] {
        &self.last_frame
    }
}

impl Transport for SimulatedTransport {
    fn init(&mut self, config: &StripConfig) -> Result<(), Status> {
        self.frame_time = frame_duration(config);
        self.bound = true;
        tracing::debug!(
            "Simulated strip bound: {} pixels, {:?} per frame",
            config.pixel_count,
            self.frame_time
        );
        Ok(())
    }

    fn render(&mut self, frame: &[Color]) -> Result<(), Status> {
        if !self.bound {
            // WS2811_ERROR_GENERIC
            return Err(-1);
        }
        self.last_frame.clear();
        self.last_frame.extend_from_slice(frame);
        self.frames_rendered += 1;
        self.pending = true;
        Ok(())
    }

    fn wait(&mut self) -> Result<(), Status> {
        if self.pending && self.pace {
            thread::sleep(self.frame_time);
        }
        self.pending = false;
        Ok(())
    }

    fn fini(&mut self) {
        self.bound = false;
        self.pending = false;
    }
}

// ── Test transport ───────────────────────────────────────────────────


// ── Tests ────────────────────────────────────────────────────────────
