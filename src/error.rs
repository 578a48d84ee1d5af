//! Error types for configuration and device operations.
//!
//! Transport status codes are opaque integers from the rpi_ws281x C library
//! (`ws2811_return_t`). They are carried through unmodified so callers can
//! look them up in `ws2811.h`.

use std::fmt;
use std::path::PathBuf;

/// Which transport call reported a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportOp {
    Render,
    Wait,
}

impl fmt::Display for TransportOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportOp::Render => f.write_str("render"),
            TransportOp::Wait => f.write_str("wait"),
        }
    }
}

/// Errors produced by [`crate::StripConfig`] validation and loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("pixel count must be greater than zero")]
    ZeroPixels,

    #[error("signal frequency must be greater than zero")]
    ZeroFrequency,

    #[error("ring layout references pixel {index}, but the strip has {pixel_count} pixels")]
    RingIndexOutOfRange { index: usize, pixel_count: usize },

    #[error("ring layout lists pixel {index} more than once")]
    RingIndexRepeated { index: usize },

    #[error("ring layout covers {covered} of {pixel_count} pixels")]
    RingCoverage { covered: usize, pixel_count: usize },

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced by [`crate::device::Device`] and [`crate::device::LedStrip`].
///
/// # Rust concept: enums as error taxonomies
/// Each failure mode is its own variant, so callers can `match` on exactly
/// the cases they care about. `thiserror` writes the `Display` and
/// `std::error::Error` impls from the `#[error(...)]` attributes.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("unable to allocate a frame buffer for {pixel_count} pixels")]
    Resource { pixel_count: usize },

    #[error("invalid strip configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("ws2811 init failed with status {code}")]
    HardwareInit { code: i32 },

    #[error("ws2811 {op} failed with status {code}")]
    Transport { op: TransportOp, code: i32 },

    #[error("pixel index {index} is out of range for a {len}-pixel strip")]
    Index { index: usize, len: usize },

    #[error("expected {expected} colors, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("device has been finalized")]
    Finalized,
}
