//! Frame and animation engine for WS281x ("NeoPixel") LED strips.
//!
//! This crate provides:
//! - A packed 32-bit colour type and the gamma table applied to it
//! - Strip configuration, including optional concentric ring layouts
//! - A typestate [`device::Device`] / [`device::LedStrip`] pair that owns the
//!   frame buffer and the transport handle
//! - The classic strand-test animations (wipe, theater chase, rainbow,
//!   rainbow cycle, chase rainbow) plus a ring-by-ring wipe
//!
//! The bit-level transmission lives behind the [`transport::Transport`]
//! trait. With the `hardware` feature, [`hardware::Ws281xTransport`] drives a
//! real strip through the rpi_ws281x library; without it, everything runs
//! against [`transport::SimulatedTransport`].

pub mod animation;
pub mod device;
pub mod error;
pub mod gamma;
#[cfg(feature = "hardware")]
pub mod hardware;
pub mod transport;

pub use error::{ConfigError, DeviceError, TransportOp};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Color ──────────────────────────────────────────────────────────

/// A colour packed the way the ws2811 driver stores it: `0xWWRRGGBB`.
///
/// The white byte is always zero here; RGBW strips are not supported.
///
/// # Rust concept: newtypes
/// Wrapping the `u32` in a tuple struct gives it its own type, so a raw
/// integer can't be passed where a colour is expected by accident. With
/// `#[repr(transparent)]` the wrapper has exactly the layout of a `u32`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build a colour from integer channels, clamping each to 0-255.
    ///
    /// Clamping keeps an out-of-range value from bleeding into the
    /// neighbouring channel the way a plain shift would.
    pub fn clamped(r: i32, g: i32, b: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        Self::new(clamp(r), clamp(g), clamp(b))
    }

    pub const fn from_packed(value: u32) -> Self {
        Self(value)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Split into `(red, green, blue)`.
    pub const fn channels(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }

    pub const fn is_black(self) -> bool {
        self.0 & 0x00FF_FFFF == 0
    }
}

/// Create a Color from RGB values.
pub fn color(r: u8, g: u8, b: u8) -> Color {
    Color::new(r, g, b)
}

// ── Strip configuration ────────────────────────────────────────────

/// Channel order the strip expects on the wire.
///
/// The discriminants are the rpi_ws281x `WS2811_STRIP_*` constants: each
/// byte gives the bit shift for one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOrder {
    Rgb,
    Rbg,
    #[default]
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl ColorOrder {
    /// The `strip_type` value understood by the ws2811 driver.
    pub const fn strip_type(self) -> u32 {
        match self {
            ColorOrder::Rgb => 0x0010_0800,
            ColorOrder::Rbg => 0x0010_0008,
            ColorOrder::Grb => 0x0008_1000,
            ColorOrder::Gbr => 0x0008_0010,
            ColorOrder::Brg => 0x0000_1008,
            ColorOrder::Bgr => 0x0000_0810,
        }
    }
}

impl std::str::FromStr for ColorOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorOrder::Rgb),
            "rbg" => Ok(ColorOrder::Rbg),
            "grb" => Ok(ColorOrder::Grb),
            "gbr" => Ok(ColorOrder::Gbr),
            "brg" => Ok(ColorOrder::Brg),
            "bgr" => Ok(ColorOrder::Bgr),
            other => Err(format!("unknown color order '{other}'")),
        }
    }
}

/// Direction in which a [`RingLayout`] lists its rings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingOrder {
    #[default]
    InnerToOuter,
    OuterToInner,
}

/// Physical grouping of pixels into concentric rings.
///
/// Each ring is an ordered list of pixel indices. Together the rings must
/// cover every pixel exactly once (checked by [`StripConfig::validate`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingLayout {
    pub rings: Vec<Vec<usize>>,
    #[serde(default)]
    pub order: RingOrder,
}

impl RingLayout {
    pub fn new(rings: Vec<Vec<usize>>, order: RingOrder) -> Self {
        Self { rings, order }
    }

    /// The 93-LED, six-ring WS2812 5050 board from Mokungit.
    ///
    /// Pixel 92 is the centre; pixel 0 starts the outermost ring of 32.
    pub fn mokungit_93() -> Self {
        let sizes = [1, 8, 12, 16, 24, 32];
        let mut next = 93;
        let rings = sizes
            .iter()
            .map(|&size| {
                let ring: Vec<usize> = (next - size..next).rev().collect();
                next -= size;
                ring
            })
            .collect();
        Self::new(rings, RingOrder::InnerToOuter)
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Total number of pixels listed across all rings.
    pub fn pixel_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Rings ordered from the innermost outward, whatever the stored order.
    pub fn inner_to_outer(&self) -> impl Iterator<Item = &[usize]> {
        let reverse = self.order == RingOrder::OuterToInner;
        let len = self.rings.len();
        (0..len).map(move |i| {
            let idx = if reverse { len - 1 - i } else { i };
            self.rings[idx].as_slice()
        })
    }

    /// Check that the rings partition exactly `pixel_count` pixels.
    pub fn validate(&self, pixel_count: usize) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(pixel_count);
        for &index in self.rings.iter().flatten() {
            if index >= pixel_count {
                return Err(ConfigError::RingIndexOutOfRange { index, pixel_count });
            }
            if !seen.insert(index) {
                return Err(ConfigError::RingIndexRepeated { index });
            }
        }
        if seen.len() != pixel_count {
            return Err(ConfigError::RingCoverage {
                covered: seen.len(),
                pixel_count,
            });
        }
        Ok(())
    }
}

/// Strip and driver parameters. Fixed once a [`device::Device`] is built.
///
/// # Rust concept: serde defaults
/// `#[serde(default)]` on the struct fills any field missing from the JSON
/// with the value from `Default::default()`, so a config file only needs to
/// list what differs from the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Signal rate in Hz; 800 kHz for WS2812, 400 kHz for older WS2811.
    pub frequency: u32,
    pub dma_channel: i32,
    pub gpio_pin: i32,
    pub pixel_count: usize,
    /// Global brightness applied by the driver (0-255).
    pub brightness: u8,
    pub color_order: ColorOrder,
    pub invert_signal: bool,
    pub ring_layout: Option<RingLayout>,
}

impl StripConfig {
    pub const DEFAULT_FREQUENCY: u32 = 800_000;
    pub const DEFAULT_DMA_CHANNEL: i32 = 5;

    pub fn new(gpio_pin: i32, pixel_count: usize) -> Self {
        Self {
            gpio_pin,
            pixel_count,
            ..Self::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_count == 0 {
            return Err(ConfigError::ZeroPixels);
        }
        if self.frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if let Some(layout) = &self.ring_layout {
            layout.validate(self.pixel_count)?;
        }
        Ok(())
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
            dma_channel: Self::DEFAULT_DMA_CHANNEL,
            gpio_pin: 17,
            pixel_count: 93,
            brightness: 255,
            color_order: ColorOrder::Grb,
            invert_signal: false,
            ring_layout: None,
        }
    }
}

// ── Shutdown signal ────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// Animations poll this flag between frames (see
/// [`animation::play_while`]) so the strip can be cleared before exit.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared between the animation loop and the signal handler.
/// `Arc` gives both of them ownership; `AtomicBool` makes the read and
/// write safe without a mutex.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
