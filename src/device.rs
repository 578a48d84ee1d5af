//! The LED device: frame buffer plus transport handle.
//!
//! The lifecycle is encoded in the types:
//!
//! ```text
//! Device::new(config, transport)  ->  Device<T>      (constructed, not bound)
//! Device::initialize()            ->  LedStrip<T>    (bound, renderable)
//! LedStrip::finalize() / drop     ->  finalized      (every call fails)
//! ```
//!
//! A `Device` has no render methods at all, so rendering before init does
//! not compile. `initialize` consumes the `Device`, so it cannot run twice.
//!
//! ## Rust concepts
//! - Typestate: different types for different lifecycle stages
//! - `Drop` for guaranteed cleanup on every exit path
//! - `Vec::try_reserve_exact` to surface allocation failure as an error

use crate::error::{DeviceError, TransportOp};
use crate::gamma;
use crate::transport::Transport;
use crate::{Color, StripConfig};

/// A strip that has been configured but not yet bound to hardware.
pub struct Device<T: Transport> {
    config: StripConfig,
    frame: Vec<Color>,
    transport: T,
}

impl<T: Transport> Device<T> {
    /// Validate `config` and allocate a frame buffer for it.
    pub fn new(config: StripConfig, transport: T) -> Result<Self, DeviceError> {
        config.validate()?;

        let mut frame = Vec::new();
        frame
            .try_reserve_exact(config.pixel_count)
            .map_err(|_| DeviceError::Resource {
                pixel_count: config.pixel_count,
            })?;
        frame.resize(config.pixel_count, Color::BLACK);

        Ok(Self {
            config,
            frame,
            transport,
        })
    }

    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    /// Bind the transport to the GPIO/DMA hardware.
    ///
    /// On failure the transport is released before the error is returned,
    /// and the device is gone: there is no half-initialized strip to keep
    /// using.
    pub fn initialize(mut self) -> Result<LedStrip<T>, DeviceError> {
        if let Err(code) = self.transport.init(&self.config) {
            self.transport.fini();
            return Err(DeviceError::HardwareInit { code });
        }

        tracing::info!(
            "Strip initialized: {} pixels on GPIO {} (DMA {}, {} Hz, {:?})",
            self.config.pixel_count,
            self.config.gpio_pin,
            self.config.dma_channel,
            self.config.frequency,
            self.config.color_order
        );

        Ok(LedStrip {
            config: self.config,
            frame: self.frame,
            transport: self.transport,
            finalized: false,
        })
    }

    /// Release the transport without ever initializing it.
    pub fn finalize(mut self) {
        self.transport.fini();
    }
}

/// An initialized strip, ready to render frames.
///
/// Dropping the strip finalizes it if that has not happened already.
pub struct LedStrip<T: Transport> {
    config: StripConfig,
    frame: Vec<Color>,
    transport: T,
    finalized: bool,
}

impl<T: Transport> LedStrip<T> {
    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Number of pixels on the strip.
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The frame buffer as it will be sent, gamma corrected.
    pub fn frame(&self) -> &[Color] {
        &self.frame
    }

    /// The gamma-corrected colour at `index`, if it exists.
    pub fn pixel(&self, index: usize) -> Option<Color> {
        self.frame.get(index).copied()
    }

    fn ensure_live(&self) -> Result<(), DeviceError> {
        if self.finalized {
            return Err(DeviceError::Finalized);
        }
        Ok(())
    }

    /// Gamma-correct `color` and store it at `index`.
    pub fn set_pixel(&mut self, index: usize, color: Color) -> Result<(), DeviceError> {
        self.ensure_live()?;
        let len = self.frame.len();
        let slot = self
            .frame
            .get_mut(index)
            .ok_or(DeviceError::Index { index, len })?;
        *slot = gamma::correct(color);
        Ok(())
    }

    /// Gamma-correct and store `color` if `index` is on the strip and the
    /// strip is live; otherwise do nothing.
    pub(crate) fn paint_pixel(&mut self, index: usize, color: Color) {
        if self.finalized {
            return;
        }
        if let Some(slot) = self.frame.get_mut(index) {
            *slot = gamma::correct(color);
        }
    }

    /// Replace the whole frame. `colors` must have exactly one entry per pixel.
    pub fn set_all(&mut self, colors: &[Color]) -> Result<(), DeviceError> {
        self.ensure_live()?;
        if colors.len() != self.frame.len() {
            return Err(DeviceError::LengthMismatch {
                expected: self.frame.len(),
                actual: colors.len(),
            });
        }
        for (slot, &color) in self.frame.iter_mut().zip(colors) {
            *slot = gamma::correct(color);
        }
        Ok(())
    }

    /// Set every pixel to black. Takes effect on the next render.
    pub fn clear(&mut self) -> Result<(), DeviceError> {
        self.ensure_live()?;
        self.frame.fill(Color::BLACK);
        Ok(())
    }

    /// Submit the current frame to the transport.
    pub fn render(&mut self) -> Result<(), DeviceError> {
        self.ensure_live()?;
        self.transport
            .render(&self.frame)
            .map_err(|code| DeviceError::Transport {
                op: TransportOp::Render,
                code,
            })
    }

    /// Block until the previous render has been shifted out.
    pub fn wait(&mut self) -> Result<(), DeviceError> {
        self.ensure_live()?;
        self.transport.wait().map_err(|code| DeviceError::Transport {
            op: TransportOp::Wait,
            code,
        })
    }

    /// Render, then wait for the frame to finish transmitting.
    pub fn show(&mut self) -> Result<(), DeviceError> {
        self.render()?;
        self.wait()
    }

    /// Release the transport. Later calls are no-ops; every other method
    /// returns [`DeviceError::Finalized`] afterwards.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.transport.fini();
        self.finalized = true;
        tracing::info!("Strip finalized");
    }
}

impl<T: Transport> Drop for LedStrip<T> {
    fn drop(&mut self) {
        if !self.finalized {
            tracing::warn!("Strip dropped without finalize; releasing transport");
            self.finalize();
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
