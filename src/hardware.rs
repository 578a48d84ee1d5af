//! Real strip output through the rpi_ws281x C library.
//!
//! `rs_ws281x` wraps `ws2811_init`/`render`/`wait`/`fini`. Building the
//! controller performs the init, and dropping it performs the fini, so the
//! controller only exists between [`Transport::init`] and [`Transport::fini`].
//!
//! Only channel 0 is used; multi-channel setups are not supported.

use crate::transport::{Status, Transport};
use crate::{Color, ColorOrder, StripConfig};
use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, StripType, WS2811Error};

const CHANNEL: usize = 0;

/// Transport backed by the Pi's PWM/PCM/SPI peripheral and a DMA channel.
#[derive(Default)]
pub struct Ws281xTransport {
    controller: Option<Controller>,
}

impl Ws281xTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

fn strip_type(order: ColorOrder) -> StripType {
    match order {
        ColorOrder::Rgb => StripType::Ws2811Rgb,
        ColorOrder::Rbg => StripType::Ws2811Rbg,
        ColorOrder::Grb => StripType::Ws2811Grb,
        ColorOrder::Gbr => StripType::Ws2811Gbr,
        ColorOrder::Brg => StripType::Ws2811Brg,
        ColorOrder::Bgr => StripType::Ws2811Bgr,
    }
}

/// The `ws2811_return_t` value behind each error variant.
fn status(err: WS2811Error) -> Status {
    match err {
        WS2811Error::Generic => -1,
        WS2811Error::OutOfMemory => -2,
        WS2811Error::HwNotSupported => -3,
        WS2811Error::MemLock => -4,
        WS2811Error::Mmap => -5,
        WS2811Error::MapRegisters => -6,
        WS2811Error::GpioInit => -7,
        WS2811Error::PwmSetup => -8,
        WS2811Error::MailboxDevice => -9,
        WS2811Error::Dma => -10,
        WS2811Error::IllegalGpio => -11,
        WS2811Error::PcmSetup => -12,
        WS2811Error::SpiSetup => -13,
        WS2811Error::SpiTransfer => -14,
    }
}

impl Transport for Ws281xTransport {
    fn init(&mut self, config: &StripConfig) -> Result<(), Status> {
        let count = i32::try_from(config.pixel_count)
            .map_err(|_| status(WS2811Error::OutOfMemory))?;
        let channel = ChannelBuilder::new()
            .pin(config.gpio_pin)
            .count(count)
            .strip_type(strip_type(config.color_order))
            .brightness(config.brightness)
            .invert(config.invert_signal)
            .build();

        let controller = ControllerBuilder::new()
            .freq(config.frequency)
            .dma(config.dma_channel)
            .channel(CHANNEL, channel)
            .build()
            .map_err(|e| {
                tracing::debug!("ws2811_init failed: {:?}", e);
                status(e)
            })?;

        self.controller = Some(controller);
        Ok(())
    }

    fn render(&mut self, frame: &[Color]) -> Result<(), Status> {
        let controller = self.controller.as_mut().ok_or(status(WS2811Error::Generic))?;
        // The driver stores each LED as a native-endian 0xWWRRGGBB word.
        for (led, color) in controller.leds_mut(CHANNEL).iter_mut().zip(frame) {
            *led = color.packed().to_ne_bytes();
        }
        controller.render().map_err(status)
    }

    fn wait(&mut self) -> Result<(), Status> {
        let controller = self.controller.as_mut().ok_or(status(WS2811Error::Generic))?;
        controller.wait().map_err(status)
    }

    fn fini(&mut self) {
        // Dropping the controller calls ws2811_fini.
        self.controller.take();
    }
}
