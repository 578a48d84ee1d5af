//! # Pulsing Colors Demo
//!
//! Fills the whole strip with one colour that drifts around the colour
//! wheel while its intensity pulses up and down, until Ctrl+C.
//!
//! Shows how to write your own [`Animation`]: `paint` gets the frame number
//! and returns the pause after it, and the library does the rendering,
//! waiting and gamma correction.
//!
//! ## Run it
//! ```sh
//! cargo run --example pulse                               # simulated
//! cargo build --release --features hardware --example pulse
//! sudo ./target/release/examples/pulse
//! ```

use std::time::Duration;
use ws281x_strip::animation::{self, Animation, Canvas, wheel};
use ws281x_strip::device::Device;
use ws281x_strip::{Color, StripConfig, is_running, setup_signal_handler};

/// One hue step every other frame; a 200-frame triangle wave on intensity.
struct Pulse {
    frames: usize,
}

impl Animation for Pulse {
    fn name(&self) -> &'static str {
        "pulse"
    }

    fn frame_count(&self, _pixel_count: usize) -> usize {
        self.frames
    }

    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration {
        let (r, g, b) = wheel((frame / 2) as u32).channels();

        // Triangle wave: 0 → 100 → 0 over 200 frames
        let cycle = (frame % 200) as u16;
        let level = if cycle < 100 { cycle } else { 200 - cycle };
        let scale = |c: u8| ((u16::from(c) * level) / 100) as u8;
        let dimmed = Color::new(scale(r), scale(g), scale(b));

        for i in 0..canvas.pixel_count() {
            canvas.paint(i, dimmed);
        }
        Duration::from_millis(16)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().compact().init();

    let config = StripConfig::new(18, 93);

    #[cfg(feature = "hardware")]
    let transport = ws281x_strip::hardware::Ws281xTransport::new();
    #[cfg(not(feature = "hardware"))]
    let transport = ws281x_strip::transport::SimulatedTransport::paced();

    let mut strip = Device::new(config, transport)?.initialize()?;
    let running = setup_signal_handler()?;

    let pulse = Pulse { frames: usize::MAX };
    animation::play_while(&mut strip, &pulse, || is_running(&running))?;

    strip.clear()?;
    strip.show()?;
    strip.finalize();
    println!("\nShutting down cleanly.");
    Ok(())
}
