//! WS281x strand test
//!
//! Runs the classic strand-test animations on an LED strip or ring board,
//! then clears the strip and releases the hardware. Ctrl+C stops the
//! current animation after its frame and still clears the strip.
//!
//! Built without the `hardware` feature (or with `--simulate`), frames go to
//! a simulated transport paced like a real strip, which is handy for trying
//! options on a laptop.
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/ws281x-strip --gpio-pin 18 --width 1 --height 93 --rings
//! RUST_LOG=debug ./target/release/ws281x-strip --animation rainbow --iterations 2
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ws281x_strip::animation::{
    self, Animation, ColorWipe, Playback, Rainbow, RainbowCycle, RingWipe, TheaterChase,
    TheaterChaseRainbow,
};
use ws281x_strip::device::{Device, LedStrip};
use ws281x_strip::transport::{SimulatedTransport, Transport};
use ws281x_strip::{Color, ColorOrder, RingLayout, StripConfig, color, is_running};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Show {
    All,
    Wipe,
    Chase,
    Rainbow,
    RainbowCycle,
    ChaseRainbow,
    Rings,
}

/// WS281x strand test
#[derive(Parser)]
#[command(name = "ws281x-strip")]
#[command(about = "Run strand-test animations on a WS281x LED strip")]
#[command(version)]
struct Args {
    /// JSON strip config; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// GPIO pin driving the strip's data line
    #[arg(long)]
    gpio_pin: Option<i32>,

    /// DMA channel used by the driver
    #[arg(long)]
    dma: Option<i32>,

    /// Signal frequency in Hz (800000, or 400000 for older WS2811)
    #[arg(long)]
    frequency: Option<u32>,

    /// LED matrix width [default: 1]
    #[arg(long)]
    width: Option<usize>,

    /// LED matrix height [default: the configured pixel count]
    #[arg(long)]
    height: Option<usize>,

    /// Brightness (0-255)
    #[arg(long)]
    brightness: Option<u8>,

    /// Channel order expected by the strip (rgb, rbg, grb, gbr, brg, bgr)
    #[arg(long)]
    color_order: Option<ColorOrder>,

    /// Invert the data signal (for inverting level shifters)
    #[arg(long)]
    invert: bool,

    /// Use the 93-LED six-ring board layout
    #[arg(long)]
    rings: bool,

    /// Red component of the chase and ring colour
    #[arg(long, default_value = "0")]
    red: i32,

    /// Green component of the chase and ring colour
    #[arg(long, default_value = "0")]
    green: i32,

    /// Blue component of the chase and ring colour
    #[arg(long, default_value = "255")]
    blue: i32,

    /// Pause between animation steps, in milliseconds
    #[arg(long, default_value = "20")]
    duration: u64,

    /// Rounds for the chase and rainbow animations
    #[arg(long, default_value = "100")]
    iterations: usize,

    /// Which animation to run
    #[arg(long, value_enum, default_value = "all")]
    animation: Show,

    /// Use the simulated transport even when built with hardware support
    #[arg(long)]
    simulate: bool,
}

impl Args {
    fn strip_config(&self) -> Result<StripConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => StripConfig::from_json_file(path)?,
            None => StripConfig {
                gpio_pin: 12,
                ..StripConfig::default()
            },
        };

        if let Some(pin) = self.gpio_pin {
            config.gpio_pin = pin;
        }
        if let Some(dma) = self.dma {
            config.dma_channel = dma;
        }
        if let Some(frequency) = self.frequency {
            config.frequency = frequency;
        }
        if self.width.is_some() || self.height.is_some() {
            let width = self.width.unwrap_or(1);
            let height = self.height.unwrap_or(config.pixel_count);
            config.pixel_count = width.checked_mul(height).ok_or_else(|| {
                format!("a {width}x{height} matrix has more pixels than can be addressed")
            })?;
        }
        if let Some(brightness) = self.brightness {
            config.brightness = brightness;
        }
        if let Some(order) = self.color_order {
            config.color_order = order;
        }
        if self.invert {
            config.invert_signal = true;
        }
        if self.rings {
            config.ring_layout = Some(RingLayout::mokungit_93());
        }
        Ok(config)
    }

    fn playlist(&self, config: &StripConfig) -> Vec<Box<dyn Animation>> {
        let step_delay = Duration::from_millis(self.duration);
        let iterations = self.iterations;
        let chosen = Color::clamped(self.red, self.green, self.blue);
        let red = color(255, 0, 0);
        let green = color(0, 255, 0);
        let blue = color(0, 0, 255);

        let wipe = |c: Color| -> Box<dyn Animation> {
            Box::new(ColorWipe {
                color: c,
                step_delay,
            })
        };
        let chase: Box<dyn Animation> = Box::new(TheaterChase {
            color: chosen,
            step_delay,
            iterations,
        });
        let rainbow: Box<dyn Animation> = Box::new(Rainbow {
            step_delay,
            iterations,
        });
        let cycle: Box<dyn Animation> = Box::new(RainbowCycle {
            step_delay,
            iterations,
        });
        let chase_rainbow: Box<dyn Animation> = Box::new(TheaterChaseRainbow {
            step_delay,
            iterations,
        });
        let rings = config.ring_layout.clone().map(|layout| {
            Box::new(RingWipe {
                color: chosen,
                step_delay,
                layout,
            }) as Box<dyn Animation>
        });

        match self.animation {
            Show::All => {
                let mut list: Vec<Box<dyn Animation>> = vec![
                    chase,
                    rainbow,
                    cycle,
                    wipe(blue),
                    wipe(green),
                    wipe(blue),
                    wipe(red),
                    chase_rainbow,
                ];
                list.extend(rings);
                list
            }
            Show::Wipe => vec![wipe(blue), wipe(green), wipe(blue), wipe(red)],
            Show::Chase => vec![chase],
            Show::Rainbow => vec![rainbow],
            Show::RainbowCycle => vec![cycle],
            Show::ChaseRainbow => vec![chase_rainbow],
            Show::Rings => rings.into_iter().collect(),
        }
    }
}

/// Play the animations in order, then clear the strip and finalize it.
fn run<T: Transport>(
    mut strip: LedStrip<T>,
    playlist: &[Box<dyn Animation>],
    running: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = Ok(());
    for current in playlist {
        tracing::info!("{} animation", current.name());
        match animation::play_while(&mut strip, current.as_ref(), || is_running(running)) {
            Ok(Playback::Finished) => {}
            Ok(Playback::Interrupted { .. }) => break,
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    // Leave the strip dark even after an interrupt or a failed frame.
    let cleared = strip.clear().and_then(|()| strip.show());
    strip.finalize();
    result?;
    cleared?;
    Ok(())
}

fn start<T: Transport>(
    config: StripConfig,
    transport: T,
    playlist: &[Box<dyn Animation>],
    running: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let strip = Device::new(config, transport)?.initialize()?;
    run(strip, playlist, running)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();
    let config = args.strip_config()?;
    let playlist = args.playlist(&config);
    if playlist.is_empty() {
        tracing::warn!("Nothing to play: the ring animation needs --rings or a ring_layout");
    }

    tracing::info!("WS281x strand test v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Strip: {} pixels, GPIO {}, brightness {}",
        config.pixel_count,
        config.gpio_pin,
        config.brightness
    );
    tracing::info!("Step delay: {}ms, iterations: {}", args.duration, args.iterations);

    let running = ws281x_strip::setup_signal_handler()?;

    #[cfg(feature = "hardware")]
    if !args.simulate {
        let transport = ws281x_strip::hardware::Ws281xTransport::new();
        return start(config, transport, &playlist, &running);
    }

    if !args.simulate {
        tracing::info!("Built without hardware support; using the simulated transport");
    }
    start(config, SimulatedTransport::paced(), &playlist, &running)
}
