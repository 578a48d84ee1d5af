//! Strand-test animations and the loop that plays them on a strip.
//!
//! Each animation is a plain value describing *what* to draw. Frame `n` is
//! produced by [`Animation::paint`], which depends only on `n` and the
//! canvas it paints on, so an animation can be replayed, snapshotted with
//! [`frames`], or played on a real strip with [`play`].
//!
//! Pacing is always a [`Duration`]. Each `paint` returns how long to pause
//! after its frame has finished transmitting.
//!
//! ## Rust concepts
//! - Trait objects (`&mut dyn Canvas`, `Box<dyn Animation>`)
//! - Iterators with internal state ([`Frames`])
//! - `impl FnMut` for caller-supplied predicates

use crate::device::LedStrip;
use crate::error::DeviceError;
use crate::transport::Transport;
use crate::{Color, RingLayout};
use std::thread;
use std::time::Duration;

// ── Wheel ────────────────────────────────────────────────────────────

/// Hue around a 256-step colour wheel, in three 85-step linear segments.
///
/// Positions wrap, so `wheel(p) == wheel(p % 256)` for every `p`.
pub fn wheel(position: u32) -> Color {
    let pos = (position % 256) as u8;
    match pos {
        0..=84 => Color::new(pos * 3, 255 - pos * 3, 0),
        85..=169 => {
            let p = pos - 85;
            Color::new(255 - p * 3, 0, p * 3)
        }
        _ => {
            let p = pos - 170;
            Color::new(0, p * 3, 255 - p * 3)
        }
    }
}

// ── Canvas ───────────────────────────────────────────────────────────

/// Something an animation can paint pixels onto.
///
/// Out-of-range indices are ignored, so animations whose patterns run past
/// the end of the strip simply lose the overhanging pixels.
pub trait Canvas {
    fn pixel_count(&self) -> usize;

    fn paint(&mut self, index: usize, color: Color);
}

/// A raw (not gamma corrected) in-memory frame.
impl Canvas for [Color] {
    fn pixel_count(&self) -> usize {
        self.len()
    }

    fn paint(&mut self, index: usize, color: Color) {
        if let Some(slot) = self.get_mut(index) {
            *slot = color;
        }
    }
}

impl Canvas for Vec<Color> {
    fn pixel_count(&self) -> usize {
        self.len()
    }

    fn paint(&mut self, index: usize, color: Color) {
        self.as_mut_slice().paint(index, color);
    }
}

/// Painting a live strip applies gamma correction through `set_pixel`.
impl<T: Transport> Canvas for LedStrip<T> {
    fn pixel_count(&self) -> usize {
        self.len()
    }

    fn paint(&mut self, index: usize, color: Color) {
        self.paint_pixel(index, color);
    }
}

// ── Animation trait ──────────────────────────────────────────────────

/// A deterministic sequence of frames.
pub trait Animation {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// How many frames this animation submits on a strip of `pixel_count`.
    fn frame_count(&self, pixel_count: usize) -> usize;

    /// Draw frame `frame` and return the pause to take once it is shown.
    ///
    /// Pixels not touched keep whatever the canvas already held.
    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration;
}

/// Paint every pixel `i` with `i % 3 == 0`, shifted by `phase`.
fn paint_chase(canvas: &mut dyn Canvas, phase: usize, color_at: impl Fn(usize) -> Color) {
    let n = canvas.pixel_count();
    for i in (0..n).step_by(3) {
        canvas.paint(i + phase, color_at(i));
    }
}

/// Shared frame arithmetic for the two theater chases.
///
/// Each round is three phases; each phase is a lit frame followed by a
/// cleared frame. Pauses follow the lit frame and the end of the round.
struct ChaseStep {
    round: usize,
    phase: usize,
    lit: bool,
}

impl ChaseStep {
    const FRAMES_PER_ROUND: usize = 6;

    fn at(frame: usize) -> Self {
        let sub = frame % Self::FRAMES_PER_ROUND;
        Self {
            round: frame / Self::FRAMES_PER_ROUND,
            phase: sub / 2,
            lit: sub % 2 == 0,
        }
    }

    fn pause(&self, step_delay: Duration) -> Duration {
        if self.lit || self.phase == 2 {
            step_delay
        } else {
            Duration::ZERO
        }
    }
}

// ── Animations ───────────────────────────────────────────────────────

/// Fill the strip with `color` one pixel at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorWipe {
    pub color: Color,
    pub step_delay: Duration,
}

impl Animation for ColorWipe {
    fn name(&self) -> &'static str {
        "color-wipe"
    }

    fn frame_count(&self, pixel_count: usize) -> usize {
        pixel_count
    }

    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration {
        canvas.paint(frame, self.color);
        self.step_delay
    }
}

/// Movie-theater marquee: every third pixel lit, stepping along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TheaterChase {
    pub color: Color,
    pub step_delay: Duration,
    pub iterations: usize,
}

impl Animation for TheaterChase {
    fn name(&self) -> &'static str {
        "theater-chase"
    }

    fn frame_count(&self, _pixel_count: usize) -> usize {
        self.iterations.saturating_mul(ChaseStep::FRAMES_PER_ROUND)
    }

    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration {
        let step = ChaseStep::at(frame);
        let color = if step.lit { self.color } else { Color::BLACK };
        paint_chase(canvas, step.phase, |_| color);
        step.pause(self.step_delay)
    }
}

/// Every pixel drifts around the colour wheel, one hue step per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rainbow {
    pub step_delay: Duration,
    pub iterations: usize,
}

impl Animation for Rainbow {
    fn name(&self) -> &'static str {
        "rainbow"
    }

    fn frame_count(&self, _pixel_count: usize) -> usize {
        self.iterations.saturating_mul(256)
    }

    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration {
        for i in 0..canvas.pixel_count() {
            canvas.paint(i, wheel(((i + frame % 256) % 256) as u32));
        }
        self.step_delay
    }
}

/// One full colour wheel spread evenly across the strip, rotating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RainbowCycle {
    pub step_delay: Duration,
    pub iterations: usize,
}

impl Animation for RainbowCycle {
    fn name(&self) -> &'static str {
        "rainbow-cycle"
    }

    fn frame_count(&self, _pixel_count: usize) -> usize {
        self.iterations.saturating_mul(256)
    }

    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration {
        let n = canvas.pixel_count();
        for i in 0..n {
            let hue = (i * 256 / n + frame % 256) % 256;
            canvas.paint(i, wheel(hue as u32));
        }
        self.step_delay
    }
}

/// Theater chase whose lit pixels take rainbow hues that shift every round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TheaterChaseRainbow {
    pub step_delay: Duration,
    pub iterations: usize,
}

impl Animation for TheaterChaseRainbow {
    fn name(&self) -> &'static str {
        "theater-chase-rainbow"
    }

    fn frame_count(&self, _pixel_count: usize) -> usize {
        self.iterations.saturating_mul(ChaseStep::FRAMES_PER_ROUND)
    }

    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration {
        let step = ChaseStep::at(frame);
        if step.lit {
            paint_chase(canvas, step.phase, |i| {
                wheel(((i + step.round % 255) % 255) as u32)
            });
        } else {
            paint_chase(canvas, step.phase, |_| Color::BLACK);
        }
        step.pause(self.step_delay)
    }
}

/// Light one concentric ring per frame, innermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingWipe {
    pub color: Color,
    pub step_delay: Duration,
    pub layout: RingLayout,
}

impl Animation for RingWipe {
    fn name(&self) -> &'static str {
        "ring-wipe"
    }

    fn frame_count(&self, _pixel_count: usize) -> usize {
        self.layout.ring_count()
    }

    fn paint(&self, frame: usize, canvas: &mut dyn Canvas) -> Duration {
        if let Some(ring) = self.layout.inner_to_outer().nth(frame) {
            for &index in ring {
                canvas.paint(index, self.color);
            }
        }
        self.step_delay
    }
}

// ── Frame snapshots ──────────────────────────────────────────────────

/// Iterator over the raw frames an animation produces, starting from an
/// all-black strip. Colours are not gamma corrected.
pub struct Frames<'a, A: Animation + ?Sized> {
    animation: &'a A,
    canvas: Vec<Color>,
    next: usize,
    total: usize,
}

impl<A: Animation + ?Sized> Iterator for Frames<'_, A> {
    /// The frame contents and the pause that follows it.
    type Item = (Vec<Color>, Duration);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let pause = self.animation.paint(self.next, &mut self.canvas);
        self.next += 1;
        Some((self.canvas.clone(), pause))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

/// Replay `animation` on an in-memory strip of `pixel_count` pixels.
pub fn frames<A: Animation + ?Sized>(animation: &A, pixel_count: usize) -> Frames<'_, A> {
    Frames {
        animation,
        canvas: vec![Color::BLACK; pixel_count],
        next: 0,
        total: animation.frame_count(pixel_count),
    }
}

// ── Playback ─────────────────────────────────────────────────────────

/// How a playback ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Finished,
    /// Stopped early after this many frames had been shown.
    Interrupted { frames_shown: usize },
}

/// Play every frame of `animation` on `strip`.
///
/// Each frame is painted, rendered and waited on before its pause. The first
/// render or wait failure stops the animation and is returned; no further
/// frames are submitted.
pub fn play<T, A>(strip: &mut LedStrip<T>, animation: &A) -> Result<(), DeviceError>
where
    T: Transport,
    A: Animation + ?Sized,
{
    play_while(strip, animation, || true).map(|_| ())
}

/// Like [`play`], but checks `keep_going` after every shown frame and stops
/// early once it returns false.
pub fn play_while<T, A>(
    strip: &mut LedStrip<T>,
    animation: &A,
    mut keep_going: impl FnMut() -> bool,
) -> Result<Playback, DeviceError>
where
    T: Transport,
    A: Animation + ?Sized,
{
    let total = animation.frame_count(strip.len());
    tracing::debug!("Starting {} ({} frames)", animation.name(), total);

    for frame in 0..total {
        let pause = animation.paint(frame, strip);
        strip.show()?;
        tracing::trace!("{} frame {}/{}", animation.name(), frame + 1, total);

        if !keep_going() {
            tracing::warn!(
                "{} interrupted after {} of {} frames",
                animation.name(),
                frame + 1,
                total
            );
            return Ok(Playback::Interrupted {
                frames_shown: frame + 1,
            });
        }

        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    tracing::debug!("Finished {}", animation.name());
    Ok(Playback::Finished)
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use crate::error::TransportOp;
    use crate::gamma;
    use crate::transport::testing::ScriptedTransport;
    use crate::{RingOrder, StripConfig};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const RED: Color = Color::new(255, 0, 0);
    const MS: Duration = Duration::from_millis(1);

    fn strip_with(transport: ScriptedTransport, pixel_count: usize) -> LedStrip<ScriptedTransport> {
        Device::new(StripConfig::new(18, pixel_count), transport)
            .unwrap()
            .initialize()
            .unwrap()
    }

    fn strip(pixel_count: usize) -> LedStrip<ScriptedTransport> {
        strip_with(ScriptedTransport::new(), pixel_count)
    }

    fn lit_indices(frame: &[Color]) -> Vec<usize> {
        frame
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_black())
            .map(|(i, _)| i)
            .collect()
    }

    // ── Wheel ──────────────────────────────────────────────────────

    #[rstest]
    #[case(0, (0, 255, 0))]
    #[case(84, (252, 3, 0))]
    #[case(85, (255, 0, 0))]
    #[case(127, (129, 0, 126))]
    #[case(170, (0, 0, 255))]
    #[case(254, (0, 252, 3))]
    fn wheel_segments(#[case] position: u32, #[case] expected: (u8, u8, u8)) {
        assert_eq!(wheel(position).channels(), expected);
    }

    #[test]
    fn wheel_is_periodic_with_period_256() {
        for p in 0..1024u32 {
            assert_eq!(wheel(p), wheel(p % 256), "position {p}");
        }
    }

    #[test]
    fn wheel_is_continuous() {
        for p in 0..256u32 {
            let (r0, g0, b0) = wheel(p).channels();
            let (r1, g1, b1) = wheel(p + 1).channels();
            for (a, b) in [(r0, r1), (g0, g1), (b0, b1)] {
                assert!(a.abs_diff(b) <= 3, "jump between {p} and {}", p + 1);
            }
        }
    }

    #[test]
    fn wheel_never_lights_all_three_channels() {
        for p in 0..256u32 {
            let (r, g, b) = wheel(p).channels();
            assert!(r == 0 || g == 0 || b == 0, "position {p}");
        }
    }

    // ── Canvas ─────────────────────────────────────────────────────

    #[test]
    fn slice_canvas_ignores_out_of_range() {
        let mut canvas = vec![Color::BLACK; 2];
        canvas.paint(5, RED);
        canvas.paint(1, RED);
        assert_eq!(canvas, vec![Color::BLACK, RED]);
    }

    #[test]
    fn strip_canvas_ignores_out_of_range_and_finalized() {
        let mut strip = strip(2);
        strip.paint(2, RED);
        assert_eq!(strip.frame(), &[Color::BLACK; 2]);

        strip.finalize();
        strip.paint(0, RED);
        assert_eq!(strip.pixel(0), Some(Color::BLACK));
    }

    // ── Frame counts ───────────────────────────────────────────────

    #[rstest]
    #[case(1, 6, 256)]
    #[case(100, 600, 25_600)]
    #[case(usize::MAX / 100, usize::MAX, usize::MAX)]
    #[case(usize::MAX, usize::MAX, usize::MAX)]
    fn frame_counts_saturate_on_huge_iterations(
        #[case] iterations: usize,
        #[case] chase_frames: usize,
        #[case] rainbow_frames: usize,
    ) {
        let step_delay = Duration::ZERO;
        let chase = TheaterChase {
            color: RED,
            step_delay,
            iterations,
        };
        let chase_rainbow = TheaterChaseRainbow {
            step_delay,
            iterations,
        };
        let rainbow = Rainbow {
            step_delay,
            iterations,
        };
        let cycle = RainbowCycle {
            step_delay,
            iterations,
        };
        assert_eq!(chase.frame_count(10), chase_frames);
        assert_eq!(chase_rainbow.frame_count(10), chase_frames);
        assert_eq!(rainbow.frame_count(10), rainbow_frames);
        assert_eq!(cycle.frame_count(10), rainbow_frames);
    }

    #[test]
    fn late_frames_of_huge_animations_do_not_overflow() {
        let rainbow = Rainbow {
            step_delay: Duration::ZERO,
            iterations: usize::MAX,
        };
        let mut canvas = vec![Color::BLACK; 4];
        let pause = rainbow.paint(usize::MAX - 1, &mut canvas);
        assert_eq!(pause, Duration::ZERO);
        assert_eq!(canvas[0], wheel(((usize::MAX - 1) % 256) as u32));
    }

    // ── ColorWipe ──────────────────────────────────────────────────

    #[test]
    fn color_wipe_renders_once_per_pixel() {
        let mut strip = strip(5);
        let wipe = ColorWipe {
            color: RED,
            step_delay: Duration::ZERO,
        };
        play(&mut strip, &wipe).unwrap();

        assert_eq!(strip.transport().render_count(), 5);
        assert_eq!(strip.frame(), &[RED; 5]);
    }

    #[test]
    fn color_wipe_lights_one_more_pixel_per_frame() {
        let wipe = ColorWipe {
            color: RED,
            step_delay: MS,
        };
        for (n, (frame, pause)) in frames(&wipe, 4).enumerate() {
            assert_eq!(lit_indices(&frame), (0..=n).collect::<Vec<_>>());
            assert_eq!(pause, MS);
        }
    }

    #[test]
    fn color_wipe_leaves_unreached_pixels_alone() {
        let mut strip = strip(3);
        strip.set_all(&[Color::new(0, 0, 255); 3]).unwrap();
        let wipe = ColorWipe {
            color: RED,
            step_delay: Duration::ZERO,
        };
        wipe.paint(0, &mut strip);
        assert_eq!(strip.pixel(0), Some(RED));
        assert_eq!(strip.pixel(2), Some(Color::new(0, 0, 255)));
    }

    // ── TheaterChase ───────────────────────────────────────────────

    #[test]
    fn theater_chase_on_three_pixels() {
        let mut strip = strip(3);
        let chase = TheaterChase {
            color: RED,
            step_delay: Duration::ZERO,
            iterations: 1,
        };
        play(&mut strip, &chase).unwrap();

        let rendered = strip.transport().rendered_frames();
        assert_eq!(rendered.len(), 6);
        for phase in 0..3 {
            assert_eq!(lit_indices(&rendered[phase * 2]), vec![phase]);
            assert_eq!(lit_indices(&rendered[phase * 2 + 1]), Vec::<usize>::new());
        }
    }

    #[test]
    fn theater_chase_skips_pixels_past_the_end() {
        let chase = TheaterChase {
            color: RED,
            step_delay: Duration::ZERO,
            iterations: 1,
        };
        let lit: Vec<Vec<usize>> = frames(&chase, 7)
            .step_by(2)
            .map(|(frame, _)| lit_indices(&frame))
            .collect();
        assert_eq!(lit, vec![vec![0, 3, 6], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn theater_chase_pauses_after_lit_frames_and_round_end() {
        let chase = TheaterChase {
            color: RED,
            step_delay: MS,
            iterations: 2,
        };
        let pauses: Vec<Duration> = frames(&chase, 6).map(|(_, pause)| pause).collect();
        let round = [MS, Duration::ZERO, MS, Duration::ZERO, MS, MS];
        assert_eq!(pauses, [round, round].concat());
    }

    // ── Rainbow ────────────────────────────────────────────────────

    #[test]
    fn rainbow_frame_count_and_hues() {
        let rainbow = Rainbow {
            step_delay: Duration::ZERO,
            iterations: 2,
        };
        assert_eq!(rainbow.frame_count(10), 512);

        let all: Vec<Vec<Color>> = frames(&rainbow, 10).map(|(f, _)| f).collect();
        assert_eq!(all.len(), 512);
        for i in 0..10 {
            assert_eq!(all[7][i], wheel((i + 7) as u32));
        }
        assert_eq!(all[256], all[0]);
    }

    #[test]
    fn rainbow_repeats_bands_on_long_strips() {
        let rainbow = Rainbow {
            step_delay: Duration::ZERO,
            iterations: 1,
        };
        let (frame, _) = frames(&rainbow, 300).next().unwrap();
        assert_eq!(frame[0], frame[256]);
    }

    // ── RainbowCycle ───────────────────────────────────────────────

    #[test]
    fn rainbow_cycle_spreads_one_wheel_over_256_pixels() {
        let cycle = RainbowCycle {
            step_delay: Duration::ZERO,
            iterations: 1,
        };
        let (frame, _) = frames(&cycle, 256).next().unwrap();
        for (i, c) in frame.iter().enumerate() {
            assert_eq!(*c, wheel(i as u32));
        }
    }

    #[test]
    fn rainbow_cycle_on_strip_applies_gamma() {
        let mut strip = strip(256);
        let cycle = RainbowCycle {
            step_delay: Duration::ZERO,
            iterations: 1,
        };
        cycle.paint(0, &mut strip);
        for i in 0..256 {
            assert_eq!(strip.pixel(i), Some(gamma::correct(wheel(i as u32))));
        }
    }

    #[rstest]
    #[case(3)]
    #[case(93)]
    #[case(600)]
    fn rainbow_cycle_first_pixel_tracks_frame(#[case] pixel_count: usize) {
        let cycle = RainbowCycle {
            step_delay: Duration::ZERO,
            iterations: 1,
        };
        for (j, (frame, _)) in frames(&cycle, pixel_count).enumerate().take(40) {
            assert_eq!(frame[0], wheel(j as u32));
        }
    }

    // ── TheaterChaseRainbow ────────────────────────────────────────

    #[test]
    fn chase_rainbow_hue_shifts_each_round() {
        let chase = TheaterChaseRainbow {
            step_delay: Duration::ZERO,
            iterations: 2,
        };
        let all: Vec<Vec<Color>> = frames(&chase, 9).map(|(f, _)| f).collect();
        assert_eq!(all.len(), 12);

        // Round 0, phase 1: pixels 1, 4, 7 take wheel(0), wheel(3), wheel(6).
        assert_eq!(lit_indices(&all[2]), vec![1, 4, 7]);
        assert_eq!(all[2][4], wheel(3));
        // Round 1, phase 0: hues move by one step.
        assert_eq!(all[6][0], wheel(1));
        assert_eq!(all[6][3], wheel(4));
        // Cleared sub-frames are dark.
        assert!(lit_indices(&all[7]).is_empty());
    }

    #[test]
    fn chase_rainbow_hue_wraps_at_255() {
        let chase = TheaterChaseRainbow {
            step_delay: Duration::ZERO,
            iterations: 1,
        };
        let (frame, _) = frames(&chase, 258).next().unwrap();
        assert_eq!(frame[255], wheel(0));
    }

    // ── RingWipe ───────────────────────────────────────────────────

    #[test]
    fn ring_wipe_lights_inner_ring_first() {
        let layout = RingLayout::new(vec![vec![2, 3], vec![1], vec![0]], RingOrder::OuterToInner);
        let wipe = RingWipe {
            color: RED,
            step_delay: MS,
            layout,
        };
        let lit: Vec<Vec<usize>> = frames(&wipe, 4).map(|(f, _)| lit_indices(&f)).collect();
        assert_eq!(lit, vec![vec![0], vec![0, 1], vec![0, 1, 2, 3]]);
    }

    #[test]
    fn ring_wipe_covers_mokungit_board() {
        let wipe = RingWipe {
            color: RED,
            step_delay: Duration::ZERO,
            layout: RingLayout::mokungit_93(),
        };
        let (last, _) = frames(&wipe, 93).last().unwrap();
        assert_eq!(lit_indices(&last).len(), 93);
    }

    // ── Restartability ─────────────────────────────────────────────

    #[test]
    fn replay_produces_identical_frames() {
        let chase = TheaterChaseRainbow {
            step_delay: Duration::ZERO,
            iterations: 3,
        };
        let first: Vec<_> = frames(&chase, 20).collect();
        let second: Vec<_> = frames(&chase, 20).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn animations_work_as_trait_objects() {
        let playlist: Vec<Box<dyn Animation>> = vec![
            Box::new(ColorWipe {
                color: RED,
                step_delay: Duration::ZERO,
            }),
            Box::new(Rainbow {
                step_delay: Duration::ZERO,
                iterations: 1,
            }),
        ];
        let mut strip = strip(4);
        for animation in &playlist {
            play(&mut strip, animation.as_ref()).unwrap();
        }
        assert_eq!(strip.transport().render_count(), 4 + 256);
    }

    // ── Failure & cancellation ─────────────────────────────────────

    #[test]
    fn render_failure_stops_animation() {
        let transport = ScriptedTransport {
            fail_render: Some((2, -3)),
            ..ScriptedTransport::new()
        };
        let mut strip = strip_with(transport, 5);
        let wipe = ColorWipe {
            color: RED,
            step_delay: Duration::ZERO,
        };
        let err = play(&mut strip, &wipe).unwrap_err();

        assert!(matches!(
            err,
            DeviceError::Transport {
                op: TransportOp::Render,
                code: -3
            }
        ));
        assert_eq!(strip.transport().render_count(), 3);
    }

    #[test]
    fn wait_failure_stops_animation() {
        let transport = ScriptedTransport {
            fail_wait: Some((1, -10)),
            ..ScriptedTransport::new()
        };
        let mut strip = strip_with(transport, 3);
        let chase = TheaterChase {
            color: RED,
            step_delay: Duration::ZERO,
            iterations: 4,
        };
        let err = play(&mut strip, &chase).unwrap_err();

        assert!(matches!(
            err,
            DeviceError::Transport {
                op: TransportOp::Wait,
                code: -10
            }
        ));
        assert_eq!(strip.transport().render_count(), 2);
    }

    #[test]
    fn play_on_finalized_strip_fails_without_rendering() {
        let mut strip = strip(3);
        strip.finalize();
        let wipe = ColorWipe {
            color: RED,
            step_delay: Duration::ZERO,
        };
        assert!(matches!(play(&mut strip, &wipe), Err(DeviceError::Finalized)));
        assert_eq!(strip.transport().render_count(), 0);
    }

    #[test]
    fn play_while_stops_when_predicate_fails() {
        let mut strip = strip(10);
        let wipe = ColorWipe {
            color: RED,
            step_delay: Duration::ZERO,
        };
        let mut budget = 3;
        let outcome = play_while(&mut strip, &wipe, || {
            budget -= 1;
            budget > 0
        })
        .unwrap();

        assert_eq!(outcome, Playback::Interrupted { frames_shown: 3 });
        assert_eq!(strip.transport().render_count(), 3);
    }

    #[test]
    fn play_while_reports_finished() {
        let mut strip = strip(2);
        let wipe = ColorWipe {
            color: RED,
            step_delay: Duration::ZERO,
        };
        assert_eq!(play_while(&mut strip, &wipe, || true).unwrap(), Playback::Finished);
    }
}
