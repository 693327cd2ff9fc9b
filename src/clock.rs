//! Fixed timestep scheduler
//!
//! Converts display-rate timestamps (milliseconds, e.g. from
//! `requestAnimationFrame`) into a bounded number of fixed simulation ticks.
//! Rendering happens exactly once per delivered frame, however many ticks ran.

use std::ops::ControlFlow;

use crate::consts::{DEFAULT_FPS, MAX_SUPPORTED_FPS, MIN_SUPPORTED_FPS};

/// Largest wall-clock span (ms) a single frame may convert into ticks
pub const MAX_FRAME_DELTA_MS: f64 = 1000.0 / MIN_SUPPORTED_FPS;

/// Fixed-rate tick scheduler
#[derive(Debug, Clone)]
pub struct SimClock {
    last_timestamp: f64,
    start_timestamp: f64,
    accumulator: f64,
    target_fps: f64,
    target_tick_ms: f64,
    running: bool,
    /// Ticks delivered since construction
    ticks: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl SimClock {
    pub fn new(fps: f64) -> Self {
        let mut clock = Self {
            last_timestamp: 0.0,
            start_timestamp: 0.0,
            accumulator: 0.0,
            target_fps: DEFAULT_FPS,
            target_tick_ms: 1000.0 / DEFAULT_FPS,
            running: false,
            ticks: 0,
        };
        clock.set_target_rate(fps);
        clock
    }

    /// Begin accepting frames; `now` becomes the reference timestamp
    pub fn start(&mut self, now: f64) {
        self.running = true;
        self.last_timestamp = now;
        self.start_timestamp = now;
        self.accumulator = 0.0;
        log::info!("Clock started at {:.1} Hz", self.target_fps);
    }

    /// Halt tick delivery. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("Clock stopped after {} ticks", self.ticks);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set the simulation rate, clamped into the supported range.
    /// Returns the rate actually applied.
    pub fn set_target_rate(&mut self, fps: f64) -> f64 {
        let clamped = if fps.is_nan() {
            DEFAULT_FPS
        } else {
            fps.clamp(MIN_SUPPORTED_FPS, MAX_SUPPORTED_FPS)
        };
        if clamped != fps {
            log::warn!("Requested tick rate {fps} clamped to {clamped}");
        }
        self.target_fps = clamped;
        self.target_tick_ms = 1000.0 / clamped;
        clamped
    }

    pub fn target_fps(&self) -> f64 {
        self.target_fps
    }

    pub fn target_tick_ms(&self) -> f64 {
        self.target_tick_ms
    }

    /// Fixed tick duration in seconds, as handed to the tick callback
    pub fn tick_dt(&self) -> f32 {
        (self.target_tick_ms / 1000.0) as f32
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Wall-clock time (ms) between `start` and the latest frame
    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(self.last_timestamp)
    }

    /// Wall-clock time (ms) between `start` and `timestamp`, never negative
    pub fn elapsed_at(&self, timestamp: f64) -> f64 {
        (timestamp - self.start_timestamp).max(0.0)
    }

    /// Process one display frame.
    ///
    /// Runs `handler.tick(dt_seconds)` zero or more times, then
    /// `handler.render()` once. A tick returning `ControlFlow::Break` stops the
    /// clock; no further ticks are delivered, but this frame is still rendered.
    /// Frames arriving while stopped do nothing. Returns the number of ticks run.
    pub fn drive<H: FrameHandler + ?Sized>(&mut self, timestamp: f64, handler: &mut H) -> u32 {
        if !self.running {
            return 0;
        }

        // Backwards timestamps count as zero elapsed time
        let delta = (timestamp - self.last_timestamp).clamp(0.0, MAX_FRAME_DELTA_MS);
        self.last_timestamp = timestamp;

        self.accumulator = (self.accumulator + delta).min(MAX_FRAME_DELTA_MS);

        let dt = self.tick_dt();
        let mut ran = 0;
        while self.accumulator >= self.target_tick_ms {
            let flow = handler.tick(dt);
            self.accumulator -= self.target_tick_ms;
            self.ticks += 1;
            ran += 1;
            if flow.is_break() {
                self.stop();
                break;
            }
        }

        handler.render();
        ran
    }

    /// Closure form of [`SimClock::drive`]
    pub fn frame<T, R>(&mut self, timestamp: f64, on_tick: T, on_render: R) -> u32
    where
        T: FnMut(f32) -> ControlFlow<()>,
        R: FnOnce(),
    {
        let mut callbacks = Callbacks {
            on_tick,
            on_render: Some(on_render),
        };
        self.drive(timestamp, &mut callbacks)
    }
}

/// Receives the ticks and the render call of one frame
pub trait FrameHandler {
    fn tick(&mut self, dt: f32) -> ControlFlow<()>;
    fn render(&mut self);
}

struct Callbacks<T, R> {
    on_tick: T,
    on_render: Option<R>,
}

impl<T, R> FrameHandler for Callbacks<T, R>
where
    T: FnMut(f32) -> ControlFlow<()>,
    R: FnOnce(),
{
    fn tick(&mut self, dt: f32) -> ControlFlow<()> {
        (self.on_tick)(dt)
    }

    fn render(&mut self) {
        if let Some(render) = self.on_render.take() {
            render();
        }
    }
}
