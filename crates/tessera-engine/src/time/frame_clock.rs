use std::time::{Duration, Instant};

/// Frame timing snapshot handed to every `update` pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick (clamped).
    pub dt: f32,
    /// Seconds accumulated since the clock started (sum of clamped `dt`s).
    pub elapsed: f64,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// A synthetic snapshot for headless hosts that step time themselves.
    pub fn fixed(frame_index: u64, dt: f32) -> Self {
        Self { dt, elapsed: frame_index as f64 * dt as f64, frame_index }
    }
}

/// Frame clock producing [`FrameTime`] snapshots.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline without touching the frame counter.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new [`FrameTime`].
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).clamp(self.dt_min, self.dt_max);
        self.last = now;
        self.advance(dt)
    }

    /// Advances by a fixed `dt`, ignoring wall time. For headless hosts that
    /// script their frames.
    pub fn step(&mut self, dt: Duration) -> FrameTime {
        self.last = Instant::now();
        self.advance(dt)
    }

    fn advance(&mut self, dt: Duration) -> FrameTime {
        self.elapsed += dt.as_secs_f64();
        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
