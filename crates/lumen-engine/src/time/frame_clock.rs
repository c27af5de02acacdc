use std::time::{Duration, Instant};

/// Snapshot taken when a frame is drawn.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous drawn frame, clamped.
    pub dt: f32,

    /// Seconds since the clock was created.
    pub elapsed: f32,

    pub now: Instant,

    /// Number of frames drawn before this one.
    pub frame_index: u64,
}

/// Produces [`FrameTime`] snapshots.
///
/// A redraw-on-resize loop can sit idle for minutes, so `dt` is clamped to
/// keep time-based shader inputs bounded after a long pause.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
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
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Same as [`FrameClock::tick`] with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut c = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(c.tick_at(t0).frame_index, 0);
        assert_eq!(c.tick_at(t0 + Duration::from_millis(16)).frame_index, 1);
    }

    #[test]
    fn long_idle_is_clamped() {
        let mut c = FrameClock::new();
        let t0 = Instant::now();
        c.tick_at(t0);
        let ft = c.tick_at(t0 + Duration::from_secs(120));
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert!(ft.elapsed >= 120.0);
    }

    #[test]
    fn zero_dt_is_raised_to_minimum() {
        let mut c = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_secs(1));
        let t0 = Instant::now();
        c.tick_at(t0);
        assert!((c.tick_at(t0).dt - 0.001).abs() < 1e-6);
    }
}
