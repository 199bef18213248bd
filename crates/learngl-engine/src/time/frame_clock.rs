use std::time::{Duration, Instant};

/// Timing snapshot for one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub dt: f32,

    /// Seconds since the clock was created.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    pub frame_index: u64,
}

/// Produces per-frame delta times.
///
/// By default the delta is the raw wall-clock difference between consecutive
/// ticks. `with_clamps` bounds it, which keeps motion sane after the process
/// was stopped in a debugger.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    clamps: Option<(Duration, Duration)>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose first tick is measured from `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            frame_index: 0,
            clamps: None,
        }
    }

    /// Creates a clock with delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            clamps: Some((dt_min, dt_max)),
            ..Self::new()
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`. An earlier `now` yields a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let mut dt = now.saturating_duration_since(self.last);
        if let Some((lo, hi)) = self.clamps {
            dt = dt.clamp(lo, hi);
        }

        self.last = self.last.max(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.last.saturating_duration_since(self.start).as_secs_f32(),
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
    fn delta_is_difference_between_ticks() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);

        let a = clock.tick_at(t0 + Duration::from_millis(16));
        let b = clock.tick_at(t0 + Duration::from_millis(40));

        assert!((a.dt - 0.016).abs() < 1e-6);
        assert!((b.dt - 0.024).abs() < 1e-6);
        assert!((b.elapsed - 0.040).abs() < 1e-6);
    }

    #[test]
    fn frame_index_counts_ticks() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        assert_eq!(clock.tick_at(t0).frame_index, 0);
        assert_eq!(clock.tick_at(t0).frame_index, 1);
        assert_eq!(clock.tick_at(t0).frame_index, 2);
    }

    #[test]
    fn going_backwards_gives_zero_delta() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0 + Duration::from_millis(10));
        let ft = clock.tick_at(t0);
        assert_eq!(ft.dt, 0.0);
    }

    #[test]
    fn clamps_bound_the_delta() {
        let mut clock =
            FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let base = clock.last;

        let long = clock.tick_at(base + Duration::from_secs(3));
        assert!((long.dt - 0.1).abs() < 1e-6);

        let short = clock.tick_at(base + Duration::from_secs(3));
        assert!((short.dt - 0.001).abs() < 1e-6);
    }
}
