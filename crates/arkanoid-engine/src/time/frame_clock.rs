use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds. May be `0.0`.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Instantaneous frames per second derived from `dt`.
    ///
    /// Returns `f32::INFINITY` for a zero `dt` instead of dividing by zero.
    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { f32::INFINITY }
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Every `tick` reads the time since the previous tick and rebases the clock
/// to zero, so each frame sees only its own elapsed time.
///
/// `dt` is raw wall-clock time: a long stall produces a long `dt`. A cap can be
/// opted into with [`FrameClock::with_max`]. There is no lower clamp; a zero
/// `dt` is a valid reading and downstream math tolerates it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_max: Option<Duration>,
}

impl FrameClock {
    /// Creates an uncapped clock.
    pub fn new() -> Self {
        Self::with_max(None)
    }

    /// Creates a clock with a custom cap, or no cap at all.
    pub fn with_max(dt_max: Option<Duration>) -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_max,
        }
    }

    /// Resets the clock baseline without producing a tick.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    ///
    /// A `now` earlier than the previous tick yields `dt == 0`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let mut dt = now.saturating_duration_since(self.last);

        if let Some(max) = self.dt_max {
            dt = dt.min(max);
        }

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
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
    fn tick_measures_since_previous_tick() {
        let mut clock = FrameClock::with_max(None);
        let start = Instant::now();
        clock.tick_at(start);

        let ft = clock.tick_at(start + Duration::from_millis(100));
        assert!((ft.dt - 0.1).abs() < 1e-6);

        // Rebased: the next reading starts from the previous tick, not from start.
        let ft = clock.tick_at(start + Duration::from_millis(150));
        assert!((ft.dt - 0.05).abs() < 1e-6);
    }

    #[test]
    fn zero_elapsed_gives_zero_dt_and_infinite_fps() {
        let mut clock = FrameClock::with_max(None);
        let start = Instant::now();
        clock.tick_at(start);

        let ft = clock.tick_at(start);
        assert_eq!(ft.dt, 0.0);
        assert!(ft.fps().is_infinite());
    }

    #[test]
    fn backwards_time_saturates_to_zero() {
        let mut clock = FrameClock::with_max(None);
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick_at(start);

        let ft = clock.tick_at(start - Duration::from_millis(10));
        assert_eq!(ft.dt, 0.0);
    }

    #[test]
    fn default_clock_reports_full_stalls() {
        let mut clock = FrameClock::default();
        let start = Instant::now();
        clock.tick_at(start);

        let ft = clock.tick_at(start + Duration::from_secs(2));
        assert_eq!(ft.dt, 2.0);
    }

    #[test]
    fn opt_in_cap_limits_stalls() {
        let mut clock = FrameClock::with_max(Some(Duration::from_millis(250)));
        let start = Instant::now();
        clock.tick_at(start);

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::default();
        let start = Instant::now();
        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start).frame_index, 1);
        assert_eq!(clock.tick_at(start).frame_index, 2);
    }

    #[test]
    fn fps_is_reciprocal_of_dt() {
        let ft = FrameTime { dt: 0.02, now: Instant::now(), frame_index: 0 };
        assert!((ft.fps() - 50.0).abs() < 1e-3);
    }
}
