//! Frame clock and loop scheduling state.

use instant::Instant;
use std::time::Duration;

/// Timing delivered to kernels for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Milliseconds since the previous frame (never negative).
    pub dt_ms: f64,
    /// Seconds accumulated since the clock was created.
    pub elapsed_seconds: f64,
}

impl FrameTime {
    #[inline]
    pub fn dt_seconds(&self) -> f32 {
        (self.dt_ms / 1000.0) as f32
    }
}

/// Accumulates simulated time from real elapsed time.
///
/// There is no catch-up or cap: a long pause between ticks is delivered as one
/// large step.
#[derive(Clone, Debug)]
pub struct Clock {
    last_tick: Instant,
    elapsed: f64,
}

impl Clock {
    pub fn new(now: Instant) -> Self {
        Self {
            last_tick: now,
            elapsed: 0.0,
        }
    }

    /// Advance to `now`. Instants earlier than the last tick count as zero.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let dt = if now > self.last_tick {
            let dt = now - self.last_tick;
            self.last_tick = now;
            dt
        } else {
            Duration::ZERO
        };
        self.advance(dt)
    }

    /// Advance by an explicit step without consulting the wall clock.
    pub fn advance(&mut self, dt: Duration) -> FrameTime {
        self.elapsed += dt.as_secs_f64();
        FrameTime {
            dt_ms: dt.as_secs_f64() * 1000.0,
            elapsed_seconds: self.elapsed,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }
}

/// What the host should do after [`LoopDriver::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartAction {
    /// Single-shot: render exactly one frame now, schedule nothing.
    RenderOnce,
    /// Continuous: schedule frames until stopped.
    Schedule,
}

/// Continuous vs single-shot scheduling on top of a [`Clock`].
///
/// Ticks are cooperative: the host calls [`tick`](Self::tick) once per
/// scheduled frame and only schedules the next one after it returns.
#[derive(Clone, Debug)]
pub struct LoopDriver {
    clock: Clock,
    single_shot: bool,
    running: bool,
}

impl LoopDriver {
    pub fn new(now: Instant, single_shot: bool) -> Self {
        Self {
            clock: Clock::new(now),
            single_shot,
            running: false,
        }
    }

    pub fn start(&mut self) -> StartAction {
        if self.single_shot {
            self.running = false;
            StartAction::RenderOnce
        } else {
            self.running = true;
            StartAction::Schedule
        }
    }

    /// Cancel scheduling. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self, now: Instant) -> FrameTime {
        self.clock.tick(now)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_running_sum_of_steps() {
        let t0 = Instant::now();
        let mut clock = Clock::new(t0);
        let steps = [16u64, 0, 33, 250, 1, 5000];
        let mut now = t0;
        let mut sum = 0.0;
        for ms in steps {
            now += Duration::from_millis(ms);
            let ft = clock.tick(now);
            sum += ms as f64 / 1000.0;
            assert!((ft.dt_ms - ms as f64).abs() < 1e-6);
            assert!((ft.elapsed_seconds - sum).abs() < 1e-9);
        }
    }

    #[test]
    fn backwards_instant_is_zero_dt() {
        let t0 = Instant::now();
        let mut clock = Clock::new(t0 + Duration::from_millis(100));
        let ft = clock.tick(t0);
        assert_eq!(ft.dt_ms, 0.0);
        assert_eq!(clock.elapsed_seconds(), 0.0);
        let ft = clock.tick(t0 + Duration::from_millis(150));
        assert!((ft.dt_ms - 50.0).abs() < 1e-6);
    }

    #[test]
    fn single_shot_start_does_not_run() {
        let mut driver = LoopDriver::new(Instant::now(), true);
        assert_eq!(driver.start(), StartAction::RenderOnce);
        assert!(!driver.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut driver = LoopDriver::new(Instant::now(), false);
        assert_eq!(driver.start(), StartAction::Schedule);
        assert!(driver.is_running());
        driver.stop();
        driver.stop();
        assert!(!driver.is_running());
    }
}
