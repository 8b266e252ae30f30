use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source driving the experiment loop. Timestamps are
/// milliseconds since the clock's own epoch, never wall-clock time.
pub trait Clock {
    fn now_ms(&self) -> u64;
    fn sleep(&self, d: Duration);
}

/// Production clock backed by `Instant`, with a high-precision sleep path
/// on Linux (`clock_nanosleep` against the monotonic clock).
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep(&self, d: Duration) {
        precise_sleep(d);
    }
}

#[cfg(target_os = "linux")]
fn precise_sleep(duration: Duration) {
    use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

    let req = timespec {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_nsec: duration.subsec_nanos() as libc::c_long,
    };

    unsafe {
        clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
    }
}

#[cfg(not(target_os = "linux"))]
fn precise_sleep(duration: Duration) {
    std::thread::sleep(duration);
}

/// Deterministic clock for tests and simulations. Time only moves when
/// advanced explicitly; `sleep` advances it by the requested amount, so a
/// cooperative loop driven by this clock runs instantly.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d.as_millis() as u64);
    }
}
