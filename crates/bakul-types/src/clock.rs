use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Wall-clock instant used for `date_created` / `date_modified`.
pub type Timestamp = DateTime<Utc>;

/// Source of item timestamps.
///
/// Implementations must return strictly increasing values: the tree orders
/// siblings by `(date_created, date_modified)`, and items created in one
/// batch must keep the order in which they were created.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock that never repeats or goes backwards.
///
/// When the wall clock has not advanced past the previous reading (same
/// tick, or the system clock stepped back) the previous reading plus one
/// microsecond is returned instead.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<Timestamp>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never return a value at or before `floor`, e.g. the newest timestamp
    /// found in a restored snapshot.
    pub fn with_floor(floor: Timestamp) -> Self {
        Self {
            last: Mutex::new(Some(floor)),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let wall = Utc::now();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *last {
            Some(prev) if wall <= prev => prev + Duration::microseconds(1),
            _ => wall,
        };
        *last = Some(next);
        next
    }
}

/// Deterministic clock advancing by a fixed step on every reading.
#[derive(Debug)]
pub struct FixedStepClock {
    step: Duration,
    current: Mutex<Timestamp>,
}

impl FixedStepClock {
    /// The first reading is `start`; each following one adds `step`.
    pub fn new(start: Timestamp, step: Duration) -> Self {
        Self {
            step,
            current: Mutex::new(start - step),
        }
    }
}

impl Clock for FixedStepClock {
    fn now(&self) -> Timestamp {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += self.step;
        *current
    }
}
