use chrono::{DateTime, Utc};

/// Source of wall-clock time for join dates and result stamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// System time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
