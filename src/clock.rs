//! Clock sources and the monotonic timestamper.
//!
//! Entry and log timestamps are ISO-8601 local times with microsecond
//! precision. Within one dispatch cycle every issued timestamp is strictly
//! greater than the previous one, and greater than the newest timestamp
//! already recorded in the head log, even when the wall clock is coarse or
//! steps backwards.

use chrono::{Duration, Local, NaiveDateTime};
use std::sync::Arc;

/// Canonical rendering of a timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Parse pattern; the fractional part is optional.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Wall clock abstraction so dispatch can run against a frozen time in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Build from a timestamp string such as `1970-01-01T00:00:00.123456`.
    pub fn parse(s: &str) -> Option<Self> {
        parse_timestamp(s).map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, PARSE_FORMAT).ok()
}

/// Issues strictly increasing timestamps: `max(clock.now(), last + 1µs)`.
pub struct Timestamper {
    clock: Arc<dyn Clock>,
    last: Option<NaiveDateTime>,
}

impl Timestamper {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, last: None }
    }

    /// Raise the floor so later stamps sort after `ts`. Unparseable input is ignored.
    pub fn observe(&mut self, ts: &str) {
        if let Some(parsed) = parse_timestamp(ts) {
            if self.last.map_or(true, |last| parsed > last) {
                self.last = Some(parsed);
            }
        }
    }

    /// Next timestamp, rendered.
    pub fn next(&mut self) -> String {
        let now = self.clock.now();
        let issued = match self.last {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last = Some(issued);
        format_timestamp(&issued)
    }

    /// Current wall-clock reading, without advancing the stamper.
    pub fn peek_now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}
