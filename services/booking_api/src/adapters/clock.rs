//! services/booking_api/src/adapters/clock.rs
//!
//! The wall-clock adapter for the `Clock` port.

use booking_core::ports::Clock;
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Reads the date from the host's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
