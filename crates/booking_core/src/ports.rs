//! crates/booking_core/src/ports.rs
//!
//! Defines the service contracts (traits) the booking core depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of wall clocks, runtimes and notification channels.

use crate::domain::ConfirmedBooking;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn now(&self) -> DateTime<Utc>;
}

/// Receives finalized bookings.
///
/// Callers treat this as fire-and-forget: a failed notification is the sink's
/// own concern and never changes the booking state.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn notify(&self, booking: &ConfirmedBooking) -> PortResult<()>;
}

/// A clock pinned to a single instant. Useful for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
}

impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            now: date.and_hms_opt(9, 0, 0).unwrap_or_default().and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
