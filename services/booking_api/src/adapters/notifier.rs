//! services/booking_api/src/adapters/notifier.rs
//!
//! This module contains the notification sink for confirmed bookings.
//! It implements the `BookingNotifier` port from the `core` crate by emitting
//! one structured log event per booking.

use async_trait::async_trait;
use booking_core::domain::ConfirmedBooking;
use booking_core::ports::{BookingNotifier, PortError, PortResult};
use tracing::info;

use crate::web::protocol::BookingDto;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A notifier that writes every confirmed booking to the `tracing` pipeline.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

//=========================================================================================
// `BookingNotifier` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookingNotifier for TracingNotifier {
    async fn notify(&self, booking: &ConfirmedBooking) -> PortResult<()> {
        let record = serde_json::to_string(&BookingDto::from(booking))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        info!(
            reference = %booking.reference,
            practitioner_id = booking.practitioner.id,
            date = %booking.date,
            slot = %booking.slot,
            record = %record,
            "Booking confirmed"
        );
        Ok(())
    }
}
