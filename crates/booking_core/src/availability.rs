//! crates/booking_core/src/availability.rs
//!
//! Decides whether a slot is already taken.
//!
//! Both functions scan the appointment list linearly. The appointment data is
//! a short fixture, so there is no index keyed by practitioner or date.

use crate::domain::{ExistingAppointment, SlotLabel};
use chrono::NaiveDate;

/// Whether a slot is shown to the presentation layer as taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: SlotLabel,
    pub booked: bool,
}

/// True iff an existing appointment matches the practitioner, date and slot exactly.
///
/// Without a practitioner there is nothing to check against and the slot is
/// reported as free.
pub fn is_booked(
    practitioner_id: Option<u32>,
    date: NaiveDate,
    slot: &SlotLabel,
    appointments: &[ExistingAppointment],
) -> bool {
    let Some(practitioner_id) = practitioner_id else {
        return false;
    };
    appointments
        .iter()
        .any(|a| a.practitioner_id == practitioner_id && a.date == date && &a.slot == slot)
}

/// Availability of every catalog slot for one practitioner and day, in catalog order.
///
/// Returns an empty list when no practitioner is selected: the slot grid is
/// only shown once a practitioner has been chosen.
pub fn slot_availability(
    practitioner_id: Option<u32>,
    date: NaiveDate,
    catalog: &[SlotLabel],
    appointments: &[ExistingAppointment],
) -> Vec<SlotAvailability> {
    if practitioner_id.is_none() {
        return Vec::new();
    }
    catalog
        .iter()
        .map(|slot| SlotAvailability {
            slot: slot.clone(),
            booked: is_booked(practitioner_id, date, slot, appointments),
        })
        .collect()
}
