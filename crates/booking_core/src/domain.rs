//! crates/booking_core/src/domain.rs
//!
//! Defines the pure, core data structures for booking an appointment.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A practitioner that can be booked. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Practitioner {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub avatar_ref: String,
}

/// A time-of-day label taken from the slot catalog, e.g. `"09:00 AM"`.
///
/// The label is opaque: slots are ordered by their position in the catalog,
/// never by comparing the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotLabel(String);

impl SlotLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// An appointment that already occupies a practitioner's slot on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAppointment {
    pub practitioner_id: u32,
    pub date: NaiveDate,
    pub slot: SlotLabel,
    pub patient_label: String,
}

/// Contact details typed into the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientContact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl PatientContact {
    /// Replaces a single field, leaving the others untouched.
    pub fn set(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::FullName => self.full_name = value,
            ContactField::Email => self.email = value,
            ContactField::Phone => self.phone = value,
            ContactField::Notes => self.notes = value,
        }
    }

    /// A name plus at least one way to reach the patient.
    pub fn is_reachable(&self) -> bool {
        is_present(&self.full_name) && (is_present(&self.email) || is_present(&self.phone))
    }
}

fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Names one editable field of [`PatientContact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    FullName,
    Email,
    Phone,
    Notes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown contact field: {0}")]
pub struct UnknownContactField(pub String);

impl FromStr for ContactField {
    type Err = UnknownContactField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullName" | "full_name" => Ok(Self::FullName),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "notes" => Ok(Self::Notes),
            other => Err(UnknownContactField(other.to_string())),
        }
    }
}

/// The state of one booking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSelection {
    pub practitioner: Option<Practitioner>,
    pub date: NaiveDate,
    pub slot: Option<SlotLabel>,
    pub contact: PatientContact,
    pub confirmed: bool,
}

impl BookingSelection {
    /// The initial empty selection for a session starting on `today`.
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            practitioner: None,
            date: today,
            slot: None,
            contact: PatientContact::default(),
            confirmed: false,
        }
    }

    pub fn practitioner_id(&self) -> Option<u32> {
        self.practitioner.as_ref().map(|p| p.id)
    }

    /// Whether every field required to confirm the booking is filled in.
    pub fn can_submit(&self) -> bool {
        !self.confirmed
            && self.practitioner.is_some()
            && self.slot.is_some()
            && self.contact.is_reachable()
    }

    /// Which step of the booking flow this selection is at.
    ///
    /// `SelectingDate` covers a freshly chosen practitioner whose date is still
    /// the session default; once the date has been moved the flow is waiting
    /// on a slot.
    pub fn phase(&self, today: NaiveDate) -> BookingPhase {
        if self.confirmed {
            BookingPhase::Confirmed
        } else if self.practitioner.is_none() {
            BookingPhase::Browsing
        } else if self.slot.is_some() {
            BookingPhase::ReadyToConfirm
        } else if self.date != today {
            BookingPhase::SelectingSlot
        } else {
            BookingPhase::SelectingDate
        }
    }
}

/// The steps of the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPhase {
    Browsing,
    SelectingDate,
    SelectingSlot,
    ReadyToConfirm,
    Confirmed,
}

/// The finalized booking handed to the notification sink on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedBooking {
    pub reference: Uuid,
    pub practitioner: Practitioner,
    pub date: NaiveDate,
    pub slot: SlotLabel,
    pub contact: PatientContact,
    pub confirmed_at: DateTime<Utc>,
}
