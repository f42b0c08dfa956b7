//! services/booking_api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the booking widget in the
//! browser and the session host, plus the JSON views shared with the REST API.

use booking_core::availability::SlotAvailability;
use booking_core::domain::{
    BookingPhase, BookingSelection, ConfirmedBooking, ContactField, PatientContact, Practitioner,
    SlotLabel, UnknownContactField,
};
use booking_core::machine::{BookingSession, Intent};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// The user intents the widget forwards to its session.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ChoosePractitioner { practitioner_id: u32 },

    /// Moves the selected date by whole days; negative values go back.
    ShiftDate { days: i64 },

    ResetToToday,

    ChooseSlot { slot: String },

    /// `field` is one of `full_name`, `email`, `phone` or `notes`.
    EditContact { field: String, value: String },

    Submit,

    /// Dismisses the confirmation screen before the dwell time runs out.
    Acknowledge,
}

impl ClientMessage {
    pub fn into_intent(self) -> Result<Intent, UnknownContactField> {
        Ok(match self {
            Self::ChoosePractitioner { practitioner_id } => {
                Intent::ChoosePractitioner(practitioner_id)
            }
            Self::ShiftDate { days } => Intent::ShiftDate(days),
            Self::ResetToToday => Intent::ResetToToday,
            Self::ChooseSlot { slot } => Intent::ChooseSlot(SlotLabel::new(slot)),
            Self::EditContact { field, value } => Intent::EditContact {
                field: field.parse::<ContactField>()?,
                value,
            },
            Self::Submit => Intent::Submit,
            Self::Acknowledge => Intent::Acknowledge,
        })
    }
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The full session state, sent after every intent and every reset.
    Render(SessionView),

    /// Sent once when a booking is submitted successfully.
    Confirmed { booking: BookingDto },

    /// The last message could not be understood.
    Error { message: String },
}

//=========================================================================================
// JSON Views
//=========================================================================================

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct PractitionerDto {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub avatar_ref: String,
}

impl From<&Practitioner> for PractitionerDto {
    fn from(p: &Practitioner) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            specialty: p.specialty.clone(),
            avatar_ref: p.avatar_ref.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct SlotDto {
    pub slot: String,
    pub booked: bool,
}

impl From<&SlotAvailability> for SlotDto {
    fn from(s: &SlotAvailability) -> Self {
        Self {
            slot: s.slot.to_string(),
            booked: s.booked,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ContactDto {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl From<&PatientContact> for ContactDto {
    fn from(c: &PatientContact) -> Self {
        Self {
            full_name: c.full_name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            notes: c.notes.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct SelectionDto {
    pub practitioner: Option<PractitionerDto>,
    pub date: NaiveDate,
    pub slot: Option<String>,
    pub contact: ContactDto,
    pub confirmed: bool,
}

impl From<&BookingSelection> for SelectionDto {
    fn from(s: &BookingSelection) -> Self {
        Self {
            practitioner: s.practitioner.as_ref().map(PractitionerDto::from),
            date: s.date,
            slot: s.slot.as_ref().map(SlotLabel::to_string),
            contact: ContactDto::from(&s.contact),
            confirmed: s.confirmed,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseDto {
    Browsing,
    SelectingDate,
    SelectingSlot,
    ReadyToConfirm,
    Confirmed,
}

impl From<BookingPhase> for PhaseDto {
    fn from(phase: BookingPhase) -> Self {
        match phase {
            BookingPhase::Browsing => Self::Browsing,
            BookingPhase::SelectingDate => Self::SelectingDate,
            BookingPhase::SelectingSlot => Self::SelectingSlot,
            BookingPhase::ReadyToConfirm => Self::ReadyToConfirm,
            BookingPhase::Confirmed => Self::Confirmed,
        }
    }
}

/// Everything the widget needs to redraw itself.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub selection: SelectionDto,
    pub phase: PhaseDto,
    pub can_submit: bool,
    pub slots: Vec<SlotDto>,
}

impl From<&BookingSession> for SessionView {
    fn from(session: &BookingSession) -> Self {
        Self {
            selection: SelectionDto::from(session.selection()),
            phase: session.phase().into(),
            can_submit: session.can_submit(),
            slots: session.availability().iter().map(SlotDto::from).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct BookingDto {
    pub reference: Uuid,
    pub practitioner: PractitionerDto,
    pub date: NaiveDate,
    pub slot: String,
    pub contact: ContactDto,
    pub confirmed_at: DateTime<Utc>,
}

impl From<&ConfirmedBooking> for BookingDto {
    fn from(b: &ConfirmedBooking) -> Self {
        Self {
            reference: b.reference,
            practitioner: PractitionerDto::from(&b.practitioner),
            date: b.date,
            slot: b.slot.to_string(),
            contact: ContactDto::from(&b.contact),
            confirmed_at: b.confirmed_at,
        }
    }
}
