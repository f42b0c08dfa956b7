pub mod availability;
pub mod domain;
pub mod machine;
pub mod ports;
pub mod roster;

pub use availability::{is_booked, slot_availability, SlotAvailability};
pub use domain::{
    BookingPhase, BookingSelection, ConfirmedBooking, ContactField, ExistingAppointment,
    PatientContact, Practitioner, SlotLabel, UnknownContactField,
};
pub use machine::{transition, BookingSession, Intent, Refusal, Transition, TransitionContext};
pub use ports::{BookingNotifier, Clock, FixedClock, PortError, PortResult};
pub use roster::Roster;
