//! crates/booking_core/src/machine.rs
//!
//! The booking state machine.
//!
//! [`transition`] is a total function from the current selection and one
//! intent to the next selection. A refused intent never changes state; the
//! refusal is returned so callers can log it, but it is not meant to be shown
//! to the user (the presentation layer disables those controls already).
//! [`BookingSession`] owns a selection and feeds intents through it.

use crate::availability::{is_booked, slot_availability, SlotAvailability};
use crate::domain::{BookingPhase, BookingSelection, ConfirmedBooking, ContactField, SlotLabel};
use crate::ports::Clock;
use crate::roster::Roster;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Something the user asked the booking flow to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ChoosePractitioner(u32),
    ShiftDate(i64),
    ResetToToday,
    ChooseSlot(SlotLabel),
    EditContact { field: ContactField, value: String },
    Submit,
    /// The user dismissed the confirmation screen.
    Acknowledge,
    /// The confirmation dwell time elapsed.
    AutoReset,
}

/// Why an intent left the selection untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    #[error("No practitioner with id {0}")]
    UnknownPractitioner(u32),
    #[error("A practitioner must be chosen before a slot")]
    NoPractitioner,
    #[error("Slot {0} is not in the catalog")]
    UnknownSlot(SlotLabel),
    #[error("Slot {slot} on {date} is already booked")]
    SlotBooked { slot: SlotLabel, date: NaiveDate },
    #[error("Shifting the date by {0} days leaves the calendar range")]
    DateOutOfRange(i64),
    #[error("Booking needs a practitioner, a slot, a name and an email or phone")]
    IncompleteBooking,
    #[error("The booking is confirmed and can no longer be edited")]
    Frozen,
    #[error("There is no confirmed booking to clear")]
    NotConfirmed,
}

/// Everything a transition may read besides the selection itself.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub roster: &'a Roster,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

/// The result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied(BookingSelection),
    Confirmed {
        selection: BookingSelection,
        booking: ConfirmedBooking,
    },
    Refused(Refusal),
}

/// Computes the selection that follows `intent`.
pub fn transition(
    selection: &BookingSelection,
    intent: Intent,
    ctx: &TransitionContext<'_>,
) -> Transition {
    if selection.confirmed {
        return match intent {
            Intent::Acknowledge | Intent::AutoReset => {
                Transition::Applied(BookingSelection::empty(ctx.today))
            }
            _ => Transition::Refused(Refusal::Frozen),
        };
    }

    let mut next = selection.clone();
    match intent {
        Intent::ChoosePractitioner(id) => {
            let Some(practitioner) = ctx.roster.practitioner(id) else {
                return Transition::Refused(Refusal::UnknownPractitioner(id));
            };
            if next.practitioner_id() != Some(id) {
                next.practitioner = Some(practitioner.clone());
                next.slot = None;
            }
        }
        Intent::ShiftDate(days) => {
            let Some(date) = Duration::try_days(days).and_then(|d| next.date.checked_add_signed(d))
            else {
                return Transition::Refused(Refusal::DateOutOfRange(days));
            };
            next.date = date;
            next.slot = None;
        }
        Intent::ResetToToday => {
            next.date = ctx.today;
            next.slot = None;
        }
        Intent::ChooseSlot(slot) => {
            if next.practitioner.is_none() {
                return Transition::Refused(Refusal::NoPractitioner);
            }
            if !ctx.roster.has_slot(&slot) {
                return Transition::Refused(Refusal::UnknownSlot(slot));
            }
            if is_booked(
                next.practitioner_id(),
                next.date,
                &slot,
                ctx.roster.existing_appointments(),
            ) {
                return Transition::Refused(Refusal::SlotBooked {
                    slot,
                    date: next.date,
                });
            }
            next.slot = Some(slot);
        }
        Intent::EditContact { field, value } => {
            next.contact.set(field, value);
        }
        Intent::Submit => {
            if !next.can_submit() {
                return Transition::Refused(Refusal::IncompleteBooking);
            }
            let (Some(practitioner), Some(slot)) = (next.practitioner.clone(), next.slot.clone())
            else {
                return Transition::Refused(Refusal::IncompleteBooking);
            };
            next.confirmed = true;
            let booking = ConfirmedBooking {
                reference: Uuid::new_v4(),
                practitioner,
                date: next.date,
                slot,
                contact: next.contact.clone(),
                confirmed_at: ctx.now,
            };
            return Transition::Confirmed {
                selection: next,
                booking,
            };
        }
        Intent::Acknowledge | Intent::AutoReset => {
            return Transition::Refused(Refusal::NotConfirmed);
        }
    }
    Transition::Applied(next)
}

//=========================================================================================
// BookingSession
//=========================================================================================

/// One user's booking flow.
pub struct BookingSession {
    roster: Arc<Roster>,
    clock: Arc<dyn Clock>,
    selection: BookingSelection,
}

impl BookingSession {
    /// Starts an empty session dated today.
    pub fn new(roster: Arc<Roster>, clock: Arc<dyn Clock>) -> Self {
        let selection = BookingSelection::empty(clock.today());
        Self {
            roster,
            clock,
            selection,
        }
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn phase(&self) -> BookingPhase {
        self.selection.phase(self.clock.today())
    }

    pub fn can_submit(&self) -> bool {
        self.selection.can_submit()
    }

    /// Booked flags for every slot of the selected practitioner and date.
    pub fn availability(&self) -> Vec<SlotAvailability> {
        slot_availability(
            self.selection.practitioner_id(),
            self.selection.date,
            self.roster.list_slot_labels(),
            self.roster.existing_appointments(),
        )
    }

    /// Applies one intent. Returns the confirmed booking when the intent was a
    /// successful submit.
    pub fn apply(&mut self, intent: Intent) -> Result<Option<ConfirmedBooking>, Refusal> {
        let ctx = TransitionContext {
            roster: &self.roster,
            today: self.clock.today(),
            now: self.clock.now(),
        };
        match transition(&self.selection, intent, &ctx) {
            Transition::Applied(next) => {
                self.selection = next;
                Ok(None)
            }
            Transition::Confirmed { selection, booking } => {
                self.selection = selection;
                Ok(Some(booking))
            }
            Transition::Refused(refusal) => Err(refusal),
        }
    }

    pub fn choose_practitioner(&mut self, id: u32) -> Result<(), Refusal> {
        self.apply(Intent::ChoosePractitioner(id)).map(|_| ())
    }

    pub fn shift_date(&mut self, delta_days: i64) -> Result<(), Refusal> {
        self.apply(Intent::ShiftDate(delta_days)).map(|_| ())
    }

    pub fn reset_to_today(&mut self) -> Result<(), Refusal> {
        self.apply(Intent::ResetToToday).map(|_| ())
    }

    pub fn choose_slot(&mut self, slot: impl Into<SlotLabel>) -> Result<(), Refusal> {
        self.apply(Intent::ChooseSlot(slot.into())).map(|_| ())
    }

    pub fn edit_contact(
        &mut self,
        field: ContactField,
        value: impl Into<String>,
    ) -> Result<(), Refusal> {
        self.apply(Intent::EditContact {
            field,
            value: value.into(),
        })
        .map(|_| ())
    }

    pub fn submit(&mut self) -> Result<ConfirmedBooking, Refusal> {
        self.apply(Intent::Submit)?.ok_or(Refusal::IncompleteBooking)
    }

    pub fn acknowledge(&mut self) -> Result<(), Refusal> {
        self.apply(Intent::Acknowledge).map(|_| ())
    }

    pub fn auto_reset(&mut self) -> Result<(), Refusal> {
        self.apply(Intent::AutoReset).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use rstest::rstest;

    fn june_20() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 20).expect("valid date")
    }

    fn session() -> BookingSession {
        BookingSession::new(
            Arc::new(Roster::sample()),
            Arc::new(FixedClock::on(june_20())),
        )
    }

    fn ready_session() -> BookingSession {
        let mut s = session();
        s.choose_practitioner(2).unwrap();
        s.choose_slot("03:00 PM").unwrap();
        s
    }

    #[test]
    fn starts_empty_and_browsing() {
        let s = session();
        assert_eq!(s.selection(), &BookingSelection::empty(june_20()));
        assert_eq!(s.phase(), BookingPhase::Browsing);
        assert!(s.availability().is_empty());
    }

    #[rstest]
    #[case(2, "02:00 PM", Err(Refusal::SlotBooked { slot: SlotLabel::from("02:00 PM"), date: june_20() }))]
    #[case(2, "03:00 PM", Ok(()))]
    #[case(1, "10:00 AM", Err(Refusal::SlotBooked { slot: SlotLabel::from("10:00 AM"), date: june_20() }))]
    #[case(1, "09:00 AM", Ok(()))]
    fn choose_slot_refuses_booked_slots(
        #[case] practitioner: u32,
        #[case] slot: &str,
        #[case] expected: Result<(), Refusal>,
    ) {
        let mut s = session();
        s.choose_practitioner(practitioner).unwrap();
        let before = s.selection().clone();

        let result = s.choose_slot(slot);
        assert_eq!(result, expected);
        match result {
            Ok(()) => assert_eq!(s.selection().slot, Some(SlotLabel::from(slot))),
            Err(_) => assert_eq!(s.selection(), &before),
        }
    }

    #[test]
    fn slot_requires_practitioner_and_catalog_label() {
        let mut s = session();
        assert_eq!(s.choose_slot("09:00 AM"), Err(Refusal::NoPractitioner));
        assert!(s.selection().slot.is_none());

        s.choose_practitioner(1).unwrap();
        assert_eq!(
            s.choose_slot("01:00 PM"),
            Err(Refusal::UnknownSlot(SlotLabel::from("01:00 PM")))
        );
    }

    #[test]
    fn unknown_practitioner_is_refused() {
        let mut s = session();
        assert_eq!(
            s.choose_practitioner(42),
            Err(Refusal::UnknownPractitioner(42))
        );
        assert_eq!(s.phase(), BookingPhase::Browsing);
    }

    #[test]
    fn changing_practitioner_clears_slot_but_reselecting_does_not() {
        let mut s = ready_session();
        s.choose_practitioner(2).unwrap();
        assert_eq!(s.selection().slot, Some(SlotLabel::from("03:00 PM")));

        s.choose_practitioner(3).unwrap();
        assert!(s.selection().slot.is_none());
        assert_eq!(s.selection().practitioner_id(), Some(3));
    }

    #[rstest]
    #[case(Intent::ShiftDate(1))]
    #[case(Intent::ShiftDate(-1))]
    #[case(Intent::ShiftDate(0))]
    #[case(Intent::ResetToToday)]
    fn date_changes_always_clear_slot(#[case] intent: Intent) {
        let mut s = ready_session();
        s.apply(intent).unwrap();
        assert!(s.selection().slot.is_none());
        assert!(s.selection().practitioner.is_some());
    }

    #[test]
    fn shift_date_uses_calendar_days() {
        let mut s = session();
        s.shift_date(11).unwrap();
        assert_eq!(
            s.selection().date,
            NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
        );
        s.shift_date(-31).unwrap();
        assert_eq!(
            s.selection().date,
            NaiveDate::from_ymd_opt(2023, 5, 31).unwrap()
        );
        s.reset_to_today().unwrap();
        assert_eq!(s.selection().date, june_20());
    }

    #[test]
    fn shift_date_out_of_range_is_refused() {
        let mut s = session();
        assert_eq!(
            s.shift_date(i64::MAX),
            Err(Refusal::DateOutOfRange(i64::MAX))
        );
        assert_eq!(s.selection().date, june_20());
    }

    #[test]
    fn booked_slot_becomes_free_on_another_day() {
        let mut s = session();
        s.choose_practitioner(2).unwrap();
        s.shift_date(1).unwrap();
        assert_eq!(s.choose_slot("02:00 PM"), Ok(()));
    }

    #[test]
    fn submit_needs_a_contact_channel() {
        let mut s = ready_session();
        s.edit_contact(ContactField::FullName, "Jane Doe").unwrap();
        assert!(!s.can_submit());
        assert_eq!(s.submit(), Err(Refusal::IncompleteBooking));
        assert!(!s.selection().confirmed);

        s.edit_contact(ContactField::Email, "j@x.com").unwrap();
        let booking = s.submit().unwrap();
        assert_eq!(s.phase(), BookingPhase::Confirmed);
        assert_eq!(booking.practitioner.id, 2);
        assert_eq!(booking.slot, SlotLabel::from("03:00 PM"));
        assert_eq!(booking.date, june_20());
        assert_eq!(booking.contact.email, "j@x.com");
    }

    #[test]
    fn submit_without_slot_is_refused() {
        let mut s = session();
        s.choose_practitioner(1).unwrap();
        s.edit_contact(ContactField::FullName, "Jane Doe").unwrap();
        s.edit_contact(ContactField::Phone, "555-0100").unwrap();
        let before = s.selection().clone();
        assert_eq!(s.submit(), Err(Refusal::IncompleteBooking));
        assert_eq!(s.selection(), &before);
    }

    #[test]
    fn confirmed_selection_is_frozen() {
        let mut s = ready_session();
        s.edit_contact(ContactField::FullName, "Jane Doe").unwrap();
        s.edit_contact(ContactField::Phone, "555-0100").unwrap();
        s.submit().unwrap();
        let frozen = s.selection().clone();

        assert_eq!(s.choose_practitioner(1), Err(Refusal::Frozen));
        assert_eq!(s.shift_date(1), Err(Refusal::Frozen));
        assert_eq!(
            s.edit_contact(ContactField::Notes, "late"),
            Err(Refusal::Frozen)
        );
        assert_eq!(s.submit(), Err(Refusal::Frozen));
        assert_eq!(s.selection(), &frozen);
    }

    #[rstest]
    #[case(Intent::AutoReset)]
    #[case(Intent::Acknowledge)]
    fn reset_restores_initial_state(#[case] intent: Intent) {
        let mut s = ready_session();
        s.shift_date(3).unwrap();
        s.choose_slot("09:00 AM").unwrap();
        s.edit_contact(ContactField::FullName, "Jane Doe").unwrap();
        s.edit_contact(ContactField::Email, "j@x.com").unwrap();
        s.submit().unwrap();

        s.apply(intent).unwrap();
        assert_eq!(s.selection(), &BookingSelection::empty(june_20()));
        assert_eq!(s.phase(), BookingPhase::Browsing);
    }

    #[test]
    fn reset_without_confirmation_is_refused() {
        let mut s = ready_session();
        let before = s.selection().clone();
        assert_eq!(s.auto_reset(), Err(Refusal::NotConfirmed));
        assert_eq!(s.acknowledge(), Err(Refusal::NotConfirmed));
        assert_eq!(s.selection(), &before);
    }

    #[test]
    fn phases_follow_the_flow() {
        let mut s = session();
        s.choose_practitioner(1).unwrap();
        assert_eq!(s.phase(), BookingPhase::SelectingDate);
        s.shift_date(1).unwrap();
        assert_eq!(s.phase(), BookingPhase::SelectingSlot);
        s.choose_slot("11:00 AM").unwrap();
        assert_eq!(s.phase(), BookingPhase::ReadyToConfirm);
    }

    #[test]
    fn slot_never_outlives_practitioner() {
        let intents = [
            Intent::ChooseSlot(SlotLabel::from("09:00 AM")),
            Intent::ChoosePractitioner(4),
            Intent::ChooseSlot(SlotLabel::from("09:00 AM")),
            Intent::ChoosePractitioner(99),
            Intent::ShiftDate(2),
            Intent::ChooseSlot(SlotLabel::from("05:00 PM")),
            Intent::EditContact {
                field: ContactField::FullName,
                value: "Jane Doe".to_string(),
            },
            Intent::EditContact {
                field: ContactField::Phone,
                value: "555-0100".to_string(),
            },
            Intent::Submit,
            Intent::ChooseSlot(SlotLabel::from("04:00 PM")),
            Intent::AutoReset,
            Intent::ChooseSlot(SlotLabel::from("04:00 PM")),
        ];
        let mut s = session();
        for intent in intents {
            let _ = s.apply(intent);
            let sel = s.selection();
            assert!(sel.slot.is_none() || sel.practitioner.is_some());
        }
    }

    #[test]
    fn empty_roster_offers_nothing_to_book() {
        let mut s = BookingSession::new(
            Arc::new(Roster::default()),
            Arc::new(FixedClock::on(june_20())),
        );
        assert_eq!(
            s.choose_practitioner(1),
            Err(Refusal::UnknownPractitioner(1))
        );
        assert!(s.availability().is_empty());
        assert_eq!(s.submit(), Err(Refusal::IncompleteBooking));
    }
}
