//! crates/booking_core/src/roster.rs
//!
//! The read-only roster: practitioners, the slot catalog and the appointments
//! already on the books. Data is injected at construction and never changes.

use crate::domain::{ExistingAppointment, Practitioner, SlotLabel};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    practitioners: Vec<Practitioner>,
    slot_labels: Vec<SlotLabel>,
    appointments: Vec<ExistingAppointment>,
}

impl Roster {
    pub fn new(
        practitioners: Vec<Practitioner>,
        slot_labels: Vec<SlotLabel>,
        appointments: Vec<ExistingAppointment>,
    ) -> Self {
        Self {
            practitioners,
            slot_labels,
            appointments,
        }
    }

    /// Practitioners in catalog order.
    pub fn list_practitioners(&self) -> &[Practitioner] {
        &self.practitioners
    }

    /// Slot labels in catalog order.
    pub fn list_slot_labels(&self) -> &[SlotLabel] {
        &self.slot_labels
    }

    pub fn existing_appointments(&self) -> &[ExistingAppointment] {
        &self.appointments
    }

    pub fn practitioner(&self, id: u32) -> Option<&Practitioner> {
        self.practitioners.iter().find(|p| p.id == id)
    }

    pub fn has_slot(&self, slot: &SlotLabel) -> bool {
        self.slot_labels.contains(slot)
    }

    /// The compiled-in sample clinic.
    pub fn sample() -> Self {
        let practitioners = [
            (1, "Dr. Ana Martínez", "Cardiología", "Dr.+Ana"),
            (2, "Dr. Carlos Ruiz", "Pediatría", "Dr.+Carlos"),
            (3, "Dra. Laura Gómez", "Dermatología", "Dra.+Laura"),
            (4, "Dr. Javier Sánchez", "Ortopedia", "Dr.+Javier"),
        ]
        .into_iter()
        .map(|(id, name, specialty, avatar)| Practitioner {
            id,
            name: name.to_string(),
            specialty: specialty.to_string(),
            avatar_ref: format!("https://placehold.co/100x100?text={avatar}"),
        })
        .collect();

        let slot_labels = [
            "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
            "05:00 PM",
        ]
        .into_iter()
        .map(SlotLabel::from)
        .collect();

        let seed_day = NaiveDate::from_ymd_opt(2023, 6, 20).unwrap_or_default();
        let appointments = vec![
            ExistingAppointment {
                practitioner_id: 1,
                date: seed_day,
                slot: SlotLabel::from("10:00 AM"),
                patient_label: "Paciente Ejemplo 1".to_string(),
            },
            ExistingAppointment {
                practitioner_id: 2,
                date: seed_day,
                slot: SlotLabel::from("02:00 PM"),
                patient_label: "Paciente Ejemplo 2".to_string(),
            },
        ];

        Self::new(practitioners, slot_labels, appointments)
    }
}
