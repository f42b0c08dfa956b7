//! services/booking_api/src/web/rest.rs
//!
//! Contains the Axum handlers for the read-only REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{PractitionerDto, SlotDto};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use booking_core::availability::slot_availability;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::{IntoParams, OpenApi};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_practitioners_handler,
        list_slots_handler,
        availability_handler,
    ),
    components(
        schemas(PractitionerDto, SlotDto)
    ),
    tags(
        (name = "Booking API", description = "Roster and availability for the appointment booking widget.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Query Structs
//=========================================================================================

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// The practitioner whose calendar is checked.
    pub practitioner_id: u32,
    /// Calendar date in `yyyy-mm-dd` form.
    pub date: NaiveDate,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the practitioners that can be booked, in roster order.
#[utoipa::path(
    get,
    path = "/practitioners",
    responses(
        (status = 200, description = "Practitioners in roster order", body = [PractitionerDto])
    )
)]
pub async fn list_practitioners_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<PractitionerDto>> {
    Json(
        app_state
            .roster
            .list_practitioners()
            .iter()
            .map(PractitionerDto::from)
            .collect(),
    )
}

/// List the bookable time-of-day slots, in catalog order.
#[utoipa::path(
    get,
    path = "/slots",
    responses(
        (status = 200, description = "Slot labels in catalog order", body = [String])
    )
)]
pub async fn list_slots_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(
        app_state
            .roster
            .list_slot_labels()
            .iter()
            .map(|slot| slot.to_string())
            .collect(),
    )
}

/// Report which slots a practitioner already has booked on a given day.
#[utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Every catalog slot with its booked flag", body = [SlotDto]),
        (status = 404, description = "Unknown practitioner")
    )
)]
pub async fn availability_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<SlotDto>>, (StatusCode, String)> {
    let roster = &app_state.roster;
    if roster.practitioner(query.practitioner_id).is_none() {
        debug!("Availability requested for unknown practitioner {}", query.practitioner_id);
        return Err((
            StatusCode::NOT_FOUND,
            format!("No practitioner with id {}", query.practitioner_id),
        ));
    }

    let slots = slot_availability(
        Some(query.practitioner_id),
        query.date,
        roster.list_slot_labels(),
        roster.existing_appointments(),
    );
    Ok(Json(slots.iter().map(SlotDto::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TracingNotifier;
    use crate::config::Config;
    use booking_core::ports::FixedClock;
    use booking_core::roster::Roster;

    fn app_state(roster: Roster) -> Arc<AppState> {
        Arc::new(AppState {
            config: Arc::new(Config::from_lookup(|_| None).unwrap()),
            roster: Arc::new(roster),
            clock: Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2023, 6, 20).unwrap())),
            notifier: Arc::new(TracingNotifier::new()),
        })
    }

    #[tokio::test]
    async fn lists_roster_in_order() {
        let state = app_state(Roster::sample());
        let Json(practitioners) = list_practitioners_handler(State(state.clone())).await;
        let names: Vec<&str> = practitioners.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Dr. Ana Martínez",
                "Dr. Carlos Ruiz",
                "Dra. Laura Gómez",
                "Dr. Javier Sánchez"
            ]
        );

        let Json(slots) = list_slots_handler(State(state)).await;
        assert_eq!(slots.first().map(String::as_str), Some("09:00 AM"));
        assert_eq!(slots.last().map(String::as_str), Some("05:00 PM"));
    }

    #[tokio::test]
    async fn empty_roster_lists_nothing() {
        let state = app_state(Roster::default());
        let Json(practitioners) = list_practitioners_handler(State(state.clone())).await;
        assert!(practitioners.is_empty());
        let Json(slots) = list_slots_handler(State(state)).await;
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn availability_marks_fixture_appointment() {
        let state = app_state(Roster::sample());
        let query = AvailabilityQuery {
            practitioner_id: 1,
            date: NaiveDate::from_ymd_opt(2023, 6, 20).unwrap(),
        };
        let Json(slots) = availability_handler(State(state), Query(query)).await.unwrap();
        let booked: Vec<&str> = slots
            .iter()
            .filter(|s| s.booked)
            .map(|s| s.slot.as_str())
            .collect();
        assert_eq!(booked, vec!["10:00 AM"]);
    }

    #[tokio::test]
    async fn availability_for_unknown_practitioner_is_not_found() {
        let state = app_state(Roster::sample());
        let query = AvailabilityQuery {
            practitioner_id: 9,
            date: NaiveDate::from_ymd_opt(2023, 6, 20).unwrap(),
        };
        let err = availability_handler(State(state), Query(query))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn openapi_documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/practitioners", "/slots", "/availability"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
