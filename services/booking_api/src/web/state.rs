//! services/booking_api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::config::Config;
use crate::web::reset_task::ResetTimer;
use booking_core::machine::BookingSession;
use booking_core::ports::{BookingNotifier, Clock};
use booking_core::roster::Roster;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
/// Everything in it is read-only.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub roster: Arc<Roster>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn BookingNotifier>,
}

//=========================================================================================
// SessionState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single booking widget connection.
pub struct SessionState {
    pub session: BookingSession,
    /// Pending auto-reset, present only while a booking is confirmed.
    pub reset_timer: Option<ResetTimer>,
}

impl SessionState {
    /// Starts an empty booking session dated today.
    pub fn new(app_state: &AppState) -> Self {
        Self {
            session: BookingSession::new(app_state.roster.clone(), app_state.clock.clone()),
            reset_timer: None,
        }
    }

    /// Cancels the pending auto-reset, if any.
    pub fn cancel_reset(&mut self) {
        if let Some(timer) = self.reset_timer.take() {
            timer.cancel();
        }
    }
}
