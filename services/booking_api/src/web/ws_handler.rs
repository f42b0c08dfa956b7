//! services/booking_api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a booking widget connection.
//! Each connection owns one booking session. Intents are applied one at a time
//! and every intent is answered with a fresh render.

use crate::web::{
    protocol::{BookingDto, ClientMessage, ServerMessage, SessionView},
    reset_task::{auto_reset_process, ResetTimer},
    state::{AppState, SessionState},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use booking_core::machine::Intent;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{
    mpsc::{self, UnboundedSender},
    Mutex,
};
use tracing::{debug, error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New booking session connected.");

    let (mut sender, mut receiver) = socket.split();
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // --- 1. Writer: serializes everything queued for this client ---
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                warn!("Failed to send message. Client may have disconnected.");
                break;
            }
        }
    });

    let session_state_lock = Arc::new(Mutex::new(SessionState::new(&app_state)));
    {
        let state = session_state_lock.lock().await;
        send(&outbound, ServerMessage::Render(SessionView::from(&state.session)));
    }

    // --- 2. Main Message Loop ---
    loop {
        match receiver.next().await {
            Some(Ok(Message::Text(text))) => {
                handle_text_message(text.as_str(), &app_state, &session_state_lock, &outbound)
                    .await;
            }
            Some(Ok(Message::Close(_))) => {
                info!("Client sent close message.");
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("WebSocket receive failed: {}", e);
                break;
            }
            None => {
                info!("Client disconnected.");
                break;
            }
        }
    }

    // --- 3. Cleanup ---
    close_session(&session_state_lock).await;
    drop(outbound);
    writer.abort();
    info!("Booking session closed.");
}

/// Tears down a session: a pending auto-reset must not outlive the connection.
pub async fn close_session(session_state_lock: &Arc<Mutex<SessionState>>) {
    session_state_lock.lock().await.cancel_reset();
}

/// Decodes one client message, applies it to the session and queues the replies.
pub async fn handle_text_message(
    text: &str,
    app_state: &Arc<AppState>,
    session_state_lock: &Arc<Mutex<SessionState>>,
    outbound: &UnboundedSender<ServerMessage>,
) {
    let intent = match serde_json::from_str::<ClientMessage>(text)
        .map_err(|e| e.to_string())
        .and_then(|msg| msg.into_intent().map_err(|e| e.to_string()))
    {
        Ok(intent) => intent,
        Err(message) => {
            warn!("Failed to decode client message: {}", message);
            send(outbound, ServerMessage::Error { message });
            return;
        }
    };

    let acknowledging = intent == Intent::Acknowledge;
    let mut state = session_state_lock.lock().await;
    match state.session.apply(intent) {
        Ok(Some(booking)) => {
            info!(reference = %booking.reference, "Booking submitted.");

            let notifier = app_state.notifier.clone();
            let record = booking.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.notify(&record).await {
                    error!("Failed to deliver booking notification: {}", e);
                }
            });

            send(
                outbound,
                ServerMessage::Confirmed {
                    booking: BookingDto::from(&booking),
                },
            );

            state.cancel_reset();
            let lock = session_state_lock.clone();
            let outbound = outbound.clone();
            state.reset_timer = Some(ResetTimer::schedule(
                app_state.config.confirmation_dwell,
                move |token| auto_reset_process(lock, outbound, token),
            ));
        }
        Ok(None) => {
            if acknowledging {
                info!("Confirmation acknowledged. Session reset.");
                state.cancel_reset();
            }
        }
        Err(refusal) => {
            debug!("Intent refused: {}", refusal);
        }
    }

    send(outbound, ServerMessage::Render(SessionView::from(&state.session)));
}

fn send(outbound: &UnboundedSender<ServerMessage>, msg: ServerMessage) {
    if outbound.send(msg).is_err() {
        warn!("Outbound channel closed. Client may have disconnected.");
    }
}
