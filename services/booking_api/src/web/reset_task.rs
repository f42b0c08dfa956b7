//! services/booking_api/src/web/reset_task.rs
//!
//! The deferred auto-reset that clears a session some time after its booking
//! was confirmed.

use crate::web::{
    protocol::{ServerMessage, SessionView},
    state::SessionState,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc::UnboundedSender, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Handle to a scheduled callback. Cancelling it before the delay elapses
/// guarantees the callback never runs.
#[derive(Debug)]
pub struct ResetTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ResetTimer {
    /// Runs `callback` once `delay` has elapsed, unless cancelled first.
    ///
    /// The callback receives the timer's token so it can re-check cancellation
    /// after any await of its own.
    pub fn schedule<F, Fut>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = child.cancelled() => {
                    debug!("Scheduled reset cancelled.");
                }
                _ = tokio::time::sleep(delay) => {
                    callback(child).await;
                }
            }
        });
        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the callback has run or the timer was cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Clears a confirmed session and pushes the fresh state to the client.
///
/// Does nothing once `token` is cancelled: the timer was superseded while
/// this task waited for the session lock.
pub async fn auto_reset_process(
    session_state_lock: Arc<Mutex<SessionState>>,
    outbound: UnboundedSender<ServerMessage>,
    token: CancellationToken,
) {
    let mut state = session_state_lock.lock().await;
    if token.is_cancelled() {
        debug!("Auto-reset superseded before it ran.");
        return;
    }
    match state.session.auto_reset() {
        Ok(()) => {
            info!("Confirmation dwell elapsed. Session reset.");
            state.reset_timer = None;
            let view = SessionView::from(&state.session);
            if outbound.send(ServerMessage::Render(view)).is_err() {
                warn!("Failed to send reset render. Client may have disconnected.");
            }
        }
        Err(refusal) => {
            debug!("Auto-reset skipped: {}", refusal);
        }
    }
}
