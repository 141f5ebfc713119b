//! `WebSocket` handler for the live photo feed.
//!
//! Each connection opens its own [`FeedSession`](feedmock_core::FeedSession)
//! over the `wsFeed` fixture: a private random permutation emitted one
//! photo at a time with a randomized pause before each. Two futures run
//! side by side per connection:
//!
//! - the scheduler, which paces photos into a bounded per-connection
//!   queue, and
//! - the writer, which forwards queued photos as JSON text frames and
//!   watches the socket for the client going away.
//!
//! When the client disconnects the writer closes the session, which
//! cancels the scheduler's pending timer. When the permutation is
//! exhausted the queue drains and the server sends a close frame.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt as _, StreamExt as _};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and start a live
/// feed session.
///
/// # Route
///
/// `GET /` and `GET /ws/feed`
pub async fn live_feed(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_feed(socket, state))
}

/// Run one feed session against one socket until either side ends it.
async fn handle_feed(socket: WebSocket, state: Arc<AppState>) {
    let registry = &state.registry;
    let session = registry.open(&state.fixtures.picshare.ws_feed);
    let session_id = session.id();
    let (mut sink, mut queue) = session.channel(state.queue_capacity);
    let (mut sender, mut receiver) = socket.split();

    info!(session_id = %session_id, "live feed client connected");

    // Owns the sink so the queue reports end-of-feed once it finishes.
    let scheduler = async move { registry.stream(session, &mut sink).await };

    let writer = async {
        loop {
            tokio::select! {
                item = queue.recv() => {
                    let Some(photo) = item else {
                        debug!(session_id = %session_id, "feed exhausted, closing socket");
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    };
                    let json = match serde_json::to_string(&photo) {
                        Ok(j) => j,
                        Err(e) => {
                            warn!(session_id = %session_id, "failed to serialize photo: {e}");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!(session_id = %session_id, "client disconnected (send failed)");
                        break;
                    }
                }
                msg = receiver.next() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => {
                            debug!(session_id = %session_id, "client disconnected");
                            break;
                        }
                        Some(Err(e)) => {
                            debug!(session_id = %session_id, "WebSocket error: {e}");
                            break;
                        }
                        // Clients have nothing to say to the feed; pings
                        // are answered by the protocol layer.
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
        // Fail any delivery still waiting on a full queue.
        queue.close();
        registry.close(session_id);
    };

    let (outcome, ()) = tokio::join!(scheduler, writer);
    info!(
        session_id = %session_id,
        emitted = outcome.emitted(),
        active = registry.active(),
        "live feed client finished"
    );
}
