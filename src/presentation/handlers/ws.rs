use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::broadcast;

use crate::application::ports::BroadcastChannel;
use crate::domain::Actor;
use crate::infrastructure::channels::OutboundMessage;
use crate::presentation::extract::CurrentActor;
use crate::presentation::state::AppState;

/// Realtime leg of the fan-out: each connection receives its own user
/// channel, plus the office channel for office actors.
#[tracing::instrument(skip(state, ws, actor), fields(user_id = %actor.0.id.as_uuid()))]
pub async fn ws_handler(
    State(state): State<AppState>,
    actor: CurrentActor,
    ws: WebSocketUpgrade,
) -> Response {
    let receiver = state.hub.subscribe();
    ws.on_upgrade(move |socket| client_loop(socket, receiver, actor.0))
}

async fn client_loop(
    mut socket: WebSocket,
    mut receiver: broadcast::Receiver<OutboundMessage>,
    actor: Actor,
) {
    loop {
        tokio::select! {
            outbound = receiver.recv() => match outbound {
                Ok(message) if delivers_to(message.channel, &actor) => {
                    let text = message.payload.to_string();
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Realtime client lagged, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                // Clients only listen; pings are handled by axum.
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }
    tracing::debug!(user_id = %actor.id.as_uuid(), "Realtime client disconnected");
}

fn delivers_to(channel: BroadcastChannel, actor: &Actor) -> bool {
    match channel {
        BroadcastChannel::User(user_id) => user_id == actor.id,
        BroadcastChannel::Office => actor.role.is_office(),
    }
}
