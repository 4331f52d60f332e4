//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{DisplayName, MessageText, RoomName, SessionId, SessionIdFactory},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::LoginError,
};

/// Text of the `loginError` frame sent on credential rejection
const LOGIN_ERROR_TEXT: &str = "Authentication failed. Please check your credentials.";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Session ids are generated server-side; clients never choose them
    let session_id = SessionIdFactory::generate();
    tracing::info!("Session '{}' connecting", session_id.as_str());
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: frames produced by the
/// use cases (via the MessagePusher) are sent to this session's WebSocket
/// connection.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this session
/// * `sender` - WebSocket sink to send frames to this session
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the frame to this session
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, session_id: SessionId) {
    let (sender, mut receiver) = socket.split();

    // Register the outbound channel before any event can be processed,
    // so key delivery and error notices always have a route back
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_session(session_id.clone(), tx)
        .await;

    let session_id_clone = session_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this session
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    process_event(&state_clone, &session_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", session_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive frames addressed to this session and send them out
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Cleanup always runs, whether or not the session ever entered a room
    state.disconnect_session_usecase.execute(&session_id).await;
}

/// Parse one inbound frame and dispatch it to the matching use case.
///
/// Malformed frames and invalid field values are logged and ignored;
/// the connection stays open.
async fn process_event(state: &AppState, session_id: &SessionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Ignoring malformed event from '{}': {}",
                session_id.as_str(),
                e
            );
            return;
        }
    };

    match event {
        ClientEvent::Login {
            name,
            room,
            password,
        } => {
            // Convert String -> Domain Models
            match (DisplayName::try_from(name), RoomName::try_from(room)) {
                (Ok(name_vo), Ok(room_vo)) => {
                    let result = state
                        .login_usecase
                        .execute(session_id.clone(), name_vo, room_vo, &password)
                        .await;
                    match result {
                        Ok(()) => {}
                        Err(LoginError::AuthenticationFailed(_)) => {
                            // Rejection goes to the caller only
                            let event = ServerEvent::LoginError {
                                error: LOGIN_ERROR_TEXT.to_string(),
                            };
                            let frame = serde_json::to_string(&event).unwrap();
                            if let Err(e) = state.message_pusher.push_to(session_id, &frame).await {
                                tracing::warn!(
                                    "Failed to push login error to '{}': {}",
                                    session_id.as_str(),
                                    e
                                );
                            }
                        }
                        Err(LoginError::EnterRoom(e)) => {
                            // The use case already notified the caller
                            tracing::warn!("Login of '{}' failed: {}", session_id.as_str(), e);
                        }
                    }
                }
                (Err(e), _) => {
                    tracing::warn!("Invalid name in login: {}", e);
                }
                (_, Err(e)) => {
                    tracing::warn!("Invalid room in login: {}", e);
                }
            }
        }
        ClientEvent::EnterRoom { name, room } => {
            match (DisplayName::try_from(name), RoomName::try_from(room)) {
                (Ok(name_vo), Ok(room_vo)) => {
                    if let Err(e) = state
                        .enter_room_usecase
                        .execute(session_id.clone(), name_vo, room_vo)
                        .await
                    {
                        // The use case already notified the caller
                        tracing::warn!("Room entry of '{}' failed: {}", session_id.as_str(), e);
                    }
                }
                (Err(e), _) => {
                    tracing::warn!("Invalid name in enterRoom: {}", e);
                }
                (_, Err(e)) => {
                    tracing::warn!("Invalid room in enterRoom: {}", e);
                }
            }
        }
        // The inbound name field is ignored for relays: the display name
        // in the envelope comes from the registry entry of this session
        ClientEvent::Message { text, .. } => match MessageText::try_from(text) {
            Ok(text_vo) => {
                state
                    .relay_message_usecase
                    .execute(session_id, text_vo)
                    .await;
            }
            Err(e) => {
                tracing::warn!("Invalid message text: {}", e);
            }
        },
        ClientEvent::EncMessage { text, .. } => match MessageText::try_from(text) {
            Ok(text_vo) => {
                state
                    .relay_encrypted_message_usecase
                    .execute(session_id, text_vo)
                    .await;
            }
            Err(e) => {
                tracing::warn!("Invalid encrypted message text: {}", e);
            }
        },
        ClientEvent::Activity { .. } => {
            state.notify_activity_usecase.execute(session_id).await;
        }
    }
}
