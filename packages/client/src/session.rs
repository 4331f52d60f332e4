//! WebSocket client session management.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use mitsudan_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use crate::{
    domain::{self, ActivityTracker, ClientCommand},
    error::ClientError,
    formatter::MessageFormatter,
    key_store::SessionKeyStore,
    ui::redisplay_prompt,
};

/// Client-side session state shared between the read and write tasks.
///
/// Survives reconnects: the current room is re-entered automatically,
/// while the key store is cleared because the relay issues fresh keys
/// on every entry.
pub struct ClientState {
    pub name: String,
    pub room: Option<String>,
    pub keys: SessionKeyStore,
    pub activity: ActivityTracker,
}

impl ClientState {
    pub fn new(name: String, room: Option<String>) -> Self {
        Self {
            name,
            room,
            keys: SessionKeyStore::new(),
            activity: ActivityTracker::new(),
        }
    }
}

/// What one line of user input turns into
enum Outbound {
    /// A wire event for the relay
    Send(ClientEvent),
    /// A local notice; nothing goes on the wire
    Notice(String),
    /// End the session
    Quit,
}

/// Run one WebSocket client session until quit or connection loss
pub async fn run_client_session(
    url: &str,
    state: Arc<Mutex<ClientState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to relay server");

    // Keys from a previous connection cannot decrypt anything on this one
    let prompt_name = {
        let mut state = state.lock().unwrap();
        state.keys.clear();
        state.name.clone()
    };
    println!(
        "\nYou are '{}'. Type to chat, /join <room> to enter a room, /quit to exit.\n",
        prompt_name
    );

    let (mut write, mut read) = ws_stream.split();

    // Re-enter the current room, or enter the initial one
    let rejoin = {
        let state = state.lock().unwrap();
        state.room.as_ref().map(|room| ClientEvent::EnterRoom {
            name: state.name.clone(),
            room: room.clone(),
        })
    };
    if let Some(event) = rejoin {
        let json = serde_json::to_string(&event)?;
        write
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    }

    // Spawn a task to handle incoming frames
    let state_for_read = state.clone();
    let prompt_for_read = prompt_name.clone();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if let Some(output) = render_frame(&text, &state_for_read) {
                        print!("{}", output);
                        redisplay_prompt(&prompt_for_read);
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_for_input = prompt_name.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_for_input);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn input lines into wire events
    let state_for_write = state.clone();
    let prompt_for_write = prompt_name.clone();
    let mut write_task = tokio::spawn(async move {
        use mitsudan_shared::time::{get_jst_timestamp, jst_clock_time};

        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = match outbound_event(&line, &state_for_write) {
                Outbound::Send(event) => event,
                Outbound::Notice(notice) => {
                    print!("{}", notice);
                    redisplay_prompt(&prompt_for_write);
                    continue;
                }
                Outbound::Quit => break,
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }

            // Local echo with send time; the relayed copy of this line
            // comes back under our own name and is skipped on arrival
            if matches!(event, ClientEvent::EncMessage { .. }) {
                let formatted = MessageFormatter::format_sent_confirmation(&jst_clock_time(
                    get_jst_timestamp(),
                ));
                print!("\n{}", formatted);
                redisplay_prompt(&prompt_for_write);
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}

/// Interpret one server frame and produce its display output.
///
/// Returns `None` for frames that are deliberately not rendered: envelopes
/// under our own name, throttled typing notices, unusable key deliveries.
fn render_frame(text: &str, state: &Mutex<ClientState>) -> Option<String> {
    let Ok(event) = serde_json::from_str::<ServerEvent>(text) else {
        return Some(MessageFormatter::format_raw_message(text));
    };

    match event {
        ServerEvent::Message { name, text, time } => {
            let own = state.lock().unwrap().name.clone();
            domain::should_display_envelope(&name, &own)
                .then(|| MessageFormatter::format_chat_message(&name, &text, &time))
        }
        ServerEvent::EncMessage { name, text, time } => {
            let state = state.lock().unwrap();
            if !domain::should_display_envelope(&name, &state.name) {
                return None;
            }
            match state.keys.decrypt_base64(&text) {
                Ok(plaintext) => Some(MessageFormatter::format_encrypted_message(
                    &name, &plaintext, &time,
                )),
                Err(e) => {
                    tracing::warn!("Undecryptable envelope from '{}': {}", name, e);
                    Some(MessageFormatter::format_undecryptable(&name))
                }
            }
        }
        ServerEvent::PrivateKey { key } => {
            let mut state = state.lock().unwrap();
            match state.keys.import_pem(&key) {
                Ok(()) => Some(MessageFormatter::format_key_received()),
                Err(e) => {
                    tracing::warn!("Failed to import delivered key: {}", e);
                    None
                }
            }
        }
        ServerEvent::UserList { users } => {
            let own = state.lock().unwrap().name.clone();
            Some(MessageFormatter::format_roster(&users, &own))
        }
        ServerEvent::RoomList { rooms } => Some(MessageFormatter::format_room_list(&rooms)),
        ServerEvent::Activity { name } => {
            let mut state = state.lock().unwrap();
            state
                .activity
                .should_show(&name, Instant::now())
                .then(|| MessageFormatter::format_activity(&name))
        }
        ServerEvent::LoginError { error } => {
            // Entry did not happen; stop auto-rejoining the attempted room
            let mut state = state.lock().unwrap();
            state.room = None;
            Some(MessageFormatter::format_login_error(&error))
        }
    }
}

/// Turn one line of input into a wire event, a local notice, or quit
fn outbound_event(line: &str, state: &Mutex<ClientState>) -> Outbound {
    match domain::parse_command(line) {
        ClientCommand::Join(room) => {
            let mut state = state.lock().unwrap();
            state.room = Some(room.clone());
            Outbound::Send(ClientEvent::EnterRoom {
                name: state.name.clone(),
                room,
            })
        }
        ClientCommand::Login {
            user,
            password,
            room,
        } => {
            let mut state = state.lock().unwrap();
            state.name = user.clone();
            state.room = Some(room.clone());
            Outbound::Send(ClientEvent::Login {
                name: user,
                room,
                password,
            })
        }
        ClientCommand::Quit => Outbound::Quit,
        ClientCommand::Text(text) => {
            let state = state.lock().unwrap();
            if state.room.is_none() {
                return Outbound::Notice("\n! Join a room first: /join <room>\n".to_string());
            }
            Outbound::Send(ClientEvent::EncMessage {
                name: state.name.clone(),
                text,
            })
        }
        ClientCommand::Malformed(usage) => Outbound::Notice(format!("\n! {}\n", usage)),
    }
}
