//! Room-scoped encrypted chat relay server.
//!
//! Accepts WebSocket sessions, relays room-scoped messages, and encrypts
//! designated messages on behalf of the sender.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3500 --key-mode server-held
//! ```

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use mitsudan_server::{
    domain::KeyDeliveryMode,
    infrastructure::{
        auth::StaticCredentialTable, key_exchange::RsaKeyExchange,
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    ui::Server,
    usecase::{
        DisconnectSessionUseCase, EnterRoomUseCase, GetRoomsUseCase, LoginUseCase,
        NotifyActivityUseCase, PresenceBroadcaster, RelayEncryptedMessageUseCase,
        RelayMessageUseCase,
    },
};
use mitsudan_shared::logger::setup_logger;

/// Where generated private keys live after room entry
#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyMode {
    /// Deliver the private key to its owner over the socket after entry
    ClientHeld,
    /// Retain the private key server-side and decrypt before redistribution
    ServerHeld,
}

impl From<KeyMode> for KeyDeliveryMode {
    fn from(mode: KeyMode) -> Self {
        match mode {
            KeyMode::ClientHeld => KeyDeliveryMode::ClientHeld,
            KeyMode::ServerHeld => KeyDeliveryMode::ServerHeld,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Room-scoped encrypted chat relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3500")]
    port: u16,

    /// Where generated private keys are held
    #[arg(long, value_enum, default_value_t = KeyMode::ClientHeld)]
    key_mode: KeyMode,

    /// Disable the development CORS allowlist
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let key_delivery_mode = KeyDeliveryMode::from(args.key_mode);
    tracing::info!("Key delivery mode: {:?}", key_delivery_mode);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. KeyExchange / CredentialValidator
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory session registry)
    let repository = Arc::new(InMemorySessionRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create KeyExchange (RSA) and CredentialValidator (static table)
    let key_exchange = Arc::new(RsaKeyExchange::new());
    let credential_validator = Arc::new(StaticCredentialTable::with_default_users());

    // 4. Create UseCases
    let presence = Arc::new(PresenceBroadcaster::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let enter_room_usecase = Arc::new(EnterRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        key_exchange.clone(),
        presence.clone(),
        key_delivery_mode,
    ));
    let login_usecase = Arc::new(LoginUseCase::new(
        credential_validator.clone(),
        enter_room_usecase.clone(),
    ));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let relay_encrypted_message_usecase = Arc::new(RelayEncryptedMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        key_delivery_mode,
    ));
    let notify_activity_usecase = Arc::new(NotifyActivityUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        presence.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));

    // 5. Create and run the server
    let server = Server::new(
        login_usecase,
        enter_room_usecase,
        relay_message_usecase,
        relay_encrypted_message_usecase,
        notify_activity_usecase,
        disconnect_session_usecase,
        get_rooms_usecase,
        message_pusher,
        args.production,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
