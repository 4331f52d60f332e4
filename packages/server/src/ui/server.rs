//! Server execution logic.

use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::MessagePusher;
use crate::usecase::{
    DisconnectSessionUseCase, EnterRoomUseCase, GetRoomsUseCase, LoginUseCase,
    NotifyActivityUseCase, RelayEncryptedMessageUseCase, RelayMessageUseCase,
};

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Browser origins allowed outside production
const DEV_ORIGINS: [&str; 2] = ["http://localhost:5500", "http://127.0.0.1:5500"];

/// Encrypted chat relay server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     login_usecase,
///     enter_room_usecase,
///     relay_message_usecase,
///     relay_encrypted_message_usecase,
///     notify_activity_usecase,
///     disconnect_session_usecase,
///     get_rooms_usecase,
///     message_pusher,
///     false,
/// );
/// server.run("127.0.0.1".to_string(), 3500).await?;
/// ```
pub struct Server {
    /// LoginUseCase（ログインのユースケース）
    login_usecase: Arc<LoginUseCase>,
    /// EnterRoomUseCase（入室のユースケース）
    enter_room_usecase: Arc<EnterRoomUseCase>,
    /// RelayMessageUseCase（平文メッセージ中継のユースケース）
    relay_message_usecase: Arc<RelayMessageUseCase>,
    /// RelayEncryptedMessageUseCase（暗号化メッセージ中継のユースケース）
    relay_encrypted_message_usecase: Arc<RelayEncryptedMessageUseCase>,
    /// NotifyActivityUseCase（タイピング中通知のユースケース）
    notify_activity_usecase: Arc<NotifyActivityUseCase>,
    /// DisconnectSessionUseCase（切断処理のユースケース）
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 本番モードかどうか（CORS の許可リストが変わる）
    production: bool,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        login_usecase: Arc<LoginUseCase>,
        enter_room_usecase: Arc<EnterRoomUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        relay_encrypted_message_usecase: Arc<RelayEncryptedMessageUseCase>,
        notify_activity_usecase: Arc<NotifyActivityUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
        production: bool,
    ) -> Self {
        Self {
            login_usecase,
            enter_room_usecase,
            relay_message_usecase,
            relay_encrypted_message_usecase,
            notify_activity_usecase,
            disconnect_session_usecase,
            get_rooms_usecase,
            message_pusher,
            production,
        }
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3500)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            login_usecase: self.login_usecase,
            enter_room_usecase: self.enter_room_usecase,
            relay_message_usecase: self.relay_message_usecase,
            relay_encrypted_message_usecase: self.relay_encrypted_message_usecase,
            notify_activity_usecase: self.notify_activity_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            message_pusher: self.message_pusher,
        });

        // 本番はクロスオリジンを一切許可しない
        let cors = if self.production {
            CorsLayer::new()
        } else {
            let origins: Vec<HeaderValue> = DEV_ORIGINS
                .iter()
                .map(|origin| HeaderValue::from_static(origin))
                .collect();
            CorsLayer::new().allow_origin(origins)
        };

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Encrypted chat relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
