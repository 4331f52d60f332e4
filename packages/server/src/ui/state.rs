//! Server state and connection management.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::usecase::{
    DisconnectSessionUseCase, EnterRoomUseCase, GetRoomsUseCase, LoginUseCase,
    NotifyActivityUseCase, RelayEncryptedMessageUseCase, RelayMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// LoginUseCase（ログインのユースケース）
    pub login_usecase: Arc<LoginUseCase>,
    /// EnterRoomUseCase（入室のユースケース）
    pub enter_room_usecase: Arc<EnterRoomUseCase>,
    /// RelayMessageUseCase（平文メッセージ中継のユースケース）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// RelayEncryptedMessageUseCase（暗号化メッセージ中継のユースケース）
    pub relay_encrypted_message_usecase: Arc<RelayEncryptedMessageUseCase>,
    /// NotifyActivityUseCase（タイピング中通知のユースケース）
    pub notify_activity_usecase: Arc<NotifyActivityUseCase>,
    /// DisconnectSessionUseCase（切断処理のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// MessagePusher（sender チャンネルの登録と直接送信に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
}
