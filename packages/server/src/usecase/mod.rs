//! UseCase 層
//!
//! ドメイン層の trait（Repository / MessagePusher / KeyExchange /
//! CredentialValidator）に依存してアプリケーションの操作を実装します。
//! ワイヤフレームの組み立てと送信までを担い、UI 層は受信イベントの
//! 解釈とセッションのライフサイクル管理に専念します。

pub mod disconnect_session;
pub mod enter_room;
pub mod error;
pub mod get_rooms;
pub mod login;
pub mod notify_activity;
pub mod presence;
pub mod relay_encrypted_message;
pub mod relay_message;

pub use disconnect_session::DisconnectSessionUseCase;
pub use enter_room::EnterRoomUseCase;
pub use error::{DropReason, EnterRoomError, LoginError, RelayOutcome};
pub use get_rooms::{GetRoomsUseCase, RoomOccupancy};
pub use login::LoginUseCase;
pub use notify_activity::NotifyActivityUseCase;
pub use presence::{ADMIN_NAME, LeaveKind, PresenceBroadcaster};
pub use relay_encrypted_message::RelayEncryptedMessageUseCase;
pub use relay_message::RelayMessageUseCase;
