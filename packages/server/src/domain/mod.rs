//! ドメイン層
//!
//! Value Object・エンティティ・エラー型と、Infrastructure 層が実装する
//! trait 群（Repository / MessagePusher / KeyExchange / CredentialValidator）を
//! 定義します。この層は他の層に依存しません（依存性の逆転）。

pub mod auth;
pub mod entity;
pub mod error;
pub mod key_exchange;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use auth::CredentialValidator;
pub use entity::{Session, SessionKeys};
pub use error::{KeyExchangeError, MessagePushError, ValidationError};
pub use key_exchange::{KeyDeliveryMode, KeyExchange};
#[cfg(test)]
pub use key_exchange::MockKeyExchange;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::SessionRepository;
pub use value_object::{DisplayName, MessageText, RoomName, SessionId, SessionIdFactory};
