//! ドメイン層のエラー型定義

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("display name must be 1-32 characters: '{0}'")]
    InvalidDisplayName(String),

    #[error("room name must be 1-64 characters: '{0}'")]
    InvalidRoomName(String),

    #[error("message text must be 1-190 bytes (got {len} bytes)")]
    InvalidMessageText { len: usize },
}

/// メッセージ送信のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// 対象のセッションが登録されていない
    #[error("Session '{0}' not found")]
    SessionNotFound(String),

    /// 送信失敗
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// 鍵交換のエラー
///
/// 鍵生成の失敗はルーム入室処理全体を中断させます（鍵なしで入室させない）。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyExchangeError {
    #[error("key pair generation failed: {0}")]
    GenerationFailed(String),
}
