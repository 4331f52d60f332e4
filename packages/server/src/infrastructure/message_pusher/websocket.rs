//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - セッションへのメッセージ送信（push_to, broadcast, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信
//!
//! sender マップは Registry（SessionRepository）とは独立して管理されます。
//! 接続済みでも未入室のセッションは Registry に存在しませんが、
//! sender はここに登録されているため、鍵配送やエラー通知が届きます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, SessionId};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `channels`: 接続中のセッションと対応する WebSocket sender のマップ
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
///
/// // セッションに送信
/// pusher.push_to(&session_id, "{\"type\":\"message\",\"name\":\"Admin\",...}").await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のセッションの WebSocket sender
    ///
    /// Key: session_id (String)
    /// Value: PusherChannel
    channels: Mutex<HashMap<String, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 空の sender マップを持つ WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel) {
        let mut channels = self.channels.lock().await;
        channels.insert(session_id.as_str().to_string(), sender);
        tracing::debug!(
            "Session '{}' registered to MessagePusher",
            session_id.as_str()
        );
    }

    async fn unregister_session(&self, session_id: &SessionId) {
        let mut channels = self.channels.lock().await;
        channels.remove(session_id.as_str());
        tracing::debug!(
            "Session '{}' unregistered from MessagePusher",
            session_id.as_str()
        );
    }

    async fn push_to(&self, session_id: &SessionId, content: &str) -> Result<(), MessagePushError> {
        let channels = self.channels.lock().await;

        if let Some(sender) = channels.get(session_id.as_str()) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to session '{}'", session_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::SessionNotFound(
                session_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let channels = self.channels.lock().await;

        for target in targets {
            if let Some(sender) = channels.get(target.as_str()) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push message to session '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted message to session '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Session '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }

    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError> {
        let channels = self.channels.lock().await;

        for (session_id, sender) in channels.iter() {
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!("Failed to push message to session '{}': {}", session_id, e);
            }
        }

        Ok(())
    }
}
