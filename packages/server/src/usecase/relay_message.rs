//! UseCase: 平文メッセージの中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 送信者のルーム全員（送信者を含む）への配信と、ルーム境界の遵守
//!
//! ### なぜこのテストが必要か
//! - 中継はルーム単位で行われ、他ルームへ漏れてはならない
//! - 封筒の name はクライアントの申告ではなく Registry 上の表示名を使う
//! - 未入室の送信者からのメッセージは通知なしで破棄される
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人のルームでの送信
//! - 異常系：未入室セッションからの送信
//! - エッジケース：送信者しかいないルーム

use std::sync::Arc;

use crate::domain::{MessagePusher, MessageText, SessionId, SessionRepository};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::{DropReason, RelayOutcome};

/// 平文メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 平文メッセージの中継を実行
    ///
    /// 封筒はサーバーが組み立てる。name は Registry 上の表示名、
    /// time はサーバー時刻（JST の HH:MM:SS）。
    ///
    /// # Arguments
    ///
    /// * `session_id` - 送信者のセッション ID（Domain Model）
    /// * `text` - メッセージ本文（Domain Model）
    ///
    /// # Returns
    ///
    /// 中継結果。破棄は送信者へ通知されず、ログにのみ残る。
    pub async fn execute(&self, session_id: &SessionId, text: MessageText) -> RelayOutcome {
        use mitsudan_shared::time::{get_jst_timestamp, jst_clock_time};

        // 1. 送信者の在室確認
        let Some(sender) = self.repository.find(session_id).await else {
            tracing::warn!(
                "Dropping message from unknown session '{}'",
                session_id.as_str()
            );
            return RelayOutcome::Dropped(DropReason::SenderNotInRoom);
        };
        let Some(room) = &sender.room else {
            tracing::warn!(
                "Dropping message from roomless session '{}'",
                session_id.as_str()
            );
            return RelayOutcome::Dropped(DropReason::SenderNotInRoom);
        };

        // 2. 封筒を組み立て（name は Registry 上の表示名）
        let event = ServerEvent::Message {
            name: sender.name.as_str().to_string(),
            text: text.as_str().to_string(),
            time: jst_clock_time(get_jst_timestamp()),
        };
        let frame = serde_json::to_string(&event).unwrap();

        // 3. 送信者を含むルーム全員へ配信
        let targets: Vec<SessionId> = self
            .repository
            .list_by_room(room)
            .await
            .into_iter()
            .map(|s| s.id)
            .collect();
        let recipients = targets.len();
        if let Err(e) = self.message_pusher.broadcast(targets, &frame).await {
            tracing::warn!("Failed to broadcast message: {}", e);
        }

        tracing::debug!(
            "Relayed message from '{}' to {} session(s) in room '{}'",
            sender.name.as_str(),
            recipients,
            room.as_str()
        );
        RelayOutcome::Relayed { recipients }
    }
}
