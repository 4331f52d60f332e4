//! UseCase: タイピング中通知の中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - NotifyActivityUseCase::execute() メソッド
//! - 送信者を除くルーム内への通知と、ルーム境界の遵守
//!
//! ### なぜこのテストが必要か
//! - タイピング中通知は高頻度で流れるため、宛先の誤りが最も目立つ
//! - 本人に跳ね返ると「自分がタイピング中」の表示が出てしまう
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人のルームでの通知
//! - 異常系：未入室セッションからの通知

use std::sync::Arc;

use crate::domain::{MessagePusher, SessionId, SessionRepository};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::{DropReason, RelayOutcome};

/// タイピング中通知のユースケース
pub struct NotifyActivityUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyActivityUseCase {
    /// 新しい NotifyActivityUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// タイピング中通知の中継を実行
    ///
    /// 送信者を除く同室の全員へ配信する。表示の減衰はクライアント側の
    /// タイマーに任せ、サーバーは状態を持たない。
    ///
    /// # Arguments
    ///
    /// * `session_id` - 通知元のセッション ID（Domain Model）
    ///
    /// # Returns
    ///
    /// 中継結果。破棄はログにのみ残る。
    pub async fn execute(&self, session_id: &SessionId) -> RelayOutcome {
        // 1. 送信者の在室確認
        let Some(sender) = self.repository.find(session_id).await else {
            tracing::debug!(
                "Dropping activity from unknown session '{}'",
                session_id.as_str()
            );
            return RelayOutcome::Dropped(DropReason::SenderNotInRoom);
        };
        let Some(room) = &sender.room else {
            tracing::debug!(
                "Dropping activity from roomless session '{}'",
                session_id.as_str()
            );
            return RelayOutcome::Dropped(DropReason::SenderNotInRoom);
        };

        // 2. 送信者を除く同室の全員へ配信
        let event = ServerEvent::Activity {
            name: sender.name.as_str().to_string(),
        };
        let frame = serde_json::to_string(&event).unwrap();
        let targets: Vec<SessionId> = self
            .repository
            .list_by_room(room)
            .await
            .into_iter()
            .filter(|s| s.id != sender.id)
            .map(|s| s.id)
            .collect();
        let recipients = targets.len();
        if let Err(e) = self.message_pusher.broadcast(targets, &frame).await {
            tracing::warn!("Failed to broadcast activity: {}", e);
        }

        RelayOutcome::Relayed { recipients }
    }
}
