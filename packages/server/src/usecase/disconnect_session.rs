//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 切断時の後始末（チャンネル登録解除、Registry からの削除、退室通知）
//!
//! ### なぜこのテストが必要か
//! - 切断の後始末はどの状態からでも必ず完走しなければならない
//! - 取り残された Registry 行は名簿とルーム一覧に幽霊として残り続ける
//! - 未入室のまま切断した接続でも後始末が壊れないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中のセッションの切断と通知
//! - エッジケース：最後の在室者の切断（ルームの消滅）、未入室での切断
//! - 冪等性：同じセッションの二重切断

use std::sync::Arc;

use crate::domain::{MessagePusher, SessionId, SessionRepository};

use super::presence::{LeaveKind, PresenceBroadcaster};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 在室状況の通知部品
    presence: Arc<PresenceBroadcaster>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<PresenceBroadcaster>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            presence,
        }
    }

    /// セッション切断の後始末を実行
    ///
    /// どの状態（未入室・在室中）からでも必ず完走する。失敗はない。
    ///
    /// # Arguments
    ///
    /// * `session_id` - 切断したセッションの ID（Domain Model）
    pub async fn execute(&self, session_id: &SessionId) {
        // 1. sender チャンネルの登録解除（Registry に行がなくても行う）
        self.message_pusher.unregister_session(session_id).await;

        // 2. Registry から削除
        let Some(session) = self.repository.find(session_id).await else {
            tracing::info!(
                "Session '{}' disconnected before entering a room",
                session_id.as_str()
            );
            return;
        };
        self.repository.remove(session_id).await;

        // 3. 在室していた場合は退室を通知し、全接続のルーム一覧を更新
        if let Some(room) = &session.room {
            self.presence
                .announce_leave(&session.name, room, LeaveKind::Disconnect)
                .await;
            self.presence.refresh_room_list().await;
        }

        tracing::info!(
            "Session '{}' ('{}') disconnected and removed from registry",
            session_id.as_str(),
            session.name.as_str()
        );
    }
}
