//! UseCase: 在室状況の通知処理
//!
//! 入室・退室・切断のたびに呼ばれる共通の通知部品。
//! 対象ルームへの Admin 通知とルーム名簿（userList）、全接続への
//! ルーム一覧（roomList）を組み立てて送信します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PresenceBroadcaster の announce_join / announce_leave / refresh_room_list
//! - 通知の宛先選定（本人のみ・本人以外・ルーム全員・全接続）
//! - 名簿とルーム一覧の内容と順序
//!
//! ### なぜこのテストが必要か
//! - 在室通知は入室・退室・切断の全フローから呼ばれる共有部品
//! - 宛先を誤ると他ルームへ在室情報が漏れる
//! - 名簿は Registry の現在状態から導出されるため、状態変更後に
//!   呼ばれたときの整合性を保証する必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人のルームへの入室通知、退室通知
//! - エッジケース：最後の在室者の退室（空ルームへの通知は宛先なし）

use std::sync::Arc;

use crate::domain::{
    DisplayName, MessagePusher, RoomName, Session, SessionId, SessionRepository,
};
use crate::infrastructure::dto::websocket::{ServerEvent, UserInfo};

/// システム通知の送信者名
pub const ADMIN_NAME: &str = "Admin";

/// 退室通知の種別
///
/// ルーム移動と切断では本文が異なる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveKind {
    /// 別ルームへの移動による退室
    RoomChange,
    /// WebSocket 切断による退室
    Disconnect,
}

impl LeaveKind {
    fn notice_text(&self, name: &DisplayName) -> String {
        match self {
            LeaveKind::RoomChange => format!("{} has left the room.", name.as_str()),
            LeaveKind::Disconnect => format!("{} has left the chat.", name.as_str()),
        }
    }
}

/// 在室状況通知の共通部品
pub struct PresenceBroadcaster {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl PresenceBroadcaster {
    /// 新しい PresenceBroadcaster を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 入室を通知
    ///
    /// Registry に入室後のセッションが反映された状態で呼ぶこと。
    ///
    /// - 本人へ: `Welcome to {room}.`
    /// - 本人以外の在室者へ: `{name} has joined.`
    /// - ルーム全員へ: 更新後の名簿（userList）
    pub async fn announce_join(&self, session: &Session) {
        let Some(room) = &session.room else {
            return;
        };

        // 1. 本人へのウェルカム通知
        let welcome = admin_notice(format!("Welcome to {}.", room.as_str()));
        if let Err(e) = self.message_pusher.push_to(&session.id, &welcome).await {
            tracing::warn!("Failed to push welcome to '{}': {}", session.id.as_str(), e);
        }

        // 2. 本人以外への入室通知
        let roster = self.sorted_roster(room).await;
        let others: Vec<SessionId> = roster
            .iter()
            .filter(|s| s.id != session.id)
            .map(|s| s.id.clone())
            .collect();
        let joined = admin_notice(format!("{} has joined.", session.name.as_str()));
        if let Err(e) = self.message_pusher.broadcast(others, &joined).await {
            tracing::warn!("Failed to broadcast join notice: {}", e);
        }

        // 3. ルーム全員への名簿更新
        self.push_roster(&roster).await;
    }

    /// 退室を通知
    ///
    /// Registry から退室が反映された状態で呼ぶこと。
    /// 残りの在室者へ Admin 通知と更新後の名簿を送る。
    pub async fn announce_leave(&self, name: &DisplayName, room: &RoomName, kind: LeaveKind) {
        let roster = self.sorted_roster(room).await;
        let remaining: Vec<SessionId> = roster.iter().map(|s| s.id.clone()).collect();

        let notice = admin_notice(kind.notice_text(name));
        if let Err(e) = self.message_pusher.broadcast(remaining, &notice).await {
            tracing::warn!("Failed to broadcast leave notice: {}", e);
        }

        self.push_roster(&roster).await;
    }

    /// 全接続へルーム一覧を配信
    ///
    /// 在室者が 1 人以上いるルームだけが載る。未入室の接続にも届く。
    pub async fn refresh_room_list(&self) {
        let rooms = self.repository.list_active_rooms().await;
        let event = ServerEvent::RoomList {
            rooms: rooms.iter().map(|r| r.as_str().to_string()).collect(),
        };
        let frame = serde_json::to_string(&event).unwrap();
        if let Err(e) = self.message_pusher.broadcast_all(&frame).await {
            tracing::warn!("Failed to broadcast room list: {}", e);
        }
    }

    /// 名前順に整列した在室者リストを取得
    async fn sorted_roster(&self, room: &RoomName) -> Vec<Session> {
        let mut sessions = self.repository.list_by_room(room).await;
        sessions.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        sessions
    }

    /// 名簿をルーム全員へ配信
    async fn push_roster(&self, roster: &[Session]) {
        let event = ServerEvent::UserList {
            users: roster.iter().map(UserInfo::from).collect(),
        };
        let frame = serde_json::to_string(&event).unwrap();
        let targets: Vec<SessionId> = roster.iter().map(|s| s.id.clone()).collect();
        if let Err(e) = self.message_pusher.broadcast(targets, &frame).await {
            tracing::warn!("Failed to broadcast user list: {}", e);
        }
    }
}

/// Admin 名義の message フレームを組み立てる
pub(crate) fn admin_notice(text: String) -> String {
    use mitsudan_shared::time::{get_jst_timestamp, jst_clock_time};

    let event = ServerEvent::Message {
        name: ADMIN_NAME.to_string(),
        text,
        time: jst_clock_time(get_jst_timestamp()),
    };
    serde_json::to_string(&event).unwrap()
}
