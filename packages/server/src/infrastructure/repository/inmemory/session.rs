//! InMemory Session Registry 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! SessionId をキーとする HashMap をインメモリ DB として使用します。
//!
//! ## 設計ノート
//!
//! Registry の変更は Mutex によって直列化されます。upsert / remove は
//! キー単位の置換・削除であり、マップ全体の再構築は行いません。
//! 読み取り系はロック中にクローンを返すため、呼び出し側がロックを跨いで
//! セッションを保持しても Registry と干渉しません。

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RoomName, Session, SessionId, SessionRepository};

/// インメモリ Session Registry 実装
pub struct InMemorySessionRepository {
    /// 接続中の全セッション
    ///
    /// Key: SessionId
    /// Value: Session
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    /// 空の Registry を作成
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn upsert(&self, session: Session) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id.clone(), session);
    }

    async fn remove(&self, id: &SessionId) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(id);
    }

    async fn find(&self, id: &SessionId) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions.get(id).cloned()
    }

    async fn list_by_room(&self, room: &RoomName) -> Vec<Session> {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .filter(|s| s.is_in_room(room))
            .cloned()
            .collect()
    }

    async fn list_active_rooms(&self) -> Vec<RoomName> {
        let sessions = self.sessions.lock().await;
        let rooms: BTreeSet<RoomName> = sessions
            .values()
            .filter_map(|s| s.room.clone())
            .collect();
        rooms.into_iter().collect()
    }
}
