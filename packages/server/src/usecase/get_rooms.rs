//! UseCase: ルーム一覧取得処理
//!
//! HTTP の読み取り面（`GET /api/rooms`）から呼ばれる。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetRoomsUseCase::execute() メソッド
//! - 在室者のいるルームと在室者名の導出
//!
//! ### なぜこのテストが必要か
//! - ルーム一覧は Registry からの導出ビューで、専用の保存領域を持たない
//! - 在室者ゼロのルームが現れないこと、順序が安定であることを保証する

use std::sync::Arc;

use crate::domain::{DisplayName, RoomName, SessionRepository};

/// ルームとその在室者名のスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub room: RoomName,
    pub users: Vec<DisplayName>,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// ルーム一覧を取得
    ///
    /// # Returns
    ///
    /// 在室者が 1 人以上いるルームのスナップショット
    /// （ルーム名順、在室者は名前順）
    pub async fn execute(&self) -> Vec<RoomOccupancy> {
        let rooms = self.repository.list_active_rooms().await;
        let mut occupancies = Vec::with_capacity(rooms.len());
        for room in rooms {
            let mut users: Vec<DisplayName> = self
                .repository
                .list_by_room(&room)
                .await
                .into_iter()
                .map(|s| s.name)
                .collect();
            users.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            occupancies.push(RoomOccupancy { room, users });
        }
        occupancies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Session, SessionId},
        infrastructure::repository::InMemorySessionRepository,
    };

    fn create_test_session(id: &str, name: &str, room: &str) -> Session {
        let mut session = Session::new(
            SessionId::new(id.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
        );
        session.room = Some(RoomName::new(room.to_string()).unwrap());
        session
    }

    #[tokio::test]
    async fn test_get_rooms_returns_sorted_occupancy() {
        // テスト項目: ルーム名順・在室者名順のスナップショットが返る
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        repository
            .upsert(create_test_session("s-1", "charlie", "lobby"))
            .await;
        repository
            .upsert(create_test_session("s-2", "alice", "lobby"))
            .await;
        repository
            .upsert(create_test_session("s-3", "bob", "garden"))
            .await;
        let usecase = GetRoomsUseCase::new(repository);

        // when (操作):
        let occupancies = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(occupancies.len(), 2);
        assert_eq!(occupancies[0].room.as_str(), "garden");
        assert_eq!(occupancies[0].users.len(), 1);
        assert_eq!(occupancies[1].room.as_str(), "lobby");
        let names: Vec<&str> = occupancies[1].users.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["alice", "charlie"]);
    }

    #[tokio::test]
    async fn test_get_rooms_empty_registry() {
        // テスト項目: 誰も在室していなければ空のリストが返る
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = GetRoomsUseCase::new(repository);

        // when (操作):
        let occupancies = usecase.execute().await;

        // then (期待する結果):
        assert!(occupancies.is_empty());
    }
}
