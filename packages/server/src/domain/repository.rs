//! Repository trait 定義
//!
//! ドメイン層が必要とするセッション Registry のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{RoomName, Session, SessionId};

/// Session Registry trait
///
/// 接続中の全セッションを保持する唯一のストアへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 契約
///
/// - 変更系は `upsert` と `remove` の 2 つのみ。どちらも失敗しない。
/// - 全操作はアトミック。呼び出し側が書き換え途中の Registry を観測することはない。
/// - ルームはここから導出される（`list_by_room` / `list_active_rooms`）。
///   独立したルームストアは存在しない。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを ID で置換または挿入
    async fn upsert(&self, session: Session);

    /// セッションを削除（存在しなければ何もしない）
    async fn remove(&self, id: &SessionId);

    /// セッションを ID で取得
    async fn find(&self, id: &SessionId) -> Option<Session>;

    /// 指定ルームに所属する全セッションを取得（順序は未規定）
    async fn list_by_room(&self, room: &RoomName) -> Vec<Session>;

    /// 1 人以上が所属しているルーム名の一覧を重複なしで取得
    async fn list_active_rooms(&self) -> Vec<RoomName>;
}
