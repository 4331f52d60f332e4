//! MessagePusher trait 定義
//!
//! セッションへのメッセージ配信のインターフェースを定義します。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, SessionId};

/// セッションごとの送信チャンネル
///
/// WebSocket の送信側タスクへ JSON 文字列を渡すためのチャンネル。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 配信は fire-and-forget。配信保証や再送は行わず、解決から送信までの間に
/// 切断されたセッションへの送信は no-op として扱われます。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続受付時にセッションの送信チャンネルを登録
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel);

    /// 切断時にセッションの送信チャンネルを登録解除
    async fn unregister_session(&self, session_id: &SessionId);

    /// 特定のセッションへ送信
    async fn push_to(&self, session_id: &SessionId, content: &str) -> Result<(), MessagePushError>;

    /// 指定したセッション群へ送信（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 接続中の全セッションへ送信（ルーム未入室のセッションも含む）
    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError>;
}
