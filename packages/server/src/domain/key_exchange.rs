//! KeyExchange trait 定義
//!
//! セッション鍵ペア生成のインターフェースを定義します。
//! 具体的な実装（RSA-2048）は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use mitsudan_shared::crypto::SessionKeyPair;

#[cfg(test)]
use mockall::automock;

use super::KeyExchangeError;

/// 秘密鍵の配送モード
///
/// - `ClientHeld`: 秘密鍵を PEM でクライアントへ送り、サーバー側では破棄する。
///   復号はクライアントで行う。
/// - `ServerHeld`: 秘密鍵をセッションに保持し、サーバーが再配信前に復号する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDeliveryMode {
    ClientHeld,
    ServerHeld,
}

/// KeyExchange trait
///
/// 鍵生成はルーム入室（再入室を含む）のたびに呼ばれます。メッセージ送信では
/// 呼ばれません。CPU バウンドな処理のため、実装はイベントループをブロック
/// しない形で生成を行う必要があります。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyExchange: Send + Sync {
    /// 新しい 2048-bit RSA 鍵ペアを生成
    async fn generate_key_pair(&self) -> Result<SessionKeyPair, KeyExchangeError>;
}
