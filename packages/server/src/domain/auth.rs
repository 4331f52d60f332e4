//! CredentialValidator trait 定義
//!
//! ログイン認証の pass/fail 判定のインターフェースを定義します。
//! 資格情報の保管方法はドメインの関心事ではなく、Infrastructure 層が提供します。

use async_trait::async_trait;

/// CredentialValidator trait
///
/// 認証は pass/fail の契約のみ。失敗理由の内訳（未知のユーザーか、
/// パスワード不一致か）は呼び出し側へ漏らしません。
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// 資格情報が有効なら true
    async fn validate(&self, name: &str, password: &str) -> bool;
}
