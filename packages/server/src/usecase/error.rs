//! UseCase 層のエラーと中継結果の定義

use thiserror::Error;

/// 入室処理のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnterRoomError {
    /// 鍵ペアの生成または PEM 変換に失敗
    ///
    /// 入室全体が中止され、Registry は変更されない。
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}

/// ログイン処理のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    /// 資格情報の照合に失敗（ユーザー不在とパスワード誤りは区別しない）
    #[error("authentication failed for user '{0}'")]
    AuthenticationFailed(String),
    /// 認証後の入室処理に失敗
    #[error(transparent)]
    EnterRoom(#[from] EnterRoomError),
}

/// メッセージ・アクティビティ中継の結果
///
/// 中継の失敗は送信者へ通知されない。破棄もログに残したうえでの
/// 正常な結果として扱うため、Result ではなくこの列挙で返す。
#[derive(Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// 中継完了（送信対象となったセッション数）
    Relayed { recipients: usize },
    /// 破棄（理由つき）
    Dropped(DropReason),
}

/// 中継を破棄した理由
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DropReason {
    /// 送信者がどのルームにも入室していない
    #[error("sender is not in any room")]
    SenderNotInRoom,
    /// 公開鍵を持つ他の在室者が見つからない
    #[error("no recipient with a public key in the room")]
    RecipientUnresolvable,
    /// 受信者の公開鍵での暗号化に失敗
    #[error("encryption for the recipient failed")]
    EncryptionFailed,
    /// サーバー保持の秘密鍵での復号に失敗
    #[error("decryption with the retained private key failed")]
    DecryptionFailed,
}
