//! UseCase: ログイン処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::execute() メソッド
//! - 資格情報の照合と、成功時の入室フローへの委譲
//!
//! ### なぜこのテストが必要か
//! - 認証失敗時にセッションが作られないこと（状態が変わらないこと）を保証する
//! - 認証成功時は enterRoom と同じ入室フロー全体が走ることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：正しい資格情報でのログイン
//! - 異常系：誤ったパスワード、未知のユーザー
//! - エッジケース：入室済みセッションのログイン失敗（旧状態の維持）

use std::sync::Arc;

use crate::domain::{CredentialValidator, DisplayName, RoomName, SessionId};

use super::enter_room::EnterRoomUseCase;
use super::error::LoginError;

/// ログインのユースケース
pub struct LoginUseCase {
    /// CredentialValidator（資格情報照合の抽象化）
    credential_validator: Arc<dyn CredentialValidator>,
    /// 認証成功後に委譲する入室処理
    enter_room: Arc<EnterRoomUseCase>,
}

impl LoginUseCase {
    /// 新しい LoginUseCase を作成
    pub fn new(
        credential_validator: Arc<dyn CredentialValidator>,
        enter_room: Arc<EnterRoomUseCase>,
    ) -> Self {
        Self {
            credential_validator,
            enter_room,
        }
    }

    /// ログインを実行
    ///
    /// 照合に成功した場合は通常の入室フロー（鍵生成・通知を含む）へ
    /// そのまま委譲する。失敗した場合は何も変更しない。
    ///
    /// # Arguments
    ///
    /// * `session_id` - ログインするセッションの ID（Domain Model）
    /// * `name` - ユーザー名（表示名を兼ねる、Domain Model）
    /// * `room` - 入室先のルーム名（Domain Model）
    /// * `password` - パスワード
    ///
    /// # Returns
    ///
    /// * `Ok(())` - ログインと入室に成功
    /// * `Err(LoginError)` - 照合失敗、または入室処理の失敗
    pub async fn execute(
        &self,
        session_id: SessionId,
        name: DisplayName,
        room: RoomName,
        password: &str,
    ) -> Result<(), LoginError> {
        // 1. 資格情報の照合
        if !self
            .credential_validator
            .validate(name.as_str(), password)
            .await
        {
            tracing::warn!(
                "Authentication failed for user '{}' on session '{}'",
                name.as_str(),
                session_id.as_str()
            );
            return Err(LoginError::AuthenticationFailed(name.as_str().to_string()));
        }

        // 2. 入室フローへ委譲
        self.enter_room.execute(session_id, name, room).await?;
        Ok(())
    }
}
