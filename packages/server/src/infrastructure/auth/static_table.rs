//! 静的テーブルを使った CredentialValidator 実装
//!
//! ## 責務
//!
//! - ユーザー名とパスワードの組を固定テーブルと照合する
//!
//! ## 設計ノート
//!
//! 認証基盤との連携は対象外で、資格情報は起動時に構築した
//! インメモリのテーブルで照合します。検証結果は合否のみで、
//! 「ユーザーが存在しない」と「パスワードが違う」は区別しません。

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::CredentialValidator;

/// 静的テーブルを使った CredentialValidator 実装
pub struct StaticCredentialTable {
    /// ユーザー名とパスワードの対応表
    ///
    /// Key: ユーザー名
    /// Value: パスワード
    credentials: HashMap<String, String>,
}

impl StaticCredentialTable {
    /// 任意の資格情報テーブルから作成
    pub fn new(credentials: HashMap<String, String>) -> Self {
        Self { credentials }
    }

    /// 既定のデモユーザー（user1 〜 user4、パスワードは共通で "1234"）で作成
    pub fn with_default_users() -> Self {
        let credentials = (1..=4)
            .map(|n| (format!("user{}", n), "1234".to_string()))
            .collect();
        Self::new(credentials)
    }
}

#[async_trait]
impl CredentialValidator for StaticCredentialTable {
    async fn validate(&self, name: &str, password: &str) -> bool {
        match self.credentials.get(name) {
            Some(expected) => expected == password,
            None => false,
        }
    }
}
