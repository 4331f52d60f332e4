//! RSA を使った KeyExchange 実装
//!
//! ## 責務
//!
//! - 入室ごとの RSA 鍵ペア生成
//!
//! ## 設計ノート
//!
//! 2048 bit の RSA 鍵生成は数百ミリ秒かかるブロッキング処理です。
//! Tokio のワーカースレッドを塞がないよう `spawn_blocking` で実行します。
//! 生成そのものは `mitsudan_shared::crypto` に委譲し、この実装は
//! 非同期境界とエラー変換だけを受け持ちます。

use async_trait::async_trait;

use mitsudan_shared::crypto::SessionKeyPair;

use crate::domain::{KeyExchange, KeyExchangeError};

/// RSA を使った KeyExchange 実装
pub struct RsaKeyExchange;

impl RsaKeyExchange {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RsaKeyExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyExchange for RsaKeyExchange {
    async fn generate_key_pair(&self) -> Result<SessionKeyPair, KeyExchangeError> {
        let pair = tokio::task::spawn_blocking(SessionKeyPair::generate)
            .await
            .map_err(|e| KeyExchangeError::GenerationFailed(e.to_string()))?
            .map_err(|e| KeyExchangeError::GenerationFailed(e.to_string()))?;
        Ok(pair)
    }
}
