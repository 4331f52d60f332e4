//! Value Object 定義
//!
//! セッション ID・表示名・ルーム名・メッセージ本文を検証付きの型として表現します。
//! 不正な値はコンストラクタで弾かれるため、ドメイン層の内側では常に有効な値のみが流通します。

use mitsudan_shared::crypto::MAX_PLAINTEXT_BYTES;
use uuid::Uuid;

use super::error::ValidationError;

/// 表示名の最大文字数
pub const MAX_DISPLAY_NAME_CHARS: usize = 32;

/// ルーム名の最大文字数
pub const MAX_ROOM_NAME_CHARS: usize = 64;

/// セッション ID（接続ごとにサーバーが払い出す不透明な識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// 検証付きで SessionId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptySessionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// SessionId のファクトリ
///
/// 接続受付時に UUID v4 から一意な ID を払い出します。
pub struct SessionIdFactory;

impl SessionIdFactory {
    pub fn generate() -> SessionId {
        SessionId(Uuid::new_v4().to_string())
    }
}

/// クライアントが名乗る表示名（一意性は保証しない）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// 検証付きで DisplayName を作成
    ///
    /// 空白のみ・空文字列・32 文字超は不正。
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() || value.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(ValidationError::InvalidDisplayName(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ルーム名
///
/// ルームはエンティティとして保存されず、この値を持つセッションの集合として導出されます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    /// 検証付きで RoomName を作成
    ///
    /// 空白のみ・空文字列・64 文字超は不正。
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() || value.chars().count() > MAX_ROOM_NAME_CHARS {
            return Err(ValidationError::InvalidRoomName(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// メッセージ本文
///
/// RSA-2048/OAEP-SHA-256 の 1 ブロックに収まるよう、バイト長の上限を
/// 暗号プリミティブ側の定数に合わせて検証します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// 検証付きで MessageText を作成
    ///
    /// 空文字列・190 バイト超は不正。
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() || value.len() > MAX_PLAINTEXT_BYTES {
            return Err(ValidationError::InvalidMessageText { len: value.len() });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_factory_generates_unique_ids() {
        // テスト項目: ファクトリが呼び出しごとに異なる ID を払い出す
        // given (前提条件):

        // when (操作):
        let id1 = SessionIdFactory::generate();
        let id2 = SessionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_session_id_rejects_empty_string() {
        // テスト項目: 空文字列からは SessionId を作成できない
        // given (前提条件):

        // when (操作):
        let result = SessionId::new("  ".to_string());

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::EmptySessionId));
    }

    #[test]
    fn test_display_name_accepts_valid_name() {
        // テスト項目: 有効な表示名を作成できる
        // given (前提条件):

        // when (操作):
        let name = DisplayName::new("alice".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_display_name_rejects_empty_and_too_long() {
        // テスト項目: 空文字列と 32 文字超の表示名は拒否される
        // given (前提条件):
        let too_long = "a".repeat(MAX_DISPLAY_NAME_CHARS + 1);

        // when (操作):
        let empty_result = DisplayName::new("".to_string());
        let blank_result = DisplayName::new("   ".to_string());
        let long_result = DisplayName::new(too_long);

        // then (期待する結果):
        assert!(empty_result.is_err());
        assert!(blank_result.is_err());
        assert!(long_result.is_err());
    }

    #[test]
    fn test_display_name_accepts_max_length() {
        // テスト項目: ちょうど 32 文字の表示名は作成できる
        // given (前提条件):
        let max_len = "a".repeat(MAX_DISPLAY_NAME_CHARS);

        // when (操作):
        let result = DisplayName::new(max_len.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), max_len);
    }

    #[test]
    fn test_room_name_accepts_valid_name() {
        // テスト項目: 有効なルーム名を作成できる
        // given (前提条件):

        // when (操作):
        let room = RoomName::new("lobby".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(room.as_str(), "lobby");
    }

    #[test]
    fn test_room_name_rejects_empty_and_too_long() {
        // テスト項目: 空文字列と 64 文字超のルーム名は拒否される
        // given (前提条件):
        let too_long = "r".repeat(MAX_ROOM_NAME_CHARS + 1);

        // when (操作):
        let empty_result = RoomName::new("".to_string());
        let long_result = RoomName::new(too_long);

        // then (期待する結果):
        assert!(empty_result.is_err());
        assert!(long_result.is_err());
    }

    #[test]
    fn test_message_text_accepts_valid_text() {
        // テスト項目: 有効なメッセージ本文を作成できる
        // given (前提条件):

        // when (操作):
        let text = MessageText::new("hi".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(text.as_str(), "hi");
        assert_eq!(text.as_bytes(), b"hi");
    }

    #[test]
    fn test_message_text_rejects_over_block_capacity() {
        // テスト項目: RSA ブロック容量を超える本文は拒否される
        // given (前提条件):
        let at_limit = "x".repeat(MAX_PLAINTEXT_BYTES);
        let over_limit = "x".repeat(MAX_PLAINTEXT_BYTES + 1);

        // when (操作):
        let ok_result = MessageText::new(at_limit);
        let over_result = MessageText::new(over_limit);

        // then (期待する結果):
        assert!(ok_result.is_ok());
        assert_eq!(
            over_result,
            Err(ValidationError::InvalidMessageText {
                len: MAX_PLAINTEXT_BYTES + 1
            })
        );
    }

    #[test]
    fn test_message_text_length_is_counted_in_bytes() {
        // テスト項目: 本文の上限はバイト数で判定される（マルチバイト文字を考慮）
        // given (前提条件): 64 文字 x 3 バイト = 192 バイト > 190 バイト
        let multibyte = "あ".repeat(64);

        // when (操作):
        let result = MessageText::new(multibyte);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValidationError::InvalidMessageText { len: 192 })
        );
    }
}
