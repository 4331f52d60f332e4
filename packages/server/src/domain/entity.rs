//! エンティティ定義
//!
//! Session は接続中の参加者 1 人分の状態（表示名・所属ルーム・鍵）を表します。
//! ルームはエンティティではなく、同じ RoomName を持つ Session の集合として導出されます。

use std::fmt;

use rsa::{RsaPrivateKey, RsaPublicKey};

use super::value_object::{DisplayName, RoomName, SessionId};

/// セッションに紐づく鍵の状態
///
/// 鍵配送モードによって秘密鍵の所在が変わります：
/// - `ClientHeld`: 秘密鍵はクライアントへ払い出し済み。サーバーは公開鍵のみ保持。
/// - `ServerHeld`: 秘密鍵もサーバーが保持し、再配信前にサーバー側で復号する。
///
/// どちらのモードでも、ルーム（再）入室のたびに鍵は丸ごと置き換えられます。
/// 部分的な鍵状態（公開鍵だけ更新済み等）が観測されることはありません。
#[derive(Clone)]
pub enum SessionKeys {
    ClientHeld {
        public_key: RsaPublicKey,
    },
    ServerHeld {
        public_key: RsaPublicKey,
        private_key: RsaPrivateKey,
    },
}

impl SessionKeys {
    pub fn public_key(&self) -> &RsaPublicKey {
        match self {
            Self::ClientHeld { public_key } => public_key,
            Self::ServerHeld { public_key, .. } => public_key,
        }
    }

    /// ServerHeld モードでのみ Some を返す
    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        match self {
            Self::ClientHeld { .. } => None,
            Self::ServerHeld { private_key, .. } => Some(private_key),
        }
    }
}

impl fmt::Debug for SessionKeys {
    // 鍵素材をログへ流さない
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientHeld { .. } => f.debug_struct("ClientHeld").finish_non_exhaustive(),
            Self::ServerHeld { .. } => f.debug_struct("ServerHeld").finish_non_exhaustive(),
        }
    }
}

/// 接続中の参加者 1 人分のセッション
///
/// ## ライフサイクル
///
/// 最初のルーム入室（またはログイン）成功時に作成され、再入室のたびに
/// `enter_room` でルームと鍵が同時に置き換えられ、切断時に Registry から削除されます。
#[derive(Debug, Clone)]
pub struct Session {
    /// 接続時に払い出される不変の ID
    pub id: SessionId,
    /// クライアントが名乗った表示名
    pub name: DisplayName,
    /// 所属ルーム（入室成功まで None）
    pub room: Option<RoomName>,
    /// 鍵の状態（鍵生成完了まで None）
    pub keys: Option<SessionKeys>,
}

impl Session {
    /// ルーム未入室・鍵なしのセッションを作成
    pub fn new(id: SessionId, name: DisplayName) -> Self {
        Self {
            id,
            name,
            room: None,
            keys: None,
        }
    }

    /// ルームへ入室する
    ///
    /// ルームと鍵を同時に置き換えます。以前の鍵はここで破棄され、
    /// 古いルーム向けの暗号文は以後復号できなくなります。
    pub fn enter_room(&mut self, room: RoomName, keys: SessionKeys) {
        self.room = Some(room);
        self.keys = Some(keys);
    }

    /// 表示名を更新する（enterRoom イベントは毎回 name を運ぶため）
    pub fn rename(&mut self, name: DisplayName) {
        self.name = name;
    }

    /// 指定ルームに所属しているか
    pub fn is_in_room(&self, room: &RoomName) -> bool {
        self.room.as_ref() == Some(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mitsudan_shared::crypto::SessionKeyPair;

    fn create_test_keys() -> (SessionKeys, SessionKeyPair) {
        let pair = SessionKeyPair::generate().unwrap();
        let keys = SessionKeys::ClientHeld {
            public_key: pair.public_key.clone(),
        };
        (keys, pair)
    }

    #[test]
    fn test_new_session_has_no_room_and_no_keys() {
        // テスト項目: 新規セッションはルーム未入室かつ鍵なし
        // given (前提条件):
        let id = SessionId::new("s-1".to_string()).unwrap();
        let name = DisplayName::new("alice".to_string()).unwrap();

        // when (操作):
        let session = Session::new(id.clone(), name);

        // then (期待する結果):
        assert_eq!(session.id, id);
        assert!(session.room.is_none());
        assert!(session.keys.is_none());
    }

    #[test]
    fn test_enter_room_sets_room_and_keys_together() {
        // テスト項目: 入室でルームと鍵が同時に設定される
        // given (前提条件):
        let id = SessionId::new("s-1".to_string()).unwrap();
        let name = DisplayName::new("alice".to_string()).unwrap();
        let mut session = Session::new(id, name);
        let (keys, _pair) = create_test_keys();

        // when (操作):
        let room = RoomName::new("lobby".to_string()).unwrap();
        session.enter_room(room.clone(), keys);

        // then (期待する結果):
        assert!(session.is_in_room(&room));
        assert!(session.keys.is_some());
    }

    #[test]
    fn test_reentry_replaces_keys_wholesale() {
        // テスト項目: 再入室で鍵が丸ごと置き換えられる
        // given (前提条件):
        let id = SessionId::new("s-1".to_string()).unwrap();
        let name = DisplayName::new("alice".to_string()).unwrap();
        let mut session = Session::new(id, name);
        let (first_keys, first_pair) = create_test_keys();
        session.enter_room(RoomName::new("room-a".to_string()).unwrap(), first_keys);

        // when (操作):
        let (second_keys, _second_pair) = create_test_keys();
        let room_b = RoomName::new("room-b".to_string()).unwrap();
        session.enter_room(room_b.clone(), second_keys);

        // then (期待する結果): ルームも鍵も新しいものに置き換わっている
        assert!(session.is_in_room(&room_b));
        let current_public = session.keys.as_ref().unwrap().public_key();
        assert_ne!(current_public, &first_pair.public_key);
    }

    #[test]
    fn test_private_key_presence_depends_on_mode() {
        // テスト項目: 秘密鍵は ServerHeld モードでのみ保持される
        // given (前提条件):
        let pair = SessionKeyPair::generate().unwrap();

        // when (操作):
        let client_held = SessionKeys::ClientHeld {
            public_key: pair.public_key.clone(),
        };
        let server_held = SessionKeys::ServerHeld {
            public_key: pair.public_key.clone(),
            private_key: pair.private_key.clone(),
        };

        // then (期待する結果):
        assert!(client_held.private_key().is_none());
        assert!(server_held.private_key().is_some());
    }

    #[test]
    fn test_debug_output_redacts_key_material() {
        // テスト項目: Debug 出力に鍵素材が含まれない
        // given (前提条件):
        let pair = SessionKeyPair::generate().unwrap();
        let keys = SessionKeys::ServerHeld {
            public_key: pair.public_key.clone(),
            private_key: pair.private_key.clone(),
        };

        // when (操作):
        let output = format!("{:?}", keys);

        // then (期待する結果):
        assert_eq!(output, "ServerHeld { .. }");
    }
}
