//! UseCase: 暗号化メッセージの中継処理
//!
//! 送信者のルームから公開鍵を持つ相手を 1 人選び、その公開鍵で本文を
//! RSA-OAEP 暗号化して配信します。配送モードによって最終的な封筒が変わります。
//!
//! - クライアント配送モード: Base64 の暗号文をルーム全員へ `encmessage` で配信。
//!   復号できるのは選ばれた受信者だけ。
//! - サーバー保持モード: 受信者の保持鍵で即時復号し、平文の `message` として
//!   ルーム全員へ再配信。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayEncryptedMessageUseCase::execute() メソッド
//! - 受信者の解決（同室・他者・公開鍵あり）と暗号文の配信
//! - 受信者不在時の暗黙破棄（平文でのフォールバック配信をしないこと）
//!
//! ### なぜこのテストが必要か
//! - 受信者が見つからないとき平文を流してしまうと暗号化の意味がなくなる
//! - 受信者の解決はルーム境界を越えてはならない
//! - 配送モードごとの封筒（暗号文 / 復元平文）を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：両モードでの中継
//! - 異常系：未入室の送信者、受信者不在
//! - エッジケース：公開鍵を持つ相手が別ルームにしかいない場合

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};

use crate::domain::{KeyDeliveryMode, MessagePusher, MessageText, SessionId, SessionRepository};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::{DropReason, RelayOutcome};

/// 暗号化メッセージ中継のユースケース
pub struct RelayEncryptedMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 秘密鍵の配送モード
    key_delivery_mode: KeyDeliveryMode,
}

impl RelayEncryptedMessageUseCase {
    /// 新しい RelayEncryptedMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        key_delivery_mode: KeyDeliveryMode,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            key_delivery_mode,
        }
    }

    /// 暗号化メッセージの中継を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 送信者のセッション ID（Domain Model）
    /// * `text` - メッセージ本文（平文、Domain Model）
    ///
    /// # Returns
    ///
    /// 中継結果。破棄は送信者へ通知されず、ログにのみ残る。
    pub async fn execute(&self, session_id: &SessionId, text: MessageText) -> RelayOutcome {
        use mitsudan_shared::crypto::{decrypt_with, encrypt_for};
        use mitsudan_shared::time::{get_jst_timestamp, jst_clock_time};

        // 1. 送信者の在室確認
        let Some(sender) = self.repository.find(session_id).await else {
            tracing::warn!(
                "Dropping encrypted message from unknown session '{}'",
                session_id.as_str()
            );
            return RelayOutcome::Dropped(DropReason::SenderNotInRoom);
        };
        let Some(room) = sender.room.clone() else {
            tracing::warn!(
                "Dropping encrypted message from roomless session '{}'",
                session_id.as_str()
            );
            return RelayOutcome::Dropped(DropReason::SenderNotInRoom);
        };

        // 2. 受信者の解決（同室・名前順で最初の、公開鍵を持つ他者）
        //    Repository はクローンを返すため、鍵素材はこの時点で
        //    Registry のロック外に出ている
        let mut roster = self.repository.list_by_room(&room).await;
        roster.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        let Some((recipient_id, keys)) = roster
            .iter()
            .filter(|s| s.id != sender.id)
            .find_map(|s| s.keys.as_ref().map(|keys| (&s.id, keys)))
        else {
            tracing::warn!(
                "No recipient with a public key in room '{}', dropping encrypted message",
                room.as_str()
            );
            return RelayOutcome::Dropped(DropReason::RecipientUnresolvable);
        };

        // 3. 受信者の公開鍵で暗号化
        let ciphertext = match encrypt_for(keys.public_key(), text.as_bytes()) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                tracing::warn!(
                    "Encryption for session '{}' failed: {}",
                    recipient_id.as_str(),
                    e
                );
                return RelayOutcome::Dropped(DropReason::EncryptionFailed);
            }
        };

        // 4. 配送モードに応じた封筒を組み立て
        let time = jst_clock_time(get_jst_timestamp());
        let event = match self.key_delivery_mode {
            KeyDeliveryMode::ClientHeld => ServerEvent::EncMessage {
                name: sender.name.as_str().to_string(),
                text: general_purpose::STANDARD.encode(&ciphertext),
                time,
            },
            KeyDeliveryMode::ServerHeld => {
                let Some(private_key) = keys.private_key() else {
                    tracing::warn!(
                        "Session '{}' holds no private key, dropping encrypted message",
                        recipient_id.as_str()
                    );
                    return RelayOutcome::Dropped(DropReason::DecryptionFailed);
                };
                let plaintext = match decrypt_with(private_key, &ciphertext) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!(
                            "Decryption with the retained key of '{}' failed: {}",
                            recipient_id.as_str(),
                            e
                        );
                        return RelayOutcome::Dropped(DropReason::DecryptionFailed);
                    }
                };
                let Ok(recovered) = String::from_utf8(plaintext) else {
                    tracing::warn!("Recovered plaintext is not valid UTF-8, dropping");
                    return RelayOutcome::Dropped(DropReason::DecryptionFailed);
                };
                ServerEvent::Message {
                    name: sender.name.as_str().to_string(),
                    text: recovered,
                    time,
                }
            }
        };
        let frame = serde_json::to_string(&event).unwrap();

        // 5. 送信者を含むルーム全員へ配信
        let targets: Vec<SessionId> = roster.iter().map(|s| s.id.clone()).collect();
        let recipients = targets.len();
        if let Err(e) = self.message_pusher.broadcast(targets, &frame).await {
            tracing::warn!("Failed to broadcast encrypted message: {}", e);
        }

        tracing::debug!(
            "Relayed encrypted message from '{}' to {} session(s) in room '{}'",
            sender.name.as_str(),
            recipients,
            room.as_str()
        );
        RelayOutcome::Relayed { recipients }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MessagePusher, RoomName, Session, SessionKeys},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use base64::Engine as _;
    use mitsudan_shared::crypto::{SessionKeyPair, decrypt_with};
    use tokio::sync::mpsc;

    fn create_test_session(id: &str, name: &str, room: &str, keys: Option<SessionKeys>) -> Session {
        let mut session = Session::new(
            SessionId::new(id.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
        );
        session.room = Some(RoomName::new(room.to_string()).unwrap());
        session.keys = keys;
        session
    }

    fn create_test_usecase(
        key_delivery_mode: KeyDeliveryMode,
    ) -> (
        Arc<InMemorySessionRepository>,
        Arc<WebSocketMessagePusher>,
        RelayEncryptedMessageUseCase,
    ) {
        let repository = Arc::new(InMemorySessionRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = RelayEncryptedMessageUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            key_delivery_mode,
        );
        (repository, message_pusher, usecase)
    }

    async fn register_channel(
        pusher: &WebSocketMessagePusher,
        id: &str,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        pusher
            .register_session(SessionId::new(id.to_string()).unwrap(), tx)
            .await;
        rx
    }

    fn parse(frame: String) -> ServerEvent {
        serde_json::from_str(&frame).unwrap()
    }

    #[tokio::test]
    async fn test_client_held_broadcasts_ciphertext_only_recipient_can_read() {
        // テスト項目: 暗号文がルーム全員に配信され、選ばれた受信者だけが復号できる
        // given (前提条件): bob だけが公開鍵を持つ
        let (repository, message_pusher, usecase) =
            create_test_usecase(KeyDeliveryMode::ClientHeld);
        let pair = SessionKeyPair::generate().unwrap();
        repository
            .upsert(create_test_session("s-alice", "alice", "lobby", None))
            .await;
        repository
            .upsert(create_test_session(
                "s-bob",
                "bob",
                "lobby",
                Some(SessionKeys::ClientHeld {
                    public_key: pair.public_key.clone(),
                }),
            ))
            .await;
        let mut alice_rx = register_channel(&message_pusher, "s-alice").await;
        let mut bob_rx = register_channel(&message_pusher, "s-bob").await;

        // when (操作): alice が平文を送信
        let sender = SessionId::new("s-alice".to_string()).unwrap();
        let text = MessageText::new("meet at noon".to_string()).unwrap();
        let outcome = usecase.execute(&sender, text).await;

        // then (期待する結果): 両者に同じ暗号文が届き、bob の秘密鍵で平文に戻る
        assert_eq!(outcome, RelayOutcome::Relayed { recipients: 2 });
        let alice_frame = parse(alice_rx.recv().await.unwrap());
        let bob_frame = parse(bob_rx.recv().await.unwrap());
        assert_eq!(alice_frame, bob_frame);
        match bob_frame {
            ServerEvent::EncMessage { name, text, .. } => {
                assert_eq!(name, "alice");
                // 平文はワイヤ上に現れない
                assert_ne!(text, "meet at noon");
                let ciphertext = general_purpose::STANDARD.decode(&text).unwrap();
                let plaintext = decrypt_with(&pair.private_key, &ciphertext).unwrap();
                assert_eq!(plaintext, b"meet at noon");
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_recipient_drops_without_plaintext_fallback() {
        // テスト項目: 受信者がいないとき、平文で配信されることなく破棄される
        // given (前提条件): alice しか在室していない
        let (repository, message_pusher, usecase) =
            create_test_usecase(KeyDeliveryMode::ClientHeld);
        repository
            .upsert(create_test_session("s-alice", "alice", "lobby", None))
            .await;
        let mut alice_rx = register_channel(&message_pusher, "s-alice").await;

        // when (操作):
        let sender = SessionId::new("s-alice".to_string()).unwrap();
        let text = MessageText::new("anyone?".to_string()).unwrap();
        let outcome = usecase.execute(&sender, text).await;

        // then (期待する結果): 破棄され、本人にも何も届かない
        assert_eq!(
            outcome,
            RelayOutcome::Dropped(DropReason::RecipientUnresolvable)
        );
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_recipient_resolution_is_room_scoped() {
        // テスト項目: 受信者の解決がルーム境界を越えない
        // given (前提条件): 公開鍵を持つ bob は別ルーム、同室の charlie も鍵を持つ
        let (repository, message_pusher, usecase) =
            create_test_usecase(KeyDeliveryMode::ClientHeld);
        let bob_pair = SessionKeyPair::generate().unwrap();
        let charlie_pair = SessionKeyPair::generate().unwrap();
        repository
            .upsert(create_test_session("s-alice", "alice", "lobby", None))
            .await;
        repository
            .upsert(create_test_session(
                "s-bob",
                "bob",
                "garden",
                Some(SessionKeys::ClientHeld {
                    public_key: bob_pair.public_key.clone(),
                }),
            ))
            .await;
        repository
            .upsert(create_test_session(
                "s-charlie",
                "charlie",
                "lobby",
                Some(SessionKeys::ClientHeld {
                    public_key: charlie_pair.public_key.clone(),
                }),
            ))
            .await;
        let mut bob_rx = register_channel(&message_pusher, "s-bob").await;
        let mut charlie_rx = register_channel(&message_pusher, "s-charlie").await;

        // when (操作):
        let sender = SessionId::new("s-alice".to_string()).unwrap();
        let text = MessageText::new("room scoped".to_string()).unwrap();
        let outcome = usecase.execute(&sender, text).await;

        // then (期待する結果): charlie の鍵で復号でき、bob には何も届かない
        assert_eq!(outcome, RelayOutcome::Relayed { recipients: 2 });
        match parse(charlie_rx.recv().await.unwrap()) {
            ServerEvent::EncMessage { text, .. } => {
                let ciphertext = general_purpose::STANDARD.decode(&text).unwrap();
                let plaintext = decrypt_with(&charlie_pair.private_key, &ciphertext).unwrap();
                assert_eq!(plaintext, b"room scoped");
            }
            other => panic!("unexpected frame: {:?}", other),
        }
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_server_held_redistributes_recovered_plaintext() {
        // テスト項目: サーバー保持モードでは復元した平文が message として配信される
        // given (前提条件): bob がサーバー保持の鍵ペアを持つ
        let (repository, message_pusher, usecase) =
            create_test_usecase(KeyDeliveryMode::ServerHeld);
        let pair = SessionKeyPair::generate().unwrap();
        repository
            .upsert(create_test_session("s-alice", "alice", "lobby", None))
            .await;
        repository
            .upsert(create_test_session(
                "s-bob",
                "bob",
                "lobby",
                Some(SessionKeys::ServerHeld {
                    public_key: pair.public_key.clone(),
                    private_key: pair.private_key.clone(),
                }),
            ))
            .await;
        let mut bob_rx = register_channel(&message_pusher, "s-bob").await;

        // when (操作):
        let sender = SessionId::new("s-alice".to_string()).unwrap();
        let text = MessageText::new("round trip".to_string()).unwrap();
        let outcome = usecase.execute(&sender, text).await;

        // then (期待する結果): 平文の message 封筒で届く
        assert_eq!(outcome, RelayOutcome::Relayed { recipients: 2 });
        match parse(bob_rx.recv().await.unwrap()) {
            ServerEvent::Message { name, text, .. } => {
                assert_eq!(name, "alice");
                assert_eq!(text, "round trip");
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sender_without_session_is_dropped() {
        // テスト項目: Registry に行のない送信者は破棄される
        // given (前提条件):
        let (_repository, _message_pusher, usecase) =
            create_test_usecase(KeyDeliveryMode::ClientHeld);

        // when (操作):
        let sender = SessionId::new("s-ghost".to_string()).unwrap();
        let text = MessageText::new("hello?".to_string()).unwrap();
        let outcome = usecase.execute(&sender, text).await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::SenderNotInRoom));
    }
}
