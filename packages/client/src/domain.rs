//! Domain logic for client-side operations.
//!
//! This module contains pure functions and small state machines that
//! implement client behavior without side effects, making them easy to test.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a typing notice for one sender stays "fresh"
pub const ACTIVITY_DECAY: Duration = Duration::from_secs(3);

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Switch to another room
    Join(String),
    /// Authenticate, then enter a room
    Login {
        user: String,
        password: String,
        room: String,
    },
    /// Leave the client
    Quit,
    /// Anything that is not a slash command is sent as a chat message
    Text(String),
    /// Slash command with missing or extra arguments; carries a usage hint
    Malformed(&'static str),
}

/// Parse one line of user input into a command.
///
/// Slash commands are matched on the first whitespace-separated token;
/// everything else is treated as message text verbatim.
pub fn parse_command(line: &str) -> ClientCommand {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return ClientCommand::Text(trimmed.to_string());
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    match (tokens[0], tokens.len()) {
        ("/join", 2) => ClientCommand::Join(tokens[1].to_string()),
        ("/join", _) => ClientCommand::Malformed("usage: /join <room>"),
        ("/login", 4) => ClientCommand::Login {
            user: tokens[1].to_string(),
            password: tokens[2].to_string(),
            room: tokens[3].to_string(),
        },
        ("/login", _) => ClientCommand::Malformed("usage: /login <user> <password> <room>"),
        ("/quit", 1) => ClientCommand::Quit,
        ("/quit", _) => ClientCommand::Malformed("usage: /quit"),
        _ => ClientCommand::Malformed("unknown command (available: /join, /login, /quit)"),
    }
}

/// Check whether an incoming chat envelope should be displayed.
///
/// Envelopes carrying the client's own display name are skipped: the line
/// is already visible as local echo, and encrypted envelopes from oneself
/// are undecryptable anyway (the ciphertext targets another session's key).
pub fn should_display_envelope(sender: &str, own_name: &str) -> bool {
    sender != own_name
}

/// Per-sender throttle for typing notices.
///
/// The relay forwards every `activity` event it receives; rendering each
/// one would flood a line-based terminal. One notice per sender per decay
/// window approximates the original timer-based indicator.
pub struct ActivityTracker {
    last_shown: HashMap<String, Instant>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self {
            last_shown: HashMap::new(),
        }
    }

    /// Decide whether a typing notice for `name` should be rendered now
    pub fn should_show(&mut self, name: &str, now: Instant) -> bool {
        match self.last_shown.get(name) {
            Some(last) if now.duration_since(*last) < ACTIVITY_DECAY => false,
            _ => {
                self.last_shown.insert(name.to_string(), now);
                true
            }
        }
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_command() {
        // テスト項目: /join コマンドがルーム名付きで解釈される
        // given (前提条件):
        let line = "/join lobby";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, ClientCommand::Join("lobby".to_string()));
    }

    #[test]
    fn test_parse_join_without_room_is_malformed() {
        // テスト項目: ルーム名のない /join は使い方のヒント付きで弾かれる
        // given (前提条件):
        let line = "/join";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert!(matches!(result, ClientCommand::Malformed(_)));
    }

    #[test]
    fn test_parse_login_command() {
        // テスト項目: /login コマンドがユーザー名・パスワード・ルーム名付きで解釈される
        // given (前提条件):
        let line = "/login user1 1234 lobby";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(
            result,
            ClientCommand::Login {
                user: "user1".to_string(),
                password: "1234".to_string(),
                room: "lobby".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_quit_command() {
        // テスト項目: /quit コマンドが終了として解釈される
        // given (前提条件):
        let line = "/quit";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, ClientCommand::Quit);
    }

    #[test]
    fn test_parse_unknown_slash_command_is_malformed() {
        // テスト項目: 未知のスラッシュコマンドは利用可能コマンドのヒント付きで弾かれる
        // given (前提条件):
        let line = "/teleport lobby";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert!(matches!(result, ClientCommand::Malformed(_)));
    }

    #[test]
    fn test_parse_plain_text() {
        // テスト項目: スラッシュで始まらない入力はメッセージ本文として扱われる
        // given (前提条件):
        let line = "hello everyone";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, ClientCommand::Text("hello everyone".to_string()));
    }

    #[test]
    fn test_own_envelope_is_skipped() {
        // テスト項目: 自分の表示名を載せた封筒は表示対象にならない
        // given (前提条件):
        let sender = "alice";
        let own_name = "alice";

        // when (操作):
        let result = should_display_envelope(sender, own_name);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_other_senders_envelope_is_displayed() {
        // テスト項目: 他人の封筒は表示対象になる
        // given (前提条件):
        let sender = "bob";
        let own_name = "alice";

        // when (操作):
        let result = should_display_envelope(sender, own_name);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_activity_first_notice_is_shown() {
        // テスト項目: 初回のタイピング通知は表示される
        // given (前提条件):
        let mut tracker = ActivityTracker::new();
        let now = Instant::now();

        // when (操作):
        let result = tracker.should_show("bob", now);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_activity_within_decay_window_is_suppressed() {
        // テスト項目: 減衰時間内の同一送信者からの通知は抑制される
        // given (前提条件):
        let mut tracker = ActivityTracker::new();
        let start = Instant::now();
        tracker.should_show("bob", start);

        // when (操作):
        let result = tracker.should_show("bob", start + Duration::from_secs(1));

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_activity_after_decay_window_is_shown_again() {
        // テスト項目: 減衰時間を過ぎた通知は再び表示される
        // given (前提条件):
        let mut tracker = ActivityTracker::new();
        let start = Instant::now();
        tracker.should_show("bob", start);

        // when (操作):
        let result = tracker.should_show("bob", start + Duration::from_secs(4));

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_activity_tracks_senders_independently() {
        // テスト項目: 送信者ごとに独立して抑制される
        // given (前提条件):
        let mut tracker = ActivityTracker::new();
        let now = Instant::now();
        tracker.should_show("bob", now);

        // when (操作):
        let result = tracker.should_show("carol", now);

        // then (期待する結果):
        assert!(result);
    }
}
