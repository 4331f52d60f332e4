//! Message formatting utilities for client display.

use mitsudan_server::infrastructure::dto::websocket::UserInfo;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `name` - Display name of the sender
    /// * `text` - The message text
    /// * `time` - Server-side send time, already formatted as `HH:MM:SS`
    pub fn format_chat_message(name: &str, text: &str, time: &str) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            name, text, time
        )
    }

    /// Format a decrypted chat message, marked as having arrived encrypted
    pub fn format_encrypted_message(name: &str, text: &str, time: &str) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{} [encrypted]: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            name, text, time
        )
    }

    /// Format the room roster, marking the current client
    pub fn format_roster(users: &[UserInfo], own_name: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Members:\n");

        if users.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for user in users {
                let me_suffix = if user.name == own_name { " (me)" } else { "" };
                output.push_str(&format!("{}{}\n", user.name, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format the list of rooms that currently have occupants
    pub fn format_room_list(rooms: &[String]) -> String {
        if rooms.is_empty() {
            "\n* Active rooms: (none)\n".to_string()
        } else {
            format!("\n* Active rooms: {}\n", rooms.join(", "))
        }
    }

    /// Format a typing notice
    pub fn format_activity(name: &str) -> String {
        format!("\n* {} is typing...\n", name)
    }

    /// Format a credential rejection sent by the relay
    pub fn format_login_error(error: &str) -> String {
        format!("\n! {}\n", error)
    }

    /// Format the notice shown when a new private key is imported
    pub fn format_key_received() -> String {
        "\n* Encryption key updated\n".to_string()
    }

    /// Format the notice shown when an encrypted envelope cannot be read
    pub fn format_undecryptable(name: &str) -> String {
        format!("\n! Could not decrypt a message from {}\n", name)
    }

    /// Format a confirmation line after sending
    ///
    /// # Arguments
    ///
    /// * `time` - Local send time, already formatted as `HH:MM:SS`
    pub fn format_sent_confirmation(time: &str) -> String {
        format!("sent at {}\n", time)
    }

    /// Format a raw text frame (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
