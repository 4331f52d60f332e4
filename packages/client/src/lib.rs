//! CLI chat client for the encrypted relay.
//!
//! Connects to the relay over WebSocket, joins rooms with slash commands,
//! sends chat lines as encrypted messages, and decrypts incoming envelopes
//! with the session key delivered by the relay.

mod domain;
mod error;
mod formatter;
mod key_store;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
