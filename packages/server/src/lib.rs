//! Encrypted chat relay server library.
//!
//! This library provides the relay side of a room-scoped WebSocket chat:
//! session registry, presence notices, plaintext relay, and server-side
//! encryption of designated messages.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
