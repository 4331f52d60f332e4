//! Shared library for the mitsudan chat relay.
//!
//! Cross-cutting utilities used by both the relay server and the CLI client:
//! timestamps, logging setup, and the RSA-OAEP primitives that carry the
//! per-session key exchange.

pub mod crypto;
pub mod logger;
pub mod time;
