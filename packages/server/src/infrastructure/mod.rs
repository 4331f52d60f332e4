pub mod auth;
pub mod dto;
pub mod key_exchange;
pub mod message_pusher;
pub mod repository;
