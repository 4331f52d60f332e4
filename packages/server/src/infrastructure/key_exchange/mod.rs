pub mod rsa;

pub use self::rsa::RsaKeyExchange;
