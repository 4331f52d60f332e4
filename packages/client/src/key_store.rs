//! Private key storage for decrypting relayed envelopes.

use base64::{Engine as _, engine::general_purpose};
use rsa::RsaPrivateKey;

use mitsudan_shared::crypto::{decrypt_with, private_key_from_pem};

use crate::error::ClientError;

/// Holds the session private key delivered by the relay.
///
/// The relay issues a fresh key pair on every room entry, so importing a
/// new key replaces the previous one unconditionally. In server-held mode
/// no `pkey` frame ever arrives and the store stays empty.
pub struct SessionKeyStore {
    private_key: Option<RsaPrivateKey>,
}

impl SessionKeyStore {
    pub fn new() -> Self {
        Self { private_key: None }
    }

    /// Replace the held key with the PEM payload of a `pkey` frame
    pub fn import_pem(&mut self, pem: &str) -> Result<(), ClientError> {
        let key = private_key_from_pem(pem).map_err(|e| ClientError::InvalidKey(e.to_string()))?;
        self.private_key = Some(key);
        Ok(())
    }

    /// Drop the held key; any key from a previous connection is unusable
    pub fn clear(&mut self) {
        self.private_key = None;
    }

    pub fn has_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// Decode and decrypt the `text` field of an `encmessage` frame
    pub fn decrypt_base64(&self, text: &str) -> Result<String, ClientError> {
        let private_key = self.private_key.as_ref().ok_or(ClientError::MissingKey)?;
        let ciphertext = general_purpose::STANDARD
            .decode(text)
            .map_err(|e| ClientError::DecryptionFailed(e.to_string()))?;
        let plaintext = decrypt_with(private_key, &ciphertext)
            .map_err(|e| ClientError::DecryptionFailed(e.to_string()))?;
        String::from_utf8(plaintext).map_err(|e| ClientError::DecryptionFailed(e.to_string()))
    }
}

impl Default for SessionKeyStore {
    fn default() -> Self {
        Self::new()
    }
}
