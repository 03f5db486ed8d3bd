//! Symmetric AEAD layer: AES-256-GCM and ChaCha20-Poly1305 behind one interface.
//!
//! Blob layout for both ciphers: `[nonce:12][ciphertext][tag:16]`, no associated data.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::errors::PqfeError;
use crate::types::CipherKind;

/// Symmetric key length in bytes; longer keys are truncated to this.
pub const KEY_LEN: usize = 32;
/// AEAD nonce length (96 bits).
pub const NONCE_LEN: usize = 12;
/// AEAD authentication tag length.
pub const TAG_LEN: usize = 16;
/// Smallest valid blob: nonce and tag around an empty plaintext.
pub const MIN_BLOB_LEN: usize = NONCE_LEN + TAG_LEN;

impl CipherKind {
    /// Encrypt `plaintext` under the first 32 bytes of `key` with a fresh random nonce.
    ///
    /// Returns `nonce ‖ ciphertext ‖ tag`.
    pub fn encrypt(self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, PqfeError> {
        let key = self.check_key(key)?;
        match self {
            CipherKind::Aes256Gcm => seal::<Aes256Gcm>(self, key, plaintext),
            CipherKind::ChaCha20Poly1305 => seal::<ChaCha20Poly1305>(self, key, plaintext),
        }
    }

    /// Decrypt a blob produced by [`CipherKind::encrypt`].
    ///
    /// Tampered, truncated or wrongly keyed input fails with [`PqfeError::Decryption`].
    pub fn decrypt(self, blob: &[u8], key: &[u8]) -> Result<Vec<u8>, PqfeError> {
        let key = self.check_key(key)?;
        match self {
            CipherKind::Aes256Gcm => open::<Aes256Gcm>(self, key, blob),
            CipherKind::ChaCha20Poly1305 => open::<ChaCha20Poly1305>(self, key, blob),
        }
    }

    fn check_key(self, key: &[u8]) -> Result<&[u8], PqfeError> {
        if key.len() < KEY_LEN {
            return Err(PqfeError::ShortKey {
                cipher: self.name(),
                actual: key.len(),
            });
        }
        Ok(&key[..KEY_LEN])
    }
}

/// Encrypt with the cipher named `name`, as selected from configuration.
pub fn encrypt_with(name: &str, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, PqfeError> {
    CipherKind::from_name(name)?.encrypt(plaintext, key)
}

/// Decrypt with the cipher named `name`, as selected from configuration.
pub fn decrypt_with(name: &str, blob: &[u8], key: &[u8]) -> Result<Vec<u8>, PqfeError> {
    CipherKind::from_name(name)?.decrypt(blob, key)
}

fn seal<C>(kind: CipherKind, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, PqfeError>
where
    C: Aead + AeadCore<NonceSize = U12> + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| PqfeError::ShortKey {
        cipher: kind.name(),
        actual: key.len(),
    })?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::<C>::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| PqfeError::Encryption(kind.name()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn open<C>(kind: CipherKind, key: &[u8], blob: &[u8]) -> Result<Vec<u8>, PqfeError>
where
    C: Aead + AeadCore<NonceSize = U12> + KeyInit,
{
    if blob.len() < MIN_BLOB_LEN {
        return Err(PqfeError::Decryption { cipher: kind.name() });
    }
    let cipher = C::new_from_slice(key).map_err(|_| PqfeError::ShortKey {
        cipher: kind.name(),
        actual: key.len(),
    })?;

    let (nonce, sealed) = blob.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), sealed)
        .map_err(|_| PqfeError::Decryption { cipher: kind.name() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_layout_is_nonce_ciphertext_tag() {
        let key = [7u8; KEY_LEN];
        for kind in CipherKind::ALL {
            let blob = kind.encrypt(b"abc", &key).unwrap();
            assert_eq!(blob.len(), NONCE_LEN + 3 + TAG_LEN);
            assert_eq!(kind.decrypt(&blob, &key).unwrap(), b"abc");
        }
    }

    #[test]
    fn extra_key_bytes_are_ignored() {
        let mut long_key = vec![9u8; 48];
        let blob = CipherKind::ChaCha20Poly1305.encrypt(b"x", &long_key).unwrap();
        long_key.truncate(KEY_LEN);
        assert_eq!(CipherKind::ChaCha20Poly1305.decrypt(&blob, &long_key).unwrap(), b"x");
    }

    #[test]
    fn truncated_blob_is_a_decryption_error() {
        let key = [1u8; KEY_LEN];
        let err = CipherKind::Aes256Gcm.decrypt(&[0u8; 5], &key).unwrap_err();
        assert!(matches!(err, PqfeError::Decryption { .. }));
    }
}
