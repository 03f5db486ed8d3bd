//! Error types for pqfe operations.

use thiserror::Error;

/// Protocol stage at which a decrypt or verify operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Key encapsulation or decapsulation.
    Kem,
    /// AEAD authentication (tampering, corruption or key mismatch).
    Aead,
    /// Signature creation. Only a fault inside the signing primitive lands
    /// here; key shape problems are configuration errors and a bad signature
    /// is a [`crate::Verification::Invalid`] result, not an error.
    Signature,
}

/// Errors that can occur during key handling, encryption, decryption or signing.
///
/// No variant ever carries key, secret or plaintext bytes.
#[derive(Debug, Error)]
pub enum PqfeError {
    /// The KEM variant name is not one of `Kyber512`, `Kyber768`, `Kyber1024`.
    #[error("unsupported KEM variant {0:?}; choose from Kyber512, Kyber768, Kyber1024")]
    UnsupportedKemVariant(String),

    /// The signature variant name is not one of `Dilithium2`, `Dilithium3`, `Dilithium5`.
    #[error("unsupported signature variant {0:?}; choose from Dilithium2, Dilithium3, Dilithium5")]
    UnsupportedSignatureVariant(String),

    /// The cipher name is not one of `AES256GCM`, `ChaCha20Poly1305`.
    #[error("unsupported cipher {0:?}; choose AES256GCM or ChaCha20Poly1305")]
    UnsupportedCipher(String),

    /// Symmetric key shorter than 32 bytes.
    #[error("key must be at least 32 bytes for {cipher}, got {actual}")]
    ShortKey {
        /// Cipher the key was offered to.
        cipher: &'static str,
        /// Length of the rejected key.
        actual: usize,
    },

    /// Key material whose length does not match the selected variant.
    #[error("invalid {role} for {algorithm}: expected {expected} bytes, got {actual}")]
    InvalidKey {
        /// `"public key"` or `"private key"`.
        role: &'static str,
        /// Variant name the key was offered to.
        algorithm: &'static str,
        /// Length required by the variant.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Invalid configuration value or unreadable configuration file.
    #[error("configuration error: {0}")]
    Config(String),

    /// A payload exceeded the configured size limit.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        /// Size of the rejected payload.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// Encapsulation against a public key failed.
    #[error("key encapsulation failed for {0}")]
    Encapsulation(&'static str),

    /// Decapsulation rejected the KEM ciphertext explicitly.
    #[error("key decapsulation failed: {0}")]
    Decapsulation(String),

    /// AEAD encryption failed (payload too large for the cipher).
    #[error("{0} encryption failed")]
    Encryption(&'static str),

    /// AEAD authentication failed: tampered data, truncated data or wrong key.
    #[error("decryption failed: {cipher} authentication failed")]
    Decryption {
        /// Cipher that rejected the data.
        cipher: &'static str,
    },

    /// The signature primitive rejected a private key that passed the length
    /// check. The bundled Dilithium backend accepts every correctly sized key,
    /// so this only surfaces from a backend with stricter key decoding.
    #[error("signing failed for {0}")]
    Signing(&'static str),

    /// An operation requiring a private or public key was attempted without one.
    #[error("missing {0}")]
    MissingKey(&'static str),

    /// A persisted envelope could not be parsed.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CBOR or JSON serialization error.
    #[error("serialization error: {0}")]
    Ser(String),
}

impl PqfeError {
    /// Whether the error stems from bad caller input detected before any
    /// cryptographic work; retrying with corrected input can succeed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PqfeError::UnsupportedKemVariant(_)
                | PqfeError::UnsupportedSignatureVariant(_)
                | PqfeError::UnsupportedCipher(_)
                | PqfeError::ShortKey { .. }
                | PqfeError::InvalidKey { .. }
                | PqfeError::Config(_)
        )
    }

    /// The protocol stage that failed, if the error came from one.
    pub fn stage(&self) -> Option<FailureStage> {
        match self {
            PqfeError::Encapsulation(_) | PqfeError::Decapsulation(_) => Some(FailureStage::Kem),
            PqfeError::Encryption(_) | PqfeError::Decryption { .. } => Some(FailureStage::Aead),
            PqfeError::Signing(_) => Some(FailureStage::Signature),
            _ => None,
        }
    }
}
