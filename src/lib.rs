//! # pqfe
//!
//! Post-quantum hybrid encryption for files and in-memory payloads, with
//! independent post-quantum signatures.
//!
//! ## Algorithm Suite
//!
//! - **Key Encapsulation:** ML-KEM (Kyber-512 / 768 / 1024), one fresh encapsulation per payload
//! - **Symmetric Encryption:** AES-256-GCM or ChaCha20-Poly1305, keyed with the first 32 bytes of the shared secret
//! - **Digital Signatures:** Dilithium-2 / 3 / 5 over a SHA3-384 digest of the plaintext
//! - **Transport:** CBOR envelopes in memory; a versioned self-contained layout on disk
//!
//! ## Features
//!
//! - Encrypt and decrypt data or files for a recipient's public key
//! - Sign-then-encrypt, with decryption that reports signature validity alongside the payload
//! - Re-encrypt one envelope for any number of further recipients
//! - Key storage by purpose with owner-only private key files
//! - Role-scoped handles that hold a single key and expose only what it allows
//!
//! ## Example
//!
//! ```rust
//! use pqfe::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pqfe = Pqfe::new(PqfeConfig::default());
//!
//! let storage = pqfe.generate_keypair(KeyPurpose::Encryption);
//! let signer = pqfe.generate_keypair(KeyPurpose::Signature);
//!
//! let signed = pqfe.encrypt_and_sign(
//!     b"quarterly numbers",
//!     &storage.public_key,
//!     signer.private_key.as_bytes(),
//! )?;
//! let opened = pqfe.decrypt_and_verify(
//!     &signed,
//!     storage.private_key.as_bytes(),
//!     &signer.public_key,
//! )?;
//!
//! assert!(opened.verified());
//! assert_eq!(opened.payload, b"quarterly numbers");
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Considerations
//!
//! - A failed signature check still returns the decrypted payload; check [`VerifiedPayload::verified`]
//! - Tampering, a wrong key and a wrong variant are indistinguishable at the AEAD stage
//! - Private keys and shared secrets are zeroized on drop and never logged
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0.

mod api;
mod config;
mod envelope;
mod errors;
mod file_ops;
mod files;
mod framing;
mod kem;
mod keystore;
mod roles;
mod signature;
mod symmetric;
mod types;

pub use api::Pqfe;
pub use config::{default_key_directory, PqfeConfig};
pub use envelope::{decrypt, decrypt_and_verify, encrypt, encrypt_and_sign, reencrypt};
pub use errors::{FailureStage, PqfeError};
pub use file_ops::{ENCRYPTED_EXT, MAX_FILE_SIZE};
pub use files::{FileEncryption, FileOptions, Output, VerifiedFile};
pub use framing::{decode as decode_file, encode as encode_file, EnvelopeRecord, ParsedEnvelope};
pub use kem::{decapsulate, encapsulate, SharedSecret};
pub use keystore::{delete_keys, key_paths, keys_exist, load_keys, save_keys, SavedKeys};
pub use roles::{Encryptor, Signer, Verifier};
pub use signature::{digest, sign, verify, DIGEST_LEN};
pub use symmetric::{decrypt_with, encrypt_with, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use types::*;

/// KEM key generation, by variant.
pub fn generate_kem_keypair(variant: KemVariant) -> KeyPair {
    kem::generate_keypair(variant)
}

/// Signature key generation, by variant.
pub fn generate_signature_keypair(variant: SignatureVariant) -> KeyPair {
    signature::generate_keypair(variant)
}
