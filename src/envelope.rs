//! Hybrid envelope protocol: ML-KEM establishes a fresh key per payload, the
//! AEAD protects the payload, and an independent Dilithium signature covers
//! the plaintext.
//!
//! Every call to [`encrypt`] encapsulates anew, so no shared secret or
//! (key, nonce) pair is ever reused across payloads.

use crate::errors::PqfeError;
use crate::kem;
use crate::signature;
use crate::types::{
    CipherKind, Envelope, KemVariant, SignedEnvelope, Suite, Verification, VerifiedPayload,
};

/// Encrypt `payload` for the holder of the private key matching `public_key`.
pub fn encrypt(
    payload: &[u8],
    public_key: &[u8],
    kem_variant: KemVariant,
    cipher: CipherKind,
) -> Result<Envelope, PqfeError> {
    let (kem_ciphertext, shared_secret) = kem::encapsulate(public_key, kem_variant)?;
    let aead_blob = cipher.encrypt(payload, shared_secret.symmetric_key())?;
    drop(shared_secret);

    tracing::debug!(
        kem = %kem_variant,
        cipher = %cipher,
        payload_len = payload.len(),
        blob_len = aead_blob.len(),
        "encrypted payload"
    );
    Ok(Envelope {
        kem_ciphertext,
        aead_blob,
    })
}

/// Decrypt an envelope with the recipient's private key.
///
/// A wrong key, a wrong variant or any tampering surfaces as an error, either
/// at decapsulation or at AEAD authentication.
pub fn decrypt(
    envelope: &Envelope,
    private_key: &[u8],
    kem_variant: KemVariant,
    cipher: CipherKind,
) -> Result<Vec<u8>, PqfeError> {
    if private_key.is_empty() {
        return Err(PqfeError::MissingKey("private key for decryption"));
    }
    let shared_secret = kem::decapsulate(private_key, &envelope.kem_ciphertext, kem_variant)?;
    let payload = cipher
        .decrypt(&envelope.aead_blob, shared_secret.symmetric_key())
        .inspect_err(|e| tracing::debug!(kem = %kem_variant, cipher = %cipher, error = %e, "envelope rejected"))?;

    tracing::debug!(kem = %kem_variant, cipher = %cipher, payload_len = payload.len(), "decrypted envelope");
    Ok(payload)
}

/// Sign the plaintext, then encrypt it.
///
/// The signature covers the original content, never the ciphertext.
pub fn encrypt_and_sign(
    payload: &[u8],
    encryption_public_key: &[u8],
    signing_private_key: &[u8],
    suite: &Suite,
) -> Result<SignedEnvelope, PqfeError> {
    if signing_private_key.is_empty() {
        return Err(PqfeError::MissingKey("private key for signing"));
    }
    kem::check_public_key(encryption_public_key, suite.kem)?;

    let signature = signature::sign(payload, signing_private_key, suite.signature)?;
    let envelope = encrypt(payload, encryption_public_key, suite.kem, suite.cipher)?;
    Ok(SignedEnvelope { envelope, signature })
}

/// Decrypt, then verify the signature over the recovered plaintext.
///
/// The payload is returned whether or not the signature checks out; the
/// caller decides what to do with unverified content.
pub fn decrypt_and_verify(
    signed: &SignedEnvelope,
    decryption_private_key: &[u8],
    verification_public_key: &[u8],
    suite: &Suite,
) -> Result<VerifiedPayload, PqfeError> {
    signature::check_public_key(verification_public_key, suite.signature)?;

    let payload = decrypt(&signed.envelope, decryption_private_key, suite.kem, suite.cipher)?;
    let verification = signature::verify(
        &payload,
        &signed.signature,
        verification_public_key,
        suite.signature,
    )?;
    if verification == Verification::Invalid {
        tracing::warn!(suite = %suite, "decrypted payload failed signature verification");
    }
    Ok(VerifiedPayload { payload, verification })
}

/// Decrypt `envelope` and encrypt the plaintext again for a different recipient.
///
/// The new envelope comes from an independent encapsulation; nothing from the
/// original shared secret carries over.
pub fn reencrypt(
    envelope: &Envelope,
    private_key: &[u8],
    recipient_public_key: &[u8],
    kem_variant: KemVariant,
    cipher: CipherKind,
) -> Result<Envelope, PqfeError> {
    kem::check_public_key(recipient_public_key, kem_variant)?;
    let plaintext = zeroize::Zeroizing::new(decrypt(envelope, private_key, kem_variant, cipher)?);
    encrypt(&plaintext, recipient_public_key, kem_variant, cipher)
}
