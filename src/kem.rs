//! ML-KEM (Kyber) key encapsulation over the three supported parameter sets.
//!
//! Key and ciphertext lengths are checked against the selected [`KemVariant`]
//! before any primitive runs, so bytes from one variant never reach another.

use std::fmt;

use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, EncodedSizeUser, KemCore, MlKem1024, MlKem512, MlKem768};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::errors::PqfeError;
use crate::symmetric::KEY_LEN;
use crate::types::{KemVariant, KeyAlgorithm, KeyPair, PrivateKey};

/// Secret agreed through one encapsulation. Used once to key the AEAD, then dropped.
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// The first 32 bytes, used as the symmetric key.
    pub fn symmetric_key(&self) -> &[u8] {
        let end = self.0.len().min(KEY_LEN);
        &self.0[..end]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// Generate a fresh encryption key pair for `variant`.
pub fn generate_keypair(variant: KemVariant) -> KeyPair {
    let (public_key, private_key) = match variant {
        KemVariant::Kyber512 => generate::<MlKem512>(),
        KemVariant::Kyber768 => generate::<MlKem768>(),
        KemVariant::Kyber1024 => generate::<MlKem1024>(),
    };
    tracing::debug!(variant = %variant, "generated KEM key pair");
    KeyPair {
        algorithm: KeyAlgorithm::Kem(variant),
        public_key,
        private_key: PrivateKey::new(private_key),
    }
}

/// Encapsulate against `public_key`, returning `(kem_ciphertext, shared_secret)`.
pub fn encapsulate(public_key: &[u8], variant: KemVariant) -> Result<(Vec<u8>, SharedSecret), PqfeError> {
    check_public_key(public_key, variant)?;
    match variant {
        KemVariant::Kyber512 => encapsulate_with::<MlKem512>(public_key, variant),
        KemVariant::Kyber768 => encapsulate_with::<MlKem768>(public_key, variant),
        KemVariant::Kyber1024 => encapsulate_with::<MlKem1024>(public_key, variant),
    }
}

/// Recover the shared secret from `kem_ciphertext` with `private_key`.
///
/// A well-formed but mismatched private key does not fail here: ML-KEM's
/// implicit rejection yields an unrelated secret, caught later by the AEAD.
pub fn decapsulate(
    private_key: &[u8],
    kem_ciphertext: &[u8],
    variant: KemVariant,
) -> Result<SharedSecret, PqfeError> {
    check_private_key(private_key, variant)?;
    if kem_ciphertext.len() != variant.ciphertext_len() {
        return Err(PqfeError::Decapsulation(format!(
            "{} ciphertext must be {} bytes, got {}",
            variant,
            variant.ciphertext_len(),
            kem_ciphertext.len()
        )));
    }
    match variant {
        KemVariant::Kyber512 => decapsulate_with::<MlKem512>(private_key, kem_ciphertext, variant),
        KemVariant::Kyber768 => decapsulate_with::<MlKem768>(private_key, kem_ciphertext, variant),
        KemVariant::Kyber1024 => decapsulate_with::<MlKem1024>(private_key, kem_ciphertext, variant),
    }
}

/// Reject a public key whose length does not match `variant`.
pub fn check_public_key(public_key: &[u8], variant: KemVariant) -> Result<(), PqfeError> {
    if public_key.len() != variant.public_key_len() {
        return Err(PqfeError::InvalidKey {
            role: "public key",
            algorithm: variant.name(),
            expected: variant.public_key_len(),
            actual: public_key.len(),
        });
    }
    Ok(())
}

/// Reject a private key whose length does not match `variant`.
pub fn check_private_key(private_key: &[u8], variant: KemVariant) -> Result<(), PqfeError> {
    if private_key.len() != variant.private_key_len() {
        return Err(PqfeError::InvalidKey {
            role: "private key",
            algorithm: variant.name(),
            expected: variant.private_key_len(),
            actual: private_key.len(),
        });
    }
    Ok(())
}

/* ---------------- Per-parameter-set helpers ---------------- */

fn generate<K: KemCore>() -> (Vec<u8>, Vec<u8>) {
    let (dk, ek) = K::generate(&mut OsRng);
    (ek.as_bytes().to_vec(), dk.as_bytes().to_vec())
}

fn encapsulate_with<K: KemCore>(
    public_key: &[u8],
    variant: KemVariant,
) -> Result<(Vec<u8>, SharedSecret), PqfeError> {
    let ek = <K::EncapsulationKey as EncodedSizeUser>::from_bytes(&public_key.try_into().map_err(|_| {
        PqfeError::InvalidKey {
            role: "public key",
            algorithm: variant.name(),
            expected: variant.public_key_len(),
            actual: public_key.len(),
        }
    })?);
    let (kem_ct, shared) = ek
        .encapsulate(&mut OsRng)
        .map_err(|_| PqfeError::Encapsulation(variant.name()))?;
    Ok((kem_ct.as_slice().to_vec(), SharedSecret::new(shared.as_slice().to_vec())))
}

fn decapsulate_with<K: KemCore>(
    private_key: &[u8],
    kem_ciphertext: &[u8],
    variant: KemVariant,
) -> Result<SharedSecret, PqfeError> {
    let dk = <K::DecapsulationKey as EncodedSizeUser>::from_bytes(&private_key.try_into().map_err(|_| {
        PqfeError::InvalidKey {
            role: "private key",
            algorithm: variant.name(),
            expected: variant.private_key_len(),
            actual: private_key.len(),
        }
    })?);
    let kem_ct: Ciphertext<K> = kem_ciphertext
        .try_into()
        .map_err(|_| PqfeError::Decapsulation(format!("{variant} ciphertext has the wrong length")))?;
    let shared = dk
        .decapsulate(&kem_ct)
        .map_err(|_| PqfeError::Decapsulation(format!("{variant} rejected the ciphertext")))?;
    Ok(SharedSecret::new(shared.as_slice().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_lengths_match_variant_table() {
        for variant in KemVariant::ALL {
            let pair = generate_keypair(variant);
            assert_eq!(pair.public_key.len(), variant.public_key_len());
            assert_eq!(pair.private_key.len(), variant.private_key_len());

            let (ct, ss) = encapsulate(&pair.public_key, variant).unwrap();
            assert_eq!(ct.len(), variant.ciphertext_len());
            assert_eq!(ss.symmetric_key().len(), KEY_LEN);
        }
    }
}
