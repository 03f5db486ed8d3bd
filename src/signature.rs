//! Dilithium signatures over a SHA3-384 digest of the signed content.
//!
//! Signing reduces the data to a fixed 48-byte digest first, so signature cost
//! does not grow with payload size.

use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use sha3::{Digest, Sha3_384};

use crate::errors::PqfeError;
use crate::types::{KeyAlgorithm, KeyPair, PrivateKey, SignatureVariant, Verification};

/// Length of the digest that is actually signed.
pub const DIGEST_LEN: usize = 48;

/// Bind `$scheme` to the pqcrypto module for `$variant` and evaluate `$body`.
macro_rules! with_scheme {
    ($variant:expr, $scheme:ident => $body:expr) => {
        match $variant {
            SignatureVariant::Dilithium2 => {
                use pqcrypto_dilithium::dilithium2 as $scheme;
                $body
            }
            SignatureVariant::Dilithium3 => {
                use pqcrypto_dilithium::dilithium3 as $scheme;
                $body
            }
            SignatureVariant::Dilithium5 => {
                use pqcrypto_dilithium::dilithium5 as $scheme;
                $body
            }
        }
    };
}

impl SignatureVariant {
    pub fn public_key_len(self) -> usize {
        with_scheme!(self, scheme => scheme::public_key_bytes())
    }

    pub fn private_key_len(self) -> usize {
        with_scheme!(self, scheme => scheme::secret_key_bytes())
    }

    /// Maximum detached signature length.
    pub fn signature_len(self) -> usize {
        with_scheme!(self, scheme => scheme::signature_bytes())
    }
}

/// SHA3-384 digest of `data`; the value that is signed and verified.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha3_384::digest(data));
    out
}

/// Generate a fresh signing key pair for `variant`.
pub fn generate_keypair(variant: SignatureVariant) -> KeyPair {
    let (public_key, private_key) = with_scheme!(variant, scheme => {
        let (pk, sk) = scheme::keypair();
        (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
    });
    tracing::debug!(variant = %variant, "generated signature key pair");
    KeyPair {
        algorithm: KeyAlgorithm::Signature(variant),
        public_key,
        private_key: PrivateKey::new(private_key),
    }
}

/// Sign the digest of `data` with `private_key`.
pub fn sign(data: &[u8], private_key: &[u8], variant: SignatureVariant) -> Result<Vec<u8>, PqfeError> {
    check_private_key(private_key, variant)?;
    let digest = digest(data);
    let signature = with_scheme!(variant, scheme => {
        let sk = scheme::SecretKey::from_bytes(private_key)
            .map_err(|_| PqfeError::Signing(variant.name()))?;
        scheme::detached_sign(&digest, &sk).as_bytes().to_vec()
    });
    tracing::debug!(variant = %variant, data_len = data.len(), "signed payload digest");
    Ok(signature)
}

/// Check `signature` over the digest of `data` against `public_key`.
///
/// A malformed public key or unsupported variant is a configuration error.
/// Anything wrong with the signature itself (wrong signer, corruption,
/// truncation, garbage) is reported as [`Verification::Invalid`].
pub fn verify(
    data: &[u8],
    signature: &[u8],
    public_key: &[u8],
    variant: SignatureVariant,
) -> Result<Verification, PqfeError> {
    check_public_key(public_key, variant)?;
    let digest = digest(data);
    let verification = with_scheme!(variant, scheme => {
        let pk = scheme::PublicKey::from_bytes(public_key).map_err(|_| PqfeError::InvalidKey {
            role: "public key",
            algorithm: variant.name(),
            expected: variant.public_key_len(),
            actual: public_key.len(),
        })?;
        match scheme::DetachedSignature::from_bytes(signature) {
            Ok(sig) => match scheme::verify_detached_signature(&sig, &digest, &pk) {
                Ok(()) => Verification::Valid,
                Err(_) => Verification::Invalid,
            },
            Err(_) => Verification::Invalid,
        }
    });
    tracing::debug!(variant = %variant, valid = verification.is_valid(), "verified signature");
    Ok(verification)
}

/// Reject a public key whose length does not match `variant`.
pub fn check_public_key(public_key: &[u8], variant: SignatureVariant) -> Result<(), PqfeError> {
    let expected = variant.public_key_len();
    if public_key.len() != expected {
        return Err(PqfeError::InvalidKey {
            role: "public key",
            algorithm: variant.name(),
            expected,
            actual: public_key.len(),
        });
    }
    Ok(())
}

/// Reject a private key whose length does not match `variant`.
pub fn check_private_key(private_key: &[u8], variant: SignatureVariant) -> Result<(), PqfeError> {
    let expected = variant.private_key_len();
    if private_key.len() != expected {
        return Err(PqfeError::InvalidKey {
            role: "private key",
            algorithm: variant.name(),
            expected,
            actual: private_key.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_fixed_length() {
        assert_eq!(digest(b"").len(), DIGEST_LEN);
        assert_eq!(digest(&vec![0xAB; 100_000]).len(), DIGEST_LEN);
        assert_ne!(digest(b"a"), digest(b"b"));
    }

    #[test]
    fn key_lengths_increase_with_level() {
        let [l2, l3, l5] = SignatureVariant::ALL;
        assert!(l2.public_key_len() < l3.public_key_len());
        assert!(l3.public_key_len() < l5.public_key_len());
        assert!(l2.signature_len() < l5.signature_len());
    }
}
