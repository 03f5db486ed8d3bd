//! Role-scoped handles: an [`Encryptor`] holds only a recipient's public key,
//! a [`Signer`] only a signing key, a [`Verifier`] only a verification key.
//!
//! Keys are validated when the handle is built, so a malformed key is a
//! configuration error up front rather than a crypto failure later.

use std::path::Path;

use crate::envelope;
use crate::errors::PqfeError;
use crate::files::{self, FileEncryption, FileOptions};
use crate::kem;
use crate::signature;
use crate::types::{Envelope, PrivateKey, SignatureVariant, Suite, Verification};

/// Encrypts for one recipient.
#[derive(Debug, Clone)]
pub struct Encryptor {
    public_key: Vec<u8>,
    suite: Suite,
}

impl Encryptor {
    pub fn new(public_key: Vec<u8>, suite: Suite) -> Result<Self, PqfeError> {
        kem::check_public_key(&public_key, suite.kem)?;
        Ok(Self { public_key, suite })
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn suite(&self) -> Suite {
        self.suite
    }

    pub fn encrypt_data(&self, data: &[u8]) -> Result<Envelope, PqfeError> {
        envelope::encrypt(data, &self.public_key, self.suite.kem, self.suite.cipher)
    }

    pub fn encrypt_file(&self, input: &Path, options: &FileOptions) -> Result<FileEncryption, PqfeError> {
        files::encrypt_file(input, &self.public_key, &self.suite, options)
    }
}

/// Signs with one private key.
#[derive(Debug, Clone)]
pub struct Signer {
    private_key: PrivateKey,
    variant: SignatureVariant,
}

impl Signer {
    pub fn new(private_key: PrivateKey, variant: SignatureVariant) -> Result<Self, PqfeError> {
        signature::check_private_key(private_key.as_bytes(), variant)?;
        Ok(Self { private_key, variant })
    }

    pub fn variant(&self) -> SignatureVariant {
        self.variant
    }

    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>, PqfeError> {
        signature::sign(data, self.private_key.as_bytes(), self.variant)
    }

    pub fn sign_file(&self, path: &Path, max_file_size: u64) -> Result<Vec<u8>, PqfeError> {
        files::sign_file(path, self.private_key.as_bytes(), self.variant, max_file_size)
    }
}

/// Verifies against one public key.
#[derive(Debug, Clone)]
pub struct Verifier {
    public_key: Vec<u8>,
    variant: SignatureVariant,
}

impl Verifier {
    pub fn new(public_key: Vec<u8>, variant: SignatureVariant) -> Result<Self, PqfeError> {
        signature::check_public_key(&public_key, variant)?;
        Ok(Self { public_key, variant })
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn verify_data(&self, data: &[u8], signature: &[u8]) -> Result<Verification, PqfeError> {
        signature::verify(data, signature, &self.public_key, self.variant)
    }

    pub fn verify_file(&self, path: &Path, signature: &[u8], max_file_size: u64) -> Result<Verification, PqfeError> {
        files::verify_file(path, signature, &self.public_key, self.variant, max_file_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KemVariant;

    #[test]
    fn test_encryptor_rejects_bad_keys() {
        let suite = Suite::default();
        let err = Encryptor::new(Vec::new(), suite).unwrap_err();
        assert!(err.is_configuration());

        let short = vec![0u8; KemVariant::Kyber512.public_key_len() - 1];
        assert!(Encryptor::new(short, suite).unwrap_err().is_configuration());

        // Right key, wrong variant.
        let kp = kem::generate_keypair(KemVariant::Kyber768);
        assert!(Encryptor::new(kp.public_key, suite).unwrap_err().is_configuration());
    }

    #[test]
    fn test_signer_and_verifier_reject_bad_keys() {
        let variant = SignatureVariant::Dilithium2;
        assert!(Signer::new(PrivateKey::new(vec![1, 2, 3]), variant)
            .unwrap_err()
            .is_configuration());
        assert!(Verifier::new(Vec::new(), variant).unwrap_err().is_configuration());
    }

    #[test]
    fn test_signer_verifier_pair() {
        let kp = signature::generate_keypair(SignatureVariant::Dilithium2);
        let signer = Signer::new(kp.private_key, SignatureVariant::Dilithium2).unwrap();
        let verifier = Verifier::new(kp.public_key, SignatureVariant::Dilithium2).unwrap();

        let sig = signer.sign_data(b"ledger entry").unwrap();
        assert!(verifier.verify_data(b"ledger entry", &sig).unwrap().is_valid());
        assert!(!verifier.verify_data(b"ledger entry!", &sig).unwrap().is_valid());
    }
}
