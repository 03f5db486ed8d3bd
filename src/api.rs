//! [`Pqfe`]: configured front door over keys, envelopes and files.
//!
//! A `Pqfe` holds nothing but its [`PqfeConfig`]. Keys are passed to each call
//! or loaded from the configured key directory on request, so independent
//! calls share no cryptographic state.

use std::path::Path;

use crate::config::PqfeConfig;
use crate::envelope;
use crate::errors::PqfeError;
use crate::files::{self, FileEncryption, FileOptions, Output, VerifiedFile};
use crate::kem;
use crate::keystore::{self, SavedKeys};
use crate::roles::{Encryptor, Signer, Verifier};
use crate::signature;
use crate::types::{
    Envelope, KeyPair, KeyPurpose, PrivateKey, SignedEnvelope, Suite, Verification, VerifiedPayload,
};

#[derive(Debug, Clone, Default)]
pub struct Pqfe {
    config: PqfeConfig,
}

impl Pqfe {
    pub fn new(config: PqfeConfig) -> Self {
        tracing::debug!(suite = %config.suite(), keys = %config.key_directory.display(), "pqfe configured");
        Self { config }
    }

    /// Load the configuration from a TOML file.
    pub fn from_config_file(path: &Path) -> Result<Self, PqfeError> {
        Ok(Self::new(PqfeConfig::load(path)?))
    }

    pub fn config(&self) -> &PqfeConfig {
        &self.config
    }

    pub fn suite(&self) -> Suite {
        self.config.suite()
    }

    /// File options seeded from the configuration.
    pub fn file_options(&self) -> FileOptions {
        FileOptions::from_config(&self.config)
    }

    /* ---------------- Keys ---------------- */

    /// Generate a key pair for `purpose` under the configured variant, without saving it.
    pub fn generate_keypair(&self, purpose: KeyPurpose) -> KeyPair {
        match purpose {
            KeyPurpose::Encryption => kem::generate_keypair(self.config.kem_variant),
            KeyPurpose::Signature => signature::generate_keypair(self.config.signature_variant),
        }
    }

    /// Generate a key pair for `purpose` and save it to the key directory,
    /// replacing any pair already stored for that purpose.
    pub fn generate_keys(&self, purpose: KeyPurpose) -> Result<KeyPair, PqfeError> {
        let pair = self.generate_keypair(purpose);
        self.save_keys(&pair)?;
        Ok(pair)
    }

    pub fn save_keys(&self, pair: &KeyPair) -> Result<SavedKeys, PqfeError> {
        keystore::save_keys(
            &pair.public_key,
            &pair.private_key,
            &self.config.key_directory,
            pair.purpose(),
        )
    }

    /// Stored keys for `purpose`, or `None` when none are stored.
    pub fn load_keys(&self, purpose: KeyPurpose) -> Result<Option<(Vec<u8>, PrivateKey)>, PqfeError> {
        keystore::load_keys(&self.config.key_directory, purpose)
    }

    pub fn delete_keys(&self, purpose: KeyPurpose) -> Result<bool, PqfeError> {
        keystore::delete_keys(&self.config.key_directory, purpose)
    }

    pub fn keys_exist(&self, purpose: KeyPurpose) -> bool {
        keystore::keys_exist(&self.config.key_directory, purpose)
    }

    /* ---------------- Data ---------------- */

    pub fn encrypt_data(&self, data: &[u8], public_key: &[u8]) -> Result<Envelope, PqfeError> {
        envelope::encrypt(data, public_key, self.config.kem_variant, self.config.cipher)
    }

    pub fn decrypt_data(&self, envelope: &Envelope, private_key: &[u8]) -> Result<Vec<u8>, PqfeError> {
        envelope::decrypt(envelope, private_key, self.config.kem_variant, self.config.cipher)
    }

    pub fn sign_data(&self, data: &[u8], private_key: &[u8]) -> Result<Vec<u8>, PqfeError> {
        signature::sign(data, private_key, self.config.signature_variant)
    }

    pub fn verify_data(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<Verification, PqfeError> {
        signature::verify(data, signature, public_key, self.config.signature_variant)
    }

    pub fn encrypt_and_sign(
        &self,
        data: &[u8],
        encryption_public_key: &[u8],
        signing_private_key: &[u8],
    ) -> Result<SignedEnvelope, PqfeError> {
        envelope::encrypt_and_sign(data, encryption_public_key, signing_private_key, &self.suite())
    }

    pub fn decrypt_and_verify(
        &self,
        signed: &SignedEnvelope,
        decryption_private_key: &[u8],
        verification_public_key: &[u8],
    ) -> Result<VerifiedPayload, PqfeError> {
        envelope::decrypt_and_verify(signed, decryption_private_key, verification_public_key, &self.suite())
    }

    /// Re-encrypt an envelope for another recipient.
    pub fn reencrypt(
        &self,
        envelope: &Envelope,
        private_key: &[u8],
        recipient_public_key: &[u8],
    ) -> Result<Envelope, PqfeError> {
        envelope::reencrypt(
            envelope,
            private_key,
            recipient_public_key,
            self.config.kem_variant,
            self.config.cipher,
        )
    }

    /// Re-encrypt an envelope for each recipient, in order.
    ///
    /// Every recipient key is checked before the envelope is opened, and the
    /// plaintext is recovered once. Each returned envelope comes from its own
    /// encapsulation.
    pub fn share<K: AsRef<[u8]>>(
        &self,
        envelope: &Envelope,
        private_key: &[u8],
        recipient_public_keys: &[K],
    ) -> Result<Vec<Envelope>, PqfeError> {
        for key in recipient_public_keys {
            kem::check_public_key(key.as_ref(), self.config.kem_variant)?;
        }
        let plaintext = zeroize::Zeroizing::new(self.decrypt_data(envelope, private_key)?);
        let shared = recipient_public_keys
            .iter()
            .map(|key| self.encrypt_data(&plaintext, key.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(recipients = shared.len(), suite = %self.suite(), "shared envelope");
        Ok(shared)
    }

    /* ---------------- Files ---------------- */

    pub fn encrypt_file(
        &self,
        input: &Path,
        public_key: &[u8],
        options: &FileOptions,
    ) -> Result<FileEncryption, PqfeError> {
        files::encrypt_file(input, public_key, &self.suite(), options)
    }

    /// `kem_ciphertext` is only consulted for detached files.
    pub fn decrypt_file(
        &self,
        encrypted: &Path,
        private_key: &[u8],
        kem_ciphertext: Option<&[u8]>,
        options: &FileOptions,
    ) -> Result<Output, PqfeError> {
        files::decrypt_file(encrypted, private_key, kem_ciphertext, &self.suite(), options)
    }

    pub fn sign_file(&self, path: &Path, private_key: &[u8]) -> Result<Vec<u8>, PqfeError> {
        files::sign_file(path, private_key, self.config.signature_variant, self.config.max_file_size)
    }

    pub fn verify_file(&self, path: &Path, signature: &[u8], public_key: &[u8]) -> Result<Verification, PqfeError> {
        files::verify_file(
            path,
            signature,
            public_key,
            self.config.signature_variant,
            self.config.max_file_size,
        )
    }

    pub fn encrypt_and_sign_file(
        &self,
        input: &Path,
        encryption_public_key: &[u8],
        signing_private_key: &[u8],
        options: &FileOptions,
    ) -> Result<FileEncryption, PqfeError> {
        files::encrypt_and_sign_file(input, encryption_public_key, signing_private_key, &self.suite(), options)
    }

    /// For detached files pass the KEM ciphertext and signature returned by
    /// [`Pqfe::encrypt_and_sign_file`].
    pub fn decrypt_and_verify_file(
        &self,
        encrypted: &Path,
        decryption_private_key: &[u8],
        verification_public_key: &[u8],
        kem_ciphertext: Option<&[u8]>,
        signature: Option<&[u8]>,
        options: &FileOptions,
    ) -> Result<VerifiedFile, PqfeError> {
        files::decrypt_and_verify_file(
            encrypted,
            decryption_private_key,
            verification_public_key,
            kem_ciphertext,
            signature,
            &self.suite(),
            options,
        )
    }

    /* ---------------- Role-scoped handles ---------------- */

    pub fn create_encryptor(&self, public_key: Vec<u8>) -> Result<Encryptor, PqfeError> {
        Encryptor::new(public_key, self.suite())
    }

    pub fn create_signer(&self, private_key: PrivateKey) -> Result<Signer, PqfeError> {
        Signer::new(private_key, self.config.signature_variant)
    }

    pub fn create_verifier(&self, public_key: Vec<u8>) -> Result<Verifier, PqfeError> {
        Verifier::new(public_key, self.config.signature_variant)
    }
}
