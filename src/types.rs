//! Algorithm selections, key material and envelope types, plus CBOR helpers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::PqfeError;

/// Version tag written into every self-contained envelope record.
pub const FORMAT_VERSION: &str = "1.0";

/// ML-KEM (Kyber) parameter set, in ascending security level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KemVariant {
    /// NIST level 1, roughly 128-bit classical security.
    #[default]
    Kyber512,
    /// NIST level 3, roughly 192-bit classical security.
    Kyber768,
    /// NIST level 5, roughly 256-bit classical security.
    Kyber1024,
}

impl KemVariant {
    /// All supported variants, lowest security level first.
    pub const ALL: [KemVariant; 3] = [KemVariant::Kyber512, KemVariant::Kyber768, KemVariant::Kyber1024];

    pub fn name(self) -> &'static str {
        match self {
            KemVariant::Kyber512 => "Kyber512",
            KemVariant::Kyber768 => "Kyber768",
            KemVariant::Kyber1024 => "Kyber1024",
        }
    }

    /// NIST security category.
    pub fn security_level(self) -> u8 {
        match self {
            KemVariant::Kyber512 => 1,
            KemVariant::Kyber768 => 3,
            KemVariant::Kyber1024 => 5,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            KemVariant::Kyber512 => "128-bit classical / 64-bit quantum security",
            KemVariant::Kyber768 => "192-bit classical / 96-bit quantum security",
            KemVariant::Kyber1024 => "256-bit classical / 128-bit quantum security",
        }
    }

    /// Encapsulation (public) key length in bytes.
    pub fn public_key_len(self) -> usize {
        match self {
            KemVariant::Kyber512 => 800,
            KemVariant::Kyber768 => 1184,
            KemVariant::Kyber1024 => 1568,
        }
    }

    /// Decapsulation (private) key length in bytes.
    pub fn private_key_len(self) -> usize {
        match self {
            KemVariant::Kyber512 => 1632,
            KemVariant::Kyber768 => 2400,
            KemVariant::Kyber1024 => 3168,
        }
    }

    /// KEM ciphertext length in bytes.
    pub fn ciphertext_len(self) -> usize {
        match self {
            KemVariant::Kyber512 => 768,
            KemVariant::Kyber768 => 1088,
            KemVariant::Kyber1024 => 1568,
        }
    }
}

impl fmt::Display for KemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KemVariant {
    type Err = PqfeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KemVariant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| PqfeError::UnsupportedKemVariant(s.to_string()))
    }
}

/// Dilithium parameter set, in ascending security level.
///
/// Key and signature lengths live in [`crate::signature`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureVariant {
    /// NIST level 2.
    Dilithium2,
    /// NIST level 3.
    #[default]
    Dilithium3,
    /// NIST level 5.
    Dilithium5,
}

impl SignatureVariant {
    pub const ALL: [SignatureVariant; 3] = [
        SignatureVariant::Dilithium2,
        SignatureVariant::Dilithium3,
        SignatureVariant::Dilithium5,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SignatureVariant::Dilithium2 => "Dilithium2",
            SignatureVariant::Dilithium3 => "Dilithium3",
            SignatureVariant::Dilithium5 => "Dilithium5",
        }
    }

    pub fn security_level(self) -> u8 {
        match self {
            SignatureVariant::Dilithium2 => 2,
            SignatureVariant::Dilithium3 => 3,
            SignatureVariant::Dilithium5 => 5,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SignatureVariant::Dilithium2 => "NIST level 2 (roughly AES-128 equivalent)",
            SignatureVariant::Dilithium3 => "NIST level 3 (roughly AES-192 equivalent)",
            SignatureVariant::Dilithium5 => "NIST level 5 (roughly AES-256 equivalent)",
        }
    }
}

impl fmt::Display for SignatureVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureVariant {
    type Err = PqfeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignatureVariant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| PqfeError::UnsupportedSignatureVariant(s.to_string()))
    }
}

/// Symmetric AEAD cipher protecting the payload.
///
/// Encryption and decryption are implemented in [`crate::symmetric`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherKind {
    #[default]
    #[serde(rename = "AES256GCM")]
    Aes256Gcm,
    #[serde(rename = "ChaCha20Poly1305")]
    ChaCha20Poly1305,
}

impl CipherKind {
    pub const ALL: [CipherKind; 2] = [CipherKind::Aes256Gcm, CipherKind::ChaCha20Poly1305];

    pub fn name(self) -> &'static str {
        match self {
            CipherKind::Aes256Gcm => "AES256GCM",
            CipherKind::ChaCha20Poly1305 => "ChaCha20Poly1305",
        }
    }

    /// Look a cipher up by name, ignoring case and `-`/`_` separators.
    pub fn from_name(name: &str) -> Result<Self, PqfeError> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "AES256GCM" => Ok(CipherKind::Aes256Gcm),
            "CHACHA20POLY1305" => Ok(CipherKind::ChaCha20Poly1305),
            _ => Err(PqfeError::UnsupportedCipher(name.to_string())),
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherKind {
    type Err = PqfeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherKind::from_name(s)
    }
}

/// The algorithm selections carried through every protocol call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    pub kem: KemVariant,
    pub signature: SignatureVariant,
    pub cipher: CipherKind,
}

impl Suite {
    pub fn new(kem: KemVariant, signature: SignatureVariant, cipher: CipherKind) -> Self {
        Self { kem, signature, cipher }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}+{}", self.kem, self.cipher, self.signature)
    }
}

/// What a stored key pair is for. Each purpose has its own files in a key directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPurpose {
    Encryption,
    Signature,
}

impl KeyPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyPurpose::Encryption => "encryption",
            KeyPurpose::Signature => "signature",
        }
    }
}

impl fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Algorithm a key pair was generated under; determines its purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Kem(KemVariant),
    Signature(SignatureVariant),
}

impl KeyAlgorithm {
    pub fn purpose(self) -> KeyPurpose {
        match self {
            KeyAlgorithm::Kem(_) => KeyPurpose::Encryption,
            KeyAlgorithm::Signature(_) => KeyPurpose::Signature,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyAlgorithm::Kem(v) => v.name(),
            KeyAlgorithm::Signature(v) => v.name(),
        }
    }
}

/// Private key bytes. Zeroized on drop, redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(Zeroizing<Vec<u8>>);

impl PrivateKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Raw key bytes. Never log or persist these outside the key store.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for PrivateKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED; {} bytes])", self.0.len())
    }
}

/// A public/private key pair tagged with the algorithm it belongs to.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub algorithm: KeyAlgorithm,
    pub public_key: Vec<u8>,
    pub private_key: PrivateKey,
}

impl KeyPair {
    pub fn purpose(&self) -> KeyPurpose {
        self.algorithm.purpose()
    }
}

/// Whether results are handed back as bytes or written to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    InMemory,
    #[default]
    File,
}

/// How an encrypted file is laid out on disk.
///
/// See [`crate::framing`] for the byte layout of each mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// AEAD blob, newline, then a versioned JSON record holding the KEM ciphertext.
    #[default]
    SelfContained,
    /// AEAD blob only; the caller keeps the KEM ciphertext.
    Detached,
}

/// The protected unit: KEM ciphertext plus AEAD blob (`nonce ‖ ciphertext ‖ tag`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    /// Output of encapsulating against the recipient's public key.
    #[serde(with = "serde_bytes")]
    pub kem_ciphertext: Vec<u8>,
    /// `nonce (12 bytes) ‖ ciphertext ‖ tag (16 bytes)`.
    #[serde(with = "serde_bytes")]
    pub aead_blob: Vec<u8>,
}

impl Envelope {
    /// The 12-byte AEAD nonce, or an empty slice for a truncated blob.
    pub fn nonce(&self) -> &[u8] {
        let end = self.aead_blob.len().min(crate::symmetric::NONCE_LEN);
        &self.aead_blob[..end]
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, PqfeError> {
        to_cbor_canonical(self)
    }

    pub fn from_cbor(data: &[u8]) -> Result<Self, PqfeError> {
        from_cbor(data)
    }
}

/// An envelope plus a detached signature over the original plaintext.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub envelope: Envelope,
    /// Signature over the SHA3-384 digest of the plaintext, not the ciphertext.
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
}

impl SignedEnvelope {
    pub fn to_cbor(&self) -> Result<Vec<u8>, PqfeError> {
        to_cbor_canonical(self)
    }

    pub fn from_cbor(data: &[u8]) -> Result<Self, PqfeError> {
        from_cbor(data)
    }
}

/// Outcome of checking a signature. Only says whether the signature is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verification {
    Valid,
    Invalid,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        self == Verification::Valid
    }
}

impl From<Verification> for bool {
    fn from(v: Verification) -> bool {
        v.is_valid()
    }
}

/// Decrypted payload together with the signature check over it.
///
/// A failed check does not withhold the payload; the caller decides whether to trust it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedPayload {
    pub payload: Vec<u8>,
    pub verification: Verification,
}

impl VerifiedPayload {
    pub fn verified(&self) -> bool {
        self.verification.is_valid()
    }
}

/// Serialize a value to CBOR with a self-describe tag.
pub fn to_cbor_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, PqfeError> {
    let mut buf = Vec::new();
    let mut ser = serde_cbor::ser::Serializer::new(&mut buf);
    ser.self_describe().map_err(|e| PqfeError::Ser(e.to_string()))?;
    v.serialize(&mut ser).map_err(|e| PqfeError::Ser(e.to_string()))?;
    Ok(buf)
}

/// Deserialize a value from CBOR.
pub fn from_cbor<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T, PqfeError> {
    serde_cbor::from_slice::<T>(data).map_err(|e| PqfeError::Ser(e.to_string()))
}
