//! File-level encryption, decryption and signing on top of [`crate::envelope`].
//!
//! In-memory output hands back the raw AEAD blob (with the KEM ciphertext
//! alongside); file output writes it in the configured [`Framing`].

use std::path::{Path, PathBuf};

use crate::config::PqfeConfig;
use crate::envelope;
use crate::errors::PqfeError;
use crate::file_ops::{
    decrypted_output_path, encrypted_output_path, read_file, recorded_file_name, write_atomic, MAX_FILE_SIZE,
};
use crate::framing;
use crate::signature;
use crate::types::{Envelope, Framing, OutputMode, SignatureVariant, SignedEnvelope, Suite, Verification};

const OUTPUT_FILE_MODE: u32 = 0o644;

/// Where and how file operations deliver their output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOptions {
    /// Output directory; defaults to the input file's directory.
    pub output_dir: Option<PathBuf>,
    /// Output file name; defaults to `<input>.enc` / the `.enc`-stripped name.
    pub output_filename: Option<String>,
    pub output_mode: OutputMode,
    pub framing: Framing,
    pub max_file_size: u64,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            output_filename: None,
            output_mode: OutputMode::File,
            framing: Framing::SelfContained,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl FileOptions {
    pub fn from_config(config: &PqfeConfig) -> Self {
        Self {
            output_mode: config.output_mode,
            framing: config.framing,
            max_file_size: config.max_file_size,
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            output_mode: OutputMode::InMemory,
            ..Self::default()
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = Some(name.into());
        self
    }

    pub fn framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
}

/// Result bytes or the path they were written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Data(Vec<u8>),
    Written(PathBuf),
}

impl Output {
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Output::Data(d) => Some(d),
            Output::Written(_) => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Output::Data(_) => None,
            Output::Written(p) => Some(p),
        }
    }
}

/// Outcome of encrypting a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEncryption {
    /// Needed to decrypt detached files; also embedded in self-contained ones.
    pub kem_ciphertext: Vec<u8>,
    /// Signature over the plaintext, for signed files.
    pub signature: Option<Vec<u8>>,
    /// In-memory: the AEAD blob. File: the path written.
    pub output: Output,
}

/// Outcome of decrypting and verifying a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedFile {
    pub output: Output,
    pub verification: Verification,
}

impl VerifiedFile {
    pub fn verified(&self) -> bool {
        self.verification.is_valid()
    }
}

/// Encrypt the file at `input` for `public_key`.
pub fn encrypt_file(
    input: &Path,
    public_key: &[u8],
    suite: &Suite,
    options: &FileOptions,
) -> Result<FileEncryption, PqfeError> {
    let plaintext = zeroize::Zeroizing::new(read_file(input, options.max_file_size)?);
    let envelope = envelope::encrypt(&plaintext, public_key, suite.kem, suite.cipher)?;
    deliver_envelope(input, envelope, None, plaintext.len(), suite, options)
}

/// Sign the file's plaintext, then encrypt it for `encryption_public_key`.
pub fn encrypt_and_sign_file(
    input: &Path,
    encryption_public_key: &[u8],
    signing_private_key: &[u8],
    suite: &Suite,
    options: &FileOptions,
) -> Result<FileEncryption, PqfeError> {
    let plaintext = zeroize::Zeroizing::new(read_file(input, options.max_file_size)?);
    let SignedEnvelope { envelope, signature } =
        envelope::encrypt_and_sign(&plaintext, encryption_public_key, signing_private_key, suite)?;
    deliver_envelope(input, envelope, Some(signature), plaintext.len(), suite, options)
}

/// Decrypt an encrypted file.
///
/// `kem_ciphertext` is required for detached files and ignored otherwise.
pub fn decrypt_file(
    encrypted: &Path,
    private_key: &[u8],
    kem_ciphertext: Option<&[u8]>,
    suite: &Suite,
    options: &FileOptions,
) -> Result<Output, PqfeError> {
    let data = read_file(encrypted, options.max_file_size)?;
    let parsed = framing::decode(&data, options.framing, kem_ciphertext, suite)?;
    let plaintext = envelope::decrypt(&parsed.envelope, private_key, suite.kem, suite.cipher)?;
    parsed.check_payload_size(&plaintext)?;
    deliver_plaintext(encrypted, plaintext, parsed.original_filename.as_deref(), options)
}

/// Decrypt an encrypted file and verify the signature over its plaintext.
///
/// The signature comes from `signature` when given, otherwise from the
/// self-contained record. Decryption always runs in memory; the plaintext is
/// then delivered per `options` regardless of the verification outcome.
pub fn decrypt_and_verify_file(
    encrypted: &Path,
    decryption_private_key: &[u8],
    verification_public_key: &[u8],
    kem_ciphertext: Option<&[u8]>,
    signature: Option<&[u8]>,
    suite: &Suite,
    options: &FileOptions,
) -> Result<VerifiedFile, PqfeError> {
    let data = read_file(encrypted, options.max_file_size)?;
    let mut parsed = framing::decode(&data, options.framing, kem_ciphertext, suite)?;
    let signature = signature
        .map(<[u8]>::to_vec)
        .or_else(|| parsed.signature.take())
        .ok_or_else(|| PqfeError::MalformedEnvelope("no signature supplied or embedded".into()))?;

    let signed = SignedEnvelope {
        envelope: std::mem::take(&mut parsed.envelope),
        signature,
    };
    let verified = envelope::decrypt_and_verify(&signed, decryption_private_key, verification_public_key, suite)?;
    parsed.check_payload_size(&verified.payload)?;
    let output = deliver_plaintext(encrypted, verified.payload, parsed.original_filename.as_deref(), options)?;
    Ok(VerifiedFile {
        output,
        verification: verified.verification,
    })
}

/// Sign the contents of a file.
pub fn sign_file(
    path: &Path,
    private_key: &[u8],
    variant: SignatureVariant,
    max_file_size: u64,
) -> Result<Vec<u8>, PqfeError> {
    let data = read_file(path, max_file_size)?;
    signature::sign(&data, private_key, variant)
}

/// Verify a signature over the contents of a file.
pub fn verify_file(
    path: &Path,
    signature: &[u8],
    public_key: &[u8],
    variant: SignatureVariant,
    max_file_size: u64,
) -> Result<Verification, PqfeError> {
    let data = read_file(path, max_file_size)?;
    signature::verify(&data, signature, public_key, variant)
}

fn deliver_envelope(
    input: &Path,
    envelope: Envelope,
    signature: Option<Vec<u8>>,
    payload_size: usize,
    suite: &Suite,
    options: &FileOptions,
) -> Result<FileEncryption, PqfeError> {
    let output = match options.output_mode {
        OutputMode::InMemory => Output::Data(envelope.aead_blob.clone()),
        OutputMode::File => {
            let path = encrypted_output_path(
                input,
                options.output_dir.as_deref(),
                options.output_filename.as_deref(),
            );
            let record = framing::record_for(
                &envelope,
                suite,
                payload_size as u64,
                signature.as_deref(),
                input.file_name().map(|n| n.to_string_lossy().into_owned()),
            );
            let bytes = framing::encode(&envelope, options.framing, &record)?;
            write_atomic(&path, &bytes, Some(OUTPUT_FILE_MODE))?;
            tracing::info!(
                input = %input.display(),
                output = %path.display(),
                framing = ?options.framing,
                "wrote encrypted file"
            );
            Output::Written(path)
        }
    };
    Ok(FileEncryption {
        kem_ciphertext: envelope.kem_ciphertext,
        signature,
        output,
    })
}

fn deliver_plaintext(
    encrypted: &Path,
    plaintext: Vec<u8>,
    original_filename: Option<&str>,
    options: &FileOptions,
) -> Result<Output, PqfeError> {
    match options.output_mode {
        OutputMode::InMemory => Ok(Output::Data(plaintext)),
        OutputMode::File => {
            // A recorded original name wins over the `.enc`-stripping default,
            // but only as a bare file name.
            let recorded = original_filename.and_then(|name| {
                let safe = recorded_file_name(name);
                if safe.is_none() {
                    tracing::warn!(input = %encrypted.display(), "ignoring unsafe recorded file name");
                }
                safe
            });
            let filename = options.output_filename.as_deref().or(recorded);
            let path = decrypted_output_path(encrypted, options.output_dir.as_deref(), filename);
            let plaintext = zeroize::Zeroizing::new(plaintext);
            // Plaintext stays owner-only.
            write_atomic(&path, &plaintext, None)?;
            tracing::info!(input = %encrypted.display(), output = %path.display(), "wrote decrypted file");
            Ok(Output::Written(path))
        }
    }
}
