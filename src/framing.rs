//! On-disk layout of encrypted files.
//!
//! Self-contained (`Framing::SelfContained`):
//!
//! ```text
//! [aead_blob][0x0A][record: single-line JSON]
//! ```
//!
//! The record carries the format version, algorithm names, the hex-encoded
//! KEM ciphertext and, for signed files, the hex-encoded signature. Readers
//! split at the last newline; the JSON record never contains one.
//!
//! Detached (`Framing::Detached`): the file is exactly the AEAD blob and the
//! caller keeps the KEM ciphertext.

use serde::{Deserialize, Serialize};

use crate::errors::PqfeError;
use crate::types::{CipherKind, Envelope, Framing, KemVariant, Suite, FORMAT_VERSION};

/// Metadata record trailing a self-contained envelope file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvelopeRecord {
    pub version: String,
    pub kem_variant: KemVariant,
    pub cipher: CipherKind,
    /// Hex-encoded KEM ciphertext.
    pub kem_ciphertext: String,
    /// Hex-encoded signature over the plaintext, for signed files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Plaintext length in bytes.
    pub payload_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

/// Envelope parts recovered from an encrypted file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedEnvelope {
    pub envelope: Envelope,
    pub signature: Option<Vec<u8>>,
    /// Plaintext length claimed by the record; checked after decryption.
    pub payload_size: Option<u64>,
    pub original_filename: Option<String>,
}

impl ParsedEnvelope {
    /// Reject a decrypted payload whose length disagrees with the record.
    pub fn check_payload_size(&self, payload: &[u8]) -> Result<(), PqfeError> {
        match self.payload_size {
            Some(expected) if expected != payload.len() as u64 => Err(PqfeError::MalformedEnvelope(format!(
                "record claims {expected} plaintext bytes, decrypted {}",
                payload.len()
            ))),
            _ => Ok(()),
        }
    }
}

/// Describe `envelope` for the self-contained trailer.
pub fn record_for(
    envelope: &Envelope,
    suite: &Suite,
    payload_size: u64,
    signature: Option<&[u8]>,
    original_filename: Option<String>,
) -> EnvelopeRecord {
    EnvelopeRecord {
        version: FORMAT_VERSION.to_string(),
        kem_variant: suite.kem,
        cipher: suite.cipher,
        kem_ciphertext: hex::encode(&envelope.kem_ciphertext),
        signature: signature.map(hex::encode),
        payload_size,
        original_filename,
    }
}

/// Encode a self-contained file: blob, newline, JSON record.
pub fn encode_self_contained(envelope: &Envelope, record: &EnvelopeRecord) -> Result<Vec<u8>, PqfeError> {
    let json = serde_json::to_vec(record).map_err(|e| PqfeError::Ser(e.to_string()))?;
    let mut out = Vec::with_capacity(envelope.aead_blob.len() + 1 + json.len());
    out.extend_from_slice(&envelope.aead_blob);
    out.push(b'\n');
    out.extend_from_slice(&json);
    Ok(out)
}

/// Parse a self-contained file and check it against the caller's suite.
pub fn decode_self_contained(data: &[u8], suite: &Suite) -> Result<ParsedEnvelope, PqfeError> {
    let split = data
        .iter()
        .rposition(|b| *b == b'\n')
        .ok_or_else(|| PqfeError::MalformedEnvelope("missing record separator".into()))?;
    let (blob, rest) = data.split_at(split);
    let record: EnvelopeRecord = serde_json::from_slice(&rest[1..])
        .map_err(|e| PqfeError::MalformedEnvelope(format!("unreadable record: {e}")))?;

    if record.version != FORMAT_VERSION {
        return Err(PqfeError::MalformedEnvelope(format!(
            "unsupported format version {:?}",
            record.version
        )));
    }
    if record.kem_variant != suite.kem {
        return Err(PqfeError::Config(format!(
            "file was encrypted with {} but {} is configured",
            record.kem_variant, suite.kem
        )));
    }
    if record.cipher != suite.cipher {
        return Err(PqfeError::Config(format!(
            "file was encrypted with {} but {} is configured",
            record.cipher, suite.cipher
        )));
    }

    let kem_ciphertext = hex::decode(&record.kem_ciphertext)
        .map_err(|e| PqfeError::MalformedEnvelope(format!("KEM ciphertext is not hex: {e}")))?;
    let signature = record
        .signature
        .as_deref()
        .map(hex::decode)
        .transpose()
        .map_err(|e| PqfeError::MalformedEnvelope(format!("signature is not hex: {e}")))?;

    Ok(ParsedEnvelope {
        envelope: Envelope {
            kem_ciphertext,
            aead_blob: blob.to_vec(),
        },
        signature,
        payload_size: Some(record.payload_size),
        original_filename: record.original_filename,
    })
}

/// Encode `envelope` for disk in the given framing.
pub fn encode(envelope: &Envelope, framing: Framing, record: &EnvelopeRecord) -> Result<Vec<u8>, PqfeError> {
    match framing {
        Framing::SelfContained => encode_self_contained(envelope, record),
        Framing::Detached => Ok(envelope.aead_blob.clone()),
    }
}

/// Decode file contents written in `framing`.
///
/// Detached files need the KEM ciphertext handed back by the caller.
pub fn decode(
    data: &[u8],
    framing: Framing,
    kem_ciphertext: Option<&[u8]>,
    suite: &Suite,
) -> Result<ParsedEnvelope, PqfeError> {
    match framing {
        Framing::SelfContained => decode_self_contained(data, suite),
        Framing::Detached => {
            let kem_ciphertext = kem_ciphertext.ok_or_else(|| {
                PqfeError::MalformedEnvelope("detached file requires the KEM ciphertext".into())
            })?;
            Ok(ParsedEnvelope {
                envelope: Envelope {
                    kem_ciphertext: kem_ciphertext.to_vec(),
                    aead_blob: data.to_vec(),
                },
                signature: None,
                payload_size: None,
                original_filename: None,
            })
        }
    }
}
