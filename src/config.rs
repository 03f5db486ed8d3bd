//! TOML configuration for the [`crate::Pqfe`] front door.
//!
//! ```toml
//! kem_variant = "Kyber768"
//! signature_variant = "Dilithium3"
//! cipher = "ChaCha20Poly1305"
//! key_directory = "/var/lib/pqfe/keys"
//! output_mode = "in-memory"
//! framing = "self-contained"
//! ```
//!
//! Missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::PqfeError;
use crate::file_ops::{write_atomic, MAX_FILE_SIZE};
use crate::types::{CipherKind, Framing, KemVariant, OutputMode, SignatureVariant, Suite};

/// Default key directory: `~/.pqfe/keys`, or `./.pqfe/keys` when no home directory is known.
pub fn default_key_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pqfe")
        .join("keys")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PqfeConfig {
    pub kem_variant: KemVariant,
    pub signature_variant: SignatureVariant,
    pub cipher: CipherKind,
    pub key_directory: PathBuf,
    pub output_mode: OutputMode,
    pub framing: Framing,
    /// Largest file, in bytes, that file operations will read.
    pub max_file_size: u64,
}

impl Default for PqfeConfig {
    fn default() -> Self {
        Self {
            kem_variant: KemVariant::default(),
            signature_variant: SignatureVariant::default(),
            cipher: CipherKind::default(),
            key_directory: default_key_directory(),
            output_mode: OutputMode::default(),
            framing: Framing::default(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl PqfeConfig {
    /// Build a config from algorithm names, as given on a command line or in
    /// an environment. Unknown names are configuration errors.
    pub fn from_names(kem: &str, signature: &str, cipher: &str) -> Result<Self, PqfeError> {
        Ok(Self {
            kem_variant: kem.parse()?,
            signature_variant: signature.parse()?,
            cipher: cipher.parse()?,
            ..Self::default()
        })
    }

    pub fn suite(&self) -> Suite {
        Suite::new(self.kem_variant, self.signature_variant, self.cipher)
    }

    pub fn with_key_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.key_directory = dir.into();
        self
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PqfeError> {
        toml::from_str(contents).map_err(|e| PqfeError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, PqfeError> {
        toml::to_string_pretty(self).map_err(|e| PqfeError::Config(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PqfeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PqfeError> {
        let contents = self.to_toml_string()?;
        write_atomic(path, contents.as_bytes(), Some(0o644))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PqfeConfig::default();
        assert_eq!(config.kem_variant, KemVariant::Kyber512);
        assert_eq!(config.signature_variant, SignatureVariant::Dilithium3);
        assert_eq!(config.cipher, CipherKind::Aes256Gcm);
        assert_eq!(config.output_mode, OutputMode::File);
        assert_eq!(config.framing, Framing::SelfContained);
        assert!(config.key_directory.ends_with(".pqfe/keys"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PqfeConfig::from_toml_str(
            r#"
            kem_variant = "Kyber1024"
            cipher = "ChaCha20Poly1305"
            output_mode = "in-memory"
            "#,
        )
        .unwrap();
        assert_eq!(config.kem_variant, KemVariant::Kyber1024);
        assert_eq!(config.cipher, CipherKind::ChaCha20Poly1305);
        assert_eq!(config.output_mode, OutputMode::InMemory);
        assert_eq!(config.signature_variant, SignatureVariant::Dilithium3);
    }

    #[test]
    fn test_unknown_variant_in_toml() {
        let err = PqfeConfig::from_toml_str(r#"kem_variant = "Kyber2048""#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PqfeConfig::from_names("Kyber768", "Dilithium5", "chacha20poly1305")
            .unwrap()
            .with_key_directory("/tmp/keys");
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("cipher = \"ChaCha20Poly1305\""));
        assert_eq!(PqfeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_names_rejects_unknown() {
        assert!(matches!(
            PqfeConfig::from_names("Kyber512", "Falcon512", "AES256GCM"),
            Err(PqfeError::UnsupportedSignatureVariant(_))
        ));
        assert!(matches!(
            PqfeConfig::from_names("Kyber512", "Dilithium2", "DES"),
            Err(PqfeError::UnsupportedCipher(_))
        ));
    }
}
