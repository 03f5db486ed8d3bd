//! On-disk key storage, partitioned by [`KeyPurpose`].
//!
//! A key directory holds up to four files:
//!
//! ```text
//! encryption_public_key.bin   encryption_private_key.bin
//! signature_public_key.bin    signature_private_key.bin
//! ```
//!
//! Private key files are written owner read/write only (0600 on Unix).

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::PqfeError;
use crate::file_ops::write_atomic;
use crate::types::{KeyPurpose, PrivateKey};

const PRIVATE_KEY_MODE: u32 = 0o600;
const PUBLIC_KEY_MODE: u32 = 0o644;

/// Paths of the public and private key files for `purpose` in `dir`.
pub fn key_paths(dir: &Path, purpose: KeyPurpose) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{purpose}_public_key.bin")),
        dir.join(format!("{purpose}_private_key.bin")),
    )
}

/// Result of saving a key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedKeys {
    pub public_path: PathBuf,
    pub private_path: PathBuf,
    /// Whether the private key file was restricted to its owner. The key is
    /// written either way.
    pub private_restricted: bool,
}

/// Save a key pair under `dir`, creating the directory if needed.
///
/// Only the files for `purpose` are touched.
pub fn save_keys(
    public_key: &[u8],
    private_key: &PrivateKey,
    dir: &Path,
    purpose: KeyPurpose,
) -> Result<SavedKeys, PqfeError> {
    fs::create_dir_all(dir)?;
    let (public_path, private_path) = key_paths(dir, purpose);

    write_atomic(&public_path, public_key, Some(PUBLIC_KEY_MODE))?;
    let private_restricted = write_atomic(&private_path, private_key.as_bytes(), Some(PRIVATE_KEY_MODE))?;
    if !private_restricted {
        tracing::warn!(
            path = %private_path.display(),
            "private key written without owner-only permissions"
        );
    }

    tracing::info!(purpose = %purpose, dir = %dir.display(), "saved key pair");
    Ok(SavedKeys {
        public_path,
        private_path,
        private_restricted,
    })
}

/// Load the key pair for `purpose` from `dir`.
///
/// Returns `Ok(None)` when either file is absent; that is a normal state, not an error.
pub fn load_keys(dir: &Path, purpose: KeyPurpose) -> Result<Option<(Vec<u8>, PrivateKey)>, PqfeError> {
    let (public_path, private_path) = key_paths(dir, purpose);
    if !public_path.exists() || !private_path.exists() {
        tracing::debug!(purpose = %purpose, dir = %dir.display(), "no stored key pair");
        return Ok(None);
    }

    let public_key = fs::read(&public_path)?;
    let private_key = PrivateKey::new(fs::read(&private_path)?);
    tracing::debug!(purpose = %purpose, dir = %dir.display(), "loaded key pair");
    Ok(Some((public_key, private_key)))
}

/// Delete the key files for `purpose`. Returns `true` if anything was removed.
pub fn delete_keys(dir: &Path, purpose: KeyPurpose) -> Result<bool, PqfeError> {
    let (public_path, private_path) = key_paths(dir, purpose);
    let mut deleted = false;
    for path in [public_path, private_path] {
        if path.exists() {
            fs::remove_file(&path)?;
            deleted = true;
        }
    }
    if deleted {
        tracing::info!(purpose = %purpose, dir = %dir.display(), "deleted key pair");
    }
    Ok(deleted)
}

/// Whether both key files for `purpose` are present.
pub fn keys_exist(dir: &Path, purpose: KeyPurpose) -> bool {
    let (public_path, private_path) = key_paths(dir, purpose);
    public_path.exists() && private_path.exists()
}
