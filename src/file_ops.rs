//! File reading, atomic writes and default output naming.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::PqfeError;

/// Extension appended to encrypted files.
pub const ENCRYPTED_EXT: &str = "enc";

/// Default upper bound on payload size for file operations (1 GiB).
pub const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Read a whole file, refusing anything larger than `limit` bytes.
pub fn read_file(path: &Path, limit: u64) -> Result<Vec<u8>, PqfeError> {
    let size = fs::metadata(path)?.len();
    if size > limit {
        return Err(PqfeError::PayloadTooLarge { size, limit });
    }
    Ok(fs::read(path)?)
}

/// Write `contents` to `path` through a temporary file in the same directory,
/// then rename it into place. Parent directories are created as needed.
///
/// The temporary file is created owner-only (0600 on Unix). Returns whether
/// the file ended up with the requested mode; failing to apply it is not fatal.
pub fn write_atomic(path: &Path, contents: &[u8], mode: Option<u32>) -> Result<bool, PqfeError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    let applied = match mode {
        Some(mode) => set_mode(tmp.path(), mode),
        None => true,
    };

    tmp.persist(path).map_err(|e| PqfeError::Io(e.error))?;
    Ok(applied)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), mode, error = %e, "could not set file permissions");
            false
        }
    }
}

#[cfg(not(unix))]
fn set_mode(path: &Path, _mode: u32) -> bool {
    tracing::warn!(path = %path.display(), "file permissions are not supported on this platform");
    false
}

/// Where to write an encrypted file: `<dir>/<name>`, defaulting to the
/// input's directory and `<input file name>.enc`.
pub fn encrypted_output_path(input: &Path, output_dir: Option<&Path>, output_filename: Option<&str>) -> PathBuf {
    let name = match output_filename {
        Some(name) => name.to_string(),
        None => {
            let base = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{base}.{ENCRYPTED_EXT}")
        }
    };
    output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.parent().map(Path::to_path_buf).unwrap_or_default())
        .join(name)
}

/// Where to write a decrypted file, defaulting to the encrypted file's name
/// with a trailing `.enc` removed (or `.dec` appended when there is none).
pub fn decrypted_output_path(encrypted: &Path, output_dir: Option<&Path>, output_filename: Option<&str>) -> PathBuf {
    let name = match output_filename {
        Some(name) => name.to_string(),
        None => {
            let base = encrypted
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match base.strip_suffix(&format!(".{ENCRYPTED_EXT}")) {
                Some(stripped) if !stripped.is_empty() => stripped.to_string(),
                _ => format!("{base}.dec"),
            }
        }
    };
    output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| encrypted.parent().map(Path::to_path_buf).unwrap_or_default())
        .join(name)
}

/// A file name recorded inside an encrypted file, if it is a single plain
/// component. Absolute paths, `..`, `.` and nested names yield `None`.
///
/// The record is not authenticated, so its name must never steer the output
/// outside the chosen directory.
pub fn recorded_file_name(name: &str) -> Option<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(n)), None) => n.to_str(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_encrypted_name() {
        let p = encrypted_output_path(Path::new("/data/report.pdf"), None, None);
        assert_eq!(p, PathBuf::from("/data/report.pdf.enc"));
    }

    #[test]
    fn test_custom_encrypted_location() {
        let p = encrypted_output_path(Path::new("/data/report.pdf"), Some(Path::new("/out")), Some("x.bin"));
        assert_eq!(p, PathBuf::from("/out/x.bin"));
    }

    #[test]
    fn test_default_decrypted_name_strips_extension() {
        let p = decrypted_output_path(Path::new("/data/report.pdf.enc"), None, None);
        assert_eq!(p, PathBuf::from("/data/report.pdf"));

        let p = decrypted_output_path(Path::new("/data/blob"), None, None);
        assert_eq!(p, PathBuf::from("/data/blob.dec"));
    }

    #[test]
    fn test_recorded_file_name() {
        assert_eq!(recorded_file_name("report.pdf"), Some("report.pdf"));
        assert_eq!(recorded_file_name("../escaped.txt"), None);
        assert_eq!(recorded_file_name("/home/u/.bashrc"), None);
        assert_eq!(recorded_file_name("a/b.txt"), None);
        assert_eq!(recorded_file_name(".."), None);
        assert_eq!(recorded_file_name("."), None);
        assert_eq!(recorded_file_name(""), None);
    }

    #[test]
    fn test_read_file_size_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big");
        fs::write(&path, vec![0u8; 64]).unwrap();

        assert_eq!(read_file(&path, 64).unwrap().len(), 64);
        let err = read_file(&path, 63).unwrap_err();
        assert!(matches!(err, PqfeError::PayloadTooLarge { size: 64, limit: 63 }));
    }

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c.bin");
        write_atomic(&path, b"hello", None).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("secret.bin");
        assert!(write_atomic(&path, b"k", Some(0o600)).unwrap());
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
