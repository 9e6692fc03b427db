//! Input validation: make sure a user-supplied path names a readable PDF.
//!
//! Checking existence, permissions, and the `%PDF` magic bytes up front
//! gives callers a precise error instead of an opaque parser failure deep
//! inside the object model.

use crate::error::Pdf2SumError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PDF files start with these four bytes.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Validate a local file path, returning it unchanged on success.
pub fn validate_local(path: &Path) -> Result<PathBuf, Pdf2SumError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(Pdf2SumError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(f) => {
            let mut head = Vec::with_capacity(4);
            f.take(4)
                .read_to_end(&mut head)
                .map_err(|source| Pdf2SumError::ReadFailed {
                    path: path.clone(),
                    source,
                })?;
            check_magic(&head, &path)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2SumError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2SumError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Check the magic bytes of an in-memory PDF.
pub fn check_magic(bytes: &[u8], path: &Path) -> Result<(), Pdf2SumError> {
    if bytes.len() < 4 || &bytes[..4] != PDF_MAGIC {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(Pdf2SumError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
