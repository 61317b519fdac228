//! File load/save
//!
//! Documents are plain UTF-8 text files. Load failures never touch the
//! calling editor's state; the caller surfaces the error and carries on.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },
}

/// Read a file as UTF-8 text
pub fn load(path: &Path) -> Result<String, FileError> {
    let bytes = fs::read(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if simdutf8::basic::from_utf8(&bytes).is_err() {
        return Err(FileError::Encoding {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), bytes = bytes.len(), "loaded file");
    // Validated just above
    Ok(unsafe { String::from_utf8_unchecked(bytes) })
}

/// Write text back to a file
pub fn save(path: &Path, text: &str) -> Result<(), FileError> {
    fs::write(path, text).map_err(|source| FileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "saved file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.py");
        let text = "x = 1\nprint(x)\n";

        save(&path, text).expect("save");
        assert_eq!(load(&path).expect("load"), text);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.py");
        assert!(matches!(load(&missing), Err(FileError::Read { .. })));
    }

    #[test]
    fn test_non_utf8_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bin.py");
        fs::write(&path, [0xFF, 0xFE, 0x00]).expect("write");
        assert!(matches!(load(&path), Err(FileError::Encoding { .. })));
    }
}
