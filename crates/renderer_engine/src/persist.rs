use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {dir:?} missing or not writable: {message}")]
    OutputDir { dir: PathBuf, message: String },
    #[error("output path {0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Write the rendered markup to `path`, creating its directory when needed.
///
/// Content goes to a temp file in the target directory which is then renamed
/// over `path`, so readers see either the previous file or the complete new
/// one. A bare file name lands in the current directory.
pub fn write_output(path: &Path, content: &str) -> Result<PathBuf, PersistError> {
    if path.file_name().is_none() {
        return Err(PersistError::NoFileName(path.to_path_buf()));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir {
        dir: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir {
        dir: dir.to_path_buf(),
        message: e.to_string(),
    })?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(path.to_path_buf())
}
