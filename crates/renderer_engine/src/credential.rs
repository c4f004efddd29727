use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ApiKey;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential file {0:?} not found")]
    Missing(PathBuf),
    #[error("credential file {0:?} is empty")]
    Empty(PathBuf),
    #[error("failed to read credential file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the API key from a plaintext file, trimmed at both ends.
pub fn load_credential(path: &Path) -> Result<ApiKey, CredentialError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CredentialError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CredentialError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let secret = content.trim();
    if secret.is_empty() {
        return Err(CredentialError::Empty(path.to_path_buf()));
    }
    Ok(ApiKey::new(secret))
}
