use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::decode::{decode_text, DecodeError};
use crate::Article;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("article file {0:?} not found")]
    Missing(PathBuf),
    #[error("article file {0:?} has no content")]
    Empty(PathBuf),
    #[error("article file {path:?} could not be decoded: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("failed to read article file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read an article and collapse it onto a single line.
///
/// Each line is trimmed, blank lines are dropped and the remaining lines are
/// joined with one space.
pub fn read_article(path: &Path, encoding: Option<&str>) -> Result<Article, ArticleError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ArticleError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ArticleError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let text = decode_text(&bytes, encoding).map_err(|source| ArticleError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    Article::new(normalize_lines(&text))
        .ok_or_else(|| ArticleError::Empty(path.to_path_buf()))
}

/// Any of `\n`, `\r\n` or a lone `\r` ends a line.
fn normalize_lines(text: &str) -> String {
    text.split(&['\n', '\r'][..])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
