//! Error types for the ingestion pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown source encoding: {0:?}")]
  UnknownEncoding(String),

  #[error("delimiter must be a single ASCII character, got {0:?}")]
  InvalidDelimiter(char),

  #[error("{}: not a file path", .0.display())]
  InvalidInput(PathBuf),

  #[error("{}: not valid {encoding} text", .path.display())]
  Decode {
    path:     PathBuf,
    encoding: &'static str,
  },

  #[error("{}: line {line}: expected at most {expected} fields, found {found}", .path.display())]
  RaggedRow {
    path:     PathBuf,
    line:     u64,
    expected: usize,
    found:    usize,
  },

  #[error("{}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{}: malformed csv: {source}", .path.display())]
  Csv {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  /// The store rejected a record. Rows before `line` stay persisted.
  #[error("{}: line {line}: store error: {source}", .path.display())]
  Store {
    path:   PathBuf,
    line:   u64,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
    move |source| Error::Io { path: path.to_path_buf(), source }
  }

  pub(crate) fn csv(path: &std::path::Path) -> impl FnOnce(csv::Error) -> Self + '_ {
    move |source| Error::Csv { path: path.to_path_buf(), source }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
