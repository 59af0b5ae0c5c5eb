//! Error types for `atleta-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid yes/no flag: {0:?}")]
  InvalidFlag(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
