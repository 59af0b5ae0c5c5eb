//! Error type for `atleta-store-sqlite`.

use atleta_core::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] atleta_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("table not found: {0}")]
  TableNotFound(String),

  /// The three tables handed out different identities for one record; the
  /// insert was rolled back.
  #[error(
    "identities out of alignment (person {person}, location {location}, sport {sport})"
  )]
  IdentityDrift {
    person:   RecordId,
    location: RecordId,
    sport:    RecordId,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
