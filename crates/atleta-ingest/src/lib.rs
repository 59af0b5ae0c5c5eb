//! CSV ingestion for the athlete registry.
//!
//! Pipeline:
//!   legacy-encoded CSV
//!     └─ Reconciler::normalize_headers() → header-normalized copy (side effect)
//!     └─ Reconciler::normalize_rows()    → UTF-8, markup- and accent-free CSV
//!          └─ RowMapper::map()           → Option<AthleteRecord>
//!               └─ AthleteStore::insert_record()

pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod reconcile;

pub use error::{Error, Result};
pub use mapper::{HeaderMap, Row, RowMapper};
pub use pipeline::{IngestConfig, IngestReport, IngestionPipeline, Stage};
pub use reconcile::{ReconcileConfig, Reconciler};

#[cfg(test)]
mod tests;
