//! The `AthleteStore` trait and supporting result types.
//!
//! The trait is implemented by storage backends (e.g. `atleta-store-sqlite`).
//! The ingestion pipeline and the CLI depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::record::{AthleteRecord, RecordId};

// ─── Result types ────────────────────────────────────────────────────────────

/// Every row of one table, rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRows {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

/// Row counts of one table around a [`AthleteStore::clear_tables`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableClear {
  pub table:  String,
  pub before: u64,
  pub after:  u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational store holding the Person, Location and
/// Sport tables.
///
/// A logical record is the triple of rows sharing one identity. Identities
/// are assigned in insertion order and kept aligned across the three tables;
/// deleting a record renumbers every later record down by one.
pub trait AthleteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Tables ────────────────────────────────────────────────────────────

  /// Create the three tables if they do not exist yet.
  fn create_tables(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Names of the user tables, excluding views (`vw*`).
  fn list_tables(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// All rows of a listed table. Unknown names are an error.
  fn query_table(
    &self,
    table: String,
  ) -> impl Future<Output = Result<TableRows, Self::Error>> + Send + '_;

  /// Delete every row of every listed table in one transaction.
  fn clear_tables(
    &self,
  ) -> impl Future<Output = Result<Vec<TableClear>, Self::Error>> + Send + '_;

  /// Drop a listed table. Unknown names are an error.
  fn drop_table(&self, table: String) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Records ───────────────────────────────────────────────────────────

  /// Insert Person, Location and Sport rows, in that order, as one unit.
  fn insert_record(
    &self,
    record: AthleteRecord,
  ) -> impl Future<Output = Result<RecordId, Self::Error>> + Send + '_;

  /// Read the record with identity `id`. Returns `None` if there is no
  /// Person row with that id.
  fn get_record(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<AthleteRecord>, Self::Error>> + Send + '_;

  /// Overwrite the three rows of `id`. Returns `false` if it does not exist.
  fn update_record(
    &self,
    id: RecordId,
    record: AthleteRecord,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete the three rows of `id` and shift every later identity down by
  /// one, atomically. Returns `false` (and shifts nothing) if no row had
  /// that id.
  fn delete_record(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
