//! [`IngestionPipeline`]: one CSV file, start to finish, into a store.

use std::{
  fs::File,
  io::BufReader,
  path::{Path, PathBuf},
};

use atleta_core::store::AthleteStore;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::{
  mapper::{HeaderMap, Row, RowMapper},
  reconcile::{ReconcileConfig, Reconciler},
  Error, Result,
};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
  pub reconcile: ReconcileConfig,
  pub headers:   HeaderMap,
}

// ─── Stages ──────────────────────────────────────────────────────────────────

/// The pipeline runs these in order, once each, with no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  EncodeConvert,
  RowNormalize,
  StreamRows,
  MapAndInsert,
  Commit,
}

/// Outcome of a successful ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
  pub normalized_path: PathBuf,
  /// Header row of the normalized file, as read.
  pub headers:         Vec<String>,
  pub inserted:        usize,
  pub skipped:         usize,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct IngestionPipeline {
  reconciler: Reconciler,
  mapper:     RowMapper,
}

impl IngestionPipeline {
  pub fn new(config: &IngestConfig) -> Result<Self> {
    Ok(Self {
      reconciler: Reconciler::new(&config.reconcile)?,
      mapper:     RowMapper::new(config.headers.clone()),
    })
  }

  /// The legacy header normalization pass on its own.
  pub fn normalize_legacy_headers(&self, input: &Path) -> Result<PathBuf> {
    self.reconciler.normalize_headers(input)
  }

  /// Normalize `input` and insert one record per mappable row into `store`.
  ///
  /// Rows are processed one at a time; each record is committed by the
  /// store as it is inserted. On a store failure the run stops and the
  /// records already inserted stay.
  pub async fn ingest<S: AthleteStore>(&self, store: &S, input: &Path) -> Result<IngestReport> {
    enter(Stage::EncodeConvert, input);
    self.reconciler.normalize_headers(input)?;

    enter(Stage::RowNormalize, input);
    let normalized_path = self.reconciler.normalized_path(input)?;
    self.reconciler.normalize_rows(input, &normalized_path)?;

    enter(Stage::StreamRows, &normalized_path);
    let file = File::open(&normalized_path).map_err(Error::io(&normalized_path))?;
    let mut reader = ReaderBuilder::new()
      .delimiter(self.reconciler.delimiter())
      .has_headers(true)
      .flexible(true)
      .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
      .headers()
      .map_err(Error::csv(&normalized_path))?
      .iter()
      .map(str::to_owned)
      .collect();
    tracing::info!(?headers, "csv headers");

    let missing = self.mapper.missing_headers(&headers);
    if !missing.is_empty() {
      tracing::warn!(
        ?missing,
        version = self.mapper.headers().version,
        "configured headers not found; affected fields read as empty"
      );
    }

    enter(Stage::MapAndInsert, &normalized_path);
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for result in reader.records() {
      let record = result.map_err(Error::csv(&normalized_path))?;
      let line = record.position().map_or(0, |p| p.line());

      let row: Row = headers
        .iter()
        .cloned()
        .zip(record.iter().map(str::to_owned))
        .collect();

      let Some(athlete) = self.mapper.map(&row) else {
        tracing::debug!(line, "row skipped: sex or sport missing");
        skipped += 1;
        continue;
      };

      let id = store.insert_record(athlete).await.map_err(|e| Error::Store {
        path: input.to_path_buf(),
        line,
        source: Box::new(e),
      })?;
      tracing::debug!(line, id, "record inserted");
      inserted += 1;
    }

    enter(Stage::Commit, input);
    tracing::info!(
      input = %input.display(),
      inserted,
      skipped,
      "csv loaded"
    );

    Ok(IngestReport { normalized_path, headers, inserted, skipped })
  }
}

fn enter(stage: Stage, path: &Path) {
  tracing::debug!(?stage, path = %path.display(), "ingestion stage");
}
