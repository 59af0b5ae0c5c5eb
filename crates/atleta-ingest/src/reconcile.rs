//! Re-encoding of legacy 8-bit CSV files as UTF-8.
//!
//! Two independent passes read the original file:
//!
//! - [`Reconciler::normalize_headers`] trims and whitespace-collapses the
//!   header names and copies the data cells verbatim.
//! - [`Reconciler::normalize_rows`] strips markup and diacritics from every
//!   cell, header included. Its output is what ingestion reads.
//!
//! Both passes build the whole output in memory and only touch the
//! destination once decoding and parsing succeeded. Input that is already
//! valid UTF-8 is read as UTF-8, so either pass can run on its own output.

use std::{
  fs,
  path::{Path, PathBuf},
};

use atleta_core::text::{collapse_whitespace, strip_diacritics, strip_markup};
use csv::{ReaderBuilder, StringRecord, Terminator, Writer, WriterBuilder};
use encoding_rs::{Encoding, UTF_8};
use serde::Deserialize;

use crate::{Error, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
  /// WHATWG encoding label of the source file. `latin1` resolves to
  /// windows-1252.
  pub source_encoding: String,
  pub delimiter:       char,
  /// Prepended to the input file name to form the output path.
  pub output_prefix:   String,
}

impl Default for ReconcileConfig {
  fn default() -> Self {
    Self {
      source_encoding: "latin1".to_owned(),
      delimiter:       ';',
      output_prefix:   "normalized_".to_owned(),
    }
  }
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Reconciler {
  encoding:  &'static Encoding,
  delimiter: u8,
  prefix:    String,
}

impl Reconciler {
  pub fn new(config: &ReconcileConfig) -> Result<Self> {
    let encoding = Encoding::for_label(config.source_encoding.as_bytes())
      .ok_or_else(|| Error::UnknownEncoding(config.source_encoding.clone()))?;

    let delimiter = u8::try_from(config.delimiter)
      .ok()
      .filter(u8::is_ascii)
      .ok_or(Error::InvalidDelimiter(config.delimiter))?;

    Ok(Self { encoding, delimiter, prefix: config.output_prefix.clone() })
  }

  pub fn delimiter(&self) -> u8 { self.delimiter }

  /// Sibling path `<dir>/<prefix><file name>`.
  pub fn normalized_path(&self, input: &Path) -> Result<PathBuf> {
    let name = input
      .file_name()
      .ok_or_else(|| Error::InvalidInput(input.to_path_buf()))?;
    Ok(input.with_file_name(format!("{}{}", self.prefix, name.to_string_lossy())))
  }

  /// Legacy header normalization. Writes to [`Self::normalized_path`] and
  /// returns that path.
  ///
  /// Rows shorter than the header are padded with empty cells; a row with
  /// more cells than the header aborts the pass.
  pub fn normalize_headers(&self, input: &Path) -> Result<PathBuf> {
    let output = self.normalized_path(input)?;
    let text = self.decode(input)?;

    let mut reader = ReaderBuilder::new()
      .delimiter(self.delimiter)
      .has_headers(true)
      .flexible(true)
      .from_reader(text.as_bytes());

    let headers: StringRecord = reader
      .headers()
      .map_err(Error::csv(input))?
      .iter()
      .map(collapse_whitespace)
      .collect();
    let width = headers.len();

    let mut writer = self.writer();
    writer.write_record(&headers).map_err(Error::csv(&output))?;

    for result in reader.records() {
      let mut record = result.map_err(Error::csv(input))?;
      if record.len() > width {
        return Err(Error::RaggedRow {
          path:     input.to_path_buf(),
          line:     record.position().map_or(0, |p| p.line()),
          expected: width,
          found:    record.len(),
        });
      }
      while record.len() < width {
        record.push_field("");
      }
      writer.write_record(&record).map_err(Error::csv(&output))?;
    }

    self.finish(writer, &output)?;
    tracing::info!(input = %input.display(), output = %output.display(), "headers normalized");
    Ok(output)
  }

  /// Row normalization: every cell, header included, goes through
  /// [`strip_markup`] then [`strip_diacritics`]. Ragged rows are kept as is.
  pub fn normalize_rows(&self, input: &Path, output: &Path) -> Result<()> {
    let text = self.decode(input)?;

    let mut reader = ReaderBuilder::new()
      .delimiter(self.delimiter)
      .has_headers(false)
      .flexible(true)
      .from_reader(text.as_bytes());

    let mut writer = self.writer();
    let mut rows = 0usize;

    for result in reader.records() {
      let record = result.map_err(Error::csv(input))?;
      writer
        .write_record(record.iter().map(|cell| strip_diacritics(&strip_markup(cell))))
        .map_err(Error::csv(output))?;
      rows += 1;
    }

    self.finish(writer, output)?;
    tracing::info!(
      input = %input.display(),
      output = %output.display(),
      rows,
      "rows normalized"
    );
    Ok(())
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Decode `input` with the configured encoding, unless it already is
  /// valid UTF-8 (e.g. the output of an earlier pass).
  fn decode(&self, input: &Path) -> Result<String> {
    let bytes = fs::read(input).map_err(Error::io(input))?;
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(&bytes) {
      if self.encoding != UTF_8 && !text.is_ascii() {
        tracing::debug!(input = %input.display(), "input is already utf-8");
      }
      return Ok(text.into_owned());
    }
    self
      .encoding
      .decode_without_bom_handling_and_without_replacement(&bytes)
      .map(|text| text.into_owned())
      .ok_or_else(|| Error::Decode {
        path:     input.to_path_buf(),
        encoding: self.encoding.name(),
      })
  }

  fn writer(&self) -> Writer<Vec<u8>> {
    WriterBuilder::new()
      .delimiter(self.delimiter)
      .terminator(Terminator::CRLF)
      .flexible(true)
      .from_writer(Vec::new())
  }

  fn finish(&self, writer: Writer<Vec<u8>>, output: &Path) -> Result<()> {
    let bytes = writer
      .into_inner()
      .map_err(|e| Error::io(output)(e.into_error()))?;
    fs::write(output, bytes).map_err(Error::io(output))
  }
}
