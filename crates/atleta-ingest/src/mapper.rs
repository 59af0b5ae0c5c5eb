//! Mapping from a header-keyed CSV row to an [`AthleteRecord`].
//!
//! Header lookup is exact: the names below must match the normalized file
//! byte for byte, including the double space in the medal header.

use std::collections::HashMap;

use atleta_core::{AthleteRecord, Flag, record::or_not_available};
use serde::Deserialize;

/// One data row keyed by header name. Cells past the end of a short row
/// are simply absent.
pub type Row = HashMap<String, String>;

// ─── Header map ──────────────────────────────────────────────────────────────

/// Source header name for each record field.
///
/// Bump `version` whenever the source layout changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderMap {
  pub version:     u32,
  pub sex:         String,
  pub state:       String,
  pub city:        String,
  pub force:       String,
  pub rank:        String,
  pub medal:       String,
  pub sport:       String,
  pub scholarship: String,
  pub program:     String,
}

impl Default for HeaderMap {
  fn default() -> Self {
    Self {
      version:     1,
      sex:         "Sexo".into(),
      state:       "Estado".into(),
      city:        "Cidade".into(),
      force:       "Forca".into(),
      rank:        "Posto Graduacao".into(),
      medal:       "Possui Medalha de  Merito Desportivo Militar".into(),
      sport:       "Modalidade".into(),
      scholarship: "Possui Bolsa Atleta".into(),
      program:     "PAAR".into(),
    }
  }
}

impl HeaderMap {
  fn names(&self) -> [&str; 9] {
    [
      &self.sex,
      &self.state,
      &self.city,
      &self.force,
      &self.rank,
      &self.medal,
      &self.sport,
      &self.scholarship,
      &self.program,
    ]
  }
}

// ─── Mapper ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RowMapper {
  headers: HeaderMap,
}

impl RowMapper {
  pub fn new(headers: HeaderMap) -> Self { Self { headers } }

  pub fn headers(&self) -> &HeaderMap { &self.headers }

  /// Configured header names that do not appear in `present`.
  pub fn missing_headers<'a>(&'a self, present: &[String]) -> Vec<&'a str> {
    self
      .headers
      .names()
      .into_iter()
      .filter(|name| !present.iter().any(|p| p.as_str() == *name))
      .collect()
  }

  /// Returns `None` when sex or sport is empty; such rows are skipped.
  ///
  /// Values are trimmed and otherwise taken as they are. A flag is set only
  /// when its cell reads exactly `Sim`.
  pub fn map(&self, row: &Row) -> Option<AthleteRecord> {
    let field = |name: &str| row.get(name).map_or("", |v| v.trim());
    let flag = |name: &str| Flag::from(field(name) == "Sim");

    let h = &self.headers;
    let sex = field(&h.sex);
    let sport = field(&h.sport);
    if sex.is_empty() || sport.is_empty() {
      return None;
    }

    Some(AthleteRecord {
      sex:             sex.to_owned(),
      force:           field(&h.force).to_owned(),
      rank:            field(&h.rank).to_owned(),
      state:           or_not_available(field(&h.state)),
      city:            or_not_available(field(&h.city)),
      sport:           sport.to_owned(),
      has_medal:       flag(&h.medal),
      has_scholarship: flag(&h.scholarship),
      in_program:      flag(&h.program),
    })
  }
}
