//! Conversions between domain types and the plain-text values stored in
//! SQLite columns.
//!
//! Yes/no flags are stored as the literal strings `Sim` / `Não`. Location and
//! Sport columns come out of a LEFT JOIN and may be NULL when one table has
//! lost a row; those read back as `N/A` / `Não`.

use atleta_core::{AthleteRecord, Flag, NOT_AVAILABLE};
use rusqlite::types::ValueRef;

use crate::Result;

// ─── Flag ────────────────────────────────────────────────────────────────────

pub fn encode_flag(flag: Flag) -> &'static str { flag.as_str() }

pub fn decode_flag(s: Option<&str>) -> Result<Flag> {
  match s {
    Some(s) => Ok(s.parse()?),
    None => Ok(Flag::Nao),
  }
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Double-quote an identifier for interpolation into SQL.
pub fn quote_ident(name: &str) -> String {
  format!("\"{}\"", name.replace('"', "\"\""))
}

// ─── Cell rendering ──────────────────────────────────────────────────────────

pub fn render_value(value: ValueRef<'_>) -> String {
  match value {
    ValueRef::Null => "NULL".to_owned(),
    ValueRef::Integer(i) => i.to_string(),
    ValueRef::Real(f) => f.to_string(),
    ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
    ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
  }
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// One row of the Person ⟕ Location ⟕ Sport join, as read from SQLite.
pub struct RawRecord {
  pub sex:         String,
  pub force:       String,
  pub rank:        String,
  pub state:       Option<String>,
  pub city:        Option<String>,
  pub discipline:  Option<String>,
  pub medal:       Option<String>,
  pub scholarship: Option<String>,
  pub program:     Option<String>,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      sex:         row.get(0)?,
      force:       row.get(1)?,
      rank:        row.get(2)?,
      state:       row.get(3)?,
      city:        row.get(4)?,
      discipline:  row.get(5)?,
      medal:       row.get(6)?,
      scholarship: row.get(7)?,
      program:     row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<AthleteRecord> {
    let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_owned());
    Ok(AthleteRecord {
      sex:             self.sex,
      force:           self.force,
      rank:            self.rank,
      state:           or_na(self.state),
      city:            or_na(self.city),
      sport:           or_na(self.discipline),
      has_medal:       decode_flag(self.medal.as_deref())?,
      has_scholarship: decode_flag(self.scholarship.as_deref())?,
      in_program:      decode_flag(self.program.as_deref())?,
    })
  }
}
