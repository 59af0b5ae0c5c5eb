//! The athlete record: the unit the ingestion pipeline produces and the
//! store persists as one row in each of its three tables.

use std::{fmt, str::FromStr};

use crate::Error;

/// Sentinel stored for optional free-text fields that were left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Identity shared by the Person, Location and Sport rows of one record.
pub type RecordId = i64;

// ─── Flag ────────────────────────────────────────────────────────────────────

/// A yes/no answer, persisted as the literal strings `"Sim"` / `"Não"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flag {
  Sim,
  #[default]
  Nao,
}

impl Flag {
  pub fn as_str(self) -> &'static str {
    match self {
      Flag::Sim => "Sim",
      Flag::Nao => "Não",
    }
  }
}

impl From<bool> for Flag {
  fn from(set: bool) -> Self { if set { Flag::Sim } else { Flag::Nao } }
}

impl fmt::Display for Flag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Strict parse of the stored representation.
impl FromStr for Flag {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Sim" => Ok(Flag::Sim),
      "Não" => Ok(Flag::Nao),
      other => Err(Error::InvalidFlag(other.to_owned())),
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One athlete: Person fields, Location fields and Sport fields.
///
/// Every field is non-empty once produced by the row mapper or by
/// interactive entry; empty state/city collapse to [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthleteRecord {
  pub sex:             String,
  pub force:           String,
  pub rank:            String,
  pub state:           String,
  pub city:            String,
  pub sport:           String,
  pub has_medal:       Flag,
  pub has_scholarship: Flag,
  pub in_program:      Flag,
}

/// Replace an empty (after trim) value with [`NOT_AVAILABLE`].
pub fn or_not_available(value: &str) -> String {
  let value = value.trim();
  if value.is_empty() { NOT_AVAILABLE.to_owned() } else { value.to_owned() }
}

impl fmt::Display for AthleteRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "({}, {}, {}, {}, {}, {}, {}, {}, {})",
      self.sex,
      self.force,
      self.rank,
      self.state,
      self.city,
      self.sport,
      self.has_medal,
      self.has_scholarship,
      self.in_program,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flag_renders_literal_strings() {
    assert_eq!(Flag::Sim.to_string(), "Sim");
    assert_eq!(Flag::Nao.to_string(), "Não");
    assert_eq!(Flag::from(true), Flag::Sim);
    assert_eq!(Flag::from(false), Flag::Nao);
  }

  #[test]
  fn flag_parse_is_strict() {
    assert_eq!("Sim".parse::<Flag>().unwrap(), Flag::Sim);
    assert_eq!("Não".parse::<Flag>().unwrap(), Flag::Nao);
    assert!("sim".parse::<Flag>().is_err());
    assert!("Nao".parse::<Flag>().is_err());
  }

  #[test]
  fn empty_collapses_to_sentinel() {
    assert_eq!(or_not_available("  "), "N/A");
    assert_eq!(or_not_available(" SP "), "SP");
  }
}
