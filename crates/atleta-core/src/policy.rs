//! Validation policy for interactively entered records.
//!
//! CSV ingestion does not go through this module: imported values are only
//! trimmed and normalised, never checked against these enumerations.

use strum::{Display, EnumIter, EnumString};

use crate::{Flag, text::strip_diacritics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Sex {
  #[strum(to_string = "Masculino", serialize = "masculino", serialize = "M", serialize = "m")]
  Masculino,
  #[strum(to_string = "Feminino", serialize = "feminino", serialize = "F", serialize = "f")]
  Feminino,
}

/// Armed force branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Force {
  MB,
  FAB,
  EB,
}

pub const RANKS: &[&str] = &[
  "soldado",
  "cabo",
  "sargento",
  "primeiro sargento",
  "primeiro tenente",
  "primeiro sargente",
  "segundo sargento",
  "capitao de mar e guerra",
  "subtenente",
  "tenente",
  "suboficial",
  "suboficial r/1",
  "tenete-coronel r/1",
  "capitao",
  "terceiro sargento",
  "terceiro sargento r/1",
  "tenente-coronel",
  "coronel",
];

pub const SPORTS: &[&str] = &[
  "apneia",
  "atletismo",
  "basquete",
  "boxe",
  "canoagem slalom",
  "canoagem velocidade",
  "ciclismo mtb",
  "escalada esportiva",
  "esgrima",
  "futebol",
  "ginastica artistica",
  "golfe",
  "judo",
  "levantamento de peso",
  "lifesaving",
  "lutas associadas (wrestling)",
  "maratona",
  "maratonas aquaticas",
  "nado sincronizado",
  "natacao",
  "orientacao",
  "paraquedismo",
  "pentatlo militar",
  "pentatlo moderno",
  "pentatlo naval",
  "pesca submarina",
  "taekwondo",
  "tiro",
  "tiro com arco",
  "triatlo",
  "vela",
  "voleibol",
  "volei de praia",
];

pub fn parse_sex(input: &str) -> Option<Sex> { input.trim().parse().ok() }

pub fn parse_force(input: &str) -> Option<Force> {
  canonical_force(input).parse().ok()
}

/// Upper-cased, accent-stripped form used to compare force branches.
pub fn canonical_force(input: &str) -> String {
  strip_diacritics(&input.trim().to_uppercase())
}

/// Lower-cased, accent-stripped form used to compare ranks and sports.
pub fn canonical_lower(input: &str) -> String {
  strip_diacritics(&input.trim().to_lowercase())
}

pub fn parse_rank(input: &str) -> Option<String> {
  let rank = canonical_lower(input);
  RANKS.contains(&rank.as_str()).then_some(rank)
}

pub fn parse_sport(input: &str) -> Option<String> {
  let sport = canonical_lower(input);
  SPORTS.contains(&sport.as_str()).then_some(sport)
}

/// Accepts `Sim|sim|S|s` and `Não|não|N|n`.
pub fn parse_flag(input: &str) -> Option<Flag> {
  match input.trim() {
    "Sim" | "sim" | "S" | "s" => Some(Flag::Sim),
    "Não" | "não" | "N" | "n" => Some(Flag::Nao),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn sex_aliases() {
    assert_eq!(parse_sex("m"), Some(Sex::Masculino));
    assert_eq!(parse_sex("Masculino"), Some(Sex::Masculino));
    assert_eq!(parse_sex(" F "), Some(Sex::Feminino));
    assert_eq!(parse_sex("x"), None);
    assert_eq!(Sex::Feminino.to_string(), "Feminino");
  }

  #[test]
  fn force_is_upper_cased_and_accent_stripped() {
    assert_eq!(parse_force("eb"), Some(Force::EB));
    assert_eq!(parse_force("fáb"), Some(Force::FAB));
    assert_eq!(parse_force("MARINHA"), None);
    let all: Vec<String> = Force::iter().map(|f| f.to_string()).collect();
    assert_eq!(all, ["MB", "FAB", "EB"]);
  }

  #[test]
  fn rank_and_sport_lists() {
    assert_eq!(parse_rank("Capitão").as_deref(), Some("capitao"));
    assert_eq!(parse_rank("general"), None);
    assert_eq!(parse_sport("  Natação ").as_deref(), Some("natacao"));
    assert_eq!(parse_sport("Judô").as_deref(), Some("judo"));
    assert_eq!(parse_sport("curling"), None);
  }

  #[test]
  fn flag_answers() {
    for yes in ["Sim", "sim", "S", "s"] {
      assert_eq!(parse_flag(yes), Some(Flag::Sim));
    }
    for no in ["Não", "não", "N", "n"] {
      assert_eq!(parse_flag(no), Some(Flag::Nao));
    }
    assert_eq!(parse_flag("talvez"), None);
    assert_eq!(parse_flag(""), None);
  }
}
