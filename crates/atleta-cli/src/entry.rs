//! Interactive record entry.
//!
//! Every answer is checked against [`atleta_core::policy`] and asked again
//! until it is valid. When editing, an empty answer keeps the current value.

use atleta_core::{
  AthleteRecord, Flag, NOT_AVAILABLE,
  policy::{parse_flag, parse_force, parse_rank, parse_sex, parse_sport},
  record::or_not_available,
};

use crate::console::Console;

const MEDAL: &str = "Possui medalha de mérito desportivo militar (Sim/Não)";
const SCHOLARSHIP: &str = "Possui bolsa atleta (Sim/Não)";
const PROGRAM: &str = "PAAR (Sim/Não)";

/// Ask for every field of a new record.
pub fn new_record<C: Console>(console: &mut C) -> anyhow::Result<AthleteRecord> {
  console.write_line("Forneça os dados para inclusão:")?;
  ask_record(console, None)
}

/// Ask for every field of `current`, keeping fields answered with an empty
/// line.
pub fn edit_record<C: Console>(
  console: &mut C,
  current: &AthleteRecord,
) -> anyhow::Result<AthleteRecord> {
  console.write_line("Digite os novos valores ou pressione Enter para manter os atuais.")?;
  ask_record(console, Some(current))
}

fn ask_record<C: Console>(
  console: &mut C,
  current: Option<&AthleteRecord>,
) -> anyhow::Result<AthleteRecord> {
  let keep = |f: fn(&AthleteRecord) -> &str| current.map(|r| f(r).to_owned());
  let keep_flag = |f: fn(&AthleteRecord) -> Flag| current.map(f);

  let sex = ask_valid(
    console,
    "Sexo",
    keep(|r| r.sex.as_str()),
    |a| parse_sex(a).map(|s| s.to_string()),
    "Sexo inválido. Digite novamente.",
  )?;

  let force = ask_valid(
    console,
    "Força",
    keep(|r| r.force.as_str()),
    |a| parse_force(a).map(|f| f.to_string()),
    "Força inválida. Digite novamente.",
  )?;

  let rank = ask_valid(
    console,
    "Posto/Graduação",
    keep(|r| r.rank.as_str()),
    parse_rank,
    "Posto/Graduação inválido. Digite novamente.",
  )?;

  let state = ask_free(console, "Estado", keep(|r| r.state.as_str()))?;
  let city = ask_free(console, "Cidade", keep(|r| r.city.as_str()))?;

  let sport = ask_valid(
    console,
    "Modalidade",
    keep(|r| r.sport.as_str()),
    parse_sport,
    "Modalidade inválida. Digite novamente.",
  )?;

  let has_medal = ask_flag(console, MEDAL, keep_flag(|r| r.has_medal))?;
  let has_scholarship = ask_flag(console, SCHOLARSHIP, keep_flag(|r| r.has_scholarship))?;
  let in_program = ask_flag(console, PROGRAM, keep_flag(|r| r.in_program))?;

  Ok(AthleteRecord {
    sex,
    force,
    rank,
    state,
    city,
    sport,
    has_medal,
    has_scholarship,
    in_program,
  })
}

fn prompt(label: &str, current: Option<&str>) -> String {
  match current {
    Some(value) => format!("{label} [{value}]: "),
    None => format!("{label}: "),
  }
}

/// Ask until `parse` accepts the answer. With a current value, an empty
/// answer or the current value itself is accepted unchanged.
fn ask_valid<C: Console>(
  console: &mut C,
  label: &str,
  current: Option<String>,
  parse: impl Fn(&str) -> Option<String>,
  invalid: &str,
) -> anyhow::Result<String> {
  loop {
    let answer = console.ask(&prompt(label, current.as_deref()))?;
    let answer = answer.trim();

    if let Some(value) = &current
      && (answer.is_empty() || answer == value)
    {
      return Ok(value.clone());
    }
    if let Some(value) = parse(answer) {
      return Ok(value);
    }
    console.write_line(invalid)?;
  }
}

/// Free text; empty keeps the current value, or becomes `N/A` for a new
/// record.
fn ask_free<C: Console>(
  console: &mut C,
  label: &str,
  current: Option<String>,
) -> anyhow::Result<String> {
  let answer = console.ask(&prompt(label, current.as_deref()))?;
  if answer.trim().is_empty() {
    return Ok(current.unwrap_or_else(|| NOT_AVAILABLE.to_owned()));
  }
  Ok(or_not_available(&answer))
}

fn ask_flag<C: Console>(
  console: &mut C,
  label: &str,
  current: Option<Flag>,
) -> anyhow::Result<Flag> {
  loop {
    let shown = current.map(Flag::as_str);
    let answer = console.ask(&prompt(label, shown))?;

    if let Some(flag) = current
      && answer.trim().is_empty()
    {
      return Ok(flag);
    }
    if let Some(flag) = parse_flag(&answer) {
      return Ok(flag);
    }
    console.write_line("Opção inválida. Digite novamente.")?;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::console::ScriptedConsole;

  #[test]
  fn new_record_reasks_until_valid() {
    let mut console = ScriptedConsole::new(&[
      "x", "m", // sex
      "marinha", "fab", // force
      "general", "Capitão", // rank
      "", // state
      "Natal", // city
      "curling", "Natação", // sport
      "talvez", "s", // medal
      "N", // scholarship
      "não", // program
    ]);

    let record = new_record(&mut console).unwrap();
    assert_eq!(
      record,
      AthleteRecord {
        sex:             "Masculino".into(),
        force:           "FAB".into(),
        rank:            "capitao".into(),
        state:           "N/A".into(),
        city:            "Natal".into(),
        sport:           "natacao".into(),
        has_medal:       Flag::Sim,
        has_scholarship: Flag::Nao,
        in_program:      Flag::Nao,
      }
    );
    assert!(console.printed("Sexo inválido"));
    assert!(console.printed("Força inválida"));
    assert!(console.printed("Posto/Graduação inválido"));
    assert!(console.printed("Modalidade inválida"));
    assert!(console.printed("Opção inválida"));
  }

  #[test]
  fn edit_keeps_current_values_on_empty_answers() {
    // CSV-sourced values are not in the enumerations but are kept as is.
    let current = AthleteRecord {
      sex:             "Masculino".into(),
      force:           "Exercito".into(),
      rank:            "Cabo".into(),
      state:           "SP".into(),
      city:            "Sao Paulo".into(),
      sport:           "Judo".into(),
      has_medal:       Flag::Sim,
      has_scholarship: Flag::Nao,
      in_program:      Flag::Sim,
    };
    let mut console = ScriptedConsole::new(&["", "Exercito", "", "", "Campinas", "", "", "sim", ""]);

    let edited = edit_record(&mut console, &current).unwrap();
    assert_eq!(edited.city, "Campinas");
    assert_eq!(edited.force, "Exercito");
    assert_eq!(edited.has_scholarship, Flag::Sim);
    assert_eq!(AthleteRecord { city: "Sao Paulo".into(), has_scholarship: Flag::Nao, ..edited }, current);
    assert!(console.printed("Força [Exercito]: "));
  }

  #[test]
  fn end_of_input_aborts_entry() {
    let mut console = ScriptedConsole::new(&["f"]);
    let err = new_record(&mut console).unwrap_err();
    assert!(err.is::<crate::console::EndOfInput>());
  }
}
