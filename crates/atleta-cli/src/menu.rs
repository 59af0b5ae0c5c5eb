//! The interactive menu loop.
//!
//! Each operation opens the store, runs, and drops it again, so the
//! connection never outlives the operation. Failures are logged and
//! reported on the console; the menu then redisplays.

use std::path::Path;

use anyhow::Context as _;
use atleta_core::{RecordId, store::AthleteStore};
use atleta_ingest::IngestionPipeline;
use atleta_store_sqlite::SqliteStore;

use crate::{
  config::AppConfig,
  console::{Console, EndOfInput},
  entry,
};

const MAIN_MENU: &[&str] = &[
  "",
  "--- Sistema de Gestão ---",
  "1. Criar tabelas",
  "2. Carregar CSV",
  "3. Consultar tabela",
  "4. Listar tabelas disponíveis",
  "5. Limpar tabelas",
  "6. Excluir tabelas",
  "7. Fazer CRUD",
  "8. Sair",
];

const CRUD_MENU: &[&str] = &[
  "",
  "Escolha uma opção:",
  "1. Incluir",
  "2. Alterar",
  "3. Consultar",
  "4. Excluir",
  "5. Sair",
];

/// Run the menu until the user exits or input ends.
pub async fn run<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  loop {
    for line in MAIN_MENU {
      console.write_line(line)?;
    }
    let Some(choice) = console.read_line("Escolha uma opção: ")? else {
      break;
    };

    let (operation, result) = match choice.trim() {
      "1" => ("criar tabelas", create_tables(config, console).await),
      "2" => ("carregar CSV", load_csv(config, console).await),
      "3" => ("consultar tabela", query_table(config, console).await),
      "4" => ("listar tabelas", list_tables(config, console).await),
      "5" => ("limpar tabelas", clear_tables(config, console).await),
      "6" => ("excluir tabelas", drop_table(config, console).await),
      "7" => ("fazer CRUD", crud(config, console).await),
      "8" => {
        console.write_line("Saindo...")?;
        break;
      }
      _ => {
        console.write_line("Opção inválida!")?;
        continue;
      }
    };

    if let Err(err) = result {
      if err.is::<EndOfInput>() {
        break;
      }
      tracing::error!(operation, error = %format!("{err:#}"), "operation failed");
      console.write_line("")?;
      console.write_line(&format!("Erro ao {operation}: {err:#}"))?;
    }
  }
  Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
  SqliteStore::open(&config.store)
    .await
    .with_context(|| format!("failed to open store at {:?}", config.store.path))
}

// ─── Table management ────────────────────────────────────────────────────────

async fn create_tables<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let store = open_store(config).await?;
  store.create_tables().await?;
  console.write_line("Tabelas criadas com sucesso.")?;
  Ok(())
}

async fn load_csv<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let file = console.ask("Digite o nome do arquivo CSV: ")?;
  let pipeline = IngestionPipeline::new(&config.ingest)?;

  let store = open_store(config).await?;
  let report = pipeline.ingest(&store, Path::new(file.trim())).await?;

  console.write_line(&format!("Cabeçalhos do CSV: {:?}", report.headers))?;
  console.write_line("")?;
  console.write_line(&format!(
    "Dados carregados com sucesso. {} registros incluídos, {} linhas ignoradas.",
    report.inserted, report.skipped
  ))?;
  Ok(())
}

async fn query_table<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let table = console.ask("Digite o nome da tabela para consultar: ")?;

  let store = open_store(config).await?;
  let rows = store.query_table(table.trim().to_owned()).await?;

  if rows.rows.is_empty() {
    console.write_line("Tabela vazia.")?;
    return Ok(());
  }
  console.write_line(&format!("({})", rows.columns.join(", ")))?;
  for row in &rows.rows {
    console.write_line(&format!("({})", row.join(", ")))?;
  }
  Ok(())
}

async fn list_tables<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let store = open_store(config).await?;
  print_tables(&store.list_tables().await?, console)
}

fn print_tables<C: Console>(tables: &[String], console: &mut C) -> anyhow::Result<()> {
  if tables.is_empty() {
    console.write_line("Nenhuma tabela encontrada no banco de dados.")?;
    return Ok(());
  }
  console.write_line("Tabelas disponíveis no banco de dados:")?;
  for table in tables {
    console.write_line(&format!("- {table}"))?;
  }
  Ok(())
}

async fn clear_tables<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let store = open_store(config).await?;
  let cleared = store.clear_tables().await?;

  if cleared.is_empty() {
    console.write_line("Nenhuma tabela encontrada no banco de dados.")?;
    return Ok(());
  }
  for c in &cleared {
    console.write_line("")?;
    console.write_line(&format!("Limpando dados da tabela: {}", c.table))?;
    console.write_line(&format!("Quantidade de registros antes da exclusão: {}", c.before))?;
    console.write_line(&format!("Quantidade de registros depois da exclusão: {}", c.after))?;
  }
  console.write_line("")?;
  console.write_line("Limpeza concluída com sucesso.")?;
  Ok(())
}

async fn drop_table<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let store = open_store(config).await?;
  let tables = store.list_tables().await?;
  print_tables(&tables, console)?;

  let table = console.ask("Digite o nome da tabela que deseja excluir: ")?;
  let table = table.trim();
  if !tables.iter().any(|t| t == table) {
    console.write_line("")?;
    console.write_line("Tabela não encontrada.")?;
    return Ok(());
  }

  let confirm = console.ask(&format!(
    "Tem certeza de que deseja excluir a tabela '{table}'? (Sim/Não): "
  ))?;
  if matches!(confirm.trim().to_lowercase().as_str(), "sim" | "s") {
    store.drop_table(table.to_owned()).await?;
    console.write_line(&format!("Tabela '{table}' excluída com sucesso."))?;
  } else {
    console.write_line("Operação cancelada.")?;
  }
  Ok(())
}

// ─── Record CRUD ─────────────────────────────────────────────────────────────

async fn crud<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  for line in CRUD_MENU {
    console.write_line(line)?;
  }
  let choice = console.ask("")?;

  match choice.trim() {
    "1" => insert_record(config, console).await,
    "2" => update_record(config, console).await,
    "3" => show_record(config, console).await,
    "4" => delete_record(config, console).await,
    "5" => Ok(()),
    _ => {
      console.write_line("Opção Inválida")?;
      Ok(())
    }
  }
}

/// Parse a record id, or report it as invalid.
fn parse_id<C: Console>(input: &str, console: &mut C) -> anyhow::Result<Option<RecordId>> {
  match input.trim().parse::<RecordId>() {
    Ok(id) if id > 0 => Ok(Some(id)),
    _ => {
      console.write_line("ID inválido. Por favor, insira um ID numérico.")?;
      Ok(None)
    }
  }
}

async fn insert_record<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let record = entry::new_record(console)?;

  let store = open_store(config).await?;
  let id = store.insert_record(record).await?;
  console.write_line(&format!("Registro incluído com sucesso. ID: {id}"))?;
  Ok(())
}

async fn update_record<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let input = console.ask("Digite o ID do elemento que deseja alterar: ")?;
  let Some(id) = parse_id(&input, console)? else {
    return Ok(());
  };

  let store = open_store(config).await?;
  let Some(current) = store.get_record(id).await? else {
    console.write_line("Registro não encontrado.")?;
    return Ok(());
  };

  let edited = entry::edit_record(console, &current)?;
  if store.update_record(id, edited).await? {
    console.write_line("")?;
    console.write_line("Registro atualizado com sucesso.")?;
  } else {
    console.write_line("Registro não encontrado.")?;
  }
  Ok(())
}

async fn show_record<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let input = console.ask("Digite o ID do elemento que deseja consultar: ")?;
  let Some(id) = parse_id(&input, console)? else {
    return Ok(());
  };

  let store = open_store(config).await?;
  match store.get_record(id).await? {
    Some(record) => {
      console.write_line("Resultado encontrado:")?;
      console.write_line(&record.to_string())?;
    }
    None => console.write_line("Nenhum resultado encontrado para o ID fornecido.")?,
  }
  Ok(())
}

async fn delete_record<C: Console>(config: &AppConfig, console: &mut C) -> anyhow::Result<()> {
  let input = console.ask("ID do registro a ser excluído: ")?;
  let Some(id) = parse_id(&input, console)? else {
    return Ok(());
  };

  let store = open_store(config).await?;
  if store.delete_record(id).await? {
    console.write_line("Registro excluído com sucesso.")?;
  } else {
    console.write_line("Registro não encontrado.")?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use atleta_store_sqlite::StoreConfig;

  use super::*;
  use crate::console::ScriptedConsole;

  fn config(dir: &Path) -> AppConfig {
    AppConfig {
      store: StoreConfig { path: dir.join("atleta.db") },
      log_dir: dir.to_path_buf(),
      ..AppConfig::default()
    }
  }

  async fn session(config: &AppConfig, answers: &[&str]) -> ScriptedConsole {
    let mut console = ScriptedConsole::new(answers);
    run(config, &mut console).await.unwrap();
    console
  }

  #[tokio::test]
  async fn create_and_list_tables() {
    let dir = tempfile::tempdir().unwrap();
    let console = session(&config(dir.path()), &["1", "4", "8"]).await;

    assert!(console.printed("Tabelas criadas com sucesso."));
    for table in ["- Location", "- Person", "- Sport"] {
      assert!(console.printed(table), "missing {table}");
    }
    assert!(console.printed("Saindo..."));
  }

  #[tokio::test]
  async fn failures_are_reported_and_the_menu_continues() {
    let dir = tempfile::tempdir().unwrap();
    let console = session(&config(dir.path()), &["3", "Person", "9", "4"]).await;

    assert!(console.printed("Erro ao consultar tabela: table not found: Person"));
    assert!(console.printed("Opção inválida!"));
    assert!(console.printed("Nenhuma tabela encontrada no banco de dados."));
  }

  #[tokio::test]
  async fn load_csv_then_crud() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("atletas.csv");
    fs::write(
      &csv,
      "Sexo;Estado;Cidade;Modalidade;PAAR\r\n\
       Masculino;SP;Campinas;Judo;Sim\r\n\
       Feminino;;;Vela;Nao\r\n\
       Masculino;RJ;Niteroi;Tiro;Sim\r\n",
    )
    .unwrap();
    let config = config(dir.path());

    let console = session(&config, &[
      "1",
      "2", csv.to_str().unwrap(),
      "7", "3", "2",
      "7", "4", "2",
      "7", "3", "2",
      "7", "3", "abc",
      "3", "Sport",
    ])
    .await;

    assert!(console.printed("Dados carregados com sucesso. 3 registros incluídos, 0 linhas ignoradas."));
    assert!(console.printed("(Feminino, , , N/A, N/A, Vela, Não, Não, Não)"));
    assert!(console.printed("Registro excluído com sucesso."));
    assert!(console.printed("(Masculino, , , RJ, Niteroi, Tiro, Não, Não, Sim)"));
    assert!(console.printed("ID inválido."));
    assert!(console.printed("(id, discipline, medal, scholarship, program)"));
    assert!(console.printed("(2, Tiro, Não, Não, Sim)"));
    assert!(!console.printed("(3, "));
  }

  #[tokio::test]
  async fn drop_table_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    session(&config, &["1", "6", "Sport", "n", "6", "Nope", "6", "Sport", "Sim"]).await;

    let store = open_store(&config).await.unwrap();
    assert_eq!(store.list_tables().await.unwrap(), ["Location", "Person"]);
  }

  #[tokio::test]
  async fn end_of_input_inside_an_operation_ends_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let console = session(&config(dir.path()), &["1", "7", "1", "m"]).await;
    assert!(!console.printed("Erro ao"));
  }
}
