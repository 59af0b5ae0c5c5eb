//! End-to-end ingestion tests against an in-memory SQLite store.

use std::{fs, path::Path, sync::Mutex};

use atleta_core::{
  AthleteRecord, Flag, RecordId,
  store::{AthleteStore, TableClear, TableRows},
};
use atleta_store_sqlite::SqliteStore;

use crate::{Error, IngestConfig, IngestionPipeline};

const HEADER: &str = "Sexo;Estado;Cidade;Força;Posto Graduação;\
Possui Medalha de  Mérito Desportivo Militar;Modalidade;Possui Bolsa Atleta;PAAR";

fn write_latin1(path: &Path, lines: &[&str]) {
  let mut text = lines.join("\r\n");
  text.push_str("\r\n");
  let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(&text);
  assert!(!had_errors);
  fs::write(path, bytes).unwrap();
}

fn pipeline() -> IngestionPipeline { IngestionPipeline::new(&IngestConfig::default()).unwrap() }

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.unwrap();
  s.create_tables().await.unwrap();
  s
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn loads_mappable_rows_in_order() {
  let dir = tempfile::tempdir().unwrap();
  let input = dir.path().join("atletas.csv");
  write_latin1(&input, &[
    HEADER,
    "Masculino;SP;São Paulo;EB;Cabo;Sim;<b>Judô</b>;Não;Sim",
    ";RJ;;MB;Soldado;Não;Vela;Sim;Não",
    "Feminino;;;FAB;Sargento;;Natação;Sim",
  ]);

  let s = store().await;
  let report = pipeline().ingest(&s, &input).await.unwrap();

  assert_eq!(report.inserted, 2);
  assert_eq!(report.skipped, 1);
  assert_eq!(report.normalized_path, dir.path().join("normalized_atletas.csv"));
  assert_eq!(report.headers[3], "Forca");
  assert_eq!(report.headers[5], "Possui Medalha de  Merito Desportivo Militar");

  assert_eq!(
    s.get_record(1).await.unwrap(),
    Some(AthleteRecord {
      sex:             "Masculino".into(),
      force:           "EB".into(),
      rank:            "Cabo".into(),
      state:           "SP".into(),
      city:            "Sao Paulo".into(),
      sport:           "Judo".into(),
      has_medal:       Flag::Sim,
      has_scholarship: Flag::Nao,
      in_program:      Flag::Sim,
    })
  );
  assert_eq!(
    s.get_record(2).await.unwrap(),
    Some(AthleteRecord {
      sex:             "Feminino".into(),
      force:           "FAB".into(),
      rank:            "Sargento".into(),
      state:           "N/A".into(),
      city:            "N/A".into(),
      sport:           "Natacao".into(),
      has_medal:       Flag::Nao,
      has_scholarship: Flag::Sim,
      in_program:      Flag::Nao,
    })
  );

  for table in ["Person", "Location", "Sport"] {
    assert_eq!(s.query_table(table.into()).await.unwrap().rows.len(), 2);
  }
}

#[tokio::test]
async fn normalized_file_is_utf8_without_markup_or_accents() {
  let dir = tempfile::tempdir().unwrap();
  let input = dir.path().join("atletas.csv");
  write_latin1(&input, &[HEADER, "Masculino;SP;São Paulo;EB;Cabo;Sim;<i>Judô</i>;Não;Sim"]);

  let report = pipeline().ingest(&store().await, &input).await.unwrap();
  let text = fs::read_to_string(report.normalized_path).unwrap();
  assert!(text.contains("Masculino;SP;Sao Paulo;EB;Cabo;Sim;Judo;Nao;Sim\r\n"));
  assert!(!text.contains('<'));
}

#[tokio::test]
async fn drifted_header_drops_every_row() {
  let dir = tempfile::tempdir().unwrap();
  let input = dir.path().join("atletas.csv");
  write_latin1(&input, &["Genero;Modalidade", "Masculino;Judo"]);

  let s = store().await;
  let report = pipeline().ingest(&s, &input).await.unwrap();
  assert_eq!((report.inserted, report.skipped), (0, 1));
}

#[tokio::test]
async fn legacy_header_pass_is_invocable_alone() {
  let dir = tempfile::tempdir().unwrap();
  let input = dir.path().join("atletas.csv");
  write_latin1(&input, &[" Sexo ;Posto   Graduação", "Masculino;Cabo"]);

  let output = pipeline().normalize_legacy_headers(&input).unwrap();
  assert_eq!(
    fs::read_to_string(output).unwrap(),
    "Sexo;Posto Graduação\r\nMasculino;Cabo\r\n"
  );
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_input_is_an_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let err = pipeline()
    .ingest(&store().await, &dir.path().join("nope.csv"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Io { .. }));
}

#[tokio::test]
async fn overlong_row_aborts_before_any_insert() {
  let dir = tempfile::tempdir().unwrap();
  let input = dir.path().join("atletas.csv");
  write_latin1(&input, &["Sexo;Modalidade", "Masculino;Judo", "Feminino;Vela;extra"]);

  let s = store().await;
  let err = pipeline().ingest(&s, &input).await.unwrap_err();
  assert!(matches!(err, Error::RaggedRow { line: 3, .. }));
  assert!(s.get_record(1).await.unwrap().is_none());
}

/// Accepts `capacity` records, then fails every insert.
struct FlakyStore {
  capacity: usize,
  records:  Mutex<Vec<AthleteRecord>>,
}

#[derive(Debug, thiserror::Error)]
#[error("connection lost")]
struct ConnectionLost;

impl AthleteStore for FlakyStore {
  type Error = ConnectionLost;

  async fn create_tables(&self) -> Result<(), ConnectionLost> { Ok(()) }

  async fn list_tables(&self) -> Result<Vec<String>, ConnectionLost> { Ok(vec![]) }

  async fn query_table(&self, _table: String) -> Result<TableRows, ConnectionLost> {
    Ok(TableRows::default())
  }

  async fn clear_tables(&self) -> Result<Vec<TableClear>, ConnectionLost> { Ok(vec![]) }

  async fn drop_table(&self, _table: String) -> Result<(), ConnectionLost> { Ok(()) }

  async fn insert_record(&self, record: AthleteRecord) -> Result<RecordId, ConnectionLost> {
    let mut records = self.records.lock().unwrap();
    if records.len() >= self.capacity {
      return Err(ConnectionLost);
    }
    records.push(record);
    Ok(records.len() as RecordId)
  }

  async fn get_record(&self, _id: RecordId) -> Result<Option<AthleteRecord>, ConnectionLost> {
    Ok(None)
  }

  async fn update_record(
    &self,
    _id: RecordId,
    _record: AthleteRecord,
  ) -> Result<bool, ConnectionLost> {
    Ok(false)
  }

  async fn delete_record(&self, _id: RecordId) -> Result<bool, ConnectionLost> { Ok(false) }
}

#[tokio::test]
async fn store_failure_keeps_earlier_rows_and_names_the_line() {
  let dir = tempfile::tempdir().unwrap();
  let input = dir.path().join("atletas.csv");
  write_latin1(&input, &[
    "Sexo;Modalidade",
    "Masculino;Judo",
    "Feminino;Vela",
    "Masculino;Tiro",
  ]);

  let s = FlakyStore { capacity: 1, records: Mutex::new(vec![]) };
  let err = pipeline().ingest(&s, &input).await.unwrap_err();

  match err {
    Error::Store { line, path, .. } => {
      assert_eq!(line, 3);
      assert_eq!(path, input);
    }
    other => panic!("unexpected error: {other}"),
  }
  let records = s.records.lock().unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].sport, "Judo");
}
