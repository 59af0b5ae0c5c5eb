//! [`SqliteStore`], the SQLite implementation of [`AthleteStore`].

use std::path::PathBuf;

use atleta_core::{
  AthleteRecord, RecordId,
  store::{AthleteStore, TableClear, TableRows},
};
use rusqlite::OptionalExtension as _;
use serde::Deserialize;

use crate::{
  encode::{encode_flag, quote_ident, render_value, RawRecord},
  schema::{PRAGMAS, RECORD_TABLES, TABLES},
  Error, Result,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Where the store lives on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  pub path: PathBuf,
}

impl Default for StoreConfig {
  fn default() -> Self { Self { path: PathBuf::from("atleta.db") } }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An athlete registry backed by a single SQLite file.
///
/// Clones share one reference-counted connection. The
/// connection closes when the last clone is dropped.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database file named by `config`.
  pub async fn open(config: &StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(config.path.clone()).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// User tables sorted by name, without SQLite internals or `vw*` views.
fn user_tables(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT name FROM sqlite_master
     WHERE type = 'table'
       AND substr(name, 1, 7) != 'sqlite_'
       AND substr(name, 1, 2) != 'vw'
     ORDER BY name",
  )?;
  let names = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(names)
}

// ─── AthleteStore impl ───────────────────────────────────────────────────────

impl AthleteStore for SqliteStore {
  type Error = Error;

  // ── Tables ────────────────────────────────────────────────────────────────

  async fn create_tables(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(TABLES)?;
        Ok(())
      })
      .await?;
    tracing::info!("record tables created");
    Ok(())
  }

  async fn list_tables(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| Ok(user_tables(conn)?))
      .await?;
    Ok(names)
  }

  async fn query_table(&self, table: String) -> Result<TableRows> {
    let name = table.clone();

    let found: Option<TableRows> = self
      .conn
      .call(move |conn| {
        if !user_tables(conn)?.contains(&table) {
          return Ok(None);
        }

        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(&table)))?;
        let columns: Vec<String> =
          stmt.column_names().into_iter().map(str::to_owned).collect();
        let width = columns.len();

        let rows = stmt
          .query_map([], |row| {
            (0..width)
              .map(|i| row.get_ref(i).map(render_value))
              .collect::<rusqlite::Result<Vec<_>>>()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(TableRows { columns, rows }))
      })
      .await?;

    found.ok_or(Error::TableNotFound(name))
  }

  async fn clear_tables(&self) -> Result<Vec<TableClear>> {
    let cleared = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let mut cleared = Vec::new();

        for table in user_tables(&tx)? {
          let quoted = quote_ident(&table);
          let count_sql = format!("SELECT COUNT(*) FROM {quoted}");

          let before: i64 = tx.query_row(&count_sql, [], |r| r.get(0))?;
          tx.execute(&format!("DELETE FROM {quoted}"), [])?;
          let after: i64 = tx.query_row(&count_sql, [], |r| r.get(0))?;

          cleared.push(TableClear {
            table,
            before: before as u64,
            after:  after as u64,
          });
        }

        tx.commit()?;
        Ok(cleared)
      })
      .await?;

    tracing::info!(tables = cleared.len(), "tables cleared");
    Ok(cleared)
  }

  async fn drop_table(&self, table: String) -> Result<()> {
    let name = table.clone();

    let dropped = self
      .conn
      .call(move |conn| {
        if !user_tables(conn)?.contains(&table) {
          return Ok(false);
        }
        conn.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(&table)), [])?;
        Ok(true)
      })
      .await?;

    if !dropped {
      return Err(Error::TableNotFound(name));
    }
    tracing::info!(table = %name, "table dropped");
    Ok(())
  }

  // ── Records ───────────────────────────────────────────────────────────────

  async fn insert_record(&self, record: AthleteRecord) -> Result<RecordId> {
    let AthleteRecord {
      sex,
      force,
      rank,
      state,
      city,
      sport,
      has_medal,
      has_scholarship,
      in_program,
    } = record;

    let (person, location, sport_id) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO Person (sex, force, rank) VALUES (?1, ?2, ?3)",
          rusqlite::params![sex, force, rank],
        )?;
        let person = tx.last_insert_rowid();

        tx.execute(
          "INSERT INTO Location (state, city) VALUES (?1, ?2)",
          rusqlite::params![state, city],
        )?;
        let location = tx.last_insert_rowid();

        tx.execute(
          "INSERT INTO Sport (discipline, medal, scholarship, program)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            sport,
            encode_flag(has_medal),
            encode_flag(has_scholarship),
            encode_flag(in_program),
          ],
        )?;
        let sport_id = tx.last_insert_rowid();

        // Dropping the transaction without committing rolls it back.
        if person == location && location == sport_id {
          tx.commit()?;
        }
        Ok((person, location, sport_id))
      })
      .await?;

    if person != location || location != sport_id {
      return Err(Error::IdentityDrift { person, location, sport: sport_id });
    }
    Ok(person)
  }

  async fn get_record(&self, id: RecordId) -> Result<Option<AthleteRecord>> {
    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT
               p.sex, p.force, p.rank,
               l.state, l.city,
               s.discipline, s.medal, s.scholarship, s.program
             FROM Person p
             LEFT JOIN Location l ON l.id = p.id
             LEFT JOIN Sport    s ON s.id = p.id
             WHERE p.id = ?1",
            rusqlite::params![id],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn update_record(&self, id: RecordId, record: AthleteRecord) -> Result<bool> {
    let AthleteRecord {
      sex,
      force,
      rank,
      state,
      city,
      sport,
      has_medal,
      has_scholarship,
      in_program,
    } = record;

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changed = tx.execute(
          "UPDATE Person SET sex = ?1, force = ?2, rank = ?3 WHERE id = ?4",
          rusqlite::params![sex, force, rank, id],
        )?;
        if changed == 0 {
          return Ok(false);
        }

        tx.execute(
          "UPDATE Location SET state = ?1, city = ?2 WHERE id = ?3",
          rusqlite::params![state, city, id],
        )?;
        tx.execute(
          "UPDATE Sport SET discipline = ?1, medal = ?2, scholarship = ?3, program = ?4
           WHERE id = ?5",
          rusqlite::params![
            sport,
            encode_flag(has_medal),
            encode_flag(has_scholarship),
            encode_flag(in_program),
            id,
          ],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if updated {
      tracing::info!(id, "record updated");
    }
    Ok(updated)
  }

  async fn delete_record(&self, id: RecordId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut removed = 0;
        for table in RECORD_TABLES {
          removed += tx.execute(
            &format!("DELETE FROM {table} WHERE id = ?1"),
            rusqlite::params![id],
          )?;
        }
        if removed == 0 {
          return Ok(false);
        }

        // Shift through negative ids so no intermediate state collides with
        // an existing primary key.
        for table in RECORD_TABLES {
          tx.execute(
            &format!("UPDATE {table} SET id = -(id - 1) WHERE id > ?1"),
            rusqlite::params![id],
          )?;
          tx.execute(&format!("UPDATE {table} SET id = -id WHERE id < 0"), [])?;
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if deleted {
      tracing::info!(id, "record deleted and later identities shifted");
    }
    Ok(deleted)
  }
}
