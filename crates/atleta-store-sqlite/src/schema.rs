//! SQL schema for the athlete registry.
//!
//! Identities are plain `INTEGER PRIMARY KEY` columns (no `AUTOINCREMENT`),
//! so the next identity is always `max(id) + 1`. After a delete renumbers
//! the trailing rows, new inserts stay aligned across the three tables.

pub const PERSON_TABLE: &str = "Person";
pub const LOCATION_TABLE: &str = "Location";
pub const SPORT_TABLE: &str = "Sport";

/// The three record tables, in insertion order.
pub const RECORD_TABLES: [&str; 3] = [PERSON_TABLE, LOCATION_TABLE, SPORT_TABLE];

/// Connection setup, executed once per open.
pub const PRAGMAS: &str = "PRAGMA journal_mode = WAL;";

/// Table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Yes/no columns stay string-typed and hold the literals 'Sim' / 'Não'.
pub const TABLES: &str = "
CREATE TABLE IF NOT EXISTS Person (
    id    INTEGER PRIMARY KEY,
    sex   TEXT NOT NULL,
    force TEXT NOT NULL,
    rank  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Location (
    id    INTEGER PRIMARY KEY,
    state TEXT NOT NULL,
    city  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Sport (
    id          INTEGER PRIMARY KEY,
    discipline  TEXT NOT NULL,
    medal       TEXT NOT NULL,   -- 'Sim' | 'Não'
    scholarship TEXT NOT NULL,   -- 'Sim' | 'Não'
    program     TEXT NOT NULL    -- 'Sim' | 'Não'
);
";
