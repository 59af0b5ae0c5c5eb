//! Core types and trait definitions for the athlete registry.
//!
//! No file, CSV or database access happens here. All other crates depend on
//! it.

pub mod error;
pub mod policy;
pub mod record;
pub mod store;
pub mod text;

pub use error::{Error, Result};
pub use record::{AthleteRecord, Flag, RecordId, NOT_AVAILABLE};
