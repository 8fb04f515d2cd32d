use std::str::FromStr;

use thiserror::Error;

use crate::models::EntityId;

pub mod snapshot;

pub use snapshot::SnapshotStore;

/// Why a snapshot line could not be decoded. Malformed lines are skipped
/// at load time, never fatal.
#[derive(Error, Debug)]
pub enum RecordParseError {
    #[error("expected {expected} fields, got {got}")]
    FieldCount { expected: &'static str, got: usize },

    #[error("invalid {field}: `{value}`")]
    Field { field: &'static str, value: String },
}

/// An entity that can live in a [`SnapshotStore`]: keyed by id and
/// convertible to/from one delimited snapshot line.
pub trait SnapshotRecord: Clone + Send + Sync + 'static {
    /// Entity kind used in error messages and log lines.
    const KIND: &'static str;

    /// Column names written as the snapshot header line.
    const HEADER: &'static [&'static str];

    fn id(&self) -> EntityId;

    fn to_fields(&self) -> Vec<String>;

    fn from_fields(fields: &[&str]) -> Result<Self, RecordParseError>;
}

pub(crate) fn parse_field<T: FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, RecordParseError> {
    value.trim().parse().map_err(|_| RecordParseError::Field {
        field,
        value: value.to_string(),
    })
}
