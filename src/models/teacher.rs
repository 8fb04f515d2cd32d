use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::storage::{RecordParseError, SnapshotRecord, parse_field};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: EntityId,
    pub name: String,
    pub subject: String,
    pub salary: Decimal,
}

impl SnapshotRecord for Teacher {
    const KIND: &'static str = "teacher";
    const HEADER: &'static [&'static str] = &["teacherId", "name", "subject", "salary"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.subject.clone(),
            self.salary.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RecordParseError> {
        if fields.len() != 4 {
            return Err(RecordParseError::FieldCount {
                expected: "4",
                got: fields.len(),
            });
        }
        Ok(Teacher {
            id: parse_field("teacherId", fields[0])?,
            name: fields[1].to_string(),
            subject: fields[2].to_string(),
            salary: parse_field("salary", fields[3])?,
        })
    }
}
