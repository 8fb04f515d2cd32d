use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::storage::{RecordParseError, SnapshotRecord, parse_field};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    /// Login account this student is linked to, if any. Unique across
    /// students when present.
    pub account_id: Option<EntityId>,
    pub name: String,
    pub email: String,
    pub course_id: EntityId,
}

impl SnapshotRecord for Student {
    const KIND: &'static str = "student";
    const HEADER: &'static [&'static str] = &["studentId", "userId", "name", "email", "courseId"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_fields(&self) -> Vec<String> {
        // The optional account id sits second when present; readers tell
        // the two shapes apart by field count.
        match self.account_id {
            Some(account_id) => vec![
                self.id.to_string(),
                account_id.to_string(),
                self.name.clone(),
                self.email.clone(),
                self.course_id.to_string(),
            ],
            None => vec![
                self.id.to_string(),
                self.name.clone(),
                self.email.clone(),
                self.course_id.to_string(),
            ],
        }
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RecordParseError> {
        match fields.len() {
            4 => Ok(Student {
                id: parse_field("studentId", fields[0])?,
                account_id: None,
                name: fields[1].to_string(),
                email: fields[2].to_string(),
                course_id: parse_field("courseId", fields[3])?,
            }),
            5 => Ok(Student {
                id: parse_field("studentId", fields[0])?,
                account_id: Some(parse_field("userId", fields[1])?),
                name: fields[2].to_string(),
                email: fields[3].to_string(),
                course_id: parse_field("courseId", fields[4])?,
            }),
            got => Err(RecordParseError::FieldCount {
                expected: "4 or 5",
                got,
            }),
        }
    }
}
