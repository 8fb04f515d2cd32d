use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::storage::{RecordParseError, parse_field};

/// One attendance mark. At most one record exists per (student, date);
/// a second mark for the same day is rejected, never overwritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub student_id: EntityId,
    pub date: NaiveDate,
    pub present: bool,
}

impl Attendance {
    pub(crate) const HEADER: &'static [&'static str] = &["studentId", "date", "present"];

    pub(crate) fn to_fields(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.date.to_string(),
            self.present.to_string(),
        ]
    }

    pub(crate) fn from_fields(fields: &[&str]) -> Result<Self, RecordParseError> {
        if fields.len() != 3 {
            return Err(RecordParseError::FieldCount {
                expected: "3",
                got: fields.len(),
            });
        }
        Ok(Attendance {
            student_id: parse_field("studentId", fields[0])?,
            date: parse_field("date", fields[1])?,
            present: parse_field("present", fields[2])?,
        })
    }
}
