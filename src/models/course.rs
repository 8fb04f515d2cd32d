use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::storage::{RecordParseError, SnapshotRecord, parse_field};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub name: String,
    pub duration_months: u32,
    pub fee: Decimal,
    pub teacher_id: Option<EntityId>,
}

impl SnapshotRecord for Course {
    const KIND: &'static str = "course";
    const HEADER: &'static [&'static str] =
        &["courseId", "courseName", "duration", "fees", "teacherId"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.id.to_string(),
            self.name.clone(),
            self.duration_months.to_string(),
            self.fee.to_string(),
        ];
        if let Some(teacher_id) = self.teacher_id {
            fields.push(teacher_id.to_string());
        }
        fields
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RecordParseError> {
        if fields.len() != 4 && fields.len() != 5 {
            return Err(RecordParseError::FieldCount {
                expected: "4 or 5",
                got: fields.len(),
            });
        }
        Ok(Course {
            id: parse_field("courseId", fields[0])?,
            name: fields[1].to_string(),
            duration_months: parse_field("duration", fields[2])?,
            fee: parse_field("fees", fields[3])?,
            teacher_id: fields
                .get(4)
                .map(|field| parse_field("teacherId", field))
                .transpose()?,
        })
    }
}
