use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use super::validate_name;
use crate::error::GurukulError;
use crate::ids::IdGenerator;
use crate::models::{EntityId, Teacher};
use crate::storage::SnapshotStore;

const TEACHERS_FILE: &str = "teachers.csv";

pub struct TeacherRegistry {
    store: SnapshotStore<Teacher>,
}

impl TeacherRegistry {
    pub async fn open(dir: &Path, ids: Arc<IdGenerator>) -> Result<Self, GurukulError> {
        Ok(TeacherRegistry {
            store: SnapshotStore::open(dir.join(TEACHERS_FILE), ids).await?,
        })
    }

    pub async fn add(
        &self,
        name: &str,
        subject: &str,
        salary: Decimal,
    ) -> Result<Teacher, GurukulError> {
        validate_teacher_fields(name, subject, salary)?;
        let teacher = Teacher {
            id: self.store.next_id(),
            name: name.trim().to_string(),
            subject: subject.trim().to_string(),
            salary,
        };
        let added = self.store.add(teacher).await?;
        info!(teacher_id = added.id, name = %added.name, "teacher added");
        Ok(added)
    }

    pub async fn update(&self, id: EntityId, teacher: Teacher) -> Result<Teacher, GurukulError> {
        validate_teacher_fields(&teacher.name, &teacher.subject, teacher.salary)?;
        self.store.update(id, teacher).await
    }

    pub async fn get(&self, id: EntityId) -> Result<Teacher, GurukulError> {
        self.store.get(id).await
    }

    pub async fn remove(&self, id: EntityId) -> Result<Teacher, GurukulError> {
        self.store.remove(id).await
    }

    pub async fn all(&self) -> Vec<Teacher> {
        self.store.all().await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }
}

fn validate_teacher_fields(name: &str, subject: &str, salary: Decimal) -> Result<(), GurukulError> {
    validate_name("name", name)?;
    validate_name("subject", subject)?;
    if salary <= Decimal::ZERO {
        return Err(GurukulError::InvalidField {
            field: "salary",
            reason: format!("must be positive, got {}", salary),
        });
    }
    Ok(())
}
