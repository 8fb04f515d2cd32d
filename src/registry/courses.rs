use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use super::validate_name;
use crate::error::GurukulError;
use crate::ids::IdGenerator;
use crate::models::{Course, EntityId};
use crate::storage::SnapshotStore;

const COURSES_FILE: &str = "courses.csv";

/// Course catalog over a snapshot store. Referential rules (no delete
/// while students are enrolled) live with the caller, not here.
pub struct CourseCatalog {
    store: SnapshotStore<Course>,
}

impl CourseCatalog {
    pub async fn open(dir: &Path, ids: Arc<IdGenerator>) -> Result<Self, GurukulError> {
        Ok(CourseCatalog {
            store: SnapshotStore::open(dir.join(COURSES_FILE), ids).await?,
        })
    }

    pub async fn add(
        &self,
        name: &str,
        duration_months: u32,
        fee: Decimal,
    ) -> Result<Course, GurukulError> {
        validate_course_fields(name, duration_months, fee)?;
        let course = Course {
            id: self.store.next_id(),
            name: name.trim().to_string(),
            duration_months,
            fee,
            teacher_id: None,
        };
        let added = self.store.add(course).await?;
        info!(course_id = added.id, name = %added.name, "course added");
        Ok(added)
    }

    /// Full replacement of the course at `id`.
    pub async fn update(&self, id: EntityId, course: Course) -> Result<Course, GurukulError> {
        validate_course_fields(&course.name, course.duration_months, course.fee)?;
        self.store.update(id, course).await
    }

    pub async fn get(&self, id: EntityId) -> Result<Course, GurukulError> {
        self.store.get(id).await
    }

    pub async fn contains(&self, id: EntityId) -> bool {
        self.store.contains(id).await
    }

    pub async fn remove(&self, id: EntityId) -> Result<Course, GurukulError> {
        self.store.remove(id).await
    }

    pub async fn all(&self) -> Vec<Course> {
        self.store.all().await
    }

    pub async fn by_teacher(&self, teacher_id: EntityId) -> Vec<Course> {
        self.store
            .find(|course| course.teacher_id == Some(teacher_id))
            .await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }
}

fn validate_course_fields(
    name: &str,
    duration_months: u32,
    fee: Decimal,
) -> Result<(), GurukulError> {
    validate_name("courseName", name)?;
    if duration_months == 0 {
        return Err(GurukulError::InvalidField {
            field: "duration",
            reason: "must be at least one month".to_string(),
        });
    }
    if fee < Decimal::ZERO {
        return Err(GurukulError::InvalidField {
            field: "fees",
            reason: format!("cannot be negative, got {}", fee),
        });
    }
    Ok(())
}
