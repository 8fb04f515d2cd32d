use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::{validate_email, validate_name};
use crate::error::GurukulError;
use crate::ids::IdGenerator;
use crate::models::{EntityId, Student};
use crate::storage::SnapshotStore;

const STUDENTS_FILE: &str = "students.csv";

/// Student registry. Course existence is enforced by the enrolling
/// caller; this store only guards its own fields and the uniqueness of
/// linked account ids.
pub struct StudentRegistry {
    store: SnapshotStore<Student>,
}

impl StudentRegistry {
    pub async fn open(dir: &Path, ids: Arc<IdGenerator>) -> Result<Self, GurukulError> {
        Ok(StudentRegistry {
            store: SnapshotStore::open(dir.join(STUDENTS_FILE), ids).await?,
        })
    }

    pub async fn add(
        &self,
        account_id: Option<EntityId>,
        name: &str,
        email: &str,
        course_id: EntityId,
    ) -> Result<Student, GurukulError> {
        validate_name("name", name)?;
        validate_email(email)?;

        let student = Student {
            id: self.store.next_id(),
            account_id,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            course_id,
        };
        let added = self
            .store
            .transact(move |entries| {
                if let Some(account_id) = account_id {
                    if entries.values().any(|s| s.account_id == Some(account_id)) {
                        return Err(GurukulError::AccountAlreadyLinked { account_id });
                    }
                }
                entries.insert(student.id, student.clone());
                Ok(student)
            })
            .await?;
        info!(student_id = added.id, name = %added.name, "student added");
        Ok(added)
    }

    pub async fn update(&self, id: EntityId, student: Student) -> Result<Student, GurukulError> {
        validate_name("name", &student.name)?;
        validate_email(&student.email)?;

        self.store
            .transact(move |entries| {
                if student.id != id {
                    return Err(GurukulError::IdMismatch {
                        kind: "student",
                        expected: id,
                        actual: student.id,
                    });
                }
                if !entries.contains_key(&id) {
                    return Err(GurukulError::NotFound { kind: "student", id });
                }
                if let Some(account_id) = student.account_id {
                    if entries
                        .values()
                        .any(|s| s.id != id && s.account_id == Some(account_id))
                    {
                        return Err(GurukulError::AccountAlreadyLinked { account_id });
                    }
                }
                entries.insert(id, student.clone());
                Ok(student)
            })
            .await
    }

    pub async fn get(&self, id: EntityId) -> Result<Student, GurukulError> {
        self.store.get(id).await
    }

    pub async fn remove(&self, id: EntityId) -> Result<Student, GurukulError> {
        self.store.remove(id).await
    }

    pub async fn all(&self) -> Vec<Student> {
        self.store.all().await
    }

    pub async fn by_course(&self, course_id: EntityId) -> Vec<Student> {
        self.store
            .find(|student| student.course_id == course_id)
            .await
    }

    pub async fn by_account(&self, account_id: EntityId) -> Option<Student> {
        self.store
            .find(|student| student.account_id == Some(account_id))
            .await
            .into_iter()
            .next()
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }
}
