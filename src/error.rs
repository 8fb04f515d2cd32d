use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::EntityId;

#[derive(Error, Debug)]
pub enum GurukulError {
    /// Entity lookup by id failed.
    #[error("{kind} not found with id {id}")]
    NotFound { kind: &'static str, id: EntityId },

    /// Insert collided with an existing id.
    #[error("{kind} already exists with id {id}")]
    Duplicate { kind: &'static str, id: EntityId },

    /// Full-replacement update carried a different id than the target slot.
    #[error("{kind} id mismatch: update targets {expected} but value carries {actual}")]
    IdMismatch {
        kind: &'static str,
        expected: EntityId,
        actual: EntityId,
    },

    /// Malformed or out-of-range field value.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Payment and obligation amounts must be strictly positive.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// No open PENDING record to settle against.
    #[error("student {student_id} has no open obligation for course {course_id}")]
    NoObligation {
        student_id: EntityId,
        course_id: EntityId,
    },

    /// At most one open PENDING record per (student, course).
    #[error("student {student_id} already has an open obligation for course {course_id}")]
    DuplicateObligation {
        student_id: EntityId,
        course_id: EntityId,
    },

    /// Account id already linked to a different student.
    #[error("account {account_id} is already linked to another student")]
    AccountAlreadyLinked { account_id: EntityId },

    #[error("attendance already marked for student {student_id} on {date}")]
    AttendanceAlreadyMarked {
        student_id: EntityId,
        date: NaiveDate,
    },

    #[error("no attendance records for student {0}")]
    NoAttendanceRecords(EntityId),

    #[error("cannot delete course {0}: students are still enrolled")]
    CourseInUse(EntityId),

    #[error("cannot delete teacher {0}: still assigned to a course")]
    TeacherAssigned(EntityId),

    #[error("username {0} is already taken")]
    UsernameTaken(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Snapshot file could not be read or rewritten; the in-memory state
    /// has been rolled back to the last durable snapshot.
    #[error("snapshot io error for {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("audit sink error: {0}")]
    Audit(String),
}
