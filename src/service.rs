use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditSink};
use crate::constants::{
    ACCOUNT_REGISTERED, ATTENDANCE_MARKED, COURSE_ADDED, COURSE_DELETED, COURSE_UPDATED,
    PAYMENT_DELETED, PAYMENT_RECORDED, STUDENT_DELETED, STUDENT_ENROLLED, STUDENT_UPDATED,
    TEACHER_ADDED, TEACHER_ASSIGNED, TEACHER_DELETED, TEACHER_UPDATED,
};
use crate::error::GurukulError;
use crate::ids::IdGenerator;
use crate::ledger::{AttendanceLedger, OutstandingFee, PaymentLedger, PaymentOutcome};
use crate::models::{
    Account, Attendance, AttendanceAlert, Course, EntityId, Payment, PaymentMode, Role, Student,
    StudentReport, Teacher,
};
use crate::registry::{AccountRegistry, CourseCatalog, StudentRegistry, TeacherRegistry};

/// The institute backend: every store wired together, plus the
/// cross-entity rules the stores themselves must not enforce
/// (enrollment seeding, referential delete guards, teacher assignment).
///
/// Generic over the audit seam so tests can capture entries in memory.
pub struct Institute<A: AuditSink> {
    courses: Arc<CourseCatalog>,
    teachers: Arc<TeacherRegistry>,
    students: Arc<StudentRegistry>,
    payments: PaymentLedger,
    attendance: AttendanceLedger,
    accounts: AccountRegistry,
    audit: A,
}

impl<A: AuditSink> Institute<A> {
    /// Loads every snapshot under `data_dir`. All stores share one id
    /// generator; each seeds it with the largest id it loaded, so a
    /// restart never reissues a persisted id.
    pub async fn open(
        data_dir: impl AsRef<Path>,
        bcrypt_cost: u32,
        audit: A,
    ) -> Result<Self, GurukulError> {
        let dir = data_dir.as_ref();
        let ids = Arc::new(IdGenerator::new());

        let courses = Arc::new(CourseCatalog::open(dir, ids.clone()).await?);
        let teachers = Arc::new(TeacherRegistry::open(dir, ids.clone()).await?);
        let students = Arc::new(StudentRegistry::open(dir, ids.clone()).await?);
        let payments =
            PaymentLedger::open(dir, ids.clone(), courses.clone(), students.clone()).await?;
        let attendance = AttendanceLedger::open(dir, students.clone()).await?;
        let accounts = AccountRegistry::open(dir, ids.clone(), bcrypt_cost).await?;

        info!(data_dir = %dir.display(), "institute opened");
        Ok(Institute {
            courses,
            teachers,
            students,
            payments,
            attendance,
            accounts,
            audit,
        })
    }

    pub fn courses(&self) -> &CourseCatalog {
        &self.courses
    }

    pub fn teachers(&self) -> &TeacherRegistry {
        &self.teachers
    }

    pub fn students(&self) -> &StudentRegistry {
        &self.students
    }

    pub fn payments(&self) -> &PaymentLedger {
        &self.payments
    }

    pub fn attendance(&self) -> &AttendanceLedger {
        &self.attendance
    }

    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    // COURSES

    pub async fn add_course(
        &self,
        name: &str,
        duration_months: u32,
        fee: Decimal,
    ) -> Result<Course, GurukulError> {
        let course = self.courses.add(name, duration_months, fee).await?;
        self.audit
            .record(AuditEntry::new(
                COURSE_ADDED,
                json!({ "course_id": course.id, "name": course.name, "fee": course.fee }),
            ))
            .await?;
        Ok(course)
    }

    pub async fn update_course(
        &self,
        id: EntityId,
        course: Course,
    ) -> Result<Course, GurukulError> {
        let updated = self.courses.update(id, course).await?;
        self.audit
            .record(AuditEntry::new(
                COURSE_UPDATED,
                json!({ "course_id": updated.id }),
            ))
            .await?;
        Ok(updated)
    }

    /// Deleting a course is blocked while any student references it.
    pub async fn delete_course(&self, id: EntityId) -> Result<Course, GurukulError> {
        if !self.students.by_course(id).await.is_empty() {
            return Err(GurukulError::CourseInUse(id));
        }
        let removed = self.courses.remove(id).await?;
        self.audit
            .record(AuditEntry::new(
                COURSE_DELETED,
                json!({ "course_id": removed.id }),
            ))
            .await?;
        Ok(removed)
    }

    pub async fn assign_teacher(
        &self,
        course_id: EntityId,
        teacher_id: EntityId,
    ) -> Result<Course, GurukulError> {
        self.teachers.get(teacher_id).await?;
        let mut course = self.courses.get(course_id).await?;
        course.teacher_id = Some(teacher_id);
        let updated = self.courses.update(course_id, course).await?;
        self.audit
            .record(AuditEntry::new(
                TEACHER_ASSIGNED,
                json!({ "course_id": course_id, "teacher_id": teacher_id }),
            ))
            .await?;
        Ok(updated)
    }

    // TEACHERS

    pub async fn add_teacher(
        &self,
        name: &str,
        subject: &str,
        salary: Decimal,
    ) -> Result<Teacher, GurukulError> {
        let teacher = self.teachers.add(name, subject, salary).await?;
        self.audit
            .record(AuditEntry::new(
                TEACHER_ADDED,
                json!({ "teacher_id": teacher.id, "name": teacher.name }),
            ))
            .await?;
        Ok(teacher)
    }

    pub async fn update_teacher(
        &self,
        id: EntityId,
        teacher: Teacher,
    ) -> Result<Teacher, GurukulError> {
        let updated = self.teachers.update(id, teacher).await?;
        self.audit
            .record(AuditEntry::new(
                TEACHER_UPDATED,
                json!({ "teacher_id": updated.id }),
            ))
            .await?;
        Ok(updated)
    }

    /// Deleting a teacher is blocked while any course is assigned to them.
    pub async fn delete_teacher(&self, id: EntityId) -> Result<Teacher, GurukulError> {
        if !self.courses.by_teacher(id).await.is_empty() {
            return Err(GurukulError::TeacherAssigned(id));
        }
        let removed = self.teachers.remove(id).await?;
        self.audit
            .record(AuditEntry::new(
                TEACHER_DELETED,
                json!({ "teacher_id": removed.id }),
            ))
            .await?;
        Ok(removed)
    }

    // STUDENTS

    /// Adds a student to an existing course and seeds the fee obligation
    /// for it. Zero-fee courses owe nothing, so no obligation is opened.
    pub async fn enroll_student(
        &self,
        account_id: Option<EntityId>,
        name: &str,
        email: &str,
        course_id: EntityId,
    ) -> Result<Student, GurukulError> {
        let course = self.courses.get(course_id).await?;
        let student = self.students.add(account_id, name, email, course_id).await?;

        if course.fee > Decimal::ZERO {
            if let Err(err) = self
                .payments
                .open_obligation(student.id, course_id, course.fee)
                .await
            {
                // the enrollment is only half done; take the student back out
                if let Err(rollback_err) = self.students.remove(student.id).await {
                    warn!(
                        student_id = student.id,
                        %rollback_err,
                        "enrollment rollback failed"
                    );
                }
                return Err(err);
            }
        }

        self.audit
            .record(AuditEntry::new(
                STUDENT_ENROLLED,
                json!({ "student_id": student.id, "course_id": course_id, "fee": course.fee }),
            ))
            .await?;
        Ok(student)
    }

    pub async fn update_student(
        &self,
        id: EntityId,
        student: Student,
    ) -> Result<Student, GurukulError> {
        let updated = self.students.update(id, student).await?;
        self.audit
            .record(AuditEntry::new(
                STUDENT_UPDATED,
                json!({ "student_id": updated.id }),
            ))
            .await?;
        Ok(updated)
    }

    pub async fn delete_student(&self, id: EntityId) -> Result<Student, GurukulError> {
        let removed = self.students.remove(id).await?;
        self.audit
            .record(AuditEntry::new(
                STUDENT_DELETED,
                json!({ "student_id": removed.id }),
            ))
            .await?;
        Ok(removed)
    }

    // PAYMENTS

    pub async fn record_payment(
        &self,
        student_id: EntityId,
        course_id: EntityId,
        amount: Decimal,
        mode: PaymentMode,
    ) -> Result<PaymentOutcome, GurukulError> {
        let outcome = self
            .payments
            .record_payment(student_id, course_id, amount, mode)
            .await?;
        self.audit
            .record(AuditEntry::new(
                PAYMENT_RECORDED,
                json!({
                    "payment_id": outcome.receipt.id,
                    "student_id": student_id,
                    "course_id": course_id,
                    "amount": amount,
                    "outstanding": outcome.outstanding,
                }),
            ))
            .await?;
        Ok(outcome)
    }

    pub async fn delete_payment(&self, id: EntityId) -> Result<Payment, GurukulError> {
        let removed = self.payments.delete(id).await?;
        self.audit
            .record(AuditEntry::new(
                PAYMENT_DELETED,
                json!({ "payment_id": removed.id }),
            ))
            .await?;
        Ok(removed)
    }

    // ATTENDANCE

    pub async fn mark_attendance(
        &self,
        student_id: EntityId,
        date: NaiveDate,
        present: bool,
    ) -> Result<Attendance, GurukulError> {
        let record = self.attendance.mark(student_id, date, present).await?;
        self.audit
            .record(AuditEntry::new(
                ATTENDANCE_MARKED,
                json!({ "student_id": student_id, "date": date, "present": present }),
            ))
            .await?;
        Ok(record)
    }

    // ACCOUNTS

    pub async fn register_account(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, GurukulError> {
        let account = self.accounts.register(username, password, role).await?;
        self.audit
            .record(AuditEntry::new(
                ACCOUNT_REGISTERED,
                json!({ "account_id": account.id, "username": account.username }),
            ))
            .await?;
        Ok(account)
    }

    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, GurukulError> {
        self.accounts.authenticate(username, password).await
    }

    // REPORTS — read-only aggregation over consistent snapshots; never
    // mutates a store, safe to run from worker tasks.

    pub async fn student_report(&self, student_id: EntityId) -> Result<StudentReport, GurukulError> {
        let student = self.students.get(student_id).await?;
        let total_paid = self
            .payments
            .total_paid_for_course(student_id, student.course_id)
            .await;
        let outstanding = self
            .payments
            .outstanding_for(student_id, student.course_id)
            .await;
        let attendance_percent = match self.attendance.percentage(student_id).await {
            Ok(percent) => Some(percent),
            Err(GurukulError::NoAttendanceRecords(_)) => None,
            Err(err) => return Err(err),
        };
        Ok(StudentReport {
            student_id: student.id,
            name: student.name,
            email: student.email,
            course_id: student.course_id,
            total_paid,
            outstanding,
            attendance_percent,
        })
    }

    pub async fn course_report(
        &self,
        course_id: EntityId,
    ) -> Result<Vec<StudentReport>, GurukulError> {
        self.courses.get(course_id).await?;
        let students = self.students.by_course(course_id).await;
        try_join_all(
            students
                .iter()
                .map(|student| self.student_report(student.id)),
        )
        .await
    }

    pub async fn outstanding_fees_report(&self) -> Vec<OutstandingFee> {
        self.payments.outstanding_fees().await
    }

    pub async fn low_attendance_report(&self, threshold: f64) -> Vec<AttendanceAlert> {
        let ids = self.attendance.below_threshold(threshold).await;
        let mut alerts = Vec::with_capacity(ids.len());
        for student_id in ids {
            if let Ok(percent) = self.attendance.percentage(student_id).await {
                alerts.push(AttendanceAlert {
                    student_id,
                    percent,
                });
            }
        }
        alerts
    }
}
