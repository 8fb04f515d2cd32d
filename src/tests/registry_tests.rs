use rust_decimal_macros::dec;

use super::open_institute;
use crate::GurukulError;
use crate::constants::{COURSE_ADDED, STUDENT_ENROLLED};

#[tokio::test]
async fn course_delete_blocked_while_students_enrolled() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let course = institute
        .add_course("Rust Systems", 6, dec!(1000.00))
        .await
        .unwrap();
    let student = institute
        .enroll_student(None, "Asha Verma", "asha@example.com", course.id)
        .await
        .unwrap();

    let err = institute.delete_course(course.id).await.unwrap_err();
    assert!(matches!(err, GurukulError::CourseInUse(id) if id == course.id));

    institute.delete_student(student.id).await.unwrap();
    institute.delete_course(course.id).await.unwrap();
    assert!(matches!(
        institute.courses().get(course.id).await.unwrap_err(),
        GurukulError::NotFound { .. }
    ));
}

#[tokio::test]
async fn teacher_delete_blocked_while_assigned() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let teacher = institute
        .add_teacher("R. Iyer", "Systems Programming", dec!(80000.00))
        .await
        .unwrap();
    let course = institute
        .add_course("Rust Systems", 6, dec!(1000.00))
        .await
        .unwrap();
    let course = institute.assign_teacher(course.id, teacher.id).await.unwrap();
    assert_eq!(course.teacher_id, Some(teacher.id));

    let err = institute.delete_teacher(teacher.id).await.unwrap_err();
    assert!(matches!(err, GurukulError::TeacherAssigned(id) if id == teacher.id));

    // unassign, then the delete goes through
    let mut unassigned = course.clone();
    unassigned.teacher_id = None;
    institute.update_course(course.id, unassigned).await.unwrap();
    institute.delete_teacher(teacher.id).await.unwrap();
}

#[tokio::test]
async fn assigning_unknown_teacher_fails() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let course = institute
        .add_course("Rust Systems", 6, dec!(1000.00))
        .await
        .unwrap();
    let err = institute.assign_teacher(course.id, 9999).await.unwrap_err();
    assert!(matches!(err, GurukulError::NotFound { kind: "teacher", .. }));
    assert_eq!(institute.courses().get(course.id).await.unwrap().teacher_id, None);
}

#[tokio::test]
async fn field_validation_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    assert!(matches!(
        institute.add_course("  ", 6, dec!(100.00)).await.unwrap_err(),
        GurukulError::InvalidField { field: "courseName", .. }
    ));
    assert!(matches!(
        institute.add_course("Rust, Advanced", 6, dec!(100.00)).await.unwrap_err(),
        GurukulError::InvalidField { field: "courseName", .. }
    ));
    assert!(matches!(
        institute.add_course("Rust Systems", 0, dec!(100.00)).await.unwrap_err(),
        GurukulError::InvalidField { field: "duration", .. }
    ));
    assert!(matches!(
        institute.add_course("Rust Systems", 6, dec!(-1.00)).await.unwrap_err(),
        GurukulError::InvalidField { field: "fees", .. }
    ));
    assert!(matches!(
        institute
            .add_teacher("R. Iyer", "Systems", dec!(0.00))
            .await
            .unwrap_err(),
        GurukulError::InvalidField { field: "salary", .. }
    ));

    let course = institute
        .add_course("Rust Systems", 6, dec!(100.00))
        .await
        .unwrap();
    assert!(matches!(
        institute
            .enroll_student(None, "Asha Verma", "not-an-email", course.id)
            .await
            .unwrap_err(),
        GurukulError::InvalidEmail(_)
    ));
    assert!(matches!(
        institute
            .enroll_student(None, "Asha Verma", "a@b.c,d", course.id)
            .await
            .unwrap_err(),
        GurukulError::InvalidEmail(_)
    ));
}

#[tokio::test]
async fn enrolling_into_unknown_course_fails() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let err = institute
        .enroll_student(None, "Asha Verma", "asha@example.com", 9999)
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::NotFound { kind: "course", .. }));
}

#[tokio::test]
async fn account_id_is_unique_across_students() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let course = institute
        .add_course("Rust Systems", 6, dec!(100.00))
        .await
        .unwrap();
    let account = institute
        .register_account("asha", "hunter2", crate::models::Role::User)
        .await
        .unwrap();

    let student = institute
        .enroll_student(Some(account.id), "Asha Verma", "asha@example.com", course.id)
        .await
        .unwrap();
    let err = institute
        .enroll_student(Some(account.id), "Impostor", "other@example.com", course.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GurukulError::AccountAlreadyLinked { account_id } if account_id == account.id
    ));

    let linked = institute.students().by_account(account.id).await.unwrap();
    assert_eq!(linked.id, student.id);
}

#[tokio::test]
async fn update_student_keeps_account_uniqueness() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let course = institute
        .add_course("Rust Systems", 6, dec!(100.00))
        .await
        .unwrap();
    let account = institute
        .register_account("asha", "hunter2", crate::models::Role::User)
        .await
        .unwrap();
    institute
        .enroll_student(Some(account.id), "Asha Verma", "asha@example.com", course.id)
        .await
        .unwrap();
    let other = institute
        .enroll_student(None, "Ravi Kumar", "ravi@example.com", course.id)
        .await
        .unwrap();

    let mut stolen = other.clone();
    stolen.account_id = Some(account.id);
    let err = institute.update_student(other.id, stolen).await.unwrap_err();
    assert!(matches!(err, GurukulError::AccountAlreadyLinked { .. }));
}

#[tokio::test]
async fn mutations_are_audited() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let course = institute
        .add_course("Rust Systems", 6, dec!(100.00))
        .await
        .unwrap();
    institute
        .enroll_student(None, "Asha Verma", "asha@example.com", course.id)
        .await
        .unwrap();

    let entries = institute.audit().entries().await;
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&COURSE_ADDED));
    assert!(actions.contains(&STUDENT_ENROLLED));
}

#[tokio::test]
async fn registries_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (course_id, teacher_id, student_id) = {
        let institute = open_institute(dir.path()).await;
        let teacher = institute
            .add_teacher("R. Iyer", "Systems Programming", dec!(80000.00))
            .await
            .unwrap();
        let course = institute
            .add_course("Rust Systems", 6, dec!(1000.00))
            .await
            .unwrap();
        institute.assign_teacher(course.id, teacher.id).await.unwrap();
        let student = institute
            .enroll_student(None, "Asha Verma", "asha@example.com", course.id)
            .await
            .unwrap();
        (course.id, teacher.id, student.id)
    };

    let institute = open_institute(dir.path()).await;
    let course = institute.courses().get(course_id).await.unwrap();
    assert_eq!(course.name, "Rust Systems");
    assert_eq!(course.teacher_id, Some(teacher_id));
    assert_eq!(course.fee, dec!(1000.00));

    let student = institute.students().get(student_id).await.unwrap();
    assert_eq!(student.email, "asha@example.com");
    assert_eq!(student.course_id, course_id);

    // referential guard still holds against reloaded state
    assert!(matches!(
        institute.delete_course(course_id).await.unwrap_err(),
        GurukulError::CourseInUse(_)
    ));
}

#[tokio::test]
async fn student_report_aggregates_ledgers() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let course = institute
        .add_course("Rust Systems", 6, dec!(1000.00))
        .await
        .unwrap();
    let student = institute
        .enroll_student(None, "Asha Verma", "asha@example.com", course.id)
        .await
        .unwrap();
    institute
        .record_payment(student.id, course.id, dec!(400.00), crate::models::PaymentMode::Cash)
        .await
        .unwrap();
    institute
        .mark_attendance(student.id, chrono::NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(), true)
        .await
        .unwrap();

    let report = institute.student_report(student.id).await.unwrap();
    assert_eq!(report.total_paid, dec!(400.00));
    assert_eq!(report.outstanding, dec!(600.00));
    assert_eq!(report.attendance_percent, Some(100.0));

    let course_report = institute.course_report(course.id).await.unwrap();
    assert_eq!(course_report.len(), 1);
    assert_eq!(course_report[0].student_id, student.id);
}
