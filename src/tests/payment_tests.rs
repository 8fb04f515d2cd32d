use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::open_institute;
use crate::GurukulError;
use crate::audit::InMemoryAuditSink;
use crate::models::{EntityId, PaymentMode, PaymentStatus};
use crate::service::Institute;

async fn enroll(
    institute: &Institute<InMemoryAuditSink>,
    fee: Decimal,
) -> (EntityId, EntityId) {
    let course = institute.add_course("Rust Systems", 6, fee).await.unwrap();
    let student = institute
        .enroll_student(None, "Asha Verma", "asha@example.com", course.id)
        .await
        .unwrap();
    (student.id, course.id)
}

#[tokio::test]
async fn enrollment_seeds_obligation_for_full_fee() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(1000.00)).await;

    assert_eq!(
        institute.payments().outstanding_for(student_id, course_id).await,
        dec!(1000.00)
    );
    let open = institute.outstanding_fees_report().await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].student_id, student_id);
    assert_eq!(open[0].amount, dec!(1000.00));
}

#[tokio::test]
async fn partial_then_final_payment_settles_obligation() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(1000.00)).await;

    let first = institute
        .record_payment(student_id, course_id, dec!(400.00), PaymentMode::Cash)
        .await
        .unwrap();
    assert_eq!(first.outstanding, dec!(600.00));
    assert!(!first.settled());
    assert_eq!(first.receipt.amount, dec!(400.00));
    assert_eq!(first.receipt.status, PaymentStatus::Success);
    assert_eq!(
        institute.payments().outstanding_for(student_id, course_id).await,
        dec!(600.00)
    );

    let second = institute
        .record_payment(student_id, course_id, dec!(600.00), PaymentMode::Upi)
        .await
        .unwrap();
    assert!(second.settled());
    assert_eq!(institute.payments().total_paid(student_id).await, dec!(1000.00));

    // obligation closed: amount zero, status SUCCESS, nothing outstanding
    assert!(institute.outstanding_fees_report().await.is_empty());
    let history = institute.payments().payments_by_student(student_id).await;
    assert_eq!(history.len(), 3);
    let receipts = history
        .iter()
        .filter(|p| p.status == PaymentStatus::Success && p.amount > Decimal::ZERO)
        .count();
    assert_eq!(receipts, 2);
    assert!(history.iter().all(|p| p.status == PaymentStatus::Success));
}

#[tokio::test]
async fn overpayment_is_accepted_and_untracked() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(1000.00)).await;

    institute
        .record_payment(student_id, course_id, dec!(700.00), PaymentMode::Card)
        .await
        .unwrap();
    let second = institute
        .record_payment(student_id, course_id, dec!(500.00), PaymentMode::Card)
        .await
        .unwrap();

    // 300 was owed; the 200 overpayment closes the obligation at zero
    assert!(second.settled());
    assert_eq!(second.outstanding, Decimal::ZERO);
    assert_eq!(institute.payments().total_paid(student_id).await, dec!(1200.00));
    assert!(institute.outstanding_fees_report().await.is_empty());
}

#[tokio::test]
async fn payment_without_open_obligation_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(500.00)).await;

    institute
        .record_payment(student_id, course_id, dec!(500.00), PaymentMode::Cash)
        .await
        .unwrap();
    let err = institute
        .record_payment(student_id, course_id, dec!(50.00), PaymentMode::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::NoObligation { .. }));
}

#[tokio::test]
async fn second_open_obligation_for_same_pair_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(1000.00)).await;

    let err = institute
        .payments()
        .open_obligation(student_id, course_id, dec!(1000.00))
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::DuplicateObligation { .. }));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(1000.00)).await;

    let err = institute
        .record_payment(student_id, course_id, Decimal::ZERO, PaymentMode::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::InvalidAmount(_)));

    let err = institute
        .payments()
        .open_obligation(student_id, course_id, dec!(-5.00))
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::InvalidAmount(_)));
}

#[tokio::test]
async fn unknown_student_or_course_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(1000.00)).await;

    let err = institute
        .record_payment(9999, course_id, dec!(100.00), PaymentMode::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::NotFound { kind: "student", .. }));

    let err = institute
        .record_payment(student_id, 9999, dec!(100.00), PaymentMode::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::NotFound { kind: "course", .. }));
}

#[tokio::test]
async fn delete_payment() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;
    let (student_id, course_id) = enroll(&institute, dec!(1000.00)).await;

    let outcome = institute
        .record_payment(student_id, course_id, dec!(100.00), PaymentMode::Cash)
        .await
        .unwrap();
    institute.delete_payment(outcome.receipt.id).await.unwrap();
    assert!(matches!(
        institute.payments().get(outcome.receipt.id).await.unwrap_err(),
        GurukulError::NotFound { .. }
    ));
    assert!(matches!(
        institute.delete_payment(9999).await.unwrap_err(),
        GurukulError::NotFound { .. }
    ));
}

#[tokio::test]
async fn ledger_state_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (student_id, course_id) = {
        let institute = open_institute(dir.path()).await;
        let pair = enroll(&institute, dec!(1000.00)).await;
        institute
            .record_payment(pair.0, pair.1, dec!(400.00), PaymentMode::Cash)
            .await
            .unwrap();
        pair
    };

    let institute = open_institute(dir.path()).await;
    assert_eq!(
        institute.payments().outstanding_for(student_id, course_id).await,
        dec!(600.00)
    );
    assert_eq!(institute.payments().total_paid(student_id).await, dec!(400.00));

    // settling after a restart works against the reloaded obligation
    let outcome = institute
        .record_payment(student_id, course_id, dec!(600.00), PaymentMode::Upi)
        .await
        .unwrap();
    assert!(outcome.settled());
    assert_eq!(institute.payments().total_paid(student_id).await, dec!(1000.00));

    // the fresh receipt id cannot collide with persisted ones
    let history = institute.payments().payments_by_student(student_id).await;
    let mut ids: Vec<_> = history.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), history.len());
}

#[tokio::test]
async fn total_paid_is_scoped_per_course_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let first = institute.add_course("Rust Systems", 6, dec!(500.00)).await.unwrap();
    let second = institute.add_course("Async Rust", 3, dec!(300.00)).await.unwrap();
    let student = institute
        .enroll_student(None, "Asha Verma", "asha@example.com", first.id)
        .await
        .unwrap();
    // second course obligation opened by hand; the student stays enrolled
    // in the first
    institute
        .payments()
        .open_obligation(student.id, second.id, second.fee)
        .await
        .unwrap();

    institute
        .record_payment(student.id, first.id, dec!(200.00), PaymentMode::Cash)
        .await
        .unwrap();
    institute
        .record_payment(student.id, second.id, dec!(300.00), PaymentMode::Upi)
        .await
        .unwrap();

    assert_eq!(
        institute
            .payments()
            .total_paid_for_course(student.id, first.id)
            .await,
        dec!(200.00)
    );
    assert_eq!(institute.payments().total_paid(student.id).await, dec!(500.00));
    let open = institute.outstanding_fees_report().await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].course_id, first.id);
    assert_eq!(open[0].amount, dec!(300.00));
}

#[tokio::test]
async fn zero_fee_enrollment_owes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let course = institute.add_course("Free Seminar", 1, Decimal::ZERO).await.unwrap();
    let student = institute
        .enroll_student(None, "Asha Verma", "asha@example.com", course.id)
        .await
        .unwrap();

    assert!(institute.outstanding_fees_report().await.is_empty());
    let err = institute
        .record_payment(student.id, course.id, dec!(10.00), PaymentMode::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::NoObligation { .. }));
}
