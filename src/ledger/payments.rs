use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::GurukulError;
use crate::ids::IdGenerator;
use crate::models::{EntityId, Payment, PaymentMode, PaymentStatus};
use crate::registry::{CourseCatalog, StudentRegistry};
use crate::storage::SnapshotStore;

const PAYMENTS_FILE: &str = "payments.csv";

/// Payment ledger: one open PENDING obligation per (student, course),
/// settled by SUCCESS receipts.
///
/// The catalog and registry handles are read-only lookups; the ledger
/// never mutates them.
pub struct PaymentLedger {
    store: SnapshotStore<Payment>,
    courses: Arc<CourseCatalog>,
    students: Arc<StudentRegistry>,
}

/// Result of settling a payment against an obligation.
#[derive(Clone, Debug)]
pub struct PaymentOutcome {
    /// The freshly appended SUCCESS receipt.
    pub receipt: Payment,
    /// Balance still owed after this payment. Zero when the obligation
    /// closed, including on overpayment.
    pub outstanding: Decimal,
}

impl PaymentOutcome {
    pub fn settled(&self) -> bool {
        self.outstanding.is_zero()
    }
}

/// An open unpaid balance, as reported by [`PaymentLedger::outstanding_fees`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct OutstandingFee {
    pub student_id: EntityId,
    pub course_id: EntityId,
    pub amount: Decimal,
}

impl PaymentLedger {
    pub async fn open(
        dir: &Path,
        ids: Arc<IdGenerator>,
        courses: Arc<CourseCatalog>,
        students: Arc<StudentRegistry>,
    ) -> Result<Self, GurukulError> {
        Ok(PaymentLedger {
            store: SnapshotStore::open(dir.join(PAYMENTS_FILE), ids).await?,
            courses,
            students,
        })
    }

    /// Opens a PENDING obligation for the full amount owed. At most one
    /// may be open per (student, course) at a time.
    pub async fn open_obligation(
        &self,
        student_id: EntityId,
        course_id: EntityId,
        fee: Decimal,
    ) -> Result<Payment, GurukulError> {
        if fee <= Decimal::ZERO {
            return Err(GurukulError::InvalidAmount(fee));
        }
        self.students.get(student_id).await?;
        self.courses.get(course_id).await?;

        let id = self.store.next_id();
        let obligation = self
            .store
            .transact(move |entries| {
                if entries
                    .values()
                    .any(|p| p.is_open_obligation_for(student_id, course_id))
                {
                    return Err(GurukulError::DuplicateObligation {
                        student_id,
                        course_id,
                    });
                }
                let obligation = Payment::obligation(id, student_id, course_id, fee, Utc::now());
                entries.insert(id, obligation.clone());
                Ok(obligation)
            })
            .await?;
        info!(student_id, course_id, amount = %obligation.amount, "obligation opened");
        Ok(obligation)
    }

    /// Settles an incoming payment against the open obligation for
    /// (student, course).
    ///
    /// The obligation shrinks by the paid amount, closing (amount zero,
    /// status SUCCESS) when the balance reaches zero; overpayment is
    /// accepted and not tracked. A SUCCESS receipt for the incoming
    /// amount is appended in the same transaction, so both writes land
    /// or neither does. A payment with no open obligation is rejected.
    pub async fn record_payment(
        &self,
        student_id: EntityId,
        course_id: EntityId,
        amount: Decimal,
        mode: PaymentMode,
    ) -> Result<PaymentOutcome, GurukulError> {
        if amount <= Decimal::ZERO {
            return Err(GurukulError::InvalidAmount(amount));
        }
        self.students.get(student_id).await?;
        self.courses.get(course_id).await?;

        let receipt_id = self.store.next_id();
        let outcome = self
            .store
            .transact(move |entries| {
                let obligation = entries
                    .values_mut()
                    .find(|p| p.is_open_obligation_for(student_id, course_id))
                    .ok_or(GurukulError::NoObligation {
                        student_id,
                        course_id,
                    })?;

                let now = Utc::now();
                let remaining = obligation.amount - amount;
                if remaining <= Decimal::ZERO {
                    obligation.amount = Decimal::ZERO;
                    obligation.status = PaymentStatus::Success;
                } else {
                    obligation.amount = remaining;
                }
                obligation.mode = mode;
                obligation.paid_at = now;

                let receipt =
                    Payment::receipt(receipt_id, student_id, course_id, amount, mode, now);
                entries.insert(receipt_id, receipt.clone());
                Ok(PaymentOutcome {
                    receipt,
                    outstanding: remaining.max(Decimal::ZERO),
                })
            })
            .await?;

        info!(
            student_id,
            course_id,
            amount = %amount,
            outstanding = %outcome.outstanding,
            settled = outcome.settled(),
            "payment recorded"
        );
        Ok(outcome)
    }

    /// Sum of SUCCESS amounts for the student, across all courses.
    pub async fn total_paid(&self, student_id: EntityId) -> Decimal {
        self.store
            .find(|p| p.student_id == student_id && p.status == PaymentStatus::Success)
            .await
            .iter()
            .map(|p| p.amount)
            .sum()
    }

    pub async fn total_paid_for_course(
        &self,
        student_id: EntityId,
        course_id: EntityId,
    ) -> Decimal {
        self.store
            .find(|p| {
                p.student_id == student_id
                    && p.course_id == course_id
                    && p.status == PaymentStatus::Success
            })
            .await
            .iter()
            .map(|p| p.amount)
            .sum()
    }

    /// Open unpaid balance for the pair, zero when nothing is owed.
    pub async fn outstanding_for(&self, student_id: EntityId, course_id: EntityId) -> Decimal {
        self.store
            .find(|p| p.is_open_obligation_for(student_id, course_id))
            .await
            .first()
            .map(|p| p.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Every (student, course) with an open obligation of amount > 0.
    pub async fn outstanding_fees(&self) -> Vec<OutstandingFee> {
        let open = self
            .store
            .find(|p| p.status == PaymentStatus::Pending && p.amount > Decimal::ZERO)
            .await;
        debug!(count = open.len(), "open obligations scanned");
        open.into_iter()
            .map(|p| OutstandingFee {
                student_id: p.student_id,
                course_id: p.course_id,
                amount: p.amount,
            })
            .collect()
    }

    /// Full payment history for a student, obligations included.
    pub async fn payments_by_student(&self, student_id: EntityId) -> Vec<Payment> {
        self.store.find(|p| p.student_id == student_id).await
    }

    pub async fn get(&self, id: EntityId) -> Result<Payment, GurukulError> {
        self.store.get(id).await
    }

    pub async fn delete(&self, id: EntityId) -> Result<Payment, GurukulError> {
        self.store.remove(id).await
    }

    pub async fn all(&self) -> Vec<Payment> {
        self.store.all().await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }
}
