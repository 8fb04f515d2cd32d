use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::storage::{RecordParseError, SnapshotRecord, parse_field};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    Cash,
    Upi,
    Card,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Upi => "UPI",
            PaymentMode::Card => "CARD",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(PaymentMode::Cash),
            "UPI" => Ok(PaymentMode::Upi),
            "CARD" => Ok(PaymentMode::Card),
            other => Err(format!("unknown payment mode: {}", other)),
        }
    }
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Outstanding balance still owed for a course.
    Pending,
    /// Money actually received (or a fully settled obligation).
    Success,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "SUCCESS" => Ok(PaymentStatus::Success),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

/// One row of the payment ledger. Obligation rows (status PENDING) and
/// receipt rows (status SUCCESS) share this schema; on an obligation the
/// mode and timestamp track the last settlement applied to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: EntityId,
    pub student_id: EntityId,
    pub course_id: EntityId,
    pub amount: Decimal,
    pub mode: PaymentMode,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// New open obligation carrying the full amount owed.
    pub fn obligation(
        id: EntityId,
        student_id: EntityId,
        course_id: EntityId,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Self {
        Payment {
            id,
            student_id,
            course_id,
            amount,
            mode: PaymentMode::default(),
            status: PaymentStatus::Pending,
            paid_at: at,
        }
    }

    /// Audit record of money actually received.
    pub fn receipt(
        id: EntityId,
        student_id: EntityId,
        course_id: EntityId,
        amount: Decimal,
        mode: PaymentMode,
        at: DateTime<Utc>,
    ) -> Self {
        Payment {
            id,
            student_id,
            course_id,
            amount,
            mode,
            status: PaymentStatus::Success,
            paid_at: at,
        }
    }

    pub fn is_open_obligation_for(&self, student_id: EntityId, course_id: EntityId) -> bool {
        self.status == PaymentStatus::Pending
            && self.student_id == student_id
            && self.course_id == course_id
    }
}

impl SnapshotRecord for Payment {
    const KIND: &'static str = "payment";
    const HEADER: &'static [&'static str] = &[
        "paymentId",
        "studentId",
        "courseId",
        "amount",
        "mode",
        "status",
        "timestamp",
    ];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student_id.to_string(),
            self.course_id.to_string(),
            self.amount.to_string(),
            self.mode.to_string(),
            self.status.to_string(),
            self.paid_at.to_rfc3339(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RecordParseError> {
        if fields.len() != 7 {
            return Err(RecordParseError::FieldCount {
                expected: "7",
                got: fields.len(),
            });
        }
        Ok(Payment {
            id: parse_field("paymentId", fields[0])?,
            student_id: parse_field("studentId", fields[1])?,
            course_id: parse_field("courseId", fields[2])?,
            amount: parse_field("amount", fields[3])?,
            mode: parse_field("mode", fields[4])?,
            status: parse_field("status", fields[5])?,
            paid_at: parse_field("timestamp", fields[6])?,
        })
    }
}
