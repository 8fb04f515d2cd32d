use rust_decimal::Decimal;
use serde::Serialize;

use super::EntityId;

/// Per-student aggregate for reporting: identity, money, attendance.
/// Presentation is left entirely to consumers.
#[derive(Clone, Debug, Serialize)]
pub struct StudentReport {
    pub student_id: EntityId,
    pub name: String,
    pub email: String,
    pub course_id: EntityId,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
    /// None when the student has no attendance records yet.
    pub attendance_percent: Option<f64>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AttendanceAlert {
    pub student_id: EntityId,
    pub percent: f64,
}
