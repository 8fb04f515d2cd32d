pub mod attendance;
pub mod payments;

pub use attendance::AttendanceLedger;
pub use payments::{OutstandingFee, PaymentLedger, PaymentOutcome};
