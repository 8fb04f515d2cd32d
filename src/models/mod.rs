pub mod account;
pub mod attendance;
pub mod course;
pub mod payment;
pub mod report;
pub mod student;
pub mod teacher;

pub use account::{Account, Role};
pub use attendance::Attendance;
pub use course::Course;
pub use payment::{Payment, PaymentMode, PaymentStatus};
pub use report::{AttendanceAlert, StudentReport};
pub use student::Student;
pub use teacher::Teacher;

/// Integer identifier, unique within an entity type, assigned once at
/// creation and immutable thereafter.
pub type EntityId = u32;
