pub mod audit;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod models;
pub mod registry;
pub mod service;
pub mod storage;

pub use error::GurukulError;
pub use ids::IdGenerator;
pub use ledger::{AttendanceLedger, PaymentLedger};
pub use registry::{AccountRegistry, CourseCatalog, StudentRegistry, TeacherRegistry};
pub use service::Institute;
pub use storage::{SnapshotRecord, SnapshotStore};

#[cfg(test)]
mod tests;
