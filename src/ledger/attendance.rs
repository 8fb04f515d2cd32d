use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::GurukulError;
use crate::models::{Attendance, EntityId};
use crate::registry::StudentRegistry;
use crate::storage::snapshot::{read_rows, write_rows};

const ATTENDANCE_FILE: &str = "attendance.csv";

/// Per-student attendance lists with the same load/rewrite discipline as
/// the keyed stores. Records are append-only through `mark` and never
/// deleted in normal operation.
pub struct AttendanceLedger {
    path: PathBuf,
    students: Arc<StudentRegistry>,
    entries: RwLock<BTreeMap<EntityId, Vec<Attendance>>>,
}

impl AttendanceLedger {
    pub async fn open(dir: &Path, students: Arc<StudentRegistry>) -> Result<Self, GurukulError> {
        let path = dir.join(ATTENDANCE_FILE);
        let mut entries: BTreeMap<EntityId, Vec<Attendance>> = BTreeMap::new();

        for fields in read_rows(&path).await? {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            match Attendance::from_fields(&fields) {
                Ok(record) => {
                    let days = entries.entry(record.student_id).or_default();
                    if days.iter().any(|a| a.date == record.date) {
                        warn!(
                            student_id = record.student_id,
                            date = %record.date,
                            "skipping duplicate attendance line"
                        );
                    } else {
                        days.push(record);
                    }
                }
                Err(err) => warn!(%err, "skipping malformed attendance line"),
            }
        }
        debug!(students = entries.len(), "attendance snapshot loaded");

        Ok(AttendanceLedger {
            path,
            students,
            entries: RwLock::new(entries),
        })
    }

    /// Records one mark per student per day; a second mark for the same
    /// day is rejected, never overwritten.
    pub async fn mark(
        &self,
        student_id: EntityId,
        date: NaiveDate,
        present: bool,
    ) -> Result<Attendance, GurukulError> {
        self.students.get(student_id).await?;

        let mut entries = self.entries.write().await;
        if entries
            .get(&student_id)
            .is_some_and(|days| days.iter().any(|a| a.date == date))
        {
            return Err(GurukulError::AttendanceAlreadyMarked { student_id, date });
        }

        let record = Attendance {
            student_id,
            date,
            present,
        };
        entries.entry(student_id).or_default().push(record);

        if let Err(err) = self.persist(&entries).await {
            // not durably committed: take the mark back out
            if let Some(days) = entries.get_mut(&student_id) {
                days.retain(|a| a.date != date);
                if days.is_empty() {
                    entries.remove(&student_id);
                }
            }
            return Err(err);
        }

        info!(student_id, %date, present, "attendance marked");
        Ok(record)
    }

    /// `100 * present / total` over the student's records.
    pub async fn percentage(&self, student_id: EntityId) -> Result<f64, GurukulError> {
        let entries = self.entries.read().await;
        let days = entries
            .get(&student_id)
            .filter(|days| !days.is_empty())
            .ok_or(GurukulError::NoAttendanceRecords(student_id))?;
        let present = days.iter().filter(|a| a.present).count();
        Ok(present as f64 * 100.0 / days.len() as f64)
    }

    /// Students with at least one record whose percentage is strictly
    /// below `threshold`. Students with no records are excluded, not
    /// treated as 0%.
    pub async fn below_threshold(&self, threshold: f64) -> Vec<EntityId> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|(_, days)| !days.is_empty())
            .filter(|(_, days)| {
                let present = days.iter().filter(|a| a.present).count();
                (present as f64 * 100.0 / days.len() as f64) < threshold
            })
            .map(|(student_id, _)| *student_id)
            .collect()
    }

    pub async fn records_for(&self, student_id: EntityId) -> Vec<Attendance> {
        self.entries
            .read()
            .await
            .get(&student_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_records(&self, student_id: EntityId) -> bool {
        self.entries
            .read()
            .await
            .get(&student_id)
            .is_some_and(|days| !days.is_empty())
    }

    pub async fn record_count(&self) -> usize {
        self.entries.read().await.values().map(Vec::len).sum()
    }

    async fn persist(
        &self,
        entries: &BTreeMap<EntityId, Vec<Attendance>>,
    ) -> Result<(), GurukulError> {
        let rows: Vec<Vec<String>> = entries
            .values()
            .flat_map(|days| days.iter().map(Attendance::to_fields))
            .collect();
        write_rows(&self.path, Attendance::HEADER, rows).await
    }
}
