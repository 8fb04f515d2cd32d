use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::SnapshotRecord;
use crate::error::GurukulError;
use crate::ids::IdGenerator;
use crate::models::EntityId;

/// Concurrency-safe keyed store backed by a full-rewrite flat-file snapshot.
///
/// Mutations take the write lock for the map change and the file rewrite
/// together, so durable state always matches memory at the end of a
/// successful call. Readers clone out of the map and never observe a
/// half-applied mutation.
pub struct SnapshotStore<T> {
    path: PathBuf,
    ids: Arc<IdGenerator>,
    entries: RwLock<BTreeMap<EntityId, T>>,
}

impl<T: SnapshotRecord> SnapshotStore<T> {
    /// Loads the snapshot at `path` if present, skipping malformed lines,
    /// and seeds the id generator with the largest id found.
    pub async fn open(
        path: impl Into<PathBuf>,
        ids: Arc<IdGenerator>,
    ) -> Result<Self, GurukulError> {
        let path = path.into();
        let mut entries = BTreeMap::new();

        for fields in read_rows(&path).await? {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            match T::from_fields(&fields) {
                Ok(record) => {
                    entries.insert(record.id(), record);
                }
                Err(err) => {
                    warn!(kind = T::KIND, %err, "skipping malformed snapshot line");
                }
            }
        }

        if let Some(max_id) = entries.keys().next_back() {
            ids.seed(*max_id);
        }
        debug!(kind = T::KIND, count = entries.len(), "snapshot loaded");

        Ok(SnapshotStore {
            path,
            ids,
            entries: RwLock::new(entries),
        })
    }

    /// Fresh identifier from the shared process-wide generator.
    pub fn next_id(&self) -> EntityId {
        self.ids.next_id()
    }

    pub async fn add(&self, entity: T) -> Result<T, GurukulError> {
        self.transact(move |entries| {
            let id = entity.id();
            if entries.contains_key(&id) {
                return Err(GurukulError::Duplicate { kind: T::KIND, id });
            }
            entries.insert(id, entity.clone());
            Ok(entity)
        })
        .await
    }

    pub async fn get(&self, id: EntityId) -> Result<T, GurukulError> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GurukulError::NotFound { kind: T::KIND, id })
    }

    pub async fn contains(&self, id: EntityId) -> bool {
        self.entries.read().await.contains_key(&id)
    }

    /// Full replacement of the record at `id`.
    pub async fn update(&self, id: EntityId, entity: T) -> Result<T, GurukulError> {
        self.transact(move |entries| {
            if entity.id() != id {
                return Err(GurukulError::IdMismatch {
                    kind: T::KIND,
                    expected: id,
                    actual: entity.id(),
                });
            }
            if !entries.contains_key(&id) {
                return Err(GurukulError::NotFound { kind: T::KIND, id });
            }
            entries.insert(id, entity.clone());
            Ok(entity)
        })
        .await
    }

    pub async fn remove(&self, id: EntityId) -> Result<T, GurukulError> {
        self.transact(move |entries| {
            entries
                .remove(&id)
                .ok_or(GurukulError::NotFound { kind: T::KIND, id })
        })
        .await
    }

    /// Stable snapshot of every entity, ascending id order.
    pub async fn all(&self) -> Vec<T> {
        self.entries.read().await.values().cloned().collect()
    }

    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.entries
            .read()
            .await
            .values()
            .filter(|entity| pred(entity))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Runs `f` against the live map and rewrites the snapshot once on
    /// success. The map change and the rewrite commit together: if either
    /// fails, the map is restored to its pre-call state before the error
    /// reaches the caller.
    pub async fn transact<R, F>(&self, f: F) -> Result<R, GurukulError>
    where
        F: FnOnce(&mut BTreeMap<EntityId, T>) -> Result<R, GurukulError>,
    {
        let mut entries = self.entries.write().await;
        // The rewrite below already costs O(n); the pre-image clone is the
        // rollback source at the same cost.
        let before = entries.clone();

        let out = match f(&mut entries) {
            Ok(out) => out,
            Err(err) => {
                *entries = before;
                return Err(err);
            }
        };

        let rows: Vec<Vec<String>> = entries.values().map(T::to_fields).collect();
        if let Err(err) = write_rows(&self.path, T::HEADER, rows).await {
            *entries = before;
            return Err(err);
        }
        Ok(out)
    }
}

fn snapshot_err(path: &Path, source: std::io::Error) -> GurukulError {
    GurukulError::Snapshot {
        path: path.display().to_string(),
        source,
    }
}

/// Reads every data row of the snapshot at `path` (header skipped),
/// trimming fields. A missing file is an empty snapshot. Lines the reader
/// itself cannot decode are skipped with a warning.
pub(crate) async fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, GurukulError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| snapshot_err(path, err))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(record.iter().map(|field| field.trim().to_string()).collect()),
            Err(err) => warn!(path = %path.display(), %err, "skipping unreadable snapshot line"),
        }
    }
    Ok(rows)
}

/// Full snapshot rewrite: header plus every row, staged to a temp file and
/// renamed into place so a crash leaves either the old or the new snapshot.
pub(crate) async fn write_rows(
    path: &Path,
    header: &[&str],
    rows: Vec<Vec<String>>,
) -> Result<(), GurukulError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| snapshot_err(path, err))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(|err| snapshot_err(path, std::io::Error::other(err)))?;
    for row in &rows {
        writer
            .write_record(row)
            .map_err(|err| snapshot_err(path, std::io::Error::other(err)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| snapshot_err(path, std::io::Error::other(err)))?;

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|err| snapshot_err(&tmp, err))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|err| snapshot_err(path, err))?;
    Ok(())
}
