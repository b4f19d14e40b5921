//! Roster persistence.
//!
//! The roster is stored as a JSON array of `{"name": ..., "date": "YYYY-MM-DD"}`
//! objects. [`PersistenceGateway`] abstracts where that blob lives;
//! [`JsonFileStore`] keeps it in a file on disk and [`MemoryStore`] keeps it in
//! memory.
//!
//! Unreadable content is not an error. [`load_or_seed`] treats a missing or
//! malformed blob the same way: fall back to the seed list and persist it.

use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

use crate::error::ErrorCode;
use crate::lock::{LockError, StoreLock};
use crate::model::BirthdayRecord;
use crate::seed::seed_records;

/// Default time to wait for the store lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome of reading the stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    Found(Vec<BirthdayRecord>),
    Missing,
    /// Content exists but is not a JSON array.
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize roster: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store lock failed: {0}")]
    Lock(#[from] LockError),

    #[error("in-memory store rejected the write")]
    Rejected,
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::StoreReadFailed,
            Self::Serialize(_) | Self::Rejected => ErrorCode::StoreWriteFailed,
            Self::Lock(err) => err.code(),
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Load/save boundary for the roster blob.
pub trait PersistenceGateway {
    /// Read the stored roster.
    ///
    /// # Errors
    ///
    /// Only for failures to reach the storage itself. Absent or undecodable
    /// content is reported through [`LoadResult`].
    fn load(&self) -> Result<LoadResult, StoreError>;

    /// Replace the stored roster with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the blob could not be written.
    fn save(&mut self, records: &[BirthdayRecord]) -> Result<(), StoreError>;
}

/// Encode records in the storage format.
///
/// # Errors
///
/// Propagates `serde_json` serialization failures.
pub fn encode_records(records: &[BirthdayRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Decode a stored blob.
///
/// Empty content counts as missing. A valid array keeps every element that
/// decodes to a record with a non-empty name; the rest are skipped with a
/// warning.
#[must_use]
pub fn decode_records(raw: &str) -> LoadResult {
    if raw.trim().is_empty() {
        return LoadResult::Missing;
    }

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => return LoadResult::Malformed(err.to_string()),
    };

    let Value::Array(items) = value else {
        return LoadResult::Malformed(format!("expected a JSON array, found {}", kind_of(&value)));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<BirthdayRecord>(item) {
            Ok(record) if !record.name.trim().is_empty() => records.push(record),
            Ok(_) => warn!(index, "skipping stored record with empty name"),
            Err(error) => warn!(index, %error, "skipping undecodable stored record"),
        }
    }
    LoadResult::Found(records)
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Load the stored roster, falling back to the seed list.
///
/// On a missing or malformed blob the seed is returned and persisted right
/// away. A failure to persist the seed is logged and otherwise ignored; the
/// seed is still returned.
///
/// # Errors
///
/// Propagates [`StoreError`] from [`PersistenceGateway::load`].
pub fn load_or_seed<G: PersistenceGateway + ?Sized>(
    gateway: &mut G,
) -> Result<Vec<BirthdayRecord>, StoreError> {
    match gateway.load()? {
        LoadResult::Found(records) => {
            debug!(count = records.len(), "loaded stored roster");
            Ok(records)
        }
        LoadResult::Missing => {
            info!("no stored roster, seeding");
            Ok(persist_seed(gateway))
        }
        LoadResult::Malformed(reason) => {
            warn!(%reason, "stored roster unreadable, discarding and reseeding");
            Ok(persist_seed(gateway))
        }
    }
}

fn persist_seed<G: PersistenceGateway + ?Sized>(gateway: &mut G) -> Vec<BirthdayRecord> {
    let seed = seed_records();
    if let Err(error) = gateway.save(&seed) {
        warn!(%error, "failed to persist seed roster");
    }
    seed
}

/// Roster stored as a JSON file.
///
/// Writes go to a temporary sibling and are renamed into place under an
/// exclusive lock on `<file>.lock`; reads take a shared lock.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "lock")
    }

    fn tmp_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "tmp")
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

impl PersistenceGateway for JsonFileStore {
    fn load(&self) -> Result<LoadResult, StoreError> {
        if !self.path.exists() {
            return Ok(LoadResult::Missing);
        }
        let _lock = StoreLock::shared(&self.lock_path(), self.lock_timeout)?;
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(decode_records(&raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(LoadResult::Missing),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                Ok(LoadResult::Malformed(err.to_string()))
            }
            Err(err) => Err(StoreError::io(&self.path, err)),
        }
    }

    fn save(&mut self, records: &[BirthdayRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let encoded = encode_records(records)?;

        let _lock = StoreLock::exclusive(&self.lock_path(), self.lock_timeout)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, encoded.as_bytes()).map_err(|err| StoreError::io(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| StoreError::io(&self.path, err))?;

        debug!(path = %self.path.display(), count = records.len(), "saved roster");
        Ok(())
    }
}

/// In-memory blob store.
///
/// Holds the raw JSON text so callers can inject arbitrary content, and can be
/// told to reject writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
    reject_writes: bool,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `raw`.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Store whose `save` always fails.
    #[must_use]
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistenceGateway for MemoryStore {
    fn load(&self) -> Result<LoadResult, StoreError> {
        Ok(self
            .raw
            .as_deref()
            .map_or(LoadResult::Missing, decode_records))
    }

    fn save(&mut self, records: &[BirthdayRecord]) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Rejected);
        }
        self.raw = Some(encode_records(records)?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn sample() -> Vec<BirthdayRecord> {
        vec![
            BirthdayRecord::new("Zed", date(1991, 12, 24)),
            BirthdayRecord::new("Ann", date(2000, 2, 29)),
            BirthdayRecord::new("Émile", date(1985, 6, 1)),
        ]
    }

    #[test]
    fn decode_accepts_storage_format() {
        let raw = r#"[{"name":"Argha","date":"2000-11-09"},{"name":"Biki","date":"2000-01-02"}]"#;
        let LoadResult::Found(records) = decode_records(raw) else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], BirthdayRecord::new("Argha", date(2000, 11, 9)));
    }

    #[test]
    fn decode_empty_is_missing() {
        assert_eq!(decode_records(""), LoadResult::Missing);
        assert_eq!(decode_records("  \n"), LoadResult::Missing);
    }

    #[test]
    fn decode_non_array_is_malformed() {
        for raw in ["{\"name\":\"x\"}", "42", "\"text\"", "null", "not json", "[1, 2"] {
            assert!(
                matches!(decode_records(raw), LoadResult::Malformed(_)),
                "{raw} should be malformed"
            );
        }
    }

    #[test]
    fn decode_skips_bad_entries_inside_an_array() {
        let raw = r#"[
            {"name":"Good","date":"2000-01-01"},
            {"name":"BadDate","date":"01/01/2000"},
            {"name":"","date":"2000-01-01"},
            {"date":"2000-01-01"},
            7
        ]"#;
        let LoadResult::Found(records) = decode_records(raw) else {
            panic!("expected records");
        };
        assert_eq!(records, vec![BirthdayRecord::new("Good", date(2000, 1, 1))]);
    }

    #[test]
    fn memory_round_trip_preserves_order() {
        let mut store = MemoryStore::new();
        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), LoadResult::Found(sample()));
    }

    #[test]
    fn file_round_trip_preserves_order() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = JsonFileStore::new(dir.path().join("nested/birthdays.json"));
        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), LoadResult::Found(sample()));
        assert!(!dir.path().join("nested/birthdays.json.tmp").exists());
    }

    #[test]
    fn file_store_writes_iso_dates() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = JsonFileStore::new(dir.path().join("birthdays.json"));
        store.save(&sample()[..1]).expect("save");
        let raw = fs::read_to_string(store.path()).expect("read");
        let value: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value[0]["name"], "Zed");
        assert_eq!(value[0]["date"], "1991-12-24");
    }

    #[test]
    fn missing_file_loads_as_missing() {
        let dir = TempDir::new().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().expect("load"), LoadResult::Missing);
    }

    #[test]
    fn lock_path_is_a_sibling() {
        let store = JsonFileStore::new("/data/bday/birthdays.json");
        assert_eq!(store.lock_path(), PathBuf::from("/data/bday/birthdays.json.lock"));
    }

    #[test]
    fn load_or_seed_seeds_and_persists_when_missing() {
        let mut store = MemoryStore::new();
        let records = load_or_seed(&mut store).expect("load");
        assert_eq!(records, seed_records());
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().expect("reload"), LoadResult::Found(seed_records()));
    }

    #[test]
    fn load_or_seed_reseeds_malformed_content() {
        let mut store = MemoryStore::with_raw(r#"{"not":"an array"}"#);
        let records = load_or_seed(&mut store).expect("load");
        assert_eq!(records, seed_records());
        assert_eq!(store.load().expect("reload"), LoadResult::Found(seed_records()));
    }

    #[test]
    fn load_or_seed_keeps_stored_roster() {
        let mut store = MemoryStore::new();
        store.save(&sample()).expect("save");
        let records = load_or_seed(&mut store).expect("load");
        assert_eq!(records, sample());
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn load_or_seed_keeps_an_empty_array() {
        let mut store = MemoryStore::with_raw("[]");
        assert!(load_or_seed(&mut store).expect("load").is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn load_or_seed_tolerates_seed_write_failure() {
        let mut store = MemoryStore::new().rejecting_writes();
        let records = load_or_seed(&mut store).expect("load");
        assert_eq!(records, seed_records());
        assert!(store.raw().is_none());
    }

    #[test]
    fn file_load_or_seed_reseeds_garbage_on_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("birthdays.json");
        fs::write(&path, "this is not json").expect("write garbage");

        let mut store = JsonFileStore::new(&path);
        let records = load_or_seed(&mut store).expect("load");
        assert_eq!(records, seed_records());
        assert_eq!(store.load().expect("reload"), LoadResult::Found(seed_records()));
    }

    #[test]
    fn store_error_codes() {
        assert_eq!(StoreError::Rejected.code(), ErrorCode::StoreWriteFailed);
        let io = StoreError::io(Path::new("x"), io::Error::other("boom"));
        assert_eq!(io.code(), ErrorCode::StoreReadFailed);
        assert!(io.to_string().contains("boom"));
    }
}
