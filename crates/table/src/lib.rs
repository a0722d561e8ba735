use async_trait::async_trait;
use model::{Error, Record};
use std::fmt::{Debug, Display, Formatter};

/// The remote key-value table holding records, addressed by the `id` partition key.
///
/// Every method is a single round trip to the backing store.
/// Implementations do no caching and no retries.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Look up a single record. `None` when no record has this key.
    async fn get_by_key(&self, id: &str) -> Result<Option<Record>, TableError>;

    /// Read every record in the table, in no particular order.
    async fn scan_all(&self) -> Result<Vec<Record>, TableError>;

    /// Records under `id` whose `filter_field` contains `filter_value`.
    async fn query_by_key_and_filter(
        &self,
        id: &str,
        filter_field: &str,
        filter_value: &str,
    ) -> Result<Vec<Record>, TableError>;

    /// Store a new record. Fails with `EntryExists` rather than replacing a record with the same key.
    async fn put(&self, record: Record) -> Result<(), TableError>;

    /// Set each of `fields` on an existing record, leaving other attributes untouched.
    /// Returns the record as it is after the update.
    async fn update_fields(&self, id: &str, fields: Record) -> Result<Record, TableError>;

    /// Remove a record. Deleting a missing key is not an error.
    async fn delete_by_key(&self, id: &str) -> Result<(), TableError>;
}

/// Errors arising from a table operation.
#[derive(Debug)]
pub struct TableError {
    // Absent for operations spanning the whole table
    pub key: Option<String>,

    pub operation: TableOperation,
    pub reason: TableErrorReason,
}

#[derive(Debug)]
pub enum TableErrorReason {
    // The record expected by a conditional write does not exist
    MissingEntry,
    // A record already exists under the key being created
    EntryExists,
    // The stored item could not be converted to or from a record
    BadRecord(String),
    // An error from the underlying table
    BackendFailure(Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOperation {
    GetByKey,
    ScanAll,
    QueryByKeyAndFilter,
    Put,
    UpdateFields,
    DeleteByKey,
}

impl TableError {
    pub fn new(key: Option<&str>, operation: TableOperation, reason: TableErrorReason) -> Self {
        TableError {
            key: key.map(str::to_string),
            operation,
            reason,
        }
    }
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.operation)?;

        if let Some(key) = &self.key {
            write!(f, " [{key}]")?;
        }

        match &self.reason {
            TableErrorReason::MissingEntry => f.write_str(" failed: no such record"),
            TableErrorReason::EntryExists => f.write_str(" failed: record already exists"),
            TableErrorReason::BadRecord(msg) => write!(f, " failed: bad record, {msg}"),
            TableErrorReason::BackendFailure(err) => write!(f, " failed: {err}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.reason {
            TableErrorReason::BackendFailure(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
