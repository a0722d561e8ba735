use async_trait::async_trait;
use model::{ID, Record};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use table::TableErrorReason::{BackendFailure, BadRecord, EntryExists, MissingEntry};
use table::TableOperation::{
    DeleteByKey, GetByKey, Put, QueryByKeyAndFilter, ScanAll, UpdateFields,
};
use table::{TableError, TableOperation, TableStore};

/// A table held in process memory, for use in testing.
///
/// Mirrors the conditional behaviour of the DynamoDB store so that handlers
/// can be exercised without a remote table.
#[derive(Clone, Default)]
pub struct InMemoryTableStore {
    records: Arc<Mutex<HashMap<String, Record>>>,
}

impl InMemoryTableStore {
    /// Create a store pre-populated with `records`. Records without an id are skipped.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let records: HashMap<String, Record> = records
            .into_iter()
            .filter_map(|record| Some((record.id()?.to_string(), record)))
            .collect();

        InMemoryTableStore {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
        key: Option<&str>,
        operation: TableOperation,
    ) -> Result<MutexGuard<'_, HashMap<String, Record>>, TableError> {
        self.records.lock().map_err(|err| {
            TableError::new(key, operation, BackendFailure(err.to_string().into()))
        })
    }
}

/// Same semantics as the DynamoDB `contains` function on strings and lists.
fn contains(attribute: &Value, value: &str) -> bool {
    match attribute {
        Value::String(s) => s.contains(value),
        Value::Array(items) => items.iter().any(|item| item.as_str() == Some(value)),
        _ => false,
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn get_by_key(&self, id: &str) -> Result<Option<Record>, TableError> {
        let guard = self.lock(Some(id), GetByKey)?;

        Ok(guard.get(id).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<Record>, TableError> {
        let guard = self.lock(None, ScanAll)?;

        Ok(guard.values().cloned().collect())
    }

    async fn query_by_key_and_filter(
        &self,
        id: &str,
        filter_field: &str,
        filter_value: &str,
    ) -> Result<Vec<Record>, TableError> {
        let guard = self.lock(Some(id), QueryByKeyAndFilter)?;

        Ok(guard
            .get(id)
            .filter(|record| {
                record
                    .get(filter_field)
                    .is_some_and(|attribute| contains(attribute, filter_value))
            })
            .cloned()
            .into_iter()
            .collect())
    }

    async fn put(&self, record: Record) -> Result<(), TableError> {
        let id: String = record
            .id()
            .ok_or_else(|| {
                TableError::new(None, Put, BadRecord(format!("missing {ID}")))
            })?
            .to_string();

        let mut guard = self.lock(Some(&id), Put)?;

        if guard.contains_key(&id) {
            return Err(TableError::new(Some(&id), Put, EntryExists));
        }
        guard.insert(id, record);

        Ok(())
    }

    async fn update_fields(&self, id: &str, fields: Record) -> Result<Record, TableError> {
        let mut guard = self.lock(Some(id), UpdateFields)?;

        let record: &mut Record = guard
            .get_mut(id)
            .ok_or_else(|| TableError::new(Some(id), UpdateFields, MissingEntry))?;

        for (field, value) in fields {
            record.insert(field, value);
        }

        Ok(record.clone())
    }

    async fn delete_by_key(&self, id: &str) -> Result<(), TableError> {
        self.lock(Some(id), DeleteByKey)?.remove(id);

        Ok(())
    }
}
