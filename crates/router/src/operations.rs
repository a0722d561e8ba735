use crate::error::RouteError;
use crate::route::CATEGORY;
use lambda_runtime::tracing;
use model::{ID, Record};
use serde_json::Value;
use std::sync::Arc;
use table::TableStore;

/// The record operations, each a single call against the table.
#[derive(Clone)]
pub struct RecordOperations {
    pub(crate) table: Arc<dyn TableStore>,
}

impl RecordOperations {
    pub fn new(table: Arc<dyn TableStore>) -> Self {
        RecordOperations { table }
    }

    pub async fn fetch_one(&self, id: &str) -> Result<Record, RouteError> {
        self.table
            .get_by_key(id)
            .await?
            .ok_or_else(|| RouteError::NotFound(id.to_string()))
    }

    pub async fn fetch_all(&self) -> Result<Vec<Record>, RouteError> {
        Ok(self.table.scan_all().await?)
    }

    pub async fn fetch_filtered(&self, id: &str, category: &str) -> Result<Vec<Record>, RouteError> {
        Ok(self
            .table
            .query_by_key_and_filter(id, CATEGORY, category)
            .await?)
    }

    /// Store a new record, generating its id when the body has none.
    /// An explicit id that is already taken fails rather than overwriting.
    pub async fn create(&self, record: Record) -> Result<Record, RouteError> {
        let record: Record = record.with_generated_id();

        tracing::debug!(id = record.id(), "Creating record");
        self.table.put(record.clone()).await?;

        Ok(record)
    }

    /// Set every field in `fields` on the record, returning it after the update.
    pub async fn update(&self, id: &str, mut fields: Record) -> Result<Record, RouteError> {
        // The key is immutable, but echoing it back unchanged is allowed
        match fields.remove(ID) {
            None => {}
            Some(Value::String(body_id)) if body_id == id => {}
            Some(_) => {
                return Err(RouteError::MalformedBody(format!(
                    "`{ID}` cannot be changed"
                )));
            }
        }

        if fields.is_empty() {
            return Err(RouteError::MalformedBody("no fields to update".to_string()));
        }

        Ok(self.table.update_fields(id, fields).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RouteError> {
        Ok(self.table.delete_by_key(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use table_in_memory::InMemoryTableStore;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    fn operations() -> (RecordOperations, InMemoryTableStore) {
        let store: InMemoryTableStore = InMemoryTableStore::default();

        (RecordOperations::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn fetch_one_returns_created_record() {
        let (operations, _) = operations();

        let created = operations
            .create(record(json!({"name": "Phone", "price": 950})))
            .await
            .unwrap();
        let id: &str = created.id().expect("Created record should have an id");

        let fetched = operations.fetch_one(id).await.unwrap();

        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn create_generates_unique_ids() {
        let (operations, store) = operations();

        let mut ids: HashSet<String> = HashSet::new();
        for _ in 0..20 {
            let created = operations.create(record(json!({"name": "Pen"}))).await.unwrap();
            ids.insert(created.id().unwrap().to_string());
        }

        assert_eq!(20, ids.len());
        assert_eq!(20, store.len());
    }

    #[tokio::test]
    async fn create_with_taken_id_conflicts() {
        let (operations, _) = operations();

        operations.create(record(json!({"id": "1"}))).await.unwrap();
        let err = operations.create(record(json!({"id": "1"}))).await.unwrap_err();

        assert!(matches!(err, RouteError::AlreadyExists(id) if id == "1"));
    }

    #[tokio::test]
    async fn fetch_all_returns_every_record() {
        let (operations, _) = operations();

        for id in ["1", "2", "3"] {
            operations.create(record(json!({"id": id}))).await.unwrap();
        }

        let ids: HashSet<String> = operations
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .filter_map(|record| record.id().map(str::to_string))
            .collect();

        assert_eq!(HashSet::from(["1", "2", "3"].map(String::from)), ids);
    }

    #[tokio::test]
    async fn update_rejects_id_change() {
        let (operations, _) = operations();
        operations.create(record(json!({"id": "1", "price": 5}))).await.unwrap();

        let err = operations
            .update("1", record(json!({"id": "2", "price": 10})))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::MalformedBody(_)));

        let updated = operations
            .update("1", record(json!({"id": "1", "price": 10})))
            .await
            .unwrap();
        assert_eq!(Some(&json!(10)), updated.get("price"));
    }

    #[tokio::test]
    async fn update_rejects_empty_body() {
        let (operations, _) = operations();

        let err = operations.update("1", Record::new()).await.unwrap_err();

        assert!(matches!(err, RouteError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn update_missing_record_is_not_found() {
        let (operations, _) = operations();

        let err = operations
            .update("missing", record(json!({"price": 10})))
            .await
            .unwrap_err();

        assert!(matches!(err, RouteError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let (operations, _) = operations();
        operations.create(record(json!({"id": "1"}))).await.unwrap();

        operations.delete("1").await.unwrap();
        operations.delete("1").await.expect("Second delete should not fail");

        assert!(matches!(
            operations.fetch_one("1").await,
            Err(RouteError::NotFound(_))
        ));
    }
}
