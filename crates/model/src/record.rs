use crate::ID;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single item stored in the table.
///
/// Attributes are free-form JSON values. The only attribute with meaning is `id`,
/// the partition key, which must be a non-empty string when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// Errors arising from validating a record at the boundary.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("body must be a JSON object")]
    NotAnObject,
    #[error("`id` must be a non-empty string")]
    InvalidId,
}

impl Record {
    pub fn new() -> Self {
        Record(Map::new())
    }

    /// Parse and validate a raw request body.
    pub fn from_body(body: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(body)?;

        Record::try_from(value)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get(ID).and_then(Value::as_str)
    }

    /// Returns the record with `id` set, generating a v4 UUID when it has none.
    pub fn with_generated_id(mut self) -> Self {
        if self.id().is_none() {
            self.0
                .insert(ID.to_string(), Value::String(uuid::Uuid::new_v4().to_string()));
        }

        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = value else {
            return Err(RecordError::NotAnObject);
        };

        match fields.get(ID) {
            None => {}
            Some(Value::String(id)) if !id.is_empty() => {}
            Some(_) => return Err(RecordError::InvalidId),
        }

        Ok(Record(fields))
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object_body() {
        let record: Record = Record::from_body(r#"{"id": "abc", "price": 10, "tags": ["a"]}"#)
            .expect("Body should parse");

        assert_eq!(Some("abc"), record.id());
        assert_eq!(Some(&json!(10)), record.get("price"));
        assert_eq!(3, record.len());
    }

    #[test]
    fn rejects_non_object_body() {
        let result = Record::from_body("[1, 2, 3]");

        assert!(matches!(result, Err(RecordError::NotAnObject)));
    }

    #[test]
    fn rejects_invalid_json() {
        let result = Record::from_body("{\"name\": ");

        assert!(matches!(result, Err(RecordError::InvalidJson(_))));
    }

    #[test]
    fn rejects_empty_or_non_string_id() {
        assert!(matches!(
            Record::from_body(r#"{"id": ""}"#),
            Err(RecordError::InvalidId)
        ));
        assert!(matches!(
            Record::from_body(r#"{"id": 42}"#),
            Err(RecordError::InvalidId)
        ));
    }

    #[test]
    fn generates_id_only_when_missing() {
        let existing = Record::from_body(r#"{"id": "keep-me"}"#)
            .unwrap()
            .with_generated_id();
        assert_eq!(Some("keep-me"), existing.id());

        let first = Record::new().with_generated_id();
        let second = Record::new().with_generated_id();

        assert!(first.id().is_some());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn serializes_as_plain_object() {
        let record = Record::from_body(r#"{"id": "1", "name": "pen"}"#).unwrap();

        assert_eq!(json!({"id": "1", "name": "pen"}), serde_json::to_value(&record).unwrap());
    }
}
