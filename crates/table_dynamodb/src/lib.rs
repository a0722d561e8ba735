use crate::update_expression::UpdateExpression;
use async_trait::async_trait;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
use aws_sdk_dynamodb::operation::query::QueryOutput;
use aws_sdk_dynamodb::operation::scan::ScanOutput;
use aws_sdk_dynamodb::operation::update_item::UpdateItemOutput;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use lambda_runtime::tracing;
use model::{ID, Record};
use std::collections::HashMap;
use table::TableErrorReason::{BackendFailure, BadRecord, EntryExists, MissingEntry};
use table::TableOperation::{
    DeleteByKey, GetByKey, Put, QueryByKeyAndFilter, ScanAll, UpdateFields,
};
use table::{TableError, TableOperation, TableStore};

mod update_expression;

// Placeholder bound to the partition key attribute in conditions
const ID_NAME: &str = "#id";
const ID_VALUE: &str = ":id";
const FILTER_NAME: &str = "#filter";
const FILTER_VALUE: &str = ":filter";

/// Table store backed by a DynamoDB table with a single string partition key `id`.
pub struct DynamoDbTableStore {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoDbTableStore {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        DynamoDbTableStore {
            table_name: table_name.into(),
            dynamodb_client,
        }
    }
}

fn key_value(id: &str) -> AttributeValue {
    AttributeValue::S(id.to_string())
}

fn backend_failure<E>(
    key: Option<&str>,
    operation: TableOperation,
    err: SdkError<E, HttpResponse>,
) -> TableError
where
    E: std::error::Error + Send + Sync + 'static,
{
    tracing::error!(
        ?operation,
        key,
        "DynamoDB request failed: {}",
        DisplayErrorContext(&err)
    );

    TableError::new(key, operation, BackendFailure(err.into()))
}

fn bad_record(key: Option<&str>, operation: TableOperation, err: serde_dynamo::Error) -> TableError {
    TableError::new(key, operation, BadRecord(err.to_string()))
}

#[async_trait]
impl TableStore for DynamoDbTableStore {
    async fn get_by_key(&self, id: &str) -> Result<Option<Record>, TableError> {
        let output: GetItemOutput = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(ID, key_value(id))
            .send()
            .await
            .map_err(|err| backend_failure(Some(id), GetByKey, err))?;

        output
            .item
            .map(|item| serde_dynamo::from_item::<_, Record>(item))
            .transpose()
            .map_err(|err| bad_record(Some(id), GetByKey, err))
    }

    async fn scan_all(&self) -> Result<Vec<Record>, TableError> {
        let output: ScanOutput = self
            .dynamodb_client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|err| backend_failure(None, ScanAll, err))?;

        serde_dynamo::from_items(output.items.unwrap_or_default())
            .map_err(|err| bad_record(None, ScanAll, err))
    }

    async fn query_by_key_and_filter(
        &self,
        id: &str,
        filter_field: &str,
        filter_value: &str,
    ) -> Result<Vec<Record>, TableError> {
        let output: QueryOutput = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(format!("{ID_NAME} = {ID_VALUE}"))
            .filter_expression(format!("contains({FILTER_NAME}, {FILTER_VALUE})"))
            .expression_attribute_names(ID_NAME, ID)
            .expression_attribute_names(FILTER_NAME, filter_field)
            .expression_attribute_values(ID_VALUE, key_value(id))
            .expression_attribute_values(FILTER_VALUE, AttributeValue::S(filter_value.to_string()))
            .send()
            .await
            .map_err(|err| backend_failure(Some(id), QueryByKeyAndFilter, err))?;

        serde_dynamo::from_items(output.items.unwrap_or_default())
            .map_err(|err| bad_record(Some(id), QueryByKeyAndFilter, err))
    }

    async fn put(&self, record: Record) -> Result<(), TableError> {
        let id: String = record
            .id()
            .ok_or_else(|| TableError::new(None, Put, BadRecord(format!("missing {ID}"))))?
            .to_string();

        let item: HashMap<String, AttributeValue> =
            serde_dynamo::to_item(&record).map_err(|err| bad_record(Some(&id), Put, err))?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(format!("attribute_not_exists({ID_NAME})"))
            .expression_attribute_names(ID_NAME, ID)
            .send()
            .await
            .map_err(|err| {
                let exists: bool = err
                    .as_service_error()
                    .is_some_and(|err| err.is_conditional_check_failed_exception());

                if exists {
                    TableError::new(Some(&id), Put, EntryExists)
                } else {
                    backend_failure(Some(&id), Put, err)
                }
            })?;

        Ok(())
    }

    async fn update_fields(&self, id: &str, fields: Record) -> Result<Record, TableError> {
        let update: UpdateExpression = UpdateExpression::set_fields(&fields)
            .map_err(|err| bad_record(Some(id), UpdateFields, err))?
            .ok_or_else(|| {
                TableError::new(
                    Some(id),
                    UpdateFields,
                    BadRecord("no fields to update".to_string()),
                )
            })?;

        let mut names: HashMap<String, String> = update.names;
        names.insert(ID_NAME.to_string(), ID.to_string());

        let output: UpdateItemOutput = self
            .dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .key(ID, key_value(id))
            .update_expression(update.expression)
            .condition_expression(format!("attribute_exists({ID_NAME})"))
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(update.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| {
                let missing: bool = err
                    .as_service_error()
                    .is_some_and(|err| err.is_conditional_check_failed_exception());

                if missing {
                    TableError::new(Some(id), UpdateFields, MissingEntry)
                } else {
                    backend_failure(Some(id), UpdateFields, err)
                }
            })?;

        let attributes: HashMap<String, AttributeValue> = output.attributes.ok_or_else(|| {
            TableError::new(
                Some(id),
                UpdateFields,
                BadRecord("no attributes returned".to_string()),
            )
        })?;

        serde_dynamo::from_item(attributes).map_err(|err| bad_record(Some(id), UpdateFields, err))
    }

    async fn delete_by_key(&self, id: &str) -> Result<(), TableError> {
        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID, key_value(id))
            .send()
            .await
            .map_err(|err| backend_failure(Some(id), DeleteByKey, err))?;

        Ok(())
    }
}
