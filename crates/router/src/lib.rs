use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::operations::RecordOperations;
use crate::route::Route;
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::tracing::{Instrument, Span};
use lambda_runtime::{LambdaEvent, tracing};
use model::{Error, Record};
use serde_json::{Value, json};
use std::sync::Arc;
use table::TableStore;

pub mod config;
mod envelope;
pub mod error;
pub mod operations;
pub mod route;

/// Routes API Gateway proxy events to record operations against one table.
///
/// Built once at startup and shared between invocations.
/// Holds no per-request state.
pub struct Router {
    operations: RecordOperations,
    config: RouterConfig,
}

impl Router {
    pub fn new(table: Arc<dyn TableStore>, config: RouterConfig) -> Self {
        Router {
            operations: RecordOperations::new(table),
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Select a route for the event and run its operation, returning the response data.
    pub async fn dispatch(&self, event: &ApiGatewayProxyRequest) -> Result<Value, RouteError> {
        let route: Route = Route::from_request(event)?;

        tracing::info!(handler = route.name(), "Dispatching request");

        let data: Value = match route {
            Route::FetchOne { id } => self.operations.fetch_one(&id).await?.into_value(),
            Route::FetchAll => records_value(self.operations.fetch_all().await?),
            Route::FetchFiltered { id, category } => {
                records_value(self.operations.fetch_filtered(&id, &category).await?)
            }
            Route::Create { record } => self.operations.create(record).await?.into_value(),
            Route::Update { id, fields } => self.operations.update(&id, fields).await?.into_value(),
            Route::Delete { id } => {
                self.operations.delete(&id).await?;
                json!({ "id": id })
            }
        };

        Ok(data)
    }

    /// Handle one event, converting any failure into an error envelope.
    pub async fn handle(&self, event: ApiGatewayProxyRequest) -> ApiGatewayProxyResponse {
        tracing::debug!(
            "Received request: {}",
            serde_json::to_string(&event).unwrap_or_default()
        );

        match self.dispatch(&event).await {
            Ok(data) => envelope::success(&event.http_method, data),
            Err(err) => {
                if err.status_code().is_server_error() {
                    tracing::error!("Failed to handle request: {err:?}");
                } else {
                    tracing::warn!("Rejected request: {err}");
                }

                envelope::failure(&err)
            }
        }
    }
}

fn records_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Record::into_value).collect())
}

/// Handler for the outer Lambda event, for use with `lambda_runtime::run()`.
///
/// ```ignore
/// let router: Router = Router::new(Arc::new(store), RouterConfig::from_env()?);
///
/// lambda_runtime::run(service_fn(|event: RouterLambdaEvent| router_fn(&router, event))).await
/// ```
pub async fn router_fn(
    router: &Router,
    event: RouterLambdaEvent,
) -> Result<ApiGatewayProxyResponse, Error> {
    let request_id: String = event.context.request_id.clone();
    let table_name: &str = router.config().table_name.as_str();

    let request_span: Span = tracing::span!(
        tracing::Level::INFO,
        "Request",
        request_id,
        table_name,
        method = %event.payload.http_method
    );

    Ok(router.handle(event.payload).instrument(request_span).await)
}

pub type RouterLambdaEvent = LambdaEvent<ApiGatewayProxyRequest>;
