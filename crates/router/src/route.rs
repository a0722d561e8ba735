use crate::error::RouteError;
use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use http::Method;
use model::{ID, Record};

/// Query string parameter used to filter records.
pub const CATEGORY: &str = "category";

/// The single record operation selected for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    FetchOne { id: String },
    FetchAll,
    FetchFiltered { id: String, category: String },
    Create { record: Record },
    Update { id: String, fields: Record },
    Delete { id: String },
}

impl Route {
    /// Select the operation for an event.
    ///
    /// GET with any query parameters is a filtered fetch and needs both a path `id`
    /// and a `category`. Otherwise GET fetches one record when there is a path `id`
    /// and every record when there is not. An empty path `id` is treated as missing.
    pub fn from_request(event: &ApiGatewayProxyRequest) -> Result<Route, RouteError> {
        match event.http_method {
            Method::GET if has_query(event) => {
                let category: &str = event
                    .query_string_parameters
                    .first(CATEGORY)
                    .ok_or(RouteError::MissingParameter(CATEGORY))?;

                Ok(Route::FetchFiltered {
                    id: path_id(event)?,
                    category: category.to_string(),
                })
            }
            Method::GET if event.path_parameters.contains_key(ID) => Ok(Route::FetchOne {
                id: path_id(event)?,
            }),
            Method::GET => Ok(Route::FetchAll),
            Method::POST => Ok(Route::Create {
                record: Record::from_body(body(event)?)?,
            }),
            Method::PUT => Ok(Route::Update {
                id: path_id(event)?,
                fields: Record::from_body(body(event)?)?,
            }),
            Method::DELETE => Ok(Route::Delete { id: path_id(event)? }),
            ref method => Err(RouteError::UnsupportedMethod(method.clone())),
        }
    }

    /// Handler name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Route::FetchOne { .. } => "fetch_one",
            Route::FetchAll => "fetch_all",
            Route::FetchFiltered { .. } => "fetch_filtered",
            Route::Create { .. } => "create",
            Route::Update { .. } => "update",
            Route::Delete { .. } => "delete",
        }
    }
}

fn has_query(event: &ApiGatewayProxyRequest) -> bool {
    event.query_string_parameters.iter().next().is_some()
}

fn path_id(event: &ApiGatewayProxyRequest) -> Result<String, RouteError> {
    event
        .path_parameters
        .get(ID)
        .filter(|id| !id.is_empty())
        .cloned()
        .ok_or(RouteError::MissingParameter(ID))
}

fn body(event: &ApiGatewayProxyRequest) -> Result<&str, RouteError> {
    event
        .body
        .as_deref()
        .ok_or_else(|| RouteError::MalformedBody("missing body".to_string()))
}
