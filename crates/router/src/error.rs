use http::{Method, StatusCode};
use model::RecordError;
use table::{TableError, TableErrorReason};
use thiserror::Error;

/// Every way handling a request can fail.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("unsupported route method: {0}")]
    UnsupportedMethod(Method),
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),
    #[error("malformed body: {0}")]
    MalformedBody(String),
    #[error("no record with id {0}")]
    NotFound(String),
    #[error("a record with id {0} already exists")]
    AlreadyExists(String),
    #[error("table operation failed: {0}")]
    RemoteOperationFailure(#[source] TableError),
}

impl RouteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            RouteError::MissingParameter(_) | RouteError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            RouteError::NotFound(_) => StatusCode::NOT_FOUND,
            RouteError::AlreadyExists(_) => StatusCode::CONFLICT,
            RouteError::RemoteOperationFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RecordError> for RouteError {
    fn from(err: RecordError) -> Self {
        RouteError::MalformedBody(err.to_string())
    }
}

impl From<TableError> for RouteError {
    fn from(err: TableError) -> Self {
        match (&err.reason, &err.key) {
            (TableErrorReason::MissingEntry, Some(key)) => RouteError::NotFound(key.clone()),
            (TableErrorReason::EntryExists, Some(key)) => RouteError::AlreadyExists(key.clone()),
            _ => RouteError::RemoteOperationFailure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table::TableOperation;

    #[test]
    fn conditional_failures_map_to_client_errors() {
        let missing = TableError::new(
            Some("1"),
            TableOperation::UpdateFields,
            TableErrorReason::MissingEntry,
        );
        let exists = TableError::new(Some("1"), TableOperation::Put, TableErrorReason::EntryExists);

        assert!(matches!(RouteError::from(missing), RouteError::NotFound(id) if id == "1"));
        assert!(matches!(RouteError::from(exists), RouteError::AlreadyExists(id) if id == "1"));
    }

    #[test]
    fn backend_failures_are_server_errors() {
        let err: RouteError = TableError::new(
            None,
            TableOperation::ScanAll,
            TableErrorReason::BackendFailure("timed out".into()),
        )
        .into();

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, err.status_code());
        assert_eq!("table operation failed: ScanAll failed: timed out", err.to_string());
    }

    #[test]
    fn unsupported_method_names_the_method() {
        let err = RouteError::UnsupportedMethod(Method::PATCH);

        assert_eq!(StatusCode::METHOD_NOT_ALLOWED, err.status_code());
        assert!(err.to_string().contains("PATCH"));
    }
}
