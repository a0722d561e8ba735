use crate::error::RouteError;
use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::encodings::Body;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, StatusCode};
use serde_json::{Value, json};

const FAILURE_MESSAGE: &str = "Failed to perform operation.";

/// `{"message", "data"}` with a 200 status.
pub(crate) fn success(method: &Method, data: Value) -> ApiGatewayProxyResponse {
    let body: Value = json!({
        "message": format!("Successfully finished operation: \"{method}\""),
        "data": data,
    });

    response(StatusCode::OK, body)
}

/// `{"message", "errorMessage", "detail"}` with the status for the error kind.
pub(crate) fn failure(err: &RouteError) -> ApiGatewayProxyResponse {
    let body: Value = json!({
        "message": FAILURE_MESSAGE,
        "errorMessage": err.to_string(),
        "detail": format!("{err:?}"),
    });

    response(err.status_code(), body)
}

fn response(status: StatusCode, body: Value) -> ApiGatewayProxyResponse {
    let mut response: ApiGatewayProxyResponse = ApiGatewayProxyResponse::default();
    response.status_code = i64::from(status.as_u16());
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response.body = Some(Body::Text(body.to_string()));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(response: &ApiGatewayProxyResponse) -> Value {
        match &response.body {
            Some(Body::Text(text)) => serde_json::from_str(text).unwrap(),
            other => panic!("Expected a text body, got {other:?}"),
        }
    }

    #[test]
    fn success_wraps_data() {
        let response = success(&Method::GET, json!([{"id": "1"}]));

        assert_eq!(200, response.status_code);
        assert_eq!(
            Some(&HeaderValue::from_static("application/json")),
            response.headers.get(CONTENT_TYPE)
        );
        assert_eq!(
            json!({
                "message": "Successfully finished operation: \"GET\"",
                "data": [{"id": "1"}],
            }),
            body_json(&response)
        );
    }

    #[test]
    fn failure_carries_error_text() {
        let response = failure(&RouteError::UnsupportedMethod(Method::PATCH));

        assert_eq!(405, response.status_code);

        let body = body_json(&response);
        assert_eq!(json!(FAILURE_MESSAGE), body["message"]);
        assert_eq!(json!("unsupported route method: PATCH"), body["errorMessage"]);
        assert!(body["detail"].as_str().unwrap().contains("UnsupportedMethod"));
    }
}
