use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use aws_lambda_events::query_map::QueryMap;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemOutput;
use aws_sdk_dynamodb::operation::put_item::PutItemOutput;
use aws_smithy_mocks::{Rule, mock, mock_client};
use http::Method;
use model::env::TABLE_NAME;
use std::collections::HashMap;
use std::env;

/// Test table name
pub const TEST_TABLE: &str = "test_table";

/// Create an API Gateway proxy event with a method and nothing else set
pub fn api_event(method: Method) -> ApiGatewayProxyRequest {
    let mut event: ApiGatewayProxyRequest = ApiGatewayProxyRequest::default();
    event.http_method = method;
    event.path = Some("/record".to_string());
    event.resource = Some("/record".to_string());

    event
}

/// Create an event addressed to `/record/{id}`
pub fn api_event_for_id(method: Method, id: &str) -> ApiGatewayProxyRequest {
    let mut event: ApiGatewayProxyRequest = api_event(method);
    event.path = Some(format!("/record/{id}"));
    event.resource = Some("/record/{id}".to_string());
    event.path_parameters = HashMap::from([("id".to_string(), id.to_string())]);

    event
}

/// Set the raw body of an event
pub fn with_body(mut event: ApiGatewayProxyRequest, body: &serde_json::Value) -> ApiGatewayProxyRequest {
    event.body = Some(body.to_string());

    event
}

/// Set the query string parameters of an event
pub fn with_query(mut event: ApiGatewayProxyRequest, params: &[(&str, &str)]) -> ApiGatewayProxyRequest {
    let params: HashMap<String, String> = params
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect();
    event.query_string_parameters = QueryMap::from(params);

    event
}

/// A default mock DynamoDB client which accepts every put and delete
pub fn create_mock_dynamodb_client() -> aws_sdk_dynamodb::Client {
    let put_item_rule: Rule = mock!(aws_sdk_dynamodb::Client::put_item)
        .match_requests(|req| req.table_name() == Some(TEST_TABLE))
        .sequence()
        .output(|| PutItemOutput::builder().build())
        .repeatedly()
        .build();

    let delete_item_rule: Rule = mock!(aws_sdk_dynamodb::Client::delete_item)
        .match_requests(|req| req.table_name() == Some(TEST_TABLE))
        .sequence()
        .output(|| DeleteItemOutput::builder().build())
        .repeatedly()
        .build();

    mock_client!(
        aws_sdk_dynamodb,
        aws_smithy_mocks::RuleMode::MatchAny,
        [&put_item_rule, &delete_item_rule]
    )
}

/// Setup default environment variables used in testing
pub fn setup_default_env() {
    unsafe {
        env::set_var(TABLE_NAME, TEST_TABLE);
    }
}
