use aws_config::BehaviorVersion;
use lambda_runtime::{service_fn, tracing};
use model::Error;
use router::config::RouterConfig;
use router::{Router, RouterLambdaEvent, router_fn};
use std::sync::Arc;
use table_dynamodb::DynamoDbTableStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config: RouterConfig = RouterConfig::from_env()?;

    let dynamodb_client: aws_sdk_dynamodb::Client =
        aws_sdk_dynamodb::Client::new(&aws_config::load_defaults(BehaviorVersion::latest()).await);

    let router: Router = build_router(dynamodb_client, config);

    lambda_runtime::run(service_fn(|event: RouterLambdaEvent| router_fn(&router, event))).await
}

fn build_router(dynamodb_client: aws_sdk_dynamodb::Client, config: RouterConfig) -> Router {
    tracing::info!("Routing requests to table {}", config.table_name);

    let store: DynamoDbTableStore =
        DynamoDbTableStore::new(dynamodb_client, config.table_name.as_str());

    Router::new(Arc::new(store), config)
}
