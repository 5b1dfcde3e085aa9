use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use agora_core::contract::ApiGatewayResponse;
use agora_lambda::adapters::dynamodb::DynamoAdStore;
use agora_lambda::handlers::ads::handle_get_ad;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let table_name = std::env::var("DYNAMODB_ADS_TABLE")
        .map_err(|_| Error::from("DYNAMODB_ADS_TABLE must be configured"))?;

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoAdStore::new(aws_sdk_dynamodb::Client::new(&config), table_name);

    Ok(handle_get_ad(event.payload, &store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
