/// Default environment variable containing the name of the DynamoDB table
pub const TABLE_NAME: &'static str = "DYNAMODB_TABLE_NAME";
