use thiserror::Error;

/// Failure writing to one of the key-value tables.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conditional write rejected by {table}: record already exists")]
    AlreadyExists { table: String },

    #[error("DynamoDB request failed: {0}")]
    Dynamo(#[from] aws_sdk_dynamodb::Error),
}

/// Errors that abort a post-confirmation invocation.
///
/// Relational failures never show up here; they are logged and swallowed.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("user attributes are missing `sub`")]
    MissingSubject,

    #[error("unable to add item to user table: {0}")]
    UserWrite(#[source] StoreError),

    #[error("unable to add item to entity table: {0}")]
    EntityWrite(#[source] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid table name for {var}: {value:?}")]
    InvalidTableName { var: &'static str, value: String },
}
