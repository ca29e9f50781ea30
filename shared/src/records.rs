use async_trait::async_trait;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::Client as DynamoClient;
#[cfg(test)]
use mockall::automock;

use crate::config::Config;
use crate::error::StoreError;
use crate::types::{EntityRecord, UserRecord};

/// Key-value side of registration: the user table and the entity table.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert the user record unless one with an `email` attribute is
    /// already stored under the same key.
    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Insert the entity record unconditionally.
    async fn put_entity(&self, record: &EntityRecord) -> Result<(), StoreError>;
}

pub struct DynamoRecordStore {
    client: DynamoClient,
    user_table: String,
    entity_table: String,
}

impl DynamoRecordStore {
    pub fn new(client: DynamoClient, config: &Config) -> Self {
        Self {
            client,
            user_table: config.user_table.clone(),
            entity_table: config.entity_table.clone(),
        }
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.user_table)
            .set_item(Some(record.to_item()))
            .condition_expression("attribute_not_exists(#email)")
            .expression_attribute_names("#email", "email")
            .send()
            .await
            .map_err(|e| put_error(&self.user_table, e.into_service_error()))?;

        Ok(())
    }

    async fn put_entity(&self, record: &EntityRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.entity_table)
            .set_item(Some(record.to_item()))
            .send()
            .await
            .map_err(|e| put_error(&self.entity_table, e.into_service_error()))?;

        Ok(())
    }
}

fn put_error(table: &str, err: PutItemError) -> StoreError {
    if err.is_conditional_check_failed_exception() {
        StoreError::AlreadyExists {
            table: table.to_string(),
        }
    } else {
        StoreError::Dynamo(err.into())
    }
}
