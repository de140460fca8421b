use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value};

use crate::models::werewolf::UserWerewolfStats;
use crate::repositories::errors::werewolf_repository_errors::WerewolfStatsRepositoryError;

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbWerewolfStatsRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbWerewolfStatsRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("WEREWOLF_STATS_TABLE")
            .expect("WEREWOLF_STATS_TABLE environment variable must be set");
        Self { client, table_name }
    }

    async fn increment(&self, user_id: &str, field: &str) -> Result<(), WerewolfStatsRepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(
                "user_id",
                to_attribute_value(user_id)
                    .map_err(|e| WerewolfStatsRepositoryError::Serialization(e.to_string()))?,
            )
            .update_expression("ADD #field :one")
            .expression_attribute_names("#field", field)
            .expression_attribute_values(
                ":one",
                aws_sdk_dynamodb::types::AttributeValue::N("1".to_string()),
            )
            .send()
            .await
            .map_err(|e| WerewolfStatsRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait WerewolfStatsRepository: Send + Sync {
    async fn increment_correct_identifications(
        &self,
        user_id: &str,
    ) -> Result<(), WerewolfStatsRepositoryError>;
    async fn increment_werewolf_successes(
        &self,
        user_id: &str,
    ) -> Result<(), WerewolfStatsRepositoryError>;
    async fn get_stats(
        &self,
        user_id: &str,
    ) -> Result<Option<UserWerewolfStats>, WerewolfStatsRepositoryError>;
}

#[async_trait]
impl WerewolfStatsRepository for DynamoDbWerewolfStatsRepository {
    async fn increment_correct_identifications(
        &self,
        user_id: &str,
    ) -> Result<(), WerewolfStatsRepositoryError> {
        self.increment(user_id, "correct_identifications").await
    }

    async fn increment_werewolf_successes(
        &self,
        user_id: &str,
    ) -> Result<(), WerewolfStatsRepositoryError> {
        self.increment(user_id, "werewolf_successes").await
    }

    async fn get_stats(
        &self,
        user_id: &str,
    ) -> Result<Option<UserWerewolfStats>, WerewolfStatsRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "user_id",
                to_attribute_value(user_id)
                    .map_err(|e| WerewolfStatsRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| WerewolfStatsRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            let stats: UserWerewolfStats = from_item(item)
                .map_err(|e| WerewolfStatsRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(stats))
        } else {
            Ok(None)
        }
    }
}
