use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

use crate::models::werewolf::WerewolfVote;
use crate::repositories::errors::werewolf_repository_errors::WerewolfVoteRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Votes are keyed by (game_id, voter_id); the conditional put is the
/// one-vote-per-voter unique constraint.
pub struct DynamoDbWerewolfVoteRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbWerewolfVoteRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("WEREWOLF_VOTES_TABLE")
            .expect("WEREWOLF_VOTES_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait WerewolfVoteRepository: Send + Sync {
    async fn add_vote(&self, vote: &WerewolfVote) -> Result<(), WerewolfVoteRepositoryError>;
    async fn list_votes(
        &self,
        game_id: &str,
    ) -> Result<Vec<WerewolfVote>, WerewolfVoteRepositoryError>;
}

#[async_trait]
impl WerewolfVoteRepository for DynamoDbWerewolfVoteRepository {
    async fn add_vote(&self, vote: &WerewolfVote) -> Result<(), WerewolfVoteRepositoryError> {
        let item =
            to_item(vote).map_err(|e| WerewolfVoteRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(
                "attribute_not_exists(game_id) AND attribute_not_exists(voter_id)",
            )
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(WerewolfVoteRepositoryError::DuplicateVote)
                } else {
                    Err(WerewolfVoteRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn list_votes(
        &self,
        game_id: &str,
    ) -> Result<Vec<WerewolfVote>, WerewolfVoteRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("game_id = :game_id")
            .expression_attribute_values(
                ":game_id",
                to_attribute_value(game_id)
                    .map_err(|e| WerewolfVoteRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| WerewolfVoteRepositoryError::DynamoDb(e.to_string()))?;

        let mut votes = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let vote: WerewolfVote = from_item(item)
                    .map_err(|e| WerewolfVoteRepositoryError::Serialization(e.to_string()))?;
                votes.push(vote);
            }
        }
        Ok(votes)
    }
}
