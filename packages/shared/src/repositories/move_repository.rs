use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

use crate::models::game_move::GameMove;
use crate::repositories::errors::move_repository_errors::MoveRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Move rows are keyed by (game_id, ply); the conditional put turns a
/// ply collision into a typed error instead of a silent overwrite.
pub struct DynamoDbMoveRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMoveRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("MOVES_TABLE").expect("MOVES_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait MoveRepository: Send + Sync {
    async fn add_move(&self, game_move: &GameMove) -> Result<(), MoveRepositoryError>;
    /// Every move of a game, ply ascending.
    async fn list_moves(&self, game_id: &str) -> Result<Vec<GameMove>, MoveRepositoryError>;
}

#[async_trait]
impl MoveRepository for DynamoDbMoveRepository {
    async fn add_move(&self, game_move: &GameMove) -> Result<(), MoveRepositoryError> {
        let item =
            to_item(game_move).map_err(|e| MoveRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(game_id) AND attribute_not_exists(ply)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(MoveRepositoryError::DuplicatePly)
                } else {
                    Err(MoveRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn list_moves(&self, game_id: &str) -> Result<Vec<GameMove>, MoveRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("game_id = :game_id")
            .expression_attribute_values(
                ":game_id",
                to_attribute_value(game_id)
                    .map_err(|e| MoveRepositoryError::Serialization(e.to_string()))?,
            )
            .scan_index_forward(true)
            .send()
            .await
            .map_err(|e| MoveRepositoryError::DynamoDb(e.to_string()))?;

        let mut moves = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let game_move: GameMove = from_item(item)
                    .map_err(|e| MoveRepositoryError::Serialization(e.to_string()))?;
                moves.push(game_move);
            }
        }
        moves.sort_by_key(|m| m.ply);
        Ok(moves)
    }
}
