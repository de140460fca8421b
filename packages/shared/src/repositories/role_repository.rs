use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

use crate::models::werewolf::GameRole;
use crate::repositories::errors::werewolf_repository_errors::GameRoleRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Hidden roles keyed by (game_id, user_id), written once at game
/// start.
pub struct DynamoDbGameRoleRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameRoleRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("GAME_ROLES_TABLE")
            .expect("GAME_ROLES_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait GameRoleRepository: Send + Sync {
    async fn add_role(&self, role: &GameRole) -> Result<(), GameRoleRepositoryError>;
    async fn get_roles(&self, game_id: &str) -> Result<Vec<GameRole>, GameRoleRepositoryError>;
    async fn get_role(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<GameRole, GameRoleRepositoryError>;
}

#[async_trait]
impl GameRoleRepository for DynamoDbGameRoleRepository {
    async fn add_role(&self, role: &GameRole) -> Result<(), GameRoleRepositoryError> {
        let item =
            to_item(role).map_err(|e| GameRoleRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| GameRoleRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn get_roles(&self, game_id: &str) -> Result<Vec<GameRole>, GameRoleRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("game_id = :game_id")
            .expression_attribute_values(
                ":game_id",
                to_attribute_value(game_id)
                    .map_err(|e| GameRoleRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| GameRoleRepositoryError::DynamoDb(e.to_string()))?;

        let mut roles = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let role: GameRole = from_item(item)
                    .map_err(|e| GameRoleRepositoryError::Serialization(e.to_string()))?;
                roles.push(role);
            }
        }
        Ok(roles)
    }

    async fn get_role(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<GameRole, GameRoleRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "game_id",
                to_attribute_value(game_id)
                    .map_err(|e| GameRoleRepositoryError::Serialization(e.to_string()))?,
            )
            .key(
                "user_id",
                to_attribute_value(user_id)
                    .map_err(|e| GameRoleRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| GameRoleRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            let role: GameRole =
                from_item(item).map_err(|e| GameRoleRepositoryError::Serialization(e.to_string()))?;
            Ok(role)
        } else {
            Err(GameRoleRepositoryError::NotFound)
        }
    }
}
