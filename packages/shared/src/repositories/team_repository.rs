use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

use crate::models::game::TeamName;
use crate::models::team::Team;
use crate::repositories::errors::roster_repository_errors::TeamRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Teams are keyed by (game_id, name) so both sides of a game live in
/// one partition.
pub struct DynamoDbTeamRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbTeamRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("TEAMS_TABLE").expect("TEAMS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait TeamRepository: Send + Sync {
    async fn create_team(&self, team: &Team) -> Result<(), TeamRepositoryError>;
    async fn get_team(&self, game_id: &str, name: TeamName) -> Result<Team, TeamRepositoryError>;
    async fn update_team(&self, team: &Team) -> Result<(), TeamRepositoryError>;
}

#[async_trait]
impl TeamRepository for DynamoDbTeamRepository {
    async fn create_team(&self, team: &Team) -> Result<(), TeamRepositoryError> {
        let item = to_item(team).map_err(|e| TeamRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| TeamRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn get_team(&self, game_id: &str, name: TeamName) -> Result<Team, TeamRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "game_id",
                to_attribute_value(game_id)
                    .map_err(|e| TeamRepositoryError::Serialization(e.to_string()))?,
            )
            .key(
                "name",
                to_attribute_value(name)
                    .map_err(|e| TeamRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| TeamRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            let team: Team =
                from_item(item).map_err(|e| TeamRepositoryError::Serialization(e.to_string()))?;
            Ok(team)
        } else {
            Err(TeamRepositoryError::NotFound)
        }
    }

    async fn update_team(&self, team: &Team) -> Result<(), TeamRepositoryError> {
        let item = to_item(team).map_err(|e| TeamRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(game_id)")
            .send()
            .await
            .map_err(|e| TeamRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }
}
