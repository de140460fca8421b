use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

use crate::models::team::TeamMember;
use crate::repositories::errors::roster_repository_errors::TeamMemberRepositoryError;

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbTeamMemberRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbTeamMemberRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("TEAM_MEMBERS_TABLE")
            .expect("TEAM_MEMBERS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait TeamMemberRepository: Send + Sync {
    async fn create_member(&self, member: &TeamMember) -> Result<(), TeamMemberRepositoryError>;
    async fn update_member(&self, member: &TeamMember) -> Result<(), TeamMemberRepositoryError>;
    /// The active roster of one team, ordered by position ascending.
    async fn active_members_ordered(
        &self,
        team_id: &str,
    ) -> Result<Vec<TeamMember>, TeamMemberRepositoryError>;
    /// All active members across both teams of a game.
    async fn active_participants(
        &self,
        game_id: &str,
    ) -> Result<Vec<TeamMember>, TeamMemberRepositoryError>;
    async fn find_by_game_and_user(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<TeamMember, TeamMemberRepositoryError>;
}

#[async_trait]
impl TeamMemberRepository for DynamoDbTeamMemberRepository {
    async fn create_member(&self, member: &TeamMember) -> Result<(), TeamMemberRepositoryError> {
        let item =
            to_item(member).map_err(|e| TeamMemberRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| TeamMemberRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn update_member(&self, member: &TeamMember) -> Result<(), TeamMemberRepositoryError> {
        let item =
            to_item(member).map_err(|e| TeamMemberRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|e| TeamMemberRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn active_members_ordered(
        &self,
        team_id: &str,
    ) -> Result<Vec<TeamMember>, TeamMemberRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_MembersByTeam")
            .key_condition_expression("team_id = :team_id")
            .expression_attribute_values(
                ":team_id",
                to_attribute_value(team_id)
                    .map_err(|e| TeamMemberRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| TeamMemberRepositoryError::DynamoDb(e.to_string()))?;

        let mut members = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let member: TeamMember = from_item(item)
                    .map_err(|e| TeamMemberRepositoryError::Serialization(e.to_string()))?;
                if member.active {
                    members.push(member);
                }
            }
        }
        members.sort_by_key(|m| m.position);
        Ok(members)
    }

    async fn active_participants(
        &self,
        game_id: &str,
    ) -> Result<Vec<TeamMember>, TeamMemberRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_MembersByGame")
            .key_condition_expression("game_id = :game_id")
            .expression_attribute_values(
                ":game_id",
                to_attribute_value(game_id)
                    .map_err(|e| TeamMemberRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| TeamMemberRepositoryError::DynamoDb(e.to_string()))?;

        let mut members = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let member: TeamMember = from_item(item)
                    .map_err(|e| TeamMemberRepositoryError::Serialization(e.to_string()))?;
                if member.active {
                    members.push(member);
                }
            }
        }
        Ok(members)
    }

    async fn find_by_game_and_user(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<TeamMember, TeamMemberRepositoryError> {
        let participants = self.active_participants(game_id).await?;
        participants
            .into_iter()
            .find(|m| m.user_id == user_id)
            .ok_or(TeamMemberRepositoryError::NotFound)
    }
}
