use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_dynamo::{to_attribute_value, to_item};

use crate::repositories::errors::lock_repository_errors::GameLockRepositoryError;

#[cfg(test)]
use mockall::automock;

/// One lease row per game. A lease is free when no row exists or the
/// previous holder's lease has expired; acquisition is a single
/// conditional put so two racing callers cannot both win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLockLease {
    pub game_id: String,
    pub holder: String,
    pub expires_at: DateTime<Utc>,
}

pub struct DynamoDbGameLockRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameLockRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("GAME_LOCKS_TABLE")
            .expect("GAME_LOCKS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait GameLockRepository: Send + Sync {
    /// One non-blocking acquisition attempt. `LockHeld` when another
    /// holder owns an unexpired lease.
    async fn try_acquire(&self, lease: &GameLockLease) -> Result<(), GameLockRepositoryError>;
    /// Releases only if `holder` still owns the lease; a lease that
    /// expired and was taken over is left alone.
    async fn release(&self, game_id: &str, holder: &str) -> Result<(), GameLockRepositoryError>;
}

#[async_trait]
impl GameLockRepository for DynamoDbGameLockRepository {
    async fn try_acquire(&self, lease: &GameLockLease) -> Result<(), GameLockRepositoryError> {
        let item =
            to_item(lease).map_err(|e| GameLockRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(game_id) OR expires_at < :now")
            .expression_attribute_values(
                ":now",
                to_attribute_value(Utc::now())
                    .map_err(|e| GameLockRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(GameLockRepositoryError::LockHeld)
                } else {
                    Err(GameLockRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn release(&self, game_id: &str, holder: &str) -> Result<(), GameLockRepositoryError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(
                "game_id",
                to_attribute_value(game_id)
                    .map_err(|e| GameLockRepositoryError::Serialization(e.to_string()))?,
            )
            .condition_expression("holder = :holder")
            .expression_attribute_values(
                ":holder",
                to_attribute_value(holder)
                    .map_err(|e| GameLockRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                // Losing the lease to a takeover is not a failure the
                // caller can act on.
                if error_str.contains("ConditionalCheckFailedException") {
                    Ok(())
                } else {
                    Err(GameLockRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }
}
