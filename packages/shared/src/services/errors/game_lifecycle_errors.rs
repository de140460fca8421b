use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::roster_repository_errors::{
    TeamMemberRepositoryError, TeamRepositoryError,
};
use crate::services::errors::game_lock_errors::GameLockError;
use crate::services::errors::werewolf_service_errors::WerewolfServiceError;

#[derive(Debug)]
pub enum GameLifecycleError {
    GameNotFound,
    /// Operation only valid in the lobby.
    GameNotInLobby,
    NotAParticipant,
    GameBusy,
    RepositoryError(String),
}

impl std::fmt::Display for GameLifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameLifecycleError::GameNotFound => write!(f, "Game not found"),
            GameLifecycleError::GameNotInLobby => write!(f, "Game is no longer in the lobby"),
            GameLifecycleError::NotAParticipant => {
                write!(f, "User is not a participant in this game")
            }
            GameLifecycleError::GameBusy => write!(f, "Game is busy, try again"),
            GameLifecycleError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GameLifecycleError {}

impl From<GameLockError> for GameLifecycleError {
    fn from(error: GameLockError) -> Self {
        match error {
            GameLockError::Busy => GameLifecycleError::GameBusy,
            GameLockError::Infrastructure(msg) => GameLifecycleError::RepositoryError(msg),
        }
    }
}

impl From<GameRepositoryError> for GameLifecycleError {
    fn from(error: GameRepositoryError) -> Self {
        match error {
            GameRepositoryError::NotFound => GameLifecycleError::GameNotFound,
            other => GameLifecycleError::RepositoryError(other.to_string()),
        }
    }
}

impl From<TeamRepositoryError> for GameLifecycleError {
    fn from(error: TeamRepositoryError) -> Self {
        GameLifecycleError::RepositoryError(error.to_string())
    }
}

impl From<TeamMemberRepositoryError> for GameLifecycleError {
    fn from(error: TeamMemberRepositoryError) -> Self {
        match error {
            TeamMemberRepositoryError::NotFound => GameLifecycleError::NotAParticipant,
            other => GameLifecycleError::RepositoryError(other.to_string()),
        }
    }
}

impl From<WerewolfServiceError> for GameLifecycleError {
    fn from(error: WerewolfServiceError) -> Self {
        GameLifecycleError::RepositoryError(error.to_string())
    }
}
