use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::roster_repository_errors::{
    TeamMemberRepositoryError, TeamRepositoryError,
};
use crate::repositories::errors::werewolf_repository_errors::{
    GameRoleRepositoryError, WerewolfStatsRepositoryError, WerewolfVoteRepositoryError,
};
use crate::services::errors::game_lock_errors::GameLockError;

#[derive(Debug)]
pub enum WerewolfServiceError {
    GameNotFound,
    NotWerewolfMode,
    VoteNotOpen,
    NotAParticipant,
    SuspectNotAParticipant,
    AlreadyVoted,
    GameBusy,
    RepositoryError(String),
}

impl std::fmt::Display for WerewolfServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WerewolfServiceError::GameNotFound => write!(f, "Game not found"),
            WerewolfServiceError::NotWerewolfMode => {
                write!(f, "Game is not in werewolf mode")
            }
            WerewolfServiceError::VoteNotOpen => write!(f, "The werewolf vote is not open"),
            WerewolfServiceError::NotAParticipant => {
                write!(f, "Voter is not an active participant in this game")
            }
            WerewolfServiceError::SuspectNotAParticipant => {
                write!(f, "Suspect is not an active participant in this game")
            }
            WerewolfServiceError::AlreadyVoted => {
                write!(f, "Voter has already cast a vote in this game")
            }
            WerewolfServiceError::GameBusy => write!(f, "Game is busy, try again"),
            WerewolfServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for WerewolfServiceError {}

impl From<GameLockError> for WerewolfServiceError {
    fn from(error: GameLockError) -> Self {
        match error {
            GameLockError::Busy => WerewolfServiceError::GameBusy,
            GameLockError::Infrastructure(msg) => WerewolfServiceError::RepositoryError(msg),
        }
    }
}

impl From<GameRepositoryError> for WerewolfServiceError {
    fn from(error: GameRepositoryError) -> Self {
        match error {
            GameRepositoryError::NotFound => WerewolfServiceError::GameNotFound,
            other => WerewolfServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<WerewolfVoteRepositoryError> for WerewolfServiceError {
    fn from(error: WerewolfVoteRepositoryError) -> Self {
        match error {
            WerewolfVoteRepositoryError::DuplicateVote => WerewolfServiceError::AlreadyVoted,
            other => WerewolfServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<GameRoleRepositoryError> for WerewolfServiceError {
    fn from(error: GameRoleRepositoryError) -> Self {
        WerewolfServiceError::RepositoryError(error.to_string())
    }
}

impl From<WerewolfStatsRepositoryError> for WerewolfServiceError {
    fn from(error: WerewolfStatsRepositoryError) -> Self {
        WerewolfServiceError::RepositoryError(error.to_string())
    }
}

impl From<TeamRepositoryError> for WerewolfServiceError {
    fn from(error: TeamRepositoryError) -> Self {
        WerewolfServiceError::RepositoryError(error.to_string())
    }
}

impl From<TeamMemberRepositoryError> for WerewolfServiceError {
    fn from(error: TeamMemberRepositoryError) -> Self {
        WerewolfServiceError::RepositoryError(error.to_string())
    }
}
