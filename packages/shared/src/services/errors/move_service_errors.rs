use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::move_repository_errors::MoveRepositoryError;
use crate::repositories::errors::roster_repository_errors::{
    TeamMemberRepositoryError, TeamRepositoryError,
};
use crate::services::errors::game_lock_errors::GameLockError;
use crate::services::errors::hand_brain_errors::HandBrainViolation;
use crate::services::errors::rule_engine_errors::RuleEngineError;
use crate::services::errors::turn_context_errors::TurnContextError;

#[derive(Debug)]
pub enum MoveServiceError {
    GameNotFound,
    GameNotLive,
    /// A timeout decision is pending; no moves until it resolves.
    TimeoutDecisionPending,
    GameBusy,
    NotYourTurn,
    NoPlayersInTeam,
    TurnExpired,
    InvalidUci(String),
    IllegalMove(String),
    HandBrain(HandBrainViolation),
    InvalidPosition(String),
    RepositoryError(String),
}

impl std::fmt::Display for MoveServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveServiceError::GameNotFound => write!(f, "Game not found"),
            MoveServiceError::GameNotLive => write!(f, "Game is not live"),
            MoveServiceError::TimeoutDecisionPending => {
                write!(f, "A timeout decision is pending")
            }
            MoveServiceError::GameBusy => write!(f, "Game is busy, try again"),
            MoveServiceError::NotYourTurn => write!(f, "It is not your turn to move"),
            MoveServiceError::NoPlayersInTeam => {
                write!(f, "The team to move has no active players")
            }
            MoveServiceError::TurnExpired => write!(f, "The turn deadline has passed"),
            MoveServiceError::InvalidUci(uci) => write!(f, "Malformed UCI move: {}", uci),
            MoveServiceError::IllegalMove(msg) => write!(f, "Illegal move: {}", msg),
            MoveServiceError::HandBrain(violation) => write!(f, "{}", violation),
            MoveServiceError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            MoveServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for MoveServiceError {}

impl From<TurnContextError> for MoveServiceError {
    fn from(error: TurnContextError) -> Self {
        match error {
            TurnContextError::NoPlayersInTeam => MoveServiceError::NoPlayersInTeam,
            TurnContextError::NotYourTurn => MoveServiceError::NotYourTurn,
            TurnContextError::RepositoryError(msg) => MoveServiceError::RepositoryError(msg),
        }
    }
}

impl From<GameLockError> for MoveServiceError {
    fn from(error: GameLockError) -> Self {
        match error {
            GameLockError::Busy => MoveServiceError::GameBusy,
            GameLockError::Infrastructure(msg) => MoveServiceError::RepositoryError(msg),
        }
    }
}

impl From<GameRepositoryError> for MoveServiceError {
    fn from(error: GameRepositoryError) -> Self {
        match error {
            GameRepositoryError::NotFound => MoveServiceError::GameNotFound,
            other => MoveServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<RuleEngineError> for MoveServiceError {
    fn from(error: RuleEngineError) -> Self {
        match error {
            RuleEngineError::IllegalMove(msg) => MoveServiceError::IllegalMove(msg),
            RuleEngineError::InvalidPosition(msg) => MoveServiceError::InvalidPosition(msg),
        }
    }
}

impl From<MoveRepositoryError> for MoveServiceError {
    fn from(error: MoveRepositoryError) -> Self {
        MoveServiceError::RepositoryError(error.to_string())
    }
}

impl From<TeamRepositoryError> for MoveServiceError {
    fn from(error: TeamRepositoryError) -> Self {
        MoveServiceError::RepositoryError(error.to_string())
    }
}

impl From<TeamMemberRepositoryError> for MoveServiceError {
    fn from(error: TeamMemberRepositoryError) -> Self {
        MoveServiceError::RepositoryError(error.to_string())
    }
}
