use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::move_repository_errors::MoveRepositoryError;
use crate::repositories::errors::roster_repository_errors::{
    TeamMemberRepositoryError, TeamRepositoryError,
};
use crate::services::errors::game_lock_errors::GameLockError;
use crate::services::errors::rule_engine_errors::RuleEngineError;
use crate::services::errors::turn_context_errors::TurnContextError;

#[derive(Debug)]
pub enum TimeoutServiceError {
    GameNotFound,
    GameNotLive,
    GameBusy,
    NoPlayersInTeam,
    /// Decision endpoint called while no timeout decision is open.
    NoDecisionPending,
    NotYourTeamToDecide,
    InvalidDecision(String),
    /// Claim victory attempted below the consecutive-timeout
    /// threshold, or with no timeout on record.
    ClaimNotAvailable,
    NotYourTeamToClaim,
    NotAParticipant,
    InvalidPosition(String),
    RepositoryError(String),
}

impl std::fmt::Display for TimeoutServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutServiceError::GameNotFound => write!(f, "Game not found"),
            TimeoutServiceError::GameNotLive => write!(f, "Game is not live"),
            TimeoutServiceError::GameBusy => write!(f, "Game is busy, try again"),
            TimeoutServiceError::NoPlayersInTeam => {
                write!(f, "The team to move has no active players")
            }
            TimeoutServiceError::NoDecisionPending => {
                write!(f, "No timeout decision is pending")
            }
            TimeoutServiceError::NotYourTeamToDecide => {
                write!(f, "Only the opposing team may decide on this timeout")
            }
            TimeoutServiceError::InvalidDecision(value) => {
                write!(f, "Invalid timeout decision: {}", value)
            }
            TimeoutServiceError::ClaimNotAvailable => {
                write!(f, "Claim victory is not available yet")
            }
            TimeoutServiceError::NotYourTeamToClaim => {
                write!(f, "Only the team opposite the timed-out team may claim victory")
            }
            TimeoutServiceError::NotAParticipant => {
                write!(f, "User is not an active participant in this game")
            }
            TimeoutServiceError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            TimeoutServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for TimeoutServiceError {}

impl From<TurnContextError> for TimeoutServiceError {
    fn from(error: TurnContextError) -> Self {
        match error {
            TurnContextError::NoPlayersInTeam => TimeoutServiceError::NoPlayersInTeam,
            // A system tick has no specific actor; an actor mismatch
            // never surfaces on this path.
            TurnContextError::NotYourTurn => TimeoutServiceError::NoPlayersInTeam,
            TurnContextError::RepositoryError(msg) => TimeoutServiceError::RepositoryError(msg),
        }
    }
}

impl From<GameLockError> for TimeoutServiceError {
    fn from(error: GameLockError) -> Self {
        match error {
            GameLockError::Busy => TimeoutServiceError::GameBusy,
            GameLockError::Infrastructure(msg) => TimeoutServiceError::RepositoryError(msg),
        }
    }
}

impl From<GameRepositoryError> for TimeoutServiceError {
    fn from(error: GameRepositoryError) -> Self {
        match error {
            GameRepositoryError::NotFound => TimeoutServiceError::GameNotFound,
            other => TimeoutServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<RuleEngineError> for TimeoutServiceError {
    fn from(error: RuleEngineError) -> Self {
        match error {
            RuleEngineError::InvalidPosition(msg) => TimeoutServiceError::InvalidPosition(msg),
            RuleEngineError::IllegalMove(msg) => TimeoutServiceError::InvalidPosition(msg),
        }
    }
}

impl From<MoveRepositoryError> for TimeoutServiceError {
    fn from(error: MoveRepositoryError) -> Self {
        TimeoutServiceError::RepositoryError(error.to_string())
    }
}

impl From<TeamRepositoryError> for TimeoutServiceError {
    fn from(error: TeamRepositoryError) -> Self {
        TimeoutServiceError::RepositoryError(error.to_string())
    }
}

impl From<TeamMemberRepositoryError> for TimeoutServiceError {
    fn from(error: TeamMemberRepositoryError) -> Self {
        match error {
            TeamMemberRepositoryError::NotFound => TimeoutServiceError::NotAParticipant,
            other => TimeoutServiceError::RepositoryError(other.to_string()),
        }
    }
}
