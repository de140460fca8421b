use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::roster_repository_errors::TeamMemberRepositoryError;
use crate::services::errors::game_lock_errors::GameLockError;
use crate::services::errors::turn_context_errors::TurnContextError;

#[derive(Debug)]
pub enum FastModeError {
    GameNotFound,
    GameNotLive,
    TimeoutDecisionPending,
    /// Only a member of the team to move may toggle fast mode.
    NotYourTeam,
    NotAParticipant,
    NoPlayersInTeam,
    GameBusy,
    RepositoryError(String),
}

impl std::fmt::Display for FastModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FastModeError::GameNotFound => write!(f, "Game not found"),
            FastModeError::GameNotLive => write!(f, "Game is not live"),
            FastModeError::TimeoutDecisionPending => write!(f, "A timeout decision is pending"),
            FastModeError::NotYourTeam => {
                write!(f, "Only the team to move may enable fast mode")
            }
            FastModeError::NotAParticipant => {
                write!(f, "User is not an active participant in this game")
            }
            FastModeError::NoPlayersInTeam => {
                write!(f, "The team to move has no active players")
            }
            FastModeError::GameBusy => write!(f, "Game is busy, try again"),
            FastModeError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for FastModeError {}

impl From<GameLockError> for FastModeError {
    fn from(error: GameLockError) -> Self {
        match error {
            GameLockError::Busy => FastModeError::GameBusy,
            GameLockError::Infrastructure(msg) => FastModeError::RepositoryError(msg),
        }
    }
}

impl From<GameRepositoryError> for FastModeError {
    fn from(error: GameRepositoryError) -> Self {
        match error {
            GameRepositoryError::NotFound => FastModeError::GameNotFound,
            other => FastModeError::RepositoryError(other.to_string()),
        }
    }
}

impl From<TurnContextError> for FastModeError {
    fn from(error: TurnContextError) -> Self {
        match error {
            TurnContextError::NoPlayersInTeam => FastModeError::NoPlayersInTeam,
            TurnContextError::NotYourTurn => FastModeError::NotYourTeam,
            TurnContextError::RepositoryError(msg) => FastModeError::RepositoryError(msg),
        }
    }
}

impl From<TeamMemberRepositoryError> for FastModeError {
    fn from(error: TeamMemberRepositoryError) -> Self {
        match error {
            TeamMemberRepositoryError::NotFound => FastModeError::NotAParticipant,
            other => FastModeError::RepositoryError(other.to_string()),
        }
    }
}
