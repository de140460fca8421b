use crate::models::game::PieceKind;

/// Why a hand-brain-gated move was rejected. Carried inside the move
/// service error so the web layer can report the exact violation.
#[derive(Debug, PartialEq, Eq)]
pub enum HandBrainViolation {
    /// The brain has not supplied a piece hint yet.
    MissingHint,
    /// The acting member is not the assigned hand.
    WrongAssignee,
    /// The moved piece does not match the hinted piece type.
    HintMismatch { hinted: PieceKind, moved: PieceKind },
    /// No piece could be resolved at the move's origin square.
    UnknownPiece,
}

impl std::fmt::Display for HandBrainViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandBrainViolation::MissingHint => {
                write!(f, "The brain has not given a piece hint yet")
            }
            HandBrainViolation::WrongAssignee => {
                write!(f, "Only the assigned hand may move this turn")
            }
            HandBrainViolation::HintMismatch { hinted, moved } => write!(
                f,
                "Hint was {} but the move plays a {}",
                hinted.as_str(),
                moved.as_str()
            ),
            HandBrainViolation::UnknownPiece => {
                write!(f, "No piece on the move's origin square")
            }
        }
    }
}

#[derive(Debug)]
pub enum HandBrainServiceError {
    GameNotFound,
    GameNotLive,
    NotHandBrainMode,
    /// Hint already set; the hand must move before a new hint.
    AlreadyWaitingOnHand,
    /// The acting user is not the assigned brain member.
    NotTheBrain,
    NotAParticipant,
    InvalidPiece(String),
    NoPlayersInTeam,
    GameBusy,
    RepositoryError(String),
}

impl std::fmt::Display for HandBrainServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandBrainServiceError::GameNotFound => write!(f, "Game not found"),
            HandBrainServiceError::GameNotLive => write!(f, "Game is not live"),
            HandBrainServiceError::NotHandBrainMode => {
                write!(f, "Game is not in hand & brain mode")
            }
            HandBrainServiceError::AlreadyWaitingOnHand => {
                write!(f, "A hint is already set; waiting on the hand to move")
            }
            HandBrainServiceError::NotTheBrain => {
                write!(f, "Only the assigned brain may set the hint")
            }
            HandBrainServiceError::NotAParticipant => {
                write!(f, "User is not an active participant in this game")
            }
            HandBrainServiceError::InvalidPiece(value) => {
                write!(f, "Unknown piece type: {}", value)
            }
            HandBrainServiceError::NoPlayersInTeam => {
                write!(f, "The team to move has no active players")
            }
            HandBrainServiceError::GameBusy => write!(f, "Game is busy, try again"),
            HandBrainServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for HandBrainServiceError {}

impl From<super::game_lock_errors::GameLockError> for HandBrainServiceError {
    fn from(error: super::game_lock_errors::GameLockError) -> Self {
        match error {
            super::game_lock_errors::GameLockError::Busy => HandBrainServiceError::GameBusy,
            super::game_lock_errors::GameLockError::Infrastructure(msg) => {
                HandBrainServiceError::RepositoryError(msg)
            }
        }
    }
}

impl From<super::turn_context_errors::TurnContextError> for HandBrainServiceError {
    fn from(error: super::turn_context_errors::TurnContextError) -> Self {
        match error {
            super::turn_context_errors::TurnContextError::NoPlayersInTeam => {
                HandBrainServiceError::NoPlayersInTeam
            }
            super::turn_context_errors::TurnContextError::NotYourTurn => {
                HandBrainServiceError::NotTheBrain
            }
            super::turn_context_errors::TurnContextError::RepositoryError(msg) => {
                HandBrainServiceError::RepositoryError(msg)
            }
        }
    }
}

impl From<crate::repositories::errors::roster_repository_errors::TeamMemberRepositoryError>
    for HandBrainServiceError
{
    fn from(
        error: crate::repositories::errors::roster_repository_errors::TeamMemberRepositoryError,
    ) -> Self {
        match error {
            crate::repositories::errors::roster_repository_errors::TeamMemberRepositoryError::NotFound => {
                HandBrainServiceError::NotAParticipant
            }
            other => HandBrainServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<crate::repositories::errors::game_repository_errors::GameRepositoryError>
    for HandBrainServiceError
{
    fn from(
        error: crate::repositories::errors::game_repository_errors::GameRepositoryError,
    ) -> Self {
        match error {
            crate::repositories::errors::game_repository_errors::GameRepositoryError::NotFound => {
                HandBrainServiceError::GameNotFound
            }
            other => HandBrainServiceError::RepositoryError(other.to_string()),
        }
    }
}
