use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::{
    fast_mode_errors::FastModeError, game_lifecycle_errors::GameLifecycleError,
    game_query_errors::GameQueryError, hand_brain_errors::HandBrainServiceError,
    move_service_errors::MoveServiceError, timeout_service_errors::TimeoutServiceError,
    werewolf_service_errors::WerewolfServiceError,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Query(GameQueryError),
    Move(MoveServiceError),
    Timeout(TimeoutServiceError),
    FastMode(FastModeError),
    HandBrain(HandBrainServiceError),
    Werewolf(WerewolfServiceError),
    Lifecycle(GameLifecycleError),
}

impl From<GameQueryError> for ApiError {
    fn from(error: GameQueryError) -> Self {
        ApiError::Query(error)
    }
}

impl From<MoveServiceError> for ApiError {
    fn from(error: MoveServiceError) -> Self {
        ApiError::Move(error)
    }
}

impl From<TimeoutServiceError> for ApiError {
    fn from(error: TimeoutServiceError) -> Self {
        ApiError::Timeout(error)
    }
}

impl From<FastModeError> for ApiError {
    fn from(error: FastModeError) -> Self {
        ApiError::FastMode(error)
    }
}

impl From<HandBrainServiceError> for ApiError {
    fn from(error: HandBrainServiceError) -> Self {
        ApiError::HandBrain(error)
    }
}

impl From<WerewolfServiceError> for ApiError {
    fn from(error: WerewolfServiceError) -> Self {
        ApiError::Werewolf(error)
    }
}

impl From<GameLifecycleError> for ApiError {
    fn from(error: GameLifecycleError) -> Self {
        ApiError::Lifecycle(error)
    }
}

impl ApiError {
    /// Taxonomy: not-found 404, wrong-state/busy conflicts 409, wrong
    /// actor 403, malformed input 422, infrastructure 500.
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(GameQueryError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::Query(GameQueryError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::Move(MoveServiceError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::Move(
                MoveServiceError::GameNotLive
                | MoveServiceError::TimeoutDecisionPending
                | MoveServiceError::GameBusy
                | MoveServiceError::NoPlayersInTeam
                | MoveServiceError::TurnExpired,
            ) => StatusCode::CONFLICT,
            ApiError::Move(MoveServiceError::NotYourTurn) => StatusCode::FORBIDDEN,
            ApiError::Move(
                MoveServiceError::InvalidUci(_)
                | MoveServiceError::IllegalMove(_)
                | MoveServiceError::HandBrain(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Move(
                MoveServiceError::InvalidPosition(_) | MoveServiceError::RepositoryError(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::Timeout(TimeoutServiceError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::Timeout(
                TimeoutServiceError::GameNotLive
                | TimeoutServiceError::GameBusy
                | TimeoutServiceError::NoPlayersInTeam
                | TimeoutServiceError::NoDecisionPending
                | TimeoutServiceError::ClaimNotAvailable,
            ) => StatusCode::CONFLICT,
            ApiError::Timeout(
                TimeoutServiceError::NotYourTeamToDecide
                | TimeoutServiceError::NotYourTeamToClaim
                | TimeoutServiceError::NotAParticipant,
            ) => StatusCode::FORBIDDEN,
            ApiError::Timeout(TimeoutServiceError::InvalidDecision(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Timeout(
                TimeoutServiceError::InvalidPosition(_) | TimeoutServiceError::RepositoryError(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::FastMode(FastModeError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::FastMode(
                FastModeError::GameNotLive
                | FastModeError::TimeoutDecisionPending
                | FastModeError::GameBusy
                | FastModeError::NoPlayersInTeam,
            ) => StatusCode::CONFLICT,
            ApiError::FastMode(FastModeError::NotYourTeam | FastModeError::NotAParticipant) => {
                StatusCode::FORBIDDEN
            }
            ApiError::FastMode(FastModeError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::HandBrain(HandBrainServiceError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::HandBrain(
                HandBrainServiceError::GameNotLive
                | HandBrainServiceError::NotHandBrainMode
                | HandBrainServiceError::AlreadyWaitingOnHand
                | HandBrainServiceError::NoPlayersInTeam
                | HandBrainServiceError::GameBusy,
            ) => StatusCode::CONFLICT,
            ApiError::HandBrain(
                HandBrainServiceError::NotTheBrain | HandBrainServiceError::NotAParticipant,
            ) => StatusCode::FORBIDDEN,
            ApiError::HandBrain(HandBrainServiceError::InvalidPiece(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::HandBrain(HandBrainServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::Werewolf(WerewolfServiceError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::Werewolf(
                WerewolfServiceError::NotWerewolfMode
                | WerewolfServiceError::VoteNotOpen
                | WerewolfServiceError::AlreadyVoted
                | WerewolfServiceError::GameBusy,
            ) => StatusCode::CONFLICT,
            ApiError::Werewolf(WerewolfServiceError::NotAParticipant) => StatusCode::FORBIDDEN,
            ApiError::Werewolf(WerewolfServiceError::SuspectNotAParticipant) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Werewolf(WerewolfServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::Lifecycle(GameLifecycleError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::Lifecycle(
                GameLifecycleError::GameNotInLobby | GameLifecycleError::GameBusy,
            ) => StatusCode::CONFLICT,
            ApiError::Lifecycle(GameLifecycleError::NotAParticipant) => StatusCode::FORBIDDEN,
            ApiError::Lifecycle(GameLifecycleError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Query(e) => e.to_string(),
            ApiError::Move(e) => e.to_string(),
            ApiError::Timeout(e) => e.to_string(),
            ApiError::FastMode(e) => e.to_string(),
            ApiError::HandBrain(e) => e.to_string(),
            ApiError::Werewolf(e) => e.to_string(),
            ApiError::Lifecycle(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self.message());
        }
        (
            status,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
