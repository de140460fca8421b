use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::move_repository_errors::MoveRepositoryError;

#[derive(Debug)]
pub enum GameQueryError {
    GameNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for GameQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameQueryError::GameNotFound => write!(f, "Game not found"),
            GameQueryError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GameQueryError {}

impl From<GameRepositoryError> for GameQueryError {
    fn from(error: GameRepositoryError) -> Self {
        match error {
            GameRepositoryError::NotFound => GameQueryError::GameNotFound,
            other => GameQueryError::RepositoryError(other.to_string()),
        }
    }
}

impl From<MoveRepositoryError> for GameQueryError {
    fn from(error: MoveRepositoryError) -> Self {
        GameQueryError::RepositoryError(error.to_string())
    }
}
