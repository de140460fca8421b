#[derive(Debug)]
pub enum GameLockRepositoryError {
    /// Another holder currently owns the lease for this game.
    LockHeld,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for GameLockRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameLockRepositoryError::LockHeld => write!(f, "Game lock is held by another caller"),
            GameLockRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameLockRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for GameLockRepositoryError {}
