#[derive(Debug)]
pub enum GameRoleRepositoryError {
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for GameRoleRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameRoleRepositoryError::NotFound => write!(f, "Game role not found"),
            GameRoleRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameRoleRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for GameRoleRepositoryError {}

#[derive(Debug)]
pub enum WerewolfVoteRepositoryError {
    /// The (game, voter) pair already has a vote row.
    DuplicateVote,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for WerewolfVoteRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WerewolfVoteRepositoryError::DuplicateVote => {
                write!(f, "Voter has already cast a vote in this game")
            }
            WerewolfVoteRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            WerewolfVoteRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for WerewolfVoteRepositoryError {}

#[derive(Debug)]
pub enum WerewolfStatsRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for WerewolfStatsRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WerewolfStatsRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            WerewolfStatsRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for WerewolfStatsRepositoryError {}
