#[derive(Debug)]
pub enum MoveRepositoryError {
    /// A row for this (game, ply) already exists. Surfacing this as a
    /// typed error keeps the gap-free ply sequence enforceable at the
    /// storage layer as well as under the game lock.
    DuplicatePly,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for MoveRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRepositoryError::DuplicatePly => {
                write!(f, "A move with this ply is already recorded")
            }
            MoveRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            MoveRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for MoveRepositoryError {}
