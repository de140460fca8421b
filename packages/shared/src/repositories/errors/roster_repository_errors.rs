#[derive(Debug)]
pub enum TeamRepositoryError {
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for TeamRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRepositoryError::NotFound => write!(f, "Team not found"),
            TeamRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            TeamRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for TeamRepositoryError {}

#[derive(Debug)]
pub enum TeamMemberRepositoryError {
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for TeamMemberRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamMemberRepositoryError::NotFound => write!(f, "Team member not found"),
            TeamMemberRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            TeamMemberRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for TeamMemberRepositoryError {}
