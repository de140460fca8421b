#[derive(Debug)]
pub enum RuleEngineError {
    InvalidPosition(String),
    IllegalMove(String),
}

impl std::fmt::Display for RuleEngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleEngineError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            RuleEngineError::IllegalMove(msg) => write!(f, "Illegal move: {}", msg),
        }
    }
}

impl std::error::Error for RuleEngineError {}
