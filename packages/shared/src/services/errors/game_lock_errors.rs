#[derive(Debug)]
pub enum GameLockError {
    /// The lock could not be acquired within the bounded wait. The
    /// caller should surface this as a transient busy condition.
    Busy,
    Infrastructure(String),
}

impl std::fmt::Display for GameLockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameLockError::Busy => write!(f, "Game is busy, try again"),
            GameLockError::Infrastructure(msg) => write!(f, "Lock infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for GameLockError {}
