#[derive(Debug)]
pub enum TurnContextError {
    /// The team to move has no active roster members.
    NoPlayersInTeam,
    /// The acting user is not the designated mover.
    NotYourTurn,
    RepositoryError(String),
}

impl std::fmt::Display for TurnContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnContextError::NoPlayersInTeam => {
                write!(f, "The team to move has no active players")
            }
            TurnContextError::NotYourTurn => write!(f, "It is not your turn to move"),
            TurnContextError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for TurnContextError {}
