use std::sync::Arc;

use tracing::info;

use crate::models::game::{Game, GameStatus};
use crate::services::errors::rule_engine_errors::RuleEngineError;
use crate::services::rule_engine::{PositionStatus, RuleEngine};

/// Terminal-position check run after every applied move or timeout.
/// Checkmate is normally caught earlier from the SAN `#` marker; this
/// covers stalemate and dead positions, and doubles as a fallback when
/// no SAN is available.
pub struct GameEndEvaluator {
    rule_engine: Arc<dyn RuleEngine + Send + Sync>,
}

impl GameEndEvaluator {
    pub fn new(rule_engine: Arc<dyn RuleEngine + Send + Sync>) -> Self {
        GameEndEvaluator { rule_engine }
    }

    /// Finalizes `game` in place when the position is terminal.
    /// Returns whether the game is over so callers can clear deadlines
    /// and open the werewolf vote uniformly.
    pub fn evaluate(&self, game: &mut Game) -> Result<bool, RuleEngineError> {
        if game.status == GameStatus::Finished {
            return Ok(true);
        }
        let result = match self.rule_engine.position_status(&game.fen)? {
            PositionStatus::Ongoing => return Ok(false),
            // The side to move in the FEN is the mated side.
            PositionStatus::Checkmate => format!("{}#", game.turn_team.opponent()),
            PositionStatus::Stalemate => "stalemate".to_string(),
            PositionStatus::InsufficientMaterial => "draw".to_string(),
        };
        info!("Game {} is over: {}", game.id, result);
        game.result = Some(result);
        game.status = GameStatus::Finished;
        game.clear_deadlines();
        Ok(true)
    }
}
