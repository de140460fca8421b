use std::sync::Arc;

use crate::models::projections::{GameStateProjection, MoveRecord};
use crate::repositories::game_repository::GameRepository;
use crate::repositories::move_repository::MoveRepository;
use crate::services::errors::game_query_errors::GameQueryError;

/// Lock-free reads: state and move-list projections. These may observe
/// a snapshot slightly behind a concurrent writer, which is fine.
pub struct GameQueryService {
    games: Arc<dyn GameRepository + Send + Sync>,
    moves: Arc<dyn MoveRepository + Send + Sync>,
}

impl GameQueryService {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        moves: Arc<dyn MoveRepository + Send + Sync>,
    ) -> Self {
        GameQueryService { games, moves }
    }

    pub async fn state(&self, game_id: &str) -> Result<GameStateProjection, GameQueryError> {
        let game = self.games.get_game(game_id).await?;
        Ok(GameStateProjection::from_game(&game))
    }

    pub async fn moves(&self, game_id: &str) -> Result<Vec<MoveRecord>, GameQueryError> {
        // Surface NotFound for unknown games instead of an empty list.
        self.games.get_game(game_id).await?;
        let moves = self.moves.list_moves(game_id).await?;
        Ok(moves.iter().map(MoveRecord::from).collect())
    }
}
