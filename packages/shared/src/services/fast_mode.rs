use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::TurnTimingConfig;
use crate::models::game::{Game, GameStatus};
use crate::repositories::game_repository::GameRepository;
use crate::repositories::member_repository::TeamMemberRepository;
use crate::repositories::team_repository::TeamRepository;
use crate::services::errors::fast_mode_errors::FastModeError;
use crate::services::game_lock::GameLockService;

/// Fast mode trades the long-form turn deadline for a short countdown
/// on the current turn. Any member of the team to move may enable it;
/// it clears automatically when the move is played.
pub struct FastModeService {
    games: Arc<dyn GameRepository + Send + Sync>,
    teams: Arc<dyn TeamRepository + Send + Sync>,
    members: Arc<dyn TeamMemberRepository + Send + Sync>,
    lock: Arc<GameLockService>,
    config: TurnTimingConfig,
}

impl FastModeService {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        teams: Arc<dyn TeamRepository + Send + Sync>,
        members: Arc<dyn TeamMemberRepository + Send + Sync>,
        lock: Arc<GameLockService>,
        config: TurnTimingConfig,
    ) -> Self {
        FastModeService {
            games,
            teams,
            members,
            lock,
            config,
        }
    }

    pub async fn enable(&self, game_id: &str, user_id: &str) -> Result<Game, FastModeError> {
        let lock = self.lock.acquire(game_id).await?;
        let result = self.enable_locked(game_id, user_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn enable_locked(&self, game_id: &str, user_id: &str) -> Result<Game, FastModeError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(FastModeError::GameNotLive);
        }
        if game.timeout_decision_pending {
            return Err(FastModeError::TimeoutDecisionPending);
        }

        let member = self.members.find_by_game_and_user(game_id, user_id).await?;
        let team_to_move = self
            .teams
            .get_team(game_id, game.turn_team)
            .await
            .map_err(|e| FastModeError::RepositoryError(e.to_string()))?;
        if member.team_id != team_to_move.id {
            return Err(FastModeError::NotYourTeam);
        }

        game.fast_mode_enabled = true;
        game.fast_mode_deadline = Some(Utc::now() + self.config.fast_mode_deadline);
        self.games
            .update_game(&game)
            .await
            .map_err(|e| FastModeError::RepositoryError(e.to_string()))?;

        info!(
            "Game {}: fast mode enabled by {} for team {}",
            game_id, user_id, game.turn_team
        );
        Ok(game)
    }
}
