use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::TurnTimingConfig;
use crate::models::game::{Game, GameMode, GameStatus, TeamName};
use crate::models::team::{Team, TeamMember};
use crate::repositories::game_repository::GameRepository;
use crate::repositories::member_repository::TeamMemberRepository;
use crate::repositories::team_repository::TeamRepository;
use crate::services::errors::game_lifecycle_errors::GameLifecycleError;
use crate::services::game_lock::GameLockService;
use crate::services::hand_brain;
use crate::services::werewolf::WerewolfService;

/// Lobby bookkeeping: create a game with its two teams, let players
/// join and ready up, and flip the game live once everyone is ready.
pub struct GameLifecycleService {
    games: Arc<dyn GameRepository + Send + Sync>,
    teams: Arc<dyn TeamRepository + Send + Sync>,
    members: Arc<dyn TeamMemberRepository + Send + Sync>,
    lock: Arc<GameLockService>,
    werewolf: Arc<WerewolfService>,
    config: TurnTimingConfig,
}

impl GameLifecycleService {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        teams: Arc<dyn TeamRepository + Send + Sync>,
        members: Arc<dyn TeamMemberRepository + Send + Sync>,
        lock: Arc<GameLockService>,
        werewolf: Arc<WerewolfService>,
        config: TurnTimingConfig,
    ) -> Self {
        GameLifecycleService {
            games,
            teams,
            members,
            lock,
            werewolf,
            config,
        }
    }

    /// A fresh lobby game with both teams created up front.
    pub async fn create_game(
        &self,
        mode: GameMode,
        two_wolves_enabled: bool,
    ) -> Result<Game, GameLifecycleError> {
        let mut game = Game::new(mode);
        game.two_wolves_enabled = mode == GameMode::Werewolf && two_wolves_enabled;
        self.games.create_game(&game).await?;
        for name in [TeamName::A, TeamName::B] {
            self.teams.create_team(&Team::new(&game.id, name)).await?;
        }
        info!("Created {:?} game {}", mode, game.id);
        Ok(game)
    }

    /// Adds a user to a team's roster at the next free position.
    pub async fn join_team(
        &self,
        game_id: &str,
        team_name: TeamName,
        user_id: &str,
    ) -> Result<TeamMember, GameLifecycleError> {
        let lock = self.lock.acquire(game_id).await?;
        let result = self.join_team_locked(game_id, team_name, user_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn join_team_locked(
        &self,
        game_id: &str,
        team_name: TeamName,
        user_id: &str,
    ) -> Result<TeamMember, GameLifecycleError> {
        let game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Lobby {
            return Err(GameLifecycleError::GameNotInLobby);
        }
        let team = self.teams.get_team(game_id, team_name).await?;
        let roster = self.members.active_members_ordered(&team.id).await?;
        let position = roster.iter().map(|m| m.position + 1).max().unwrap_or(0);
        let member = TeamMember::new(&team.id, game_id, user_id, position);
        self.members.create_member(&member).await?;
        info!(
            "Game {}: {} joined team {} at position {}",
            game_id, user_id, team_name, position
        );
        Ok(member)
    }

    pub async fn mark_ready(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<(), GameLifecycleError> {
        let game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Lobby {
            return Err(GameLifecycleError::GameNotInLobby);
        }
        let mut member = self.members.find_by_game_and_user(game_id, user_id).await?;
        member.ready_to_start = true;
        self.members.update_member(&member).await?;
        Ok(())
    }

    /// Flips the game live when both teams have at least one active
    /// member and every active member is ready. Returns the game
    /// either way; the caller inspects `status`.
    pub async fn start_if_ready(&self, game_id: &str) -> Result<Game, GameLifecycleError> {
        let lock = self.lock.acquire(game_id).await?;
        let result = self.start_if_ready_locked(game_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn start_if_ready_locked(&self, game_id: &str) -> Result<Game, GameLifecycleError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Lobby {
            return Err(GameLifecycleError::GameNotInLobby);
        }

        let team_a = self.teams.get_team(game_id, TeamName::A).await?;
        let team_b = self.teams.get_team(game_id, TeamName::B).await?;
        let roster_a = self.members.active_members_ordered(&team_a.id).await?;
        let roster_b = self.members.active_members_ordered(&team_b.id).await?;
        let everyone_ready = !roster_a.is_empty()
            && !roster_b.is_empty()
            && roster_a.iter().chain(roster_b.iter()).all(|m| m.ready_to_start);
        if !everyone_ready {
            return Ok(game);
        }

        game.status = GameStatus::Live;
        game.turn_deadline = Some(Utc::now() + self.config.turn_deadline);
        if game.mode == GameMode::HandBrain {
            hand_brain::refresh_roles(&mut game, &roster_a, team_a.current_index);
        }
        if game.mode == GameMode::Werewolf {
            self.werewolf.assign_roles(&game).await?;
        }
        self.games.update_game(&game).await?;
        info!(
            "Game {} is live with {} vs {} players",
            game_id,
            roster_a.len(),
            roster_b.len()
        );
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::HandBrainRole;
    use crate::models::werewolf::WerewolfRole;
    use crate::repositories::role_repository::GameRoleRepository;
    use crate::services::random::testing::ScriptedRandom;
    use crate::test_support::TestWorld;

    fn service_for(world: &TestWorld) -> GameLifecycleService {
        let werewolf = Arc::new(WerewolfService::new(
            world.games.clone(),
            world.teams.clone(),
            world.members.clone(),
            world.roles.clone(),
            world.votes.clone(),
            world.stats.clone(),
            world.lock_service(),
            Arc::new(ScriptedRandom::new(vec![0])),
        ));
        GameLifecycleService::new(
            world.games.clone(),
            world.teams.clone(),
            world.members.clone(),
            world.lock_service(),
            werewolf,
            world.config.clone(),
        )
    }

    async fn join_and_ready(
        service: &GameLifecycleService,
        game_id: &str,
        team: TeamName,
        user_id: &str,
    ) {
        service.join_team(game_id, team, user_id).await.unwrap();
        service.mark_ready(game_id, user_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_game_builds_lobby_with_both_teams() {
        let world = TestWorld::new();
        let service = service_for(&world);

        let game = service.create_game(GameMode::Classic, false).await.unwrap();

        assert_eq!(game.status, GameStatus::Lobby);
        assert!(game.turn_deadline.is_none());
        assert_eq!(world.team(&game.id, TeamName::A).await.current_index, 0);
        assert_eq!(world.team(&game.id, TeamName::B).await.current_index, 0);
    }

    #[tokio::test]
    async fn test_join_assigns_sequential_positions() {
        let world = TestWorld::new();
        let service = service_for(&world);
        let game = service.create_game(GameMode::Classic, false).await.unwrap();

        let first = service
            .join_team(&game.id, TeamName::A, "u1")
            .await
            .unwrap();
        let second = service
            .join_team(&game.id, TeamName::A, "u2")
            .await
            .unwrap();

        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
    }

    #[tokio::test]
    async fn test_start_waits_for_everyone_ready() {
        let world = TestWorld::new();
        let service = service_for(&world);
        let game = service.create_game(GameMode::Classic, false).await.unwrap();

        join_and_ready(&service, &game.id, TeamName::A, "u1").await;
        service
            .join_team(&game.id, TeamName::B, "u2")
            .await
            .unwrap();

        // u2 has not readied up.
        let game_after = service.start_if_ready(&game.id).await.unwrap();
        assert_eq!(game_after.status, GameStatus::Lobby);

        service.mark_ready(&game.id, "u2").await.unwrap();
        let game_after = service.start_if_ready(&game.id).await.unwrap();

        assert_eq!(game_after.status, GameStatus::Live);
        assert!(game_after.turn_deadline.is_some());
        assert_eq!(game_after.turn_team, crate::models::game::TeamName::A);
    }

    #[tokio::test]
    async fn test_start_initializes_hand_brain_roles() {
        let world = TestWorld::new();
        let service = service_for(&world);
        let game = service
            .create_game(GameMode::HandBrain, false)
            .await
            .unwrap();
        join_and_ready(&service, &game.id, TeamName::A, "u1").await;
        join_and_ready(&service, &game.id, TeamName::A, "u2").await;
        join_and_ready(&service, &game.id, TeamName::B, "u3").await;

        let started = service.start_if_ready(&game.id).await.unwrap();

        assert_eq!(started.hand_brain_role, Some(HandBrainRole::Brain));
        assert!(started.hand_member_id.is_some());
        assert!(started.brain_member_id.is_some());
        assert_ne!(started.hand_member_id, started.brain_member_id);
    }

    #[tokio::test]
    async fn test_start_deals_werewolf_roles() {
        let world = TestWorld::new();
        let service = service_for(&world);
        let game = service.create_game(GameMode::Werewolf, false).await.unwrap();
        for (team, user) in [
            (TeamName::A, "u1"),
            (TeamName::A, "u2"),
            (TeamName::B, "u3"),
            (TeamName::B, "u4"),
        ] {
            join_and_ready(&service, &game.id, team, user).await;
        }

        let started = service.start_if_ready(&game.id).await.unwrap();

        assert_eq!(started.status, GameStatus::Live);
        let roles = world.roles.get_roles(&game.id).await.unwrap();
        assert_eq!(roles.len(), 4);
        assert_eq!(
            roles
                .iter()
                .filter(|r| r.role == WerewolfRole::Werewolf)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_lobby_operations_rejected_after_start() {
        let world = TestWorld::new();
        let service = service_for(&world);
        let game = service.create_game(GameMode::Classic, false).await.unwrap();
        join_and_ready(&service, &game.id, TeamName::A, "u1").await;
        join_and_ready(&service, &game.id, TeamName::B, "u2").await;
        service.start_if_ready(&game.id).await.unwrap();

        let result = service.join_team(&game.id, TeamName::A, "u3").await;
        assert!(matches!(
            result.unwrap_err(),
            GameLifecycleError::GameNotInLobby
        ));

        let result = service.start_if_ready(&game.id).await;
        assert!(matches!(
            result.unwrap_err(),
            GameLifecycleError::GameNotInLobby
        ));
    }
}
