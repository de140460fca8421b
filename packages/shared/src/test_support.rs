//! In-memory repository fakes and a seeding helper for multi-step
//! service tests. Mockall mocks cover single-interaction expectations;
//! these fakes carry state across a whole scenario (play a move, tick
//! the clock, decide, play again) the way the DynamoDB tables would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::TurnTimingConfig;
use crate::models::game::{Game, GameMode, GameStatus, TeamName};
use crate::models::game_move::GameMove;
use crate::models::team::{Team, TeamMember};
use crate::models::werewolf::{GameRole, UserWerewolfStats, WerewolfVote};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::lock_repository_errors::GameLockRepositoryError;
use crate::repositories::errors::move_repository_errors::MoveRepositoryError;
use crate::repositories::errors::roster_repository_errors::{
    TeamMemberRepositoryError, TeamRepositoryError,
};
use crate::repositories::errors::werewolf_repository_errors::{
    GameRoleRepositoryError, WerewolfStatsRepositoryError, WerewolfVoteRepositoryError,
};
use crate::repositories::game_repository::GameRepository;
use crate::repositories::lock_repository::{GameLockLease, GameLockRepository};
use crate::repositories::member_repository::TeamMemberRepository;
use crate::repositories::move_repository::MoveRepository;
use crate::repositories::role_repository::GameRoleRepository;
use crate::repositories::stats_repository::WerewolfStatsRepository;
use crate::repositories::team_repository::TeamRepository;
use crate::repositories::vote_repository::WerewolfVoteRepository;
use crate::services::game_lock::GameLockService;
use crate::services::turn_context::TurnContextResolver;

#[derive(Default)]
pub struct InMemoryGameRepository {
    games: Mutex<HashMap<String, Game>>,
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        self.games
            .lock()
            .unwrap()
            .insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Game, GameRepositoryError> {
        self.games
            .lock()
            .unwrap()
            .get(game_id)
            .cloned()
            .ok_or(GameRepositoryError::NotFound)
    }

    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut games = self.games.lock().unwrap();
        if !games.contains_key(&game.id) {
            return Err(GameRepositoryError::NotFound);
        }
        games.insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<Game>, GameRepositoryError> {
        let games = self.games.lock().unwrap();
        Ok(games
            .values()
            .filter(|g| g.status == GameStatus::Live)
            .filter(|g| g.effective_deadline().is_some_and(|d| now > d))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryTeamRepository {
    teams: Mutex<HashMap<(String, TeamName), Team>>,
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create_team(&self, team: &Team) -> Result<(), TeamRepositoryError> {
        self.teams
            .lock()
            .unwrap()
            .insert((team.game_id.clone(), team.name), team.clone());
        Ok(())
    }

    async fn get_team(&self, game_id: &str, name: TeamName) -> Result<Team, TeamRepositoryError> {
        self.teams
            .lock()
            .unwrap()
            .get(&(game_id.to_string(), name))
            .cloned()
            .ok_or(TeamRepositoryError::NotFound)
    }

    async fn update_team(&self, team: &Team) -> Result<(), TeamRepositoryError> {
        let mut teams = self.teams.lock().unwrap();
        let key = (team.game_id.clone(), team.name);
        if !teams.contains_key(&key) {
            return Err(TeamRepositoryError::NotFound);
        }
        teams.insert(key, team.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTeamMemberRepository {
    members: Mutex<HashMap<String, TeamMember>>,
}

#[async_trait]
impl TeamMemberRepository for InMemoryTeamMemberRepository {
    async fn create_member(&self, member: &TeamMember) -> Result<(), TeamMemberRepositoryError> {
        self.members
            .lock()
            .unwrap()
            .insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn update_member(&self, member: &TeamMember) -> Result<(), TeamMemberRepositoryError> {
        let mut members = self.members.lock().unwrap();
        if !members.contains_key(&member.id) {
            return Err(TeamMemberRepositoryError::NotFound);
        }
        members.insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn active_members_ordered(
        &self,
        team_id: &str,
    ) -> Result<Vec<TeamMember>, TeamMemberRepositoryError> {
        let members = self.members.lock().unwrap();
        let mut roster: Vec<TeamMember> = members
            .values()
            .filter(|m| m.team_id == team_id && m.active)
            .cloned()
            .collect();
        roster.sort_by_key(|m| m.position);
        Ok(roster)
    }

    async fn active_participants(
        &self,
        game_id: &str,
    ) -> Result<Vec<TeamMember>, TeamMemberRepositoryError> {
        let members = self.members.lock().unwrap();
        Ok(members
            .values()
            .filter(|m| m.game_id == game_id && m.active)
            .cloned()
            .collect())
    }

    async fn find_by_game_and_user(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<TeamMember, TeamMemberRepositoryError> {
        self.active_participants(game_id)
            .await?
            .into_iter()
            .find(|m| m.user_id == user_id)
            .ok_or(TeamMemberRepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct InMemoryMoveRepository {
    moves: Mutex<HashMap<(String, u32), GameMove>>,
}

#[async_trait]
impl MoveRepository for InMemoryMoveRepository {
    async fn add_move(&self, game_move: &GameMove) -> Result<(), MoveRepositoryError> {
        let mut moves = self.moves.lock().unwrap();
        let key = (game_move.game_id.clone(), game_move.ply);
        if moves.contains_key(&key) {
            return Err(MoveRepositoryError::DuplicatePly);
        }
        moves.insert(key, game_move.clone());
        Ok(())
    }

    async fn list_moves(&self, game_id: &str) -> Result<Vec<GameMove>, MoveRepositoryError> {
        let moves = self.moves.lock().unwrap();
        let mut listed: Vec<GameMove> = moves
            .values()
            .filter(|m| m.game_id == game_id)
            .cloned()
            .collect();
        listed.sort_by_key(|m| m.ply);
        Ok(listed)
    }
}

#[derive(Default)]
pub struct InMemoryGameLockRepository {
    leases: Mutex<HashMap<String, GameLockLease>>,
}

#[async_trait]
impl GameLockRepository for InMemoryGameLockRepository {
    async fn try_acquire(&self, lease: &GameLockLease) -> Result<(), GameLockRepositoryError> {
        let mut leases = self.leases.lock().unwrap();
        if let Some(existing) = leases.get(&lease.game_id) {
            if existing.expires_at >= Utc::now() {
                return Err(GameLockRepositoryError::LockHeld);
            }
        }
        leases.insert(lease.game_id.clone(), lease.clone());
        Ok(())
    }

    async fn release(&self, game_id: &str, holder: &str) -> Result<(), GameLockRepositoryError> {
        let mut leases = self.leases.lock().unwrap();
        if leases.get(game_id).is_some_and(|l| l.holder == holder) {
            leases.remove(game_id);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryGameRoleRepository {
    roles: Mutex<HashMap<(String, String), GameRole>>,
}

#[async_trait]
impl GameRoleRepository for InMemoryGameRoleRepository {
    async fn add_role(&self, role: &GameRole) -> Result<(), GameRoleRepositoryError> {
        self.roles
            .lock()
            .unwrap()
            .insert((role.game_id.clone(), role.user_id.clone()), role.clone());
        Ok(())
    }

    async fn get_roles(&self, game_id: &str) -> Result<Vec<GameRole>, GameRoleRepositoryError> {
        let roles = self.roles.lock().unwrap();
        Ok(roles
            .values()
            .filter(|r| r.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn get_role(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<GameRole, GameRoleRepositoryError> {
        self.roles
            .lock()
            .unwrap()
            .get(&(game_id.to_string(), user_id.to_string()))
            .cloned()
            .ok_or(GameRoleRepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct InMemoryWerewolfVoteRepository {
    votes: Mutex<HashMap<(String, String), WerewolfVote>>,
}

#[async_trait]
impl WerewolfVoteRepository for InMemoryWerewolfVoteRepository {
    async fn add_vote(&self, vote: &WerewolfVote) -> Result<(), WerewolfVoteRepositoryError> {
        let mut votes = self.votes.lock().unwrap();
        let key = (vote.game_id.clone(), vote.voter_id.clone());
        if votes.contains_key(&key) {
            return Err(WerewolfVoteRepositoryError::DuplicateVote);
        }
        votes.insert(key, vote.clone());
        Ok(())
    }

    async fn list_votes(
        &self,
        game_id: &str,
    ) -> Result<Vec<WerewolfVote>, WerewolfVoteRepositoryError> {
        let votes = self.votes.lock().unwrap();
        Ok(votes
            .values()
            .filter(|v| v.game_id == game_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryWerewolfStatsRepository {
    stats: Mutex<HashMap<String, UserWerewolfStats>>,
}

#[async_trait]
impl WerewolfStatsRepository for InMemoryWerewolfStatsRepository {
    async fn increment_correct_identifications(
        &self,
        user_id: &str,
    ) -> Result<(), WerewolfStatsRepositoryError> {
        let mut stats = self.stats.lock().unwrap();
        let entry = stats
            .entry(user_id.to_string())
            .or_insert_with(|| UserWerewolfStats {
                user_id: user_id.to_string(),
                ..Default::default()
            });
        entry.correct_identifications += 1;
        Ok(())
    }

    async fn increment_werewolf_successes(
        &self,
        user_id: &str,
    ) -> Result<(), WerewolfStatsRepositoryError> {
        let mut stats = self.stats.lock().unwrap();
        let entry = stats
            .entry(user_id.to_string())
            .or_insert_with(|| UserWerewolfStats {
                user_id: user_id.to_string(),
                ..Default::default()
            });
        entry.werewolf_successes += 1;
        Ok(())
    }

    async fn get_stats(
        &self,
        user_id: &str,
    ) -> Result<Option<UserWerewolfStats>, WerewolfStatsRepositoryError> {
        Ok(self.stats.lock().unwrap().get(user_id).cloned())
    }
}

/// One bundle of fakes plus the common wiring every scenario needs.
pub struct TestWorld {
    pub games: Arc<InMemoryGameRepository>,
    pub teams: Arc<InMemoryTeamRepository>,
    pub members: Arc<InMemoryTeamMemberRepository>,
    pub moves: Arc<InMemoryMoveRepository>,
    pub locks: Arc<InMemoryGameLockRepository>,
    pub roles: Arc<InMemoryGameRoleRepository>,
    pub votes: Arc<InMemoryWerewolfVoteRepository>,
    pub stats: Arc<InMemoryWerewolfStatsRepository>,
    pub config: TurnTimingConfig,
}

impl TestWorld {
    pub fn new() -> Self {
        TestWorld {
            games: Arc::new(InMemoryGameRepository::default()),
            teams: Arc::new(InMemoryTeamRepository::default()),
            members: Arc::new(InMemoryTeamMemberRepository::default()),
            moves: Arc::new(InMemoryMoveRepository::default()),
            locks: Arc::new(InMemoryGameLockRepository::default()),
            roles: Arc::new(InMemoryGameRoleRepository::default()),
            votes: Arc::new(InMemoryWerewolfVoteRepository::default()),
            stats: Arc::new(InMemoryWerewolfStatsRepository::default()),
            config: TurnTimingConfig::default(),
        }
    }

    pub fn lock_service(&self) -> Arc<GameLockService> {
        Arc::new(GameLockService::new(
            self.locks.clone(),
            self.config.clone(),
        ))
    }

    pub fn turn_context(&self) -> Arc<TurnContextResolver> {
        Arc::new(TurnContextResolver::new(
            self.teams.clone(),
            self.members.clone(),
        ))
    }

    /// Seeds a live game with both teams and active rosters built from
    /// the given user ids, clock running for team A.
    pub async fn seed_live_game(
        &self,
        mode: GameMode,
        team_a_users: &[&str],
        team_b_users: &[&str],
    ) -> Game {
        let mut game = Game::new(mode);
        game.status = GameStatus::Live;
        game.turn_deadline = Some(Utc::now() + self.config.turn_deadline);
        self.games.create_game(&game).await.unwrap();

        for (name, users) in [(TeamName::A, team_a_users), (TeamName::B, team_b_users)] {
            let team = Team::new(&game.id, name);
            self.teams.create_team(&team).await.unwrap();
            for (position, user_id) in users.iter().enumerate() {
                let member = TeamMember::new(&team.id, &game.id, user_id, position as u32);
                self.members.create_member(&member).await.unwrap();
            }
        }
        game
    }

    pub async fn game(&self, game_id: &str) -> Game {
        self.games.get_game(game_id).await.unwrap()
    }

    pub async fn team(&self, game_id: &str, name: TeamName) -> Team {
        self.teams.get_team(game_id, name).await.unwrap()
    }
}
