use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::game::{Game, GameMode, TeamName};
use crate::models::werewolf::{GameRole, WerewolfRole, WerewolfVote};
use crate::repositories::game_repository::GameRepository;
use crate::repositories::member_repository::TeamMemberRepository;
use crate::repositories::role_repository::GameRoleRepository;
use crate::repositories::stats_repository::WerewolfStatsRepository;
use crate::repositories::team_repository::TeamRepository;
use crate::repositories::vote_repository::WerewolfVoteRepository;
use crate::services::errors::werewolf_service_errors::WerewolfServiceError;
use crate::services::game_lock::GameLockService;
use crate::services::random::RandomSource;

/// Minimum active players before hidden roles are dealt at all.
const MIN_PLAYERS_FOR_ROLES: usize = 4;

/// Opens the post-game identification vote. Callers flip this inside
/// their own locked section when a werewolf game finishes.
pub fn open_vote(game: &mut Game) {
    game.vote_open = true;
    game.vote_started_at = Some(Utc::now());
}

/// The team whose result code says it lost, if any. `"A#"` names the
/// mating side, so the loser is the opposite team; `"B+Atimeout"`
/// names the loser between `+` and `timeout`; `"resignA"`/`"timeoutA"`
/// name the loser directly; draw codes have no loser.
pub fn parse_losing_team(result: &str) -> Option<TeamName> {
    let team_from = |s: &str| match s {
        "A" => Some(TeamName::A),
        "B" => Some(TeamName::B),
        _ => None,
    };
    if let Some(winner) = result.strip_suffix('#') {
        return team_from(winner).map(|team| team.opponent());
    }
    if let Some(rest) = result.split_once('+').map(|(_, rest)| rest) {
        if let Some(loser) = rest.strip_suffix("timeout") {
            return team_from(loser);
        }
    }
    if let Some(loser) = result.strip_prefix("resign") {
        return team_from(loser);
    }
    if let Some(loser) = result.strip_prefix("timeout") {
        return team_from(loser);
    }
    None
}

/// Hidden-role assignment at game start and the post-game vote:
/// casting, auto-close at full turnout, strict-majority tally, and the
/// stats rewards that follow.
pub struct WerewolfService {
    games: Arc<dyn GameRepository + Send + Sync>,
    teams: Arc<dyn TeamRepository + Send + Sync>,
    members: Arc<dyn TeamMemberRepository + Send + Sync>,
    roles: Arc<dyn GameRoleRepository + Send + Sync>,
    votes: Arc<dyn WerewolfVoteRepository + Send + Sync>,
    stats: Arc<dyn WerewolfStatsRepository + Send + Sync>,
    lock: Arc<GameLockService>,
    random: Arc<dyn RandomSource>,
}

impl WerewolfService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        teams: Arc<dyn TeamRepository + Send + Sync>,
        members: Arc<dyn TeamMemberRepository + Send + Sync>,
        roles: Arc<dyn GameRoleRepository + Send + Sync>,
        votes: Arc<dyn WerewolfVoteRepository + Send + Sync>,
        stats: Arc<dyn WerewolfStatsRepository + Send + Sync>,
        lock: Arc<GameLockService>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        WerewolfService {
            games,
            teams,
            members,
            roles,
            votes,
            stats,
            lock,
            random,
        }
    }

    /// Deals hidden roles to every active player: villagers by
    /// default, then one uniformly-picked werewolf per team when
    /// `two_wolves_enabled` and both rosters are non-empty, else one
    /// werewolf overall. Skipped entirely below four active players.
    /// Runs inside the caller's game-start critical section, so it
    /// takes no lock of its own.
    pub async fn assign_roles(&self, game: &Game) -> Result<(), WerewolfServiceError> {
        if game.mode != GameMode::Werewolf {
            return Err(WerewolfServiceError::NotWerewolfMode);
        }
        let team_a = self.teams.get_team(&game.id, TeamName::A).await?;
        let team_b = self.teams.get_team(&game.id, TeamName::B).await?;
        let roster_a = self.members.active_members_ordered(&team_a.id).await?;
        let roster_b = self.members.active_members_ordered(&team_b.id).await?;
        let total = roster_a.len() + roster_b.len();
        if total < MIN_PLAYERS_FOR_ROLES {
            info!(
                "Game {}: {} active players, not dealing werewolf roles",
                game.id, total
            );
            return Ok(());
        }

        let mut roles: Vec<GameRole> = roster_a
            .iter()
            .map(|m| GameRole::villager(&game.id, &m.user_id, TeamName::A))
            .chain(
                roster_b
                    .iter()
                    .map(|m| GameRole::villager(&game.id, &m.user_id, TeamName::B)),
            )
            .collect();

        if game.two_wolves_enabled && !roster_a.is_empty() && !roster_b.is_empty() {
            let wolf_a = self.random.pick(roster_a.len());
            let wolf_b = roster_a.len() + self.random.pick(roster_b.len());
            roles[wolf_a].role = WerewolfRole::Werewolf;
            roles[wolf_b].role = WerewolfRole::Werewolf;
        } else {
            let wolf = self.random.pick(total);
            roles[wolf].role = WerewolfRole::Werewolf;
        }

        for role in &roles {
            self.roles.add_role(role).await?;
        }
        info!("Game {}: dealt roles to {} players", game.id, total);
        Ok(())
    }

    /// Records one identification vote. When the vote count reaches
    /// the number of active participants the vote closes and scores
    /// itself.
    pub async fn cast_vote(
        &self,
        game_id: &str,
        voter_id: &str,
        suspect_id: &str,
    ) -> Result<Game, WerewolfServiceError> {
        let lock = self.lock.acquire(game_id).await?;
        let result = self.cast_vote_locked(game_id, voter_id, suspect_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn cast_vote_locked(
        &self,
        game_id: &str,
        voter_id: &str,
        suspect_id: &str,
    ) -> Result<Game, WerewolfServiceError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.mode != GameMode::Werewolf {
            return Err(WerewolfServiceError::NotWerewolfMode);
        }
        if !game.vote_open {
            return Err(WerewolfServiceError::VoteNotOpen);
        }

        let participants = self.members.active_participants(game_id).await?;
        if !participants.iter().any(|m| m.user_id == voter_id) {
            return Err(WerewolfServiceError::NotAParticipant);
        }
        if !participants.iter().any(|m| m.user_id == suspect_id) {
            return Err(WerewolfServiceError::SuspectNotAParticipant);
        }

        self.votes
            .add_vote(&WerewolfVote::new(game_id, voter_id, suspect_id))
            .await?;

        let votes = self.votes.list_votes(game_id).await?;
        if votes.len() >= participants.len() {
            self.close_vote_locked(&mut game, &votes).await?;
        }
        self.games.update_game(&game).await?;
        Ok(game)
    }

    /// Explicit close for a vote that never reached full turnout.
    pub async fn close_vote(&self, game_id: &str) -> Result<Game, WerewolfServiceError> {
        let lock = self.lock.acquire(game_id).await?;
        let result = self.close_vote_by_id(game_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn close_vote_by_id(&self, game_id: &str) -> Result<Game, WerewolfServiceError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.mode != GameMode::Werewolf {
            return Err(WerewolfServiceError::NotWerewolfMode);
        }
        if !game.vote_open {
            return Err(WerewolfServiceError::VoteNotOpen);
        }
        let votes = self.votes.list_votes(game_id).await?;
        self.close_vote_locked(&mut game, &votes).await?;
        self.games.update_game(&game).await?;
        Ok(game)
    }

    async fn close_vote_locked(
        &self,
        game: &mut Game,
        votes: &[WerewolfVote],
    ) -> Result<(), WerewolfServiceError> {
        let roles = self.roles.get_roles(&game.id).await?;
        let wolves: Vec<&GameRole> = roles
            .iter()
            .filter(|r| r.role == WerewolfRole::Werewolf)
            .collect();

        let mut tally: HashMap<&str, usize> = HashMap::new();
        for vote in votes {
            *tally.entry(vote.suspect_id.as_str()).or_default() += 1;
        }
        let majority_suspect = majority(&tally, votes.len());

        match majority_suspect {
            Some(suspect) if wolves.iter().any(|w| w.user_id == suspect) => {
                for vote in votes.iter().filter(|v| v.suspect_id == suspect) {
                    self.stats
                        .increment_correct_identifications(&vote.voter_id)
                        .await?;
                    info!(
                        "Game {}: rewarding {} (reason: correct_identification of {})",
                        game.id, vote.voter_id, suspect
                    );
                }
            }
            Some(suspect) => {
                info!(
                    "Game {}: majority suspect {} was not a werewolf, no rewards",
                    game.id, suspect
                );
            }
            None => {
                let result = game.result.as_deref().unwrap_or_default();
                let losing_team = parse_losing_team(result);
                for wolf in &wolves {
                    let rewarded = if votes.is_empty() && losing_team.is_none() {
                        // Drawn game, nobody voted: every wolf went
                        // undetected.
                        true
                    } else {
                        losing_team == Some(wolf.team)
                    };
                    if rewarded {
                        self.stats
                            .increment_werewolf_successes(&wolf.user_id)
                            .await?;
                        info!(
                            "Game {}: rewarding {} (reason: undetected_werewolf, result {})",
                            game.id, wolf.user_id, result
                        );
                    }
                }
            }
        }

        game.vote_open = false;
        info!("Game {}: werewolf vote closed ({} votes)", game.id, votes.len());
        Ok(())
    }
}

/// The unique highest-voted suspect, only when their count strictly
/// exceeds half the votes cast. Ties mean no majority.
fn majority<'a>(tally: &HashMap<&'a str, usize>, total_votes: usize) -> Option<&'a str> {
    let (&suspect, &count) = tally.iter().max_by_key(|(_, &count)| count)?;
    if count * 2 <= total_votes {
        return None;
    }
    if tally.values().filter(|&&c| c == count).count() > 1 {
        return None;
    }
    Some(suspect)
}
