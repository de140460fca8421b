use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::TurnTimingConfig;
use crate::models::game::{Game, GameMode, GameStatus, TeamName};
use crate::models::game_move::GameMove;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::member_repository::TeamMemberRepository;
use crate::repositories::move_repository::MoveRepository;
use crate::repositories::team_repository::TeamRepository;
use crate::services::errors::timeout_service_errors::TimeoutServiceError;
use crate::services::game_end::GameEndEvaluator;
use crate::services::game_lock::GameLockService;
use crate::services::hand_brain;
use crate::services::werewolf::open_vote;

/// What the opposing team chose to do about a recorded timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutDecision {
    /// End the game; the timed-out team loses.
    End,
    /// Skip to the timed-out team's next member and play on.
    AllowNext,
}

impl TimeoutDecision {
    pub fn parse(value: &str) -> Option<TimeoutDecision> {
        match value {
            "end" => Some(TimeoutDecision::End),
            "allow_next" => Some(TimeoutDecision::AllowNext),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum TickOutcome {
    /// No deadline has passed; nothing changed.
    NotDue,
    /// A timeout was recorded and a decision is now pending.
    TimedOut(Game),
}

/// The timeout half of the turn state machine: the sweeper-driven
/// `tick`, the opposing team's decision, and the claim-victory path
/// once a team has timed out too many turns in a row.
pub struct TimeoutService {
    games: Arc<dyn GameRepository + Send + Sync>,
    teams: Arc<dyn TeamRepository + Send + Sync>,
    members: Arc<dyn TeamMemberRepository + Send + Sync>,
    moves: Arc<dyn MoveRepository + Send + Sync>,
    lock: Arc<GameLockService>,
    evaluator: Arc<GameEndEvaluator>,
    config: TurnTimingConfig,
}

impl TimeoutService {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        teams: Arc<dyn TeamRepository + Send + Sync>,
        members: Arc<dyn TeamMemberRepository + Send + Sync>,
        moves: Arc<dyn MoveRepository + Send + Sync>,
        lock: Arc<GameLockService>,
        evaluator: Arc<GameEndEvaluator>,
        config: TurnTimingConfig,
    ) -> Self {
        TimeoutService {
            games,
            teams,
            members,
            moves,
            lock,
            evaluator,
            config,
        }
    }

    /// Checks the game's clock and records a timeout pass if the turn
    /// deadline has passed. Safe to call repeatedly; a tick that finds
    /// no running deadline is a no-op, so the sweeper and an on-demand
    /// tick racing each other record at most one timeout.
    pub async fn tick(&self, game_id: &str) -> Result<TickOutcome, TimeoutServiceError> {
        let game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(TimeoutServiceError::GameNotLive);
        }

        let lock = self.lock.acquire(game_id).await?;
        let result = self.tick_locked(game_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn tick_locked(&self, game_id: &str) -> Result<TickOutcome, TimeoutServiceError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(TimeoutServiceError::GameNotLive);
        }
        if game.timeout_decision_pending {
            return Ok(TickOutcome::NotDue);
        }
        match game.effective_deadline() {
            Some(deadline) if Utc::now() > deadline => {}
            _ => return Ok(TickOutcome::NotDue),
        }

        let timed_out_team = game.turn_team;
        game.ply += 1;
        let pass = GameMove::timeout_pass(game_id, game.ply, timed_out_team, &game.fen);

        if game.last_timeout_team == Some(timed_out_team) {
            game.consecutive_timeouts += 1;
        } else {
            game.consecutive_timeouts = 1;
        }
        game.last_timeout_team = Some(timed_out_team);

        // The clock stops until the opposing team decides.
        game.timeout_decision_pending = true;
        game.timeout_timed_out_team = Some(timed_out_team);
        game.timeout_decision_team = Some(timed_out_team.opponent());
        game.clear_deadlines();

        // The position did not change, but a stale game can still turn
        // out to be terminal here (e.g. dead material).
        if self.evaluator.evaluate(&mut game)? && game.mode == GameMode::Werewolf {
            open_vote(&mut game);
        }

        self.moves.add_move(&pass).await?;
        self.games.update_game(&game).await?;

        info!(
            "Game {}: team {} timed out (streak {}), awaiting decision from {}",
            game_id,
            timed_out_team,
            game.consecutive_timeouts,
            timed_out_team.opponent()
        );
        Ok(TickOutcome::TimedOut(game))
    }

    /// The opposing team resolves a pending timeout: end the game, or
    /// let the timed-out team's next member play.
    pub async fn decide(
        &self,
        game_id: &str,
        user_id: &str,
        decision: &str,
    ) -> Result<Game, TimeoutServiceError> {
        let decision = TimeoutDecision::parse(decision)
            .ok_or_else(|| TimeoutServiceError::InvalidDecision(decision.to_string()))?;

        let lock = self.lock.acquire(game_id).await?;
        let result = self.decide_locked(game_id, user_id, decision).await;
        self.lock.release(lock).await;
        result
    }

    async fn decide_locked(
        &self,
        game_id: &str,
        user_id: &str,
        decision: TimeoutDecision,
    ) -> Result<Game, TimeoutServiceError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(TimeoutServiceError::GameNotLive);
        }
        if !game.timeout_decision_pending {
            return Err(TimeoutServiceError::NoDecisionPending);
        }
        let timed_out_team = game
            .timeout_timed_out_team
            .ok_or(TimeoutServiceError::NoDecisionPending)?;
        let decision_team = game
            .timeout_decision_team
            .unwrap_or_else(|| timed_out_team.opponent());

        let member = self.members.find_by_game_and_user(game_id, user_id).await?;
        let deciders = self.teams.get_team(game_id, decision_team).await?;
        if member.team_id != deciders.id {
            return Err(TimeoutServiceError::NotYourTeamToDecide);
        }

        game.timeout_decision_pending = false;
        game.timeout_timed_out_team = None;
        game.timeout_decision_team = None;

        match decision {
            TimeoutDecision::End => {
                game.result = Some(format!("{}+{}timeout", decision_team, timed_out_team));
                game.status = GameStatus::Finished;
                game.clear_deadlines();
                if game.mode == GameMode::Werewolf {
                    open_vote(&mut game);
                }
                info!(
                    "Game {}: team {} ended the game on {}'s timeout",
                    game_id, decision_team, timed_out_team
                );
            }
            TimeoutDecision::AllowNext => {
                // Skip the member who let the clock run out; the turn
                // stays with the timed-out team.
                let mut team = self.teams.get_team(game_id, timed_out_team).await?;
                let roster = self.members.active_members_ordered(&team.id).await?;
                if roster.is_empty() {
                    return Err(TimeoutServiceError::NoPlayersInTeam);
                }
                let skipped = team.current_index.min(roster.len() - 1);
                team.current_index = (skipped + 1) % roster.len();
                self.teams.update_team(&team).await?;

                game.turn_deadline = Some(Utc::now() + self.config.turn_deadline);
                if game.mode == GameMode::HandBrain {
                    hand_brain::refresh_roles(&mut game, &roster, team.current_index);
                }
                info!(
                    "Game {}: team {} allowed {}'s next member to play",
                    game_id, decision_team, timed_out_team
                );
            }
        }

        self.games.update_game(&game).await?;
        Ok(game)
    }

    /// Outright victory once the other team's timeout streak reaches
    /// the configured threshold.
    pub async fn claim_victory(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<Game, TimeoutServiceError> {
        let lock = self.lock.acquire(game_id).await?;
        let result = self.claim_victory_locked(game_id, user_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn claim_victory_locked(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<Game, TimeoutServiceError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(TimeoutServiceError::GameNotLive);
        }
        let timed_out_team = match game.last_timeout_team {
            Some(team) if game.consecutive_timeouts >= self.config.claim_victory_threshold => team,
            _ => return Err(TimeoutServiceError::ClaimNotAvailable),
        };

        let member = self.members.find_by_game_and_user(game_id, user_id).await?;
        let claimants = self
            .teams
            .get_team(game_id, timed_out_team.opponent())
            .await?;
        if member.team_id != claimants.id {
            return Err(TimeoutServiceError::NotYourTeamToClaim);
        }

        game.result = Some(format!(
            "{}+{}timeout",
            timed_out_team.opponent(),
            timed_out_team
        ));
        game.status = GameStatus::Finished;
        game.timeout_decision_pending = false;
        game.timeout_timed_out_team = None;
        game.timeout_decision_team = None;
        game.clear_deadlines();
        if game.mode == GameMode::Werewolf {
            open_vote(&mut game);
        }
        self.games.update_game(&game).await?;

        info!(
            "Game {}: team {} claimed victory after {} consecutive timeouts by {}",
            game_id,
            timed_out_team.opponent(),
            game.consecutive_timeouts,
            timed_out_team
        );
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game_move::MoveKind;
    use crate::services::rule_engine::ChessRuleEngine;
    use crate::test_support::TestWorld;
    use chrono::Duration;

    fn service_for(world: &TestWorld) -> TimeoutService {
        let rule_engine = Arc::new(ChessRuleEngine::new());
        TimeoutService::new(
            world.games.clone(),
            world.teams.clone(),
            world.members.clone(),
            world.moves.clone(),
            world.lock_service(),
            Arc::new(GameEndEvaluator::new(rule_engine)),
            world.config.clone(),
        )
    }

    async fn expire_turn(world: &TestWorld, game_id: &str) {
        let mut game = world.game(game_id).await;
        game.turn_deadline = Some(Utc::now() - Duration::seconds(1));
        world.games.update_game(&game).await.unwrap();
    }

    #[test]
    fn test_decision_parsing() {
        assert_eq!(TimeoutDecision::parse("end"), Some(TimeoutDecision::End));
        assert_eq!(
            TimeoutDecision::parse("allow_next"),
            Some(TimeoutDecision::AllowNext)
        );
        assert_eq!(TimeoutDecision::parse("forfeit"), None);
    }

    #[tokio::test]
    async fn test_tick_before_deadline_is_a_no_op() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let service = service_for(&world);

        let outcome = service.tick(&game.id).await.unwrap();

        assert!(matches!(outcome, TickOutcome::NotDue));
        assert!(world.moves.list_moves(&game.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tick_records_timeout_pass_and_opens_decision() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1", "a2"], &["b1"])
            .await;
        expire_turn(&world, &game.id).await;
        let service = service_for(&world);

        let outcome = service.tick(&game.id).await.unwrap();

        let updated = match outcome {
            TickOutcome::TimedOut(game) => game,
            TickOutcome::NotDue => panic!("expected a timeout"),
        };
        assert_eq!(updated.ply, 1);
        assert_eq!(updated.turn_team, TeamName::A);
        assert!(updated.timeout_decision_pending);
        assert_eq!(updated.timeout_timed_out_team, Some(TeamName::A));
        assert_eq!(updated.timeout_decision_team, Some(TeamName::B));
        assert_eq!(updated.consecutive_timeouts, 1);
        assert_eq!(updated.last_timeout_team, Some(TeamName::A));
        assert!(updated.turn_deadline.is_none());

        let moves = world.moves.list_moves(&game.id).await.unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind, MoveKind::TimeoutPass);
        assert_eq!(moves[0].team, TeamName::A);
        assert!(moves[0].by_user_id.is_none());
    }

    #[tokio::test]
    async fn test_tick_is_idempotent_once_decision_is_pending() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        expire_turn(&world, &game.id).await;
        let service = service_for(&world);

        service.tick(&game.id).await.unwrap();
        let second = service.tick(&game.id).await.unwrap();

        assert!(matches!(second, TickOutcome::NotDue));
        assert_eq!(world.moves.list_moves(&game.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_decide_end_finishes_game_against_timed_out_team() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        expire_turn(&world, &game.id).await;
        let service = service_for(&world);
        service.tick(&game.id).await.unwrap();

        let updated = service.decide(&game.id, "b1", "end").await.unwrap();

        assert_eq!(updated.status, GameStatus::Finished);
        assert_eq!(updated.result.as_deref(), Some("B+Atimeout"));
        assert!(!updated.timeout_decision_pending);
        assert!(updated.turn_deadline.is_none());
    }

    #[tokio::test]
    async fn test_decide_allow_next_skips_to_next_member() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1", "a2"], &["b1"])
            .await;
        expire_turn(&world, &game.id).await;
        let service = service_for(&world);
        service.tick(&game.id).await.unwrap();

        let updated = service.decide(&game.id, "b1", "allow_next").await.unwrap();

        assert_eq!(updated.status, GameStatus::Live);
        assert_eq!(updated.turn_team, TeamName::A);
        assert!(!updated.timeout_decision_pending);
        assert!(updated.turn_deadline.unwrap() > Utc::now());
        assert_eq!(world.team(&game.id, TeamName::A).await.current_index, 1);
        // The streak survives the decision; only a played move resets it.
        assert_eq!(updated.consecutive_timeouts, 1);
    }

    #[tokio::test]
    async fn test_decide_rejects_member_of_timed_out_team() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        expire_turn(&world, &game.id).await;
        let service = service_for(&world);
        service.tick(&game.id).await.unwrap();

        let result = service.decide(&game.id, "a1", "end").await;

        assert!(matches!(
            result.unwrap_err(),
            TimeoutServiceError::NotYourTeamToDecide
        ));
    }

    #[tokio::test]
    async fn test_decide_without_pending_timeout_fails() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let service = service_for(&world);

        let result = service.decide(&game.id, "b1", "end").await;
        assert!(matches!(
            result.unwrap_err(),
            TimeoutServiceError::NoDecisionPending
        ));

        let result = service.decide(&game.id, "b1", "resign").await;
        assert!(matches!(
            result.unwrap_err(),
            TimeoutServiceError::InvalidDecision(_)
        ));
    }

    #[tokio::test]
    async fn test_timeout_streak_accumulates_for_same_team() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1", "a2"], &["b1"])
            .await;
        let service = service_for(&world);

        for expected in 1..=2 {
            expire_turn(&world, &game.id).await;
            let outcome = service.tick(&game.id).await.unwrap();
            match outcome {
                TickOutcome::TimedOut(g) => assert_eq!(g.consecutive_timeouts, expected),
                TickOutcome::NotDue => panic!("expected a timeout"),
            }
            service.decide(&game.id, "b1", "allow_next").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_claim_victory_at_threshold() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let mut stale = world.game(&game.id).await;
        stale.consecutive_timeouts = 3;
        stale.last_timeout_team = Some(TeamName::A);
        world.games.update_game(&stale).await.unwrap();
        let service = service_for(&world);

        let updated = service.claim_victory(&game.id, "b1").await.unwrap();

        assert_eq!(updated.status, GameStatus::Finished);
        assert_eq!(updated.result.as_deref(), Some("B+Atimeout"));
    }

    #[tokio::test]
    async fn test_claim_victory_below_threshold_or_wrong_team() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let mut stale = world.game(&game.id).await;
        stale.consecutive_timeouts = 2;
        stale.last_timeout_team = Some(TeamName::A);
        world.games.update_game(&stale).await.unwrap();
        let service = service_for(&world);

        let result = service.claim_victory(&game.id, "b1").await;
        assert!(matches!(
            result.unwrap_err(),
            TimeoutServiceError::ClaimNotAvailable
        ));

        let mut stale = world.game(&game.id).await;
        stale.consecutive_timeouts = 3;
        world.games.update_game(&stale).await.unwrap();

        let result = service.claim_victory(&game.id, "a1").await;
        assert!(matches!(
            result.unwrap_err(),
            TimeoutServiceError::NotYourTeamToClaim
        ));
    }

    #[tokio::test]
    async fn test_claim_victory_opens_werewolf_vote() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Werewolf, &["a1"], &["b1"])
            .await;
        let mut stale = world.game(&game.id).await;
        stale.consecutive_timeouts = 3;
        stale.last_timeout_team = Some(TeamName::A);
        world.games.update_game(&stale).await.unwrap();
        let service = service_for(&world);

        let updated = service.claim_victory(&game.id, "b1").await.unwrap();

        assert!(updated.vote_open);
    }
}
