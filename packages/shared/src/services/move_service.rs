use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::TurnTimingConfig;
use crate::models::game::{Game, GameMode, GameStatus};
use crate::models::game_move::GameMove;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::member_repository::TeamMemberRepository;
use crate::repositories::move_repository::MoveRepository;
use crate::repositories::team_repository::TeamRepository;
use crate::services::errors::move_service_errors::MoveServiceError;
use crate::services::game_end::GameEndEvaluator;
use crate::services::game_lock::GameLockService;
use crate::services::hand_brain;
use crate::services::rule_engine::RuleEngine;
use crate::services::turn_context::TurnContextResolver;
use crate::services::werewolf::open_vote;

/// What a successful move left behind: the updated game, the recorded
/// half-move, and whether the move ended the game.
#[derive(Debug)]
pub struct PlayOutcome {
    pub game: Game,
    pub recorded: GameMove,
    pub game_over: bool,
}

/// The move pipeline. Validates the caller, the clock, and the move,
/// applies it through the rule engine, records the ply, and advances
/// the turn state machine, all under the per-game lock.
pub struct MoveService {
    games: Arc<dyn GameRepository + Send + Sync>,
    teams: Arc<dyn TeamRepository + Send + Sync>,
    members: Arc<dyn TeamMemberRepository + Send + Sync>,
    moves: Arc<dyn MoveRepository + Send + Sync>,
    turn_context: Arc<TurnContextResolver>,
    lock: Arc<GameLockService>,
    rule_engine: Arc<dyn RuleEngine + Send + Sync>,
    evaluator: Arc<GameEndEvaluator>,
    config: TurnTimingConfig,
}

/// Square-square with an optional q/r/b/n promotion suffix.
pub fn is_valid_uci(uci: &str) -> bool {
    let bytes = uci.as_bytes();
    if bytes.len() != 4 && bytes.len() != 5 {
        return false;
    }
    let square = |file: u8, rank: u8| (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank);
    if !square(bytes[0], bytes[1]) || !square(bytes[2], bytes[3]) {
        return false;
    }
    bytes.len() == 4 || matches!(bytes[4], b'q' | b'r' | b'b' | b'n')
}

impl MoveService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        teams: Arc<dyn TeamRepository + Send + Sync>,
        members: Arc<dyn TeamMemberRepository + Send + Sync>,
        moves: Arc<dyn MoveRepository + Send + Sync>,
        turn_context: Arc<TurnContextResolver>,
        lock: Arc<GameLockService>,
        rule_engine: Arc<dyn RuleEngine + Send + Sync>,
        evaluator: Arc<GameEndEvaluator>,
        config: TurnTimingConfig,
    ) -> Self {
        MoveService {
            games,
            teams,
            members,
            moves,
            turn_context,
            lock,
            rule_engine,
            evaluator,
            config,
        }
    }

    pub async fn play(
        &self,
        game_id: &str,
        user_id: &str,
        uci: &str,
    ) -> Result<PlayOutcome, MoveServiceError> {
        // Cheap pre-check before contending for the lock.
        let game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(MoveServiceError::GameNotLive);
        }

        let lock = self.lock.acquire(game_id).await?;
        let result = self.play_locked(game_id, user_id, uci).await;
        self.lock.release(lock).await;
        result
    }

    async fn play_locked(
        &self,
        game_id: &str,
        user_id: &str,
        uci: &str,
    ) -> Result<PlayOutcome, MoveServiceError> {
        // Re-read under the lock; the pre-check state may be stale.
        let mut game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(MoveServiceError::GameNotLive);
        }
        if game.timeout_decision_pending {
            return Err(MoveServiceError::TimeoutDecisionPending);
        }

        let context = self.turn_context.resolve_for_actor(&game, user_id).await?;
        if let Some(deadline) = game.effective_deadline() {
            if Utc::now() > deadline {
                return Err(MoveServiceError::TurnExpired);
            }
        }
        // Who and when are settled before the move itself is looked at.
        if !is_valid_uci(uci) {
            return Err(MoveServiceError::InvalidUci(uci.to_string()));
        }
        if game.mode == GameMode::HandBrain {
            hand_brain::check_move_gate(&game, context.must_play(), uci)
                .map_err(MoveServiceError::HandBrain)?;
        }

        let applied = self.rule_engine.apply_uci(&game.fen, uci)?;

        let mover_team = game.turn_team;
        game.fen = applied.fen_after.clone();
        game.ply += 1;
        // An engine that yields no SAN still leaves a readable record.
        let san = if applied.san.is_empty() {
            uci
        } else {
            applied.san.as_str()
        };
        let recorded = GameMove::normal(
            game_id,
            game.ply,
            mover_team,
            user_id,
            uci,
            san,
            &applied.fen_after,
        );

        let mut team_to_move = context.team_to_move.clone();
        team_to_move.current_index = (context.roster_index + 1) % context.roster.len();

        game.turn_team = mover_team.opponent();
        game.consecutive_timeouts = 0;
        game.last_timeout_team = None;
        game.fast_mode_enabled = false;
        game.fast_mode_deadline = None;
        game.turn_deadline = Some(Utc::now() + self.config.turn_deadline);

        // The SAN mate marker is authoritative for checkmate; the
        // evaluator picks up stalemate and dead positions.
        let game_over = if applied.san.ends_with('#') {
            game.result = Some(format!("{}#", mover_team));
            game.status = GameStatus::Finished;
            game.clear_deadlines();
            true
        } else {
            self.evaluator.evaluate(&mut game)?
        };

        if game_over {
            if game.mode == GameMode::Werewolf {
                open_vote(&mut game);
            }
        } else if game.mode == GameMode::HandBrain {
            let roster = self
                .members
                .active_members_ordered(&context.opposing_team.id)
                .await?;
            let index = if roster.is_empty() {
                0
            } else {
                context.opposing_team.current_index.min(roster.len() - 1)
            };
            hand_brain::refresh_roles(&mut game, &roster, index);
        }

        // The conditional ply write goes first so a replayed request
        // fails before any state moves.
        self.moves.add_move(&recorded).await?;
        self.teams.update_team(&team_to_move).await?;
        self.games.update_game(&game).await?;

        info!(
            "Game {}: ply {} {} by {} ({})",
            game_id, recorded.ply, applied.san, user_id, mover_team
        );
        Ok(PlayOutcome {
            game,
            recorded,
            game_over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::{HandBrainRole, PieceKind, TeamName};
    use crate::services::errors::hand_brain_errors::HandBrainViolation;
    use crate::services::rule_engine::{
        AppliedMove, ChessRuleEngine, MockRuleEngine, PositionStatus,
    };
    use crate::test_support::TestWorld;

    fn service_for(world: &TestWorld) -> MoveService {
        let rule_engine = Arc::new(ChessRuleEngine::new());
        MoveService::new(
            world.games.clone(),
            world.teams.clone(),
            world.members.clone(),
            world.moves.clone(),
            world.turn_context(),
            world.lock_service(),
            rule_engine.clone(),
            Arc::new(GameEndEvaluator::new(rule_engine)),
            world.config.clone(),
        )
    }

    #[test]
    fn test_uci_validation() {
        assert!(is_valid_uci("e2e4"));
        assert!(is_valid_uci("a7a8q"));
        assert!(is_valid_uci("h1a8"));
        assert!(!is_valid_uci("e2"));
        assert!(!is_valid_uci("e2e9"));
        assert!(!is_valid_uci("i2e4"));
        assert!(!is_valid_uci("a7a8k"));
        assert!(!is_valid_uci("e2e4x5"));
        assert!(!is_valid_uci("Nf3"));
    }

    #[tokio::test]
    async fn test_play_advances_turn_and_rotation() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1", "a2"], &["b1"])
            .await;
        let service = service_for(&world);

        let outcome = service.play(&game.id, "a1", "e2e4").await.unwrap();

        assert_eq!(outcome.recorded.ply, 1);
        assert_eq!(outcome.recorded.san.as_deref(), Some("e4"));
        assert!(!outcome.game_over);
        assert_eq!(outcome.game.turn_team, TeamName::B);
        assert_eq!(world.team(&game.id, TeamName::A).await.current_index, 1);

        // Next half-move from B, then A's second member is up.
        service.play(&game.id, "b1", "e7e5").await.unwrap();
        let outcome = service.play(&game.id, "a2", "g1f3").await.unwrap();

        assert_eq!(outcome.recorded.ply, 3);
        assert_eq!(world.team(&game.id, TeamName::A).await.current_index, 0);
        assert_eq!(world.team(&game.id, TeamName::B).await.current_index, 0);
    }

    #[tokio::test]
    async fn test_play_rejects_out_of_rotation_member() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1", "a2"], &["b1"])
            .await;
        let service = service_for(&world);

        let result = service.play(&game.id, "a2", "e2e4").await;
        assert!(matches!(result.unwrap_err(), MoveServiceError::NotYourTurn));

        let result = service.play(&game.id, "b1", "e2e4").await;
        assert!(matches!(result.unwrap_err(), MoveServiceError::NotYourTurn));

        // The actor gate fires before the move text is even parsed.
        let result = service.play(&game.id, "b1", "zz99").await;
        assert!(matches!(result.unwrap_err(), MoveServiceError::NotYourTurn));
    }

    #[tokio::test]
    async fn test_play_rejects_illegal_and_malformed_moves() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let service = service_for(&world);

        let result = service.play(&game.id, "a1", "e2e5").await;
        assert!(matches!(result.unwrap_err(), MoveServiceError::IllegalMove(_)));

        let result = service.play(&game.id, "a1", "pawn to e4").await;
        assert!(matches!(result.unwrap_err(), MoveServiceError::InvalidUci(_)));

        // Nothing was recorded.
        assert!(world.moves.list_moves(&game.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_san_is_recorded_as_raw_uci() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let mut engine = MockRuleEngine::new();
        engine.expect_apply_uci().returning(|fen, _| {
            Ok(AppliedMove {
                fen_after: fen.to_string(),
                san: String::new(),
            })
        });
        engine
            .expect_position_status()
            .returning(|_| Ok(PositionStatus::Ongoing));
        let engine = Arc::new(engine);
        let service = MoveService::new(
            world.games.clone(),
            world.teams.clone(),
            world.members.clone(),
            world.moves.clone(),
            world.turn_context(),
            world.lock_service(),
            engine.clone(),
            Arc::new(GameEndEvaluator::new(engine)),
            world.config.clone(),
        );

        let outcome = service.play(&game.id, "a1", "e2e4").await.unwrap();

        assert_eq!(outcome.recorded.san.as_deref(), Some("e2e4"));
    }

    #[tokio::test]
    async fn test_play_blocked_while_timeout_decision_pending() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let mut pending = world.game(&game.id).await;
        pending.timeout_decision_pending = true;
        world.games.update_game(&pending).await.unwrap();
        let service = service_for(&world);

        let result = service.play(&game.id, "a1", "e2e4").await;

        assert!(matches!(
            result.unwrap_err(),
            MoveServiceError::TimeoutDecisionPending
        ));
    }

    #[tokio::test]
    async fn test_play_rejects_expired_turn() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let mut expired = world.game(&game.id).await;
        expired.turn_deadline = Some(Utc::now() - chrono::Duration::seconds(1));
        world.games.update_game(&expired).await.unwrap();
        let service = service_for(&world);

        let result = service.play(&game.id, "a1", "e2e4").await;

        assert!(matches!(result.unwrap_err(), MoveServiceError::TurnExpired));
    }

    #[tokio::test]
    async fn test_play_clears_fast_mode_and_timeout_streak() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let mut hot = world.game(&game.id).await;
        hot.fast_mode_enabled = true;
        hot.fast_mode_deadline = Some(Utc::now() + chrono::Duration::minutes(1));
        hot.consecutive_timeouts = 2;
        hot.last_timeout_team = Some(TeamName::A);
        world.games.update_game(&hot).await.unwrap();
        let service = service_for(&world);

        let outcome = service.play(&game.id, "a1", "e2e4").await.unwrap();

        assert!(!outcome.game.fast_mode_enabled);
        assert!(outcome.game.fast_mode_deadline.is_none());
        assert_eq!(outcome.game.consecutive_timeouts, 0);
        assert!(outcome.game.last_timeout_team.is_none());
        assert!(outcome.game.turn_deadline.unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn test_checkmate_finishes_game_with_mover_result() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Classic, &["a1"], &["b1"])
            .await;
        let service = service_for(&world);

        service.play(&game.id, "a1", "f2f3").await.unwrap();
        service.play(&game.id, "b1", "e7e5").await.unwrap();
        service.play(&game.id, "a1", "g2g4").await.unwrap();
        let outcome = service.play(&game.id, "b1", "d8h4").await.unwrap();

        assert!(outcome.game_over);
        assert_eq!(outcome.game.status, GameStatus::Finished);
        assert_eq!(outcome.game.result.as_deref(), Some("B#"));
        assert!(outcome.game.turn_deadline.is_none());
        assert!(!outcome.game.vote_open);

        let result = service.play(&game.id, "a1", "e2e4").await;
        assert!(matches!(result.unwrap_err(), MoveServiceError::GameNotLive));
    }

    #[tokio::test]
    async fn test_checkmate_opens_werewolf_vote() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::Werewolf, &["a1"], &["b1"])
            .await;
        let service = service_for(&world);

        service.play(&game.id, "a1", "f2f3").await.unwrap();
        service.play(&game.id, "b1", "e7e5").await.unwrap();
        service.play(&game.id, "a1", "g2g4").await.unwrap();
        let outcome = service.play(&game.id, "b1", "d8h4").await.unwrap();

        assert!(outcome.game.vote_open);
        assert!(outcome.game.vote_started_at.is_some());
    }

    #[tokio::test]
    async fn test_hand_brain_gate_blocks_unhinted_move() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::HandBrain, &["a1"], &["b1"])
            .await;
        let service = service_for(&world);

        let result = service.play(&game.id, "a1", "e2e4").await;

        assert!(matches!(
            result.unwrap_err(),
            MoveServiceError::HandBrain(HandBrainViolation::MissingHint)
        ));
    }

    #[tokio::test]
    async fn test_hand_brain_move_refreshes_roles_for_next_team() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::HandBrain, &["a1"], &["b1", "b2"])
            .await;
        let hand = world
            .members
            .find_by_game_and_user(&game.id, "a1")
            .await
            .unwrap();
        let mut hinted = world.game(&game.id).await;
        hinted.piece_hint = Some(PieceKind::Pawn);
        hinted.hand_member_id = Some(hand.id.clone());
        hinted.brain_member_id = Some(hand.id);
        hinted.hand_brain_role = Some(HandBrainRole::Hand);
        world.games.update_game(&hinted).await.unwrap();
        let service = service_for(&world);

        let outcome = service.play(&game.id, "a1", "e2e4").await.unwrap();

        let b1 = world
            .members
            .find_by_game_and_user(&game.id, "b1")
            .await
            .unwrap();
        let b2 = world
            .members
            .find_by_game_and_user(&game.id, "b2")
            .await
            .unwrap();
        assert_eq!(outcome.game.hand_member_id, Some(b1.id));
        assert_eq!(outcome.game.brain_member_id, Some(b2.id));
        assert_eq!(outcome.game.hand_brain_role, Some(HandBrainRole::Brain));
        assert!(outcome.game.piece_hint.is_none());
    }

    #[tokio::test]
    async fn test_hand_brain_gate_rejects_wrong_piece() {
        let world = TestWorld::new();
        let game = world
            .seed_live_game(GameMode::HandBrain, &["a1"], &["b1"])
            .await;
        let hand = world
            .members
            .find_by_game_and_user(&game.id, "a1")
            .await
            .unwrap();
        let mut hinted = world.game(&game.id).await;
        hinted.piece_hint = Some(PieceKind::Knight);
        hinted.hand_member_id = Some(hand.id.clone());
        hinted.hand_brain_role = Some(HandBrainRole::Hand);
        world.games.update_game(&hinted).await.unwrap();
        let service = service_for(&world);

        let result = service.play(&game.id, "a1", "e2e4").await;

        assert!(matches!(
            result.unwrap_err(),
            MoveServiceError::HandBrain(HandBrainViolation::HintMismatch { .. })
        ));
    }
}
