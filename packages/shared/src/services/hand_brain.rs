use std::sync::Arc;

use tracing::info;

use crate::models::game::{Game, GameMode, GameStatus, HandBrainRole, PieceKind};
use crate::models::team::TeamMember;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::member_repository::TeamMemberRepository;
use crate::services::errors::hand_brain_errors::{HandBrainServiceError, HandBrainViolation};
use crate::services::game_lock::GameLockService;
use crate::services::rule_engine::expand_fen;
use crate::services::turn_context::TurnContextResolver;

/// Assigns hand & brain for the team to move: the must-play roster
/// member is the hand, the next member in rotation order the brain.
/// A single-member roster degrades to one person in both roles.
/// Resets to "waiting on brain" with no hint.
pub fn refresh_roles(game: &mut Game, roster: &[TeamMember], current_index: usize) {
    game.piece_hint = None;
    if roster.is_empty() {
        game.hand_brain_role = None;
        game.brain_member_id = None;
        game.hand_member_id = None;
        return;
    }
    let index = current_index.min(roster.len() - 1);
    let hand = &roster[index];
    let brain = &roster[(index + 1) % roster.len()];
    game.hand_member_id = Some(hand.id.clone());
    game.brain_member_id = Some(brain.id.clone());
    game.hand_brain_role = Some(HandBrainRole::Brain);
}

/// Resolves the piece type on `square` from a FEN board field.
/// Rank 8 is the first '/'-delimited row.
pub fn piece_kind_at(fen: &str, square: &str) -> Option<PieceKind> {
    let board_field = expand_fen(fen).split_whitespace().next()?;
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0] as i32 - 'a' as i32;
    let rank = bytes[1] as i32 - '1' as i32;
    if !(0..8).contains(&file) || !(0..8).contains(&rank) {
        return None;
    }
    let row = board_field.split('/').nth((7 - rank) as usize)?;
    let mut col = 0i32;
    for ch in row.chars() {
        if let Some(run) = ch.to_digit(10) {
            col += run as i32;
            if col > file {
                return None;
            }
        } else {
            if col == file {
                return piece_kind_from_fen_char(ch);
            }
            col += 1;
        }
    }
    None
}

fn piece_kind_from_fen_char(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'p' => Some(PieceKind::Pawn),
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        'k' => Some(PieceKind::King),
        _ => None,
    }
}

/// The move-time gate: only the assigned hand may move, only after a
/// hint, and only the hinted piece type.
pub fn check_move_gate(
    game: &Game,
    acting_member: &TeamMember,
    uci: &str,
) -> Result<(), HandBrainViolation> {
    let hinted = game.piece_hint.ok_or(HandBrainViolation::MissingHint)?;
    if game.hand_member_id.as_deref() != Some(acting_member.id.as_str()) {
        return Err(HandBrainViolation::WrongAssignee);
    }
    let moved =
        piece_kind_at(&game.fen, &uci[0..2]).ok_or(HandBrainViolation::UnknownPiece)?;
    if moved != hinted {
        return Err(HandBrainViolation::HintMismatch { hinted, moved });
    }
    Ok(())
}

pub struct HandBrainService {
    games: Arc<dyn GameRepository + Send + Sync>,
    members: Arc<dyn TeamMemberRepository + Send + Sync>,
    turn_context: Arc<TurnContextResolver>,
    lock: Arc<GameLockService>,
}

impl HandBrainService {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        members: Arc<dyn TeamMemberRepository + Send + Sync>,
        turn_context: Arc<TurnContextResolver>,
        lock: Arc<GameLockService>,
    ) -> Self {
        HandBrainService {
            games,
            members,
            turn_context,
            lock,
        }
    }

    /// (Re)computes hand & brain for the team currently to move.
    pub async fn refresh_for_turn(&self, game_id: &str) -> Result<(), HandBrainServiceError> {
        let lock = self.lock.acquire(game_id).await?;
        let result = self.refresh_for_turn_locked(game_id).await;
        self.lock.release(lock).await;
        result
    }

    async fn refresh_for_turn_locked(&self, game_id: &str) -> Result<(), HandBrainServiceError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.mode != GameMode::HandBrain {
            return Err(HandBrainServiceError::NotHandBrainMode);
        }
        let context = self.turn_context.resolve(&game).await?;
        refresh_roles(&mut game, &context.roster, context.roster_index);
        self.games
            .update_game(&game)
            .await
            .map_err(|e| HandBrainServiceError::RepositoryError(e.to_string()))?;
        Ok(())
    }

    /// The brain names the piece type the hand must move this turn.
    pub async fn set_hint(
        &self,
        game_id: &str,
        acting_user_id: &str,
        piece_value: &str,
    ) -> Result<PieceKind, HandBrainServiceError> {
        let piece = PieceKind::parse(piece_value)
            .ok_or_else(|| HandBrainServiceError::InvalidPiece(piece_value.to_string()))?;

        let game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(HandBrainServiceError::GameNotLive);
        }
        if game.mode != GameMode::HandBrain {
            return Err(HandBrainServiceError::NotHandBrainMode);
        }

        let lock = self.lock.acquire(game_id).await?;
        let result = self.set_hint_locked(game_id, acting_user_id, piece).await;
        self.lock.release(lock).await;
        result
    }

    async fn set_hint_locked(
        &self,
        game_id: &str,
        acting_user_id: &str,
        piece: PieceKind,
    ) -> Result<PieceKind, HandBrainServiceError> {
        let mut game = self.games.get_game(game_id).await?;
        if game.status != GameStatus::Live {
            return Err(HandBrainServiceError::GameNotLive);
        }
        if game.mode != GameMode::HandBrain {
            return Err(HandBrainServiceError::NotHandBrainMode);
        }

        if game.hand_brain_role.is_none() {
            // Roles were never initialized for this turn; derive them
            // before judging the caller.
            let context = self.turn_context.resolve(&game).await?;
            refresh_roles(&mut game, &context.roster, context.roster_index);
        }
        match game.hand_brain_role {
            Some(HandBrainRole::Brain) => {}
            _ => return Err(HandBrainServiceError::AlreadyWaitingOnHand),
        }

        let member = self
            .members
            .find_by_game_and_user(game_id, acting_user_id)
            .await?;
        if game.brain_member_id.as_deref() != Some(member.id.as_str()) {
            return Err(HandBrainServiceError::NotTheBrain);
        }

        game.piece_hint = Some(piece);
        game.hand_brain_role = Some(HandBrainRole::Hand);
        self.games
            .update_game(&game)
            .await
            .map_err(|e| HandBrainServiceError::RepositoryError(e.to_string()))?;
        info!(
            "Game {}: brain hinted {} for team {}",
            game_id,
            piece.as_str(),
            game.turn_team
        );
        Ok(piece)
    }
}
