use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::game::{Game, GameMode, GameStatus, HandBrainRole, TeamName};
use crate::models::game_move::{GameMove, MoveKind};

/// The snapshot handed to the broadcast layer after every successful
/// mutation. Delivery to clients is outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateProjection {
    pub game_id: String,
    pub status: GameStatus,
    pub mode: GameMode,
    pub fen: String,
    pub ply: u32,
    pub turn_team: TeamName,
    pub turn_deadline_ts: Option<i64>,
    pub fast_mode_enabled: bool,
    pub timeout_decision_pending: bool,
    pub timeout_decision_team: Option<TeamName>,
    pub consecutive_timeouts: u32,
    pub hand_brain_role: Option<HandBrainRole>,
    pub piece_hint: Option<String>,
    pub vote_open: bool,
    pub result: Option<String>,
}

impl GameStateProjection {
    pub fn from_game(game: &Game) -> Self {
        GameStateProjection {
            game_id: game.id.clone(),
            status: game.status,
            mode: game.mode,
            fen: game.fen.clone(),
            ply: game.ply,
            turn_team: game.turn_team,
            turn_deadline_ts: game.effective_deadline().map(|d| d.timestamp_millis()),
            fast_mode_enabled: game.fast_mode_enabled,
            timeout_decision_pending: game.timeout_decision_pending,
            timeout_decision_team: game.timeout_decision_team,
            consecutive_timeouts: game.consecutive_timeouts,
            hand_brain_role: game.hand_brain_role,
            piece_hint: game.piece_hint.map(|p| p.as_str().to_string()),
            vote_open: game.vote_open,
            result: game.result.clone(),
        }
    }
}

/// Per-move projection for the move list endpoint, ordered by ply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub ply: u32,
    pub team: TeamName,
    pub by_user_id: Option<String>,
    pub uci: Option<String>,
    pub san: Option<String>,
    pub kind: MoveKind,
    pub fen_after: String,
    pub created_at: DateTime<Utc>,
}

impl From<&GameMove> for MoveRecord {
    fn from(mv: &GameMove) -> Self {
        MoveRecord {
            ply: mv.ply,
            team: mv.team,
            by_user_id: mv.by_user_id.clone(),
            uci: mv.uci.clone(),
            san: mv.san.clone(),
            kind: mv.kind,
            fen_after: mv.fen_after.clone(),
            created_at: mv.created_at,
        }
    }
}
