use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::game::TeamName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Normal,
    TimeoutPass,
}

/// One recorded half-move. Immutable once created; rows for a game
/// form a gap-free ply sequence starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMove {
    pub id: String,
    pub game_id: String,
    pub ply: u32,
    pub team: TeamName,
    pub by_user_id: Option<String>,
    pub uci: Option<String>,
    pub san: Option<String>,
    pub fen_after: String,
    pub kind: MoveKind,
    pub created_at: DateTime<Utc>,
}

impl GameMove {
    pub fn normal(
        game_id: &str,
        ply: u32,
        team: TeamName,
        by_user_id: &str,
        uci: &str,
        san: &str,
        fen_after: &str,
    ) -> Self {
        GameMove {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            ply,
            team,
            by_user_id: Some(by_user_id.to_string()),
            uci: Some(uci.to_string()),
            san: Some(san.to_string()),
            fen_after: fen_after.to_string(),
            kind: MoveKind::Normal,
            created_at: Utc::now(),
        }
    }

    /// The automatic move recorded when a team misses its deadline.
    /// Carries no actor and no notation; the position is unchanged.
    pub fn timeout_pass(game_id: &str, ply: u32, team: TeamName, fen_after: &str) -> Self {
        GameMove {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            ply,
            team,
            by_user_id: None,
            uci: None,
            san: None,
            fen_after: fen_after.to_string(),
            kind: MoveKind::TimeoutPass,
            created_at: Utc::now(),
        }
    }
}
