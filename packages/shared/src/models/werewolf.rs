use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::game::TeamName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WerewolfRole {
    Villager,
    Werewolf,
}

/// Hidden role handed to every active participant at game start.
/// Created once; only reassigned before the game goes live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRole {
    pub id: String,
    pub game_id: String,
    pub user_id: String,
    pub team: TeamName,
    pub role: WerewolfRole,
}

impl GameRole {
    pub fn villager(game_id: &str, user_id: &str, team: TeamName) -> Self {
        GameRole {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            user_id: user_id.to_string(),
            team,
            role: WerewolfRole::Villager,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WerewolfVote {
    pub game_id: String,
    pub voter_id: String,
    pub suspect_id: String,
    pub created_at: DateTime<Utc>,
}

impl WerewolfVote {
    pub fn new(game_id: &str, voter_id: &str, suspect_id: &str) -> Self {
        WerewolfVote {
            game_id: game_id.to_string(),
            voter_id: voter_id.to_string(),
            suspect_id: suspect_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Per-user running counters updated by the post-vote scoring step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserWerewolfStats {
    pub user_id: String,
    pub correct_identifications: u32,
    pub werewolf_successes: u32,
}
