use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::game::TeamName;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub game_id: String,
    pub name: TeamName,
    /// Rotation pointer into the team's active roster, ordered by
    /// member position. Clamped defensively on every resolution.
    pub current_index: usize,
}

impl Team {
    pub fn new(game_id: &str, name: TeamName) -> Self {
        Team {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            name,
            current_index: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub team_id: String,
    pub game_id: String,
    pub user_id: String,
    pub position: u32,
    pub active: bool,
    pub ready_to_start: bool,
}

impl TeamMember {
    pub fn new(team_id: &str, game_id: &str, user_id: &str, position: u32) -> Self {
        TeamMember {
            id: Uuid::new_v4().to_string(),
            team_id: team_id.to_string(),
            game_id: game_id.to_string(),
            user_id: user_id.to_string(),
            position,
            active: true,
            ready_to_start: false,
        }
    }
}
