use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel FEN for the standard initial position. The rule engine
/// expands it before handing the position to the chess library.
pub const STARTPOS: &str = "startpos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Lobby,
    Live,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    HandBrain,
    Werewolf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamName {
    A,
    B,
}

impl TeamName {
    pub fn opponent(&self) -> TeamName {
        match self {
            TeamName::A => TeamName::B,
            TeamName::B => TeamName::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamName::A => "A",
            TeamName::B => "B",
        }
    }
}

impl std::fmt::Display for TeamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandBrainRole {
    Brain,
    Hand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Parses a piece word case-insensitively ("knight", "Queen", ...).
    pub fn parse(value: &str) -> Option<PieceKind> {
        match value.to_ascii_lowercase().as_str() {
            "pawn" => Some(PieceKind::Pawn),
            "knight" => Some(PieceKind::Knight),
            "bishop" => Some(PieceKind::Bishop),
            "rook" => Some(PieceKind::Rook),
            "queen" => Some(PieceKind::Queen),
            "king" => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub status: GameStatus,
    pub mode: GameMode,
    pub fen: String,
    pub ply: u32,
    pub turn_team: TeamName,
    pub turn_deadline: Option<DateTime<Utc>>,
    pub fast_mode_enabled: bool,
    pub fast_mode_deadline: Option<DateTime<Utc>>,
    pub consecutive_timeouts: u32,
    pub last_timeout_team: Option<TeamName>,
    pub timeout_decision_pending: bool,
    pub timeout_timed_out_team: Option<TeamName>,
    pub timeout_decision_team: Option<TeamName>,
    pub hand_brain_role: Option<HandBrainRole>,
    pub piece_hint: Option<PieceKind>,
    pub brain_member_id: Option<String>,
    pub hand_member_id: Option<String>,
    pub two_wolves_enabled: bool,
    pub vote_open: bool,
    pub vote_started_at: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(mode: GameMode) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            status: GameStatus::Lobby,
            mode,
            fen: STARTPOS.to_string(),
            ply: 0,
            turn_team: TeamName::A,
            turn_deadline: None,
            fast_mode_enabled: false,
            fast_mode_deadline: None,
            consecutive_timeouts: 0,
            last_timeout_team: None,
            timeout_decision_pending: false,
            timeout_timed_out_team: None,
            timeout_decision_team: None,
            hand_brain_role: None,
            piece_hint: None,
            brain_member_id: None,
            hand_member_id: None,
            two_wolves_enabled: false,
            vote_open: false,
            vote_started_at: None,
            result: None,
            created_at: Utc::now(),
        }
    }

    /// The deadline the current turn is actually judged against: the
    /// fast-mode countdown when fast mode is active, else the
    /// long-form turn deadline.
    pub fn effective_deadline(&self) -> Option<DateTime<Utc>> {
        if self.fast_mode_enabled {
            if let Some(deadline) = self.fast_mode_deadline {
                return Some(deadline);
            }
        }
        self.turn_deadline
    }

    /// Clears every running countdown. Called whenever the game ends
    /// or a timeout decision suspends the clock.
    pub fn clear_deadlines(&mut self) {
        self.turn_deadline = None;
        self.fast_mode_enabled = false;
        self.fast_mode_deadline = None;
    }
}
