use chrono::Duration;

/// Product timing constants for the turn state machine.
///
/// Defaults match the correspondence pace of the game: two weeks per
/// turn, a one-minute countdown in fast mode, and a three-strike
/// threshold before the opponent may claim victory outright.
#[derive(Debug, Clone)]
pub struct TurnTimingConfig {
    pub turn_deadline: Duration,
    pub fast_mode_deadline: Duration,
    pub lock_wait: std::time::Duration,
    pub lock_lease: Duration,
    pub claim_victory_threshold: u32,
}

impl Default for TurnTimingConfig {
    fn default() -> Self {
        TurnTimingConfig {
            turn_deadline: Duration::days(14),
            fast_mode_deadline: Duration::minutes(1),
            lock_wait: std::time::Duration::from_secs(5),
            lock_lease: Duration::seconds(30),
            claim_victory_threshold: 3,
        }
    }
}
