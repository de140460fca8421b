pub mod errors;
pub mod fast_mode;
pub mod game_end;
pub mod game_lifecycle;
pub mod game_lock;
pub mod game_query;
pub mod hand_brain;
pub mod move_service;
pub mod random;
pub mod rule_engine;
pub mod timeout_service;
pub mod turn_context;
pub mod werewolf;
