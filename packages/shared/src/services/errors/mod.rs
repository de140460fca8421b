pub mod fast_mode_errors;
pub mod game_lifecycle_errors;
pub mod game_lock_errors;
pub mod game_query_errors;
pub mod hand_brain_errors;
pub mod move_service_errors;
pub mod rule_engine_errors;
pub mod timeout_service_errors;
pub mod turn_context_errors;
pub mod werewolf_service_errors;
