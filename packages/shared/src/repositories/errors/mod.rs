pub mod game_repository_errors;
pub mod lock_repository_errors;
pub mod move_repository_errors;
pub mod roster_repository_errors;
pub mod werewolf_repository_errors;
