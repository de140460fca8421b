pub mod errors;
pub mod game_repository;
pub mod lock_repository;
pub mod member_repository;
pub mod move_repository;
pub mod role_repository;
pub mod stats_repository;
pub mod team_repository;
pub mod vote_repository;
