pub mod game;
pub mod game_move;
pub mod projections;
pub mod team;
pub mod werewolf;
