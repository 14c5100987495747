use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod pacing;
pub mod session;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use config::Config;
pub use error::{BoardError, ConfigError, MoveError};
pub use game::{GameState, new_game, reset_game};
pub use session::Session;
pub use types::{Cell, ComputerMove, GameResult, MoveLabel, Player, Position, Winner};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
