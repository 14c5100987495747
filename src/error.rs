use thiserror::Error;

use crate::types::{Player, Position};

/// Why a move was rejected. A rejected move never changes the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,
    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn { expected: Player, got: Player },
    #[error("position {0} is off the board")]
    OutOfBounds(Position),
    #[error("position {0} is already occupied")]
    Occupied(Position),
    #[error("move at {0} captures nothing")]
    NoCaptures(Position),
    #[error("{0} has no legal moves")]
    NoLegalMoves(Player),
}

/// Failure while parsing a textual board diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected 8 rows, got {0}")]
    RowCount(usize),
    #[error("row {row}: expected 8 squares, got {len}")]
    RowLength { row: usize, len: usize },
    #[error("row {row}, col {col}: unknown square {ch:?}")]
    UnknownSquare { row: usize, col: usize, ch: char },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("best_move_threshold ({best}) exceeds second_best_threshold ({second})")]
    ThresholdOrder { best: f64, second: f64 },
}
