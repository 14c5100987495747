use std::fmt;

use serde::Serialize;

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// A side in the game. Red always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Red,
    Blue,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "Red",
            Player::Blue => "Blue",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Blue,
}

/// A board coordinate.
///
/// Fields are public so callers can hand over raw input; anything outside
/// `0..8` is rejected by the engine rather than indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Row-major square index, or `None` when off the board.
    pub fn index(self) -> Option<usize> {
        self.is_on_board()
            .then(|| self.row as usize * BOARD_SIZE + self.col as usize)
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        debug_assert!(idx < NUM_SQUARES);
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Red,
    Blue,
    Draw,
}

impl Winner {
    pub fn from_counts(red_count: u8, blue_count: u8) -> Self {
        match red_count.cmp(&blue_count) {
            std::cmp::Ordering::Greater => Winner::Red,
            std::cmp::Ordering::Less => Winner::Blue,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }

    /// Banner shown once the game is over.
    pub fn banner(self) -> &'static str {
        match self {
            Winner::Red => "Red Wins!",
            Winner::Blue => "Blue Wins!",
            Winner::Draw => "Draw!",
        }
    }
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Winner,
    pub red_count: u8,
    pub blue_count: u8,
}

/// Which rank of the ranked candidate list the computer played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveLabel {
    #[serde(rename = "Best Move")]
    Best,
    #[serde(rename = "2nd Best Move")]
    SecondBest,
    #[serde(rename = "3rd Best Move")]
    ThirdBest,
    #[serde(rename = "Best Move (No other choice)")]
    OnlyChoice,
}

impl MoveLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveLabel::Best => "Best Move",
            MoveLabel::SecondBest => "2nd Best Move",
            MoveLabel::ThirdBest => "3rd Best Move",
            MoveLabel::OnlyChoice => "Best Move (No other choice)",
        }
    }
}

impl fmt::Display for MoveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A move picked by a [`crate::ai::MoveSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComputerMove {
    pub position: Position,
    pub label: MoveLabel,
}
