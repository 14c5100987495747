use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::BoardError;
use crate::types::{BOARD_SIZE, Cell, NUM_SQUARES, Player, Position};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Othello board state represented by two bitboards.
///
/// Bit `row * 8 + col` is set in `red` or `blue` when that side owns the
/// square. The two masks never overlap, so every one of the 64 squares is
/// exactly one of empty, red or blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    red: u64,
    blue: u64,
}

impl Board {
    /// Creates the opening position:
    /// (3,3)=blue, (3,4)=red, (4,3)=red, (4,4)=blue.
    pub fn new() -> Self {
        Self {
            red: bit(28) | bit(35),
            blue: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. Squares claimed by both sides are
    /// given to red.
    pub fn from_bitboards(red: u64, blue: u64) -> Self {
        debug_assert_eq!(red & blue, 0, "bitboards overlap");
        Self {
            red,
            blue: blue & !red,
        }
    }

    pub fn empty() -> Self {
        Self { red: 0, blue: 0 }
    }

    pub fn cell(&self, pos: Position) -> Cell {
        match pos.index() {
            Some(idx) => self.cell_at(idx),
            None => Cell::Empty,
        }
    }

    /// Returns the squares `player` would flip by playing at `pos`, walking
    /// each direction outward in turn. Empty when the move is illegal.
    pub fn flippable_pieces(&self, player: Player, pos: Position) -> Vec<Position> {
        let Some(idx) = pos.index() else {
            return Vec::new();
        };
        let (me, opp) = self.sides(player);
        if ((me | opp) & bit(idx)) != 0 {
            return Vec::new();
        }

        let (row, col) = (pos.row as i32, pos.col as i32);
        let mut out = Vec::new();
        for (dr, dc) in DIRECTIONS {
            let len = capped_run(row, col, dr, dc, me, opp).count_ones() as i32;
            out.extend((1..=len).map(|step| {
                Position::from_index(to_index(row + dr * step, col + dc * step))
            }));
        }
        out
    }

    pub fn is_legal(&self, player: Player, pos: Position) -> bool {
        match pos.index() {
            Some(idx) => {
                let (me, opp) = self.sides(player);
                Self::collect_flips(idx, me, opp) != 0
            }
            None => false,
        }
    }

    /// Returns legal move mask for the given side.
    pub fn legal_mask(&self, player: Player) -> u64 {
        let (me, opp) = self.sides(player);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal moves for `player` in row-major order.
    pub fn legal_moves(&self, player: Player) -> Vec<Position> {
        mask_to_positions(self.legal_mask(player))
    }

    /// Places one stone and flips captured stones.
    /// Returns the flipped squares, or an empty list (board untouched)
    /// when the move is illegal.
    pub fn place(&mut self, player: Player, pos: Position) -> Vec<Position> {
        let flipped = self.flippable_pieces(player, pos);
        let Some(idx) = pos.index() else {
            return flipped;
        };
        if flipped.is_empty() {
            return flipped;
        }

        let flips = flipped
            .iter()
            .filter_map(|p| p.index())
            .fold(0u64, |acc, i| acc | bit(i));
        let (me, opp) = self.sides(player);
        let next_me = me | bit(idx) | flips;
        let next_opp = opp & !flips;

        match player {
            Player::Red => {
                self.red = next_me;
                self.blue = next_opp;
            }
            Player::Blue => {
                self.blue = next_me;
                self.red = next_opp;
            }
        }

        flipped
    }

    /// Returns `(red_count, blue_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.red.count_ones() as u8, self.blue.count_ones() as u8)
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (red_count, blue_count) = self.count();
        NUM_SQUARES as u8 - red_count - blue_count
    }

    pub fn to_array(&self) -> [Cell; NUM_SQUARES] {
        let mut board = [Cell::Empty; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            *cell = self.cell_at(pos);
        }
        board
    }

    pub fn rows(&self) -> [[Cell; BOARD_SIZE]; BOARD_SIZE] {
        let mut rows = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (idx, cell) in self.to_array().into_iter().enumerate() {
            rows[idx / BOARD_SIZE][idx % BOARD_SIZE] = cell;
        }
        rows
    }

    fn cell_at(&self, idx: usize) -> Cell {
        let square = bit(idx);
        if (self.red & square) != 0 {
            Cell::Red
        } else if (self.blue & square) != 0 {
            Cell::Blue
        } else {
            Cell::Empty
        }
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Red => (self.red, self.blue),
            Player::Blue => (self.blue, self.red),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }
        if ((me | opp) & bit(pos)) != 0 {
            return 0;
        }

        let (row, col) = ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32);
        DIRECTIONS
            .iter()
            .fold(0u64, |flips, &(dr, dc)| {
                flips | capped_run(row, col, dr, dc, me, opp)
            })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows of `R`, `B` and `.`, top row first.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows().iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Red => 'R',
                    Cell::Blue => 'B',
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) form. Blank lines and spaces
/// inside a row are ignored; `-` is accepted for empty squares.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(BoardError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, squares) in rows.iter().enumerate() {
            if squares.len() != BOARD_SIZE {
                return Err(BoardError::RowLength {
                    row,
                    len: squares.len(),
                });
            }
            for (col, &ch) in squares.iter().enumerate() {
                let square = bit(row * BOARD_SIZE + col);
                match ch {
                    '.' | '-' => {}
                    'R' | 'r' => board.red |= square,
                    'B' | 'b' => board.blue |= square,
                    _ => return Err(BoardError::UnknownSquare { row, col, ch }),
                }
            }
        }
        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// Opponent stones from `(row, col)` along `(dr, dc)`, kept only when the
/// run is capped by one of `me`'s stones.
fn capped_run(row: i32, col: i32, dr: i32, dc: i32, me: u64, opp: u64) -> u64 {
    let mut r = row + dr;
    let mut c = col + dc;
    let mut line = 0u64;

    while in_bounds(r, c) {
        let square = bit(to_index(r, c));
        if (opp & square) != 0 {
            line |= square;
        } else if (me & square) != 0 {
            return line;
        } else {
            return 0;
        }

        r += dr;
        c += dc;
    }

    0
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn to_index(row: i32, col: i32) -> usize {
    row as usize * BOARD_SIZE + col as usize
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

fn mask_to_positions(mut mask: u64) -> Vec<Position> {
    let mut out = Vec::with_capacity(mask.count_ones() as usize);
    while mask != 0 {
        out.push(Position::from_index(mask.trailing_zeros() as usize));
        mask &= mask - 1;
    }
    out
}
