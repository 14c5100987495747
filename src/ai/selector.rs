use rand::{Rng, RngCore};

use crate::board::Board;
use crate::types::{ComputerMove, MoveLabel, Player, Position};

pub const DEFAULT_BEST_MOVE_THRESHOLD: f64 = 0.75;
pub const DEFAULT_SECOND_BEST_THRESHOLD: f64 = 0.95;

/// A legal move and the number of stones it captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub position: Position,
    pub score: usize,
}

/// Cut points on a uniform draw in `[0, 1)`.
///
/// `draw < best` plays rank 0, `best <= draw < second` plays rank 1 and
/// anything above plays rank 2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub best: f64,
    pub second: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            best: DEFAULT_BEST_MOVE_THRESHOLD,
            second: DEFAULT_SECOND_BEST_THRESHOLD,
        }
    }
}

pub trait MoveSelector: Send + Sync {
    fn select_move(
        &self,
        board: &Board,
        player: Player,
        rng: &mut dyn RngCore,
    ) -> Option<ComputerMove>;
}

/// One-ply greedy policy that sometimes plays the 2nd or 3rd best capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedGreedySelector {
    thresholds: Thresholds,
}

impl WeightedGreedySelector {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

impl MoveSelector for WeightedGreedySelector {
    fn select_move(
        &self,
        board: &Board,
        player: Player,
        rng: &mut dyn RngCore,
    ) -> Option<ComputerMove> {
        let ranked = rank_moves(board, player);
        if ranked.is_empty() {
            return None;
        }
        let draw: f64 = rng.gen_range(0.0..1.0);
        pick_ranked(&ranked, draw, self.thresholds)
    }
}

/// Legal moves sorted by capture count, highest first. Equal scores keep
/// row-major order.
pub fn rank_moves(board: &Board, player: Player) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> = board
        .legal_moves(player)
        .into_iter()
        .map(|position| ScoredMove {
            position,
            score: board.flippable_pieces(player, position).len(),
        })
        .collect();

    // Stable sort: ties stay in enumeration order.
    scored.sort_by(|left, right| right.score.cmp(&left.score));
    scored
}

/// Maps a draw in `[0, 1)` onto a rank of `ranked`.
///
/// A lone candidate is always reported as the only choice, whatever the
/// draw. When the bucket's rank does not exist the best move is played
/// under the same label.
pub fn pick_ranked(
    ranked: &[ScoredMove],
    draw: f64,
    thresholds: Thresholds,
) -> Option<ComputerMove> {
    let best = ranked.first()?;

    let (rank, label) = if ranked.len() == 1 {
        (0, MoveLabel::OnlyChoice)
    } else if draw < thresholds.best {
        (0, MoveLabel::Best)
    } else if draw < thresholds.second {
        (1, MoveLabel::SecondBest)
    } else if ranked.len() >= 3 {
        (2, MoveLabel::ThirdBest)
    } else {
        (0, MoveLabel::OnlyChoice)
    };

    let chosen = ranked.get(rank).unwrap_or(best);
    Some(ComputerMove {
        position: chosen.position,
        label,
    })
}

/// Picks the computer's move for `player` from an explicit draw, using the
/// default thresholds. `None` when `player` has no legal move.
pub fn select_move(board: &Board, player: Player, draw: f64) -> Option<ComputerMove> {
    pick_ranked(&rank_moves(board, player), draw, Thresholds::default())
}
