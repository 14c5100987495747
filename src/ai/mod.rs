pub mod selector;

pub use selector::{
    MoveSelector, ScoredMove, Thresholds, WeightedGreedySelector, pick_ranked, rank_moves,
    select_move,
};
