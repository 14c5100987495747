use rand::RngCore;
use serde::Serialize;
use tracing::{debug, info};

use crate::ai::MoveSelector;
use crate::board::Board;
use crate::error::MoveError;
use crate::types::{Cell, ComputerMove, GameResult, MoveLabel, Player, Position, Winner};

pub const HUMAN_PLAYER: Player = Player::Red;
pub const COMPUTER_PLAYER: Player = Player::Blue;

/// Snapshot of a game between two accepted moves.
///
/// Values are never mutated in place: every accepted move produces a new
/// state and a rejected one leaves the old state as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    board: Board,
    current_player: Player,
    red_count: u8,
    blue_count: u8,
    is_game_over: bool,
    /// Contract:
    /// - Exactly the moves `current_player` can make, row-major.
    /// - Empty iff the game is over.
    legal_moves: Vec<Position>,
    /// `Some` iff the game is over.
    winner: Option<Winner>,
    /// Label of the most recent computer move; survives human moves.
    last_computer_move: Option<MoveLabel>,
}

impl GameState {
    /// Opening position with Red to move.
    pub fn new() -> Self {
        Self::from_position(Board::new(), Player::Red)
    }

    /// Starts from an arbitrary board with `to_move` on turn.
    ///
    /// When `to_move` is stuck the turn passes to the other side; when both
    /// are stuck the state is already game over.
    pub fn from_position(board: Board, to_move: Player) -> Self {
        Self::settle(board, to_move, None)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn red_count(&self) -> u8 {
        self.red_count
    }

    pub fn blue_count(&self) -> u8 {
        self.blue_count
    }

    pub fn empty_count(&self) -> u8 {
        self.board.empty_count()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn legal_moves(&self) -> &[Position] {
        &self.legal_moves
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn last_computer_move(&self) -> Option<MoveLabel> {
        self.last_computer_move
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.is_game_over && self.current_player == COMPUTER_PLAYER
    }

    pub fn result(&self) -> Option<GameResult> {
        self.winner.map(|winner| GameResult {
            winner,
            red_count: self.red_count,
            blue_count: self.blue_count,
        })
    }

    /// Status line: whose turn it is, or who won.
    pub fn status_text(&self) -> String {
        match self.winner {
            Some(winner) => winner.banner().to_string(),
            None => format!("{}'s Turn", self.current_player),
        }
    }

    /// Plays `player` at `pos` and hands the turn on, skipping a side that
    /// cannot move.
    pub fn apply_move(&self, player: Player, pos: Position) -> Result<GameState, MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        if player != self.current_player {
            return Err(MoveError::NotYourTurn {
                expected: self.current_player,
                got: player,
            });
        }
        if !pos.is_on_board() {
            return Err(MoveError::OutOfBounds(pos));
        }
        if self.board.cell(pos) != Cell::Empty {
            return Err(MoveError::Occupied(pos));
        }

        let mut board = self.board;
        let flipped = board.place(player, pos);
        if flipped.is_empty() {
            return Err(MoveError::NoCaptures(pos));
        }
        debug!(%player, %pos, flipped = flipped.len(), "move applied");

        Ok(Self::settle(board, player.opponent(), self.last_computer_move))
    }

    /// Human input. Anything illegal, including clicks during the
    /// computer's turn, returns the state unchanged.
    pub fn apply_human_move(&self, pos: Position) -> GameState {
        match self.apply_move(HUMAN_PLAYER, pos) {
            Ok(next) => next,
            Err(err) => {
                debug!(%err, "human move rejected");
                self.clone()
            }
        }
    }

    /// Lets `selector` choose and play the computer's move, recording its
    /// label on the resulting state.
    pub fn try_computer_turn(
        &self,
        selector: &dyn MoveSelector,
        rng: &mut dyn RngCore,
    ) -> Result<(GameState, ComputerMove), MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        if self.current_player != COMPUTER_PLAYER {
            return Err(MoveError::NotYourTurn {
                expected: self.current_player,
                got: COMPUTER_PLAYER,
            });
        }

        let chosen = selector
            .select_move(&self.board, COMPUTER_PLAYER, rng)
            .ok_or(MoveError::NoLegalMoves(COMPUTER_PLAYER))?;
        let mut next = self.apply_move(COMPUTER_PLAYER, chosen.position)?;
        next.last_computer_move = Some(chosen.label);
        info!(label = %chosen.label, pos = %chosen.position, "AI move");

        Ok((next, chosen))
    }

    /// Like [`GameState::try_computer_turn`] but leaves the state unchanged
    /// when the computer cannot move.
    pub fn computer_turn(&self, selector: &dyn MoveSelector, rng: &mut dyn RngCore) -> GameState {
        match self.try_computer_turn(selector, rng) {
            Ok((next, _)) => next,
            Err(err) => {
                debug!(%err, "computer turn skipped");
                self.clone()
            }
        }
    }

    fn settle(board: Board, next: Player, last_computer_move: Option<MoveLabel>) -> Self {
        let (red_count, blue_count) = board.count();

        let next_legal = board.legal_moves(next);
        let (current_player, legal_moves) = if next_legal.is_empty() {
            let other = next.opponent();
            let other_legal = board.legal_moves(other);
            if !other_legal.is_empty() {
                debug!(passed = %next, "no legal moves, turn passes");
            }
            (other, other_legal)
        } else {
            (next, next_legal)
        };

        let is_game_over = legal_moves.is_empty();
        let winner = is_game_over.then(|| Winner::from_counts(red_count, blue_count));
        if let Some(winner) = winner {
            info!(?winner, red_count, blue_count, "game over");
        }

        Self {
            board,
            current_player,
            red_count,
            blue_count,
            is_game_over,
            legal_moves,
            winner,
            last_computer_move,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn new_game() -> GameState {
    GameState::new()
}

/// Discards whatever was in progress and starts over.
pub fn reset_game() -> GameState {
    GameState::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::WeightedGreedySelector;
    use rand::rngs::mock::StepRng;

    const FULL_BOARD: u64 = u64::MAX;

    fn p(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn bit(row: usize, col: usize) -> u64 {
        1u64 << (row * 8 + col)
    }

    /// Red to move. Playing (4,5) leaves Blue without a move while Red can
    /// still take (0,1) from (0,2).
    fn blue_gets_skipped() -> GameState {
        let board = "RB......
                     ........
                     ........
                     ........
                     ...RB...
                     ........
                     ........
                     ........"
            .parse()
            .unwrap();
        GameState::from_position(board, Player::Red)
    }

    #[test]
    fn initial_state_is_correct() {
        let state = new_game();

        assert_eq!(state.current_player(), Player::Red);
        assert_eq!(state.red_count(), 2);
        assert_eq!(state.blue_count(), 2);
        assert!(!state.is_game_over());
        assert_eq!(state.winner(), None);
        assert_eq!(state.last_computer_move(), None);
        assert_eq!(state.legal_moves(), &[p(2, 3), p(3, 2), p(4, 5), p(5, 4)]);
        assert_eq!(state.status_text(), "Red's Turn");
    }

    #[test]
    fn opening_move_flips_single_stone() {
        let state = new_game().apply_move(Player::Red, p(2, 3)).unwrap();

        assert_eq!(state.board().cell(p(3, 3)), Cell::Red);
        assert_eq!(state.board().cell(p(4, 4)), Cell::Blue);
        assert_eq!(state.red_count(), 4);
        assert_eq!(state.blue_count(), 1);
        assert_eq!(state.current_player(), Player::Blue);
        assert_eq!(state.legal_moves(), &[p(2, 2), p(2, 4), p(4, 2)]);
        assert_eq!(state.status_text(), "Blue's Turn");
    }

    #[test]
    fn illegal_moves_are_rejected_with_reason() {
        let state = new_game();

        assert_eq!(
            state.apply_move(Player::Red, p(3, 3)),
            Err(MoveError::Occupied(p(3, 3)))
        );
        assert_eq!(
            state.apply_move(Player::Red, p(0, 0)),
            Err(MoveError::NoCaptures(p(0, 0)))
        );
        assert_eq!(
            state.apply_move(Player::Red, p(8, 1)),
            Err(MoveError::OutOfBounds(p(8, 1)))
        );
        assert_eq!(
            state.apply_move(Player::Blue, p(2, 3)),
            Err(MoveError::NotYourTurn {
                expected: Player::Red,
                got: Player::Blue
            })
        );
    }

    #[test]
    fn rejected_human_move_is_idempotent() {
        let state = new_game();

        let once = state.apply_human_move(p(0, 0));
        let twice = once.apply_human_move(p(0, 0));

        assert_eq!(once, state);
        assert_eq!(twice, state);
    }

    #[test]
    fn human_input_is_ignored_on_computer_turn() {
        let state = new_game().apply_human_move(p(2, 3));
        assert_eq!(state.current_player(), Player::Blue);

        assert_eq!(state.apply_human_move(p(2, 2)), state);
    }

    #[test]
    fn opponent_without_moves_is_skipped() {
        let state = blue_gets_skipped();
        assert_eq!(state.legal_moves(), &[p(0, 2), p(4, 5)]);

        let next = state.apply_move(Player::Red, p(4, 5)).unwrap();

        assert_eq!(next.current_player(), Player::Red);
        assert!(!next.is_game_over());
        assert_eq!(next.winner(), None);
        assert_eq!(next.legal_moves(), &[p(0, 2)]);
        assert!(next.board().legal_moves(Player::Blue).is_empty());
    }

    #[test]
    fn computer_keeps_the_turn_when_red_is_stuck() {
        let board = "...BR...
                     ........
                     ........
                     ........
                     BR......
                     ........
                     ........
                     ........"
            .parse()
            .unwrap();
        let state = GameState::from_position(board, Player::Blue);
        assert_eq!(state.legal_moves(), &[p(0, 5), p(4, 2)]);
        let selector = WeightedGreedySelector::default();
        let mut rng = StepRng::new(0, 0);

        let (next, chosen) = state.try_computer_turn(&selector, &mut rng).unwrap();

        assert_eq!(chosen.position, p(0, 5));
        assert_eq!(next.current_player(), Player::Blue);
        assert!(next.is_computer_turn());
        assert_eq!(next.last_computer_move(), Some(MoveLabel::Best));
        assert!(next.board().legal_moves(Player::Red).is_empty());
        assert_eq!(next.legal_moves(), &[p(4, 2)]);

        let (last, chosen) = next.try_computer_turn(&selector, &mut rng).unwrap();

        assert_eq!(chosen.position, p(4, 2));
        assert_eq!(last.last_computer_move(), Some(MoveLabel::OnlyChoice));
        assert!(last.is_game_over());
        assert_eq!(last.winner(), Some(Winner::Blue));
        assert_eq!((last.red_count(), last.blue_count()), (0, 6));
    }

    #[test]
    fn game_ends_when_neither_side_can_move() {
        let state = blue_gets_skipped()
            .apply_move(Player::Red, p(4, 5))
            .unwrap()
            .apply_move(Player::Red, p(0, 2))
            .unwrap();

        assert!(state.is_game_over());
        assert!(state.legal_moves().is_empty());
        assert_eq!(state.winner(), Some(Winner::Red));
        assert_eq!(
            state.result(),
            Some(GameResult {
                winner: Winner::Red,
                red_count: 6,
                blue_count: 0
            })
        );
        assert_eq!(state.status_text(), "Red Wins!");
        assert_eq!(
            state.apply_move(Player::Red, p(7, 7)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn full_board_after_move_sets_game_over() {
        let blue = FULL_BOARD ^ bit(0, 0) ^ bit(0, 1);
        let board = Board::from_bitboards(bit(0, 1), blue);
        let state = GameState::from_position(board, Player::Blue);
        assert_eq!(state.legal_moves(), &[p(0, 0)]);

        let state = state.apply_move(Player::Blue, p(0, 0)).unwrap();

        assert!(state.is_game_over());
        assert_eq!(state.red_count(), 0);
        assert_eq!(state.blue_count(), 64);
        assert_eq!(state.winner(), Some(Winner::Blue));
    }

    #[test]
    fn full_board_with_equal_counts_is_a_draw() {
        let red = 0x0000_0000_FFFF_FFFF;
        let state = GameState::from_position(Board::from_bitboards(red, !red), Player::Red);

        assert!(state.is_game_over());
        assert_eq!(state.winner(), Some(Winner::Draw));
        assert_eq!(state.status_text(), "Draw!");
    }

    #[test]
    fn from_position_passes_to_side_that_can_move() {
        let state = GameState::from_position(Board::new(), Player::Red);
        assert_eq!(state.current_player(), Player::Red);

        let board = "RB......
                     ........
                     ........
                     ........
                     ........
                     ........
                     ........
                     ........"
            .parse()
            .unwrap();
        let state = GameState::from_position(board, Player::Blue);

        assert_eq!(state.current_player(), Player::Red);
        assert_eq!(state.legal_moves(), &[p(0, 2)]);
    }

    #[test]
    fn computer_turn_records_label_and_hands_back_turn() {
        let state = new_game().apply_human_move(p(2, 3));
        let selector = WeightedGreedySelector::default();
        let mut rng = StepRng::new(0, 0);

        let (next, chosen) = state.try_computer_turn(&selector, &mut rng).unwrap();

        assert_eq!(chosen.position, p(2, 2));
        assert_eq!(chosen.label, MoveLabel::Best);
        assert_eq!(next.last_computer_move(), Some(MoveLabel::Best));
        assert_eq!(next.current_player(), Player::Red);
        assert_eq!((next.red_count(), next.blue_count()), (3, 3));

        // Human moves keep the label.
        let after_human = next.apply_human_move(next.legal_moves()[0]);
        assert_ne!(after_human, next);
        assert_eq!(after_human.last_computer_move(), Some(MoveLabel::Best));
    }

    #[test]
    fn computer_turn_out_of_turn_is_a_no_op() {
        let state = new_game();
        let selector = WeightedGreedySelector::default();
        let mut rng = StepRng::new(0, 0);

        assert_eq!(state.computer_turn(&selector, &mut rng), state);
        assert!(matches!(
            state.try_computer_turn(&selector, &mut rng),
            Err(MoveError::NotYourTurn { .. })
        ));
    }

    #[test]
    fn reset_restores_opening_position() {
        let selector = WeightedGreedySelector::default();
        let mut rng = StepRng::new(0, 0);
        let played = new_game()
            .apply_human_move(p(2, 3))
            .computer_turn(&selector, &mut rng)
            .apply_human_move(p(2, 1));
        assert_ne!(played, new_game());

        let state = reset_game();

        assert_eq!(state, new_game());
        assert_eq!(*state.board(), Board::new());
        assert_eq!(state.current_player(), Player::Red);
        assert_eq!(state.legal_moves().len(), 4);
    }

    #[test]
    fn serialized_state_exposes_projection_fields() {
        let json = serde_json::to_value(new_game()).unwrap();

        assert_eq!(json["current_player"], "red");
        assert_eq!(json["red_count"], 2);
        assert_eq!(json["is_game_over"], false);
        assert!(json["winner"].is_null());
        assert!(json["last_computer_move"].is_null());
        assert_eq!(json["legal_moves"][0]["row"], 2);
        assert_eq!(json["board"][3][3], "blue");
    }
}
