use std::str::FromStr;

use arrayvec::ArrayVec;
use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece};

use crate::{
    game_result::{DrawReason, GameResult},
    material::insufficient_material,
    notation::parse_uci,
    GameError,
};

/// Upper bound on the number of legal moves in any chess position (218).
pub const MAX_MOVES: usize = 256;

const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;
const FIVEFOLD: usize = 5;

#[derive(Clone, Debug)]
pub struct Game {
    pub board: Board,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// Position hashes since the last irreversible move, current one included.
    history: Vec<u64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::from_board(Board::default(), 0, 1)
    }
}

impl Game {
    fn from_board(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Game {
            board,
            halfmove_clock,
            fullmove_number,
            history: vec![board.get_hash()],
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidFen(fen.to_owned());
        let fields: Vec<_> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(invalid());
        }
        let board = Board::from_str(&fields[..4].join(" ")).map_err(|_| invalid())?;
        let halfmove_clock = match fields.get(4) {
            Some(clock) => clock.parse().map_err(|_| invalid())?,
            None => 0,
        };
        let fullmove_number = match fields.get(5) {
            Some(number) => number.parse().map_err(|_| invalid())?,
            None => 1,
        };
        Ok(Self::from_board(board, halfmove_clock, fullmove_number))
    }

    /// Start position followed by the given UCI moves.
    pub fn from_uci_moves(moves: &[&str]) -> Result<Self, GameError> {
        Self::default().with_moves(moves)
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Result<Self, GameError> {
        for s in moves {
            self.play(parse_uci(s)?)?;
        }
        Ok(self)
    }

    pub fn to_fen(&self) -> String {
        format!("{} {} {}", self.canonical_key(), self.halfmove_clock, self.fullmove_number)
    }

    /// Placement, side to move, castling rights and en passant square.
    /// The clocks are left out since they do not change what a position is worth.
    pub fn canonical_key(&self) -> String {
        self.board
            .to_string()
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Ply count from the start of the game, derived from the move counters.
    pub fn ply(&self) -> u32 {
        let black = matches!(self.to_move(), Color::Black) as u32;
        self.fullmove_number.saturating_sub(1) * 2 + black
    }

    /// Legal moves ordered by origin square, then destination square, then
    /// promotion piece. Everything that breaks ties by move order relies on this.
    pub fn possible_moves(&self) -> ArrayVec<ChessMove, MAX_MOVES> {
        let mut moves: ArrayVec<ChessMove, MAX_MOVES> = MoveGen::new_legal(&self.board).collect();
        moves.sort_by_key(|m| {
            (
                m.get_source().to_index(),
                m.get_dest().to_index(),
                m.get_promotion().map(|piece| piece.to_index()),
            )
        });
        moves
    }

    pub fn is_legal(&self, my_move: ChessMove) -> bool {
        self.board.legal(my_move)
    }

    pub fn play(&mut self, my_move: ChessMove) -> Result<(), GameError> {
        if !self.is_legal(my_move) {
            return Err(GameError::IllegalMove {
                mv: my_move.to_string(),
                fen: self.to_fen(),
            });
        }

        let irreversible = self.board.piece_on(my_move.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(my_move.get_dest()).is_some();
        if self.to_move() == Color::Black {
            self.fullmove_number += 1;
        }
        self.board = self.board.make_move_new(my_move);

        if irreversible {
            self.halfmove_clock = 0;
            self.history.clear();
        } else {
            self.halfmove_clock += 1;
        }
        self.history.push(self.board.get_hash());
        Ok(())
    }

    fn repetitions(&self) -> usize {
        let current = self.board.get_hash();
        self.history.iter().filter(|&&hash| hash == current).count()
    }

    pub fn result(&self) -> GameResult {
        match self.board.status() {
            BoardStatus::Checkmate => GameResult::Winner {
                color: !self.to_move(),
            },
            BoardStatus::Stalemate => GameResult::Draw {
                reason: DrawReason::Stalemate,
            },
            BoardStatus::Ongoing => {
                if insufficient_material(&self.board) {
                    GameResult::Draw {
                        reason: DrawReason::InsufficientMaterial,
                    }
                } else if self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES {
                    GameResult::Draw {
                        reason: DrawReason::SeventyFiveMoves,
                    }
                } else if self.repetitions() >= FIVEFOLD {
                    GameResult::Draw {
                        reason: DrawReason::FivefoldRepetition,
                    }
                } else {
                    GameResult::Ongoing
                }
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        !self.result().is_ongoing()
    }

    /// Exact result relative to the side to move, if the game is over.
    pub fn terminal_value(&self) -> Option<f32> {
        self.result().value(self.to_move())
    }
}
