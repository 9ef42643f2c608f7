mod error;
mod game;
mod game_result;
mod material;
pub mod notation;
mod pgn;

pub use chess::{self, ChessMove, Color, Piece, Square};
pub use error::GameError;
pub use game::{Game, MAX_MOVES};
pub use game_result::{DrawReason, GameResult};
pub use notation::{parse_uci, to_san};
pub use pgn::GameRecord;
