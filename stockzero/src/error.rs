use chessgame::{GameError, GameResult, Piece};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("cannot encode a promotion to {0:?}, only knight, bishop, rook and queen are allowed")]
    InvalidPromotion(Piece),
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SearchError {
    #[error("the number of simulations must be at least 1 (got {0})")]
    InvalidArgument(u32),
    #[error("cannot search a position that is already decided ({0:?})")]
    NoLegalMoves(GameResult),
    #[error(transparent)]
    InvalidPosition(#[from] GameError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
