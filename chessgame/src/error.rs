use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid FEN string: {0:?}")]
    InvalidFen(String),
    #[error("cannot parse move {0:?}, expected UCI notation such as e2e4 or e7e8q")]
    InvalidMove(String),
    #[error("move {mv} is not legal in position {fen}")]
    IllegalMove { mv: String, fen: String },
}
