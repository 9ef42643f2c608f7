use chessgame::{
    chess::{Rank, ALL_SQUARES},
    ChessMove,
    Game,
    Piece,
    Square,
};

use crate::error::CodecError;

/// Size of the policy vector.
pub const NUM_MOVES: usize = 4672;

const SQUARES: usize = 64;
/// Every (from, to) pair, legal or not.
const PLAIN_MOVES: usize = SQUARES * SQUARES;
/// One band of 64 destination squares per piece, in this order.
const PROMOTION_PIECES: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

/// Decoding assumes every promotion starts from this rank.
pub const PROMOTION_ORIGIN_RANK: Rank = Rank::Seventh;

/// Map a move to its policy index.
///
/// Non-promotions use `from * 64 + to`. Promotions only keep the destination
/// square and the promoted piece, so two pawns promoting on the same square
/// share an index.
pub fn move_index(my_move: ChessMove) -> Result<usize, CodecError> {
    let to = my_move.get_dest().to_index();
    match my_move.get_promotion() {
        None => Ok(my_move.get_source().to_index() * SQUARES + to),
        Some(piece) => {
            let band = PROMOTION_PIECES
                .iter()
                .position(|&p| p == piece)
                .ok_or(CodecError::InvalidPromotion(piece))?;
            Ok(PLAIN_MOVES + band * SQUARES + to)
        }
    }
}

/// Rebuild the move behind a policy index and return it if it is legal in
/// `game`. Most indices are illegal in any given position.
pub fn index_move(index: usize, game: &Game) -> Option<ChessMove> {
    let candidate = if index < PLAIN_MOVES {
        ChessMove::new(ALL_SQUARES[index / SQUARES], ALL_SQUARES[index % SQUARES], None)
    } else {
        let offset = index - PLAIN_MOVES;
        let piece = *PROMOTION_PIECES.get(offset / SQUARES)?;
        let dest = ALL_SQUARES[offset % SQUARES];
        let source = Square::make_square(PROMOTION_ORIGIN_RANK, dest.get_file());
        ChessMove::new(source, dest, Some(piece))
    };
    game.is_legal(candidate).then(|| candidate)
}
