use chess::{BitBoard, Board, Piece, EMPTY};

/// Neither side can ever deliver mate: no pawns, rooks or queens remain and
/// the minor pieces are either at most one, or all bishops on one square colour.
pub fn insufficient_material(board: &Board) -> bool {
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy != EMPTY {
        return false;
    }

    let knights = *board.pieces(Piece::Knight);
    let bishops = *board.pieces(Piece::Bishop);
    if knights.popcnt() + bishops.popcnt() <= 1 {
        return true;
    }

    knights == EMPTY && same_square_colour(bishops)
}

fn same_square_colour(pieces: BitBoard) -> bool {
    let mut colours = pieces.map(|square| (square.get_rank().to_index() + square.get_file().to_index()) % 2);
    match colours.next() {
        Some(first) => colours.all(|colour| colour == first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chess::Board;

    use super::insufficient_material;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).unwrap()
    }

    #[test]
    fn bare_kings() {
        assert!(insufficient_material(&board("8/8/4k3/8/8/3K4/8/8 w - - 0 1")));
    }

    #[test]
    fn single_minor() {
        assert!(insufficient_material(&board("8/8/4k3/8/8/3K4/5N2/8 w - - 0 1")));
        assert!(insufficient_material(&board("8/8/4k3/8/8/3K4/5b2/8 w - - 0 1")));
    }

    #[test]
    fn bishops_on_one_colour() {
        // c1 and f4 are both dark squares.
        assert!(insufficient_material(&board("8/8/4k3/8/5b2/3K4/8/2B5 w - - 0 1")));
        // c1 is dark, c2 is light.
        assert!(!insufficient_material(&board("8/8/4k3/8/8/3K4/2b5/2B5 w - - 0 1")));
    }

    #[test]
    fn mating_material() {
        assert!(!insufficient_material(&board("8/8/4k3/8/8/3K4/8/R7 w - - 0 1")));
        assert!(!insufficient_material(&board("8/8/4k3/8/8/3K4/4P3/8 w - - 0 1")));
        assert!(!insufficient_material(&board("8/8/4k3/8/8/3K4/3NN3/8 w - - 0 1")));
    }
}
