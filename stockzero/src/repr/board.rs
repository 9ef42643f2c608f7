use chessgame::{Color, Game, Piece};

pub const INPUT_PLANES: usize = 12;
pub const INPUT_SIZE: usize = INPUT_PLANES * 64;

const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Encode a position as 12 occupancy planes, white pieces first.
/// Value at `plane * 64 + rank * 8 + file`.
pub fn game_repr(game: &Game) -> Vec<f32> {
    let board = &game.board;
    let mut planes = vec![0.0; INPUT_SIZE];
    for (side, color) in [Color::White, Color::Black].into_iter().enumerate() {
        for (kind, &piece) in PIECES.iter().enumerate() {
            let plane = side * PIECES.len() + kind;
            for square in *board.pieces(piece) & *board.color_combined(color) {
                planes[plane * 64 + square.to_index()] = 1.0;
            }
        }
    }
    planes
}
