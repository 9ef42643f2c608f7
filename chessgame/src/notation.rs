use std::str::FromStr;

use chess::{ChessMove, Color, MoveGen, Piece, Square};

use crate::{Game, GameError};

/// Parse a move in UCI long algebraic notation (`e2e4`, `e7e8q`).
/// Only the syntax is checked here, legality depends on the position.
pub fn parse_uci(s: &str) -> Result<ChessMove, GameError> {
    let invalid = || GameError::InvalidMove(s.to_owned());
    if !s.is_ascii() || !(4..=5).contains(&s.len()) {
        return Err(invalid());
    }

    let source = Square::from_str(&s[0..2]).map_err(|_| invalid())?;
    let dest = Square::from_str(&s[2..4]).map_err(|_| invalid())?;
    let promotion = match s.as_bytes().get(4) {
        None => None,
        Some(b'n') => Some(Piece::Knight),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'r') => Some(Piece::Rook),
        Some(b'q') => Some(Piece::Queen),
        Some(_) => return Err(invalid()),
    };
    Ok(ChessMove::new(source, dest, promotion))
}

/// Standard algebraic notation of a legal move in `game` (`Nf3`, `exd6`,
/// `O-O`, `a8=Q+`, `Rad1`).
pub fn to_san(game: &Game, my_move: ChessMove) -> Result<String, GameError> {
    let illegal = || GameError::IllegalMove {
        mv: my_move.to_string(),
        fen: game.to_fen(),
    };
    if !game.is_legal(my_move) {
        return Err(illegal());
    }
    let board = &game.board;
    let (source, dest) = (my_move.get_source(), my_move.get_dest());
    let piece = board.piece_on(source).ok_or_else(illegal)?;
    let file_distance = source.get_file().to_index().abs_diff(dest.get_file().to_index());

    let mut san = String::new();
    if piece == Piece::King && file_distance == 2 {
        san.push_str(if dest.get_file().to_index() > source.get_file().to_index() {
            "O-O"
        } else {
            "O-O-O"
        });
    } else if piece == Piece::Pawn {
        // en passant included, a pawn only changes file when it captures
        if file_distance != 0 {
            san.push(file_char(source));
            san.push('x');
        }
        san.push_str(&dest.to_string());
        if let Some(promotion) = my_move.get_promotion() {
            san.push('=');
            san.push_str(&promotion.to_string(Color::White));
        }
    } else {
        san.push_str(&piece.to_string(Color::White));
        let rivals: Vec<Square> = MoveGen::new_legal(board)
            .filter(|m| m.get_dest() == dest && m.get_source() != source)
            .filter(|m| board.piece_on(m.get_source()) == Some(piece))
            .map(|m| m.get_source())
            .collect();
        if !rivals.is_empty() {
            if rivals.iter().all(|s| s.get_file() != source.get_file()) {
                san.push(file_char(source));
            } else if rivals.iter().all(|s| s.get_rank() != source.get_rank()) {
                san.push(rank_char(source));
            } else {
                san.push(file_char(source));
                san.push(rank_char(source));
            }
        }
        if board.piece_on(dest).is_some() {
            san.push('x');
        }
        san.push_str(&dest.to_string());
    }

    let next = board.make_move_new(my_move);
    if next.checkers().popcnt() > 0 {
        san.push(if MoveGen::new_legal(&next).len() == 0 { '#' } else { '+' });
    }
    Ok(san)
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}
