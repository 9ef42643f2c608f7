use chess::{ChessMove, Color};

use crate::{notation::to_san, Game, GameError};

const LINE_WIDTH: usize = 80;
const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

/// The moves of one game and where it started.
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub start: Game,
    pub moves: Vec<ChessMove>,
}

impl GameRecord {
    pub fn new(start: Game) -> Self {
        GameRecord {
            start,
            moves: Vec::new(),
        }
    }

    pub fn push(&mut self, my_move: ChessMove) {
        self.moves.push(my_move);
    }

    /// Replay the moves from the start.
    pub fn end(&self) -> Result<Game, GameError> {
        let mut game = self.start.clone();
        for &my_move in &self.moves {
            game.play(my_move)?;
        }
        Ok(game)
    }

    /// Export in PGN with moves in SAN.
    ///
    /// `tags` fill the seven tag roster, missing ones are `?`. The Result,
    /// Termination and PlyCount tags come from the game itself, as do SetUp
    /// and FEN when it did not start from the initial position. Tags outside
    /// the roster follow those.
    pub fn to_pgn(&self, tags: &[(&str, &str)]) -> Result<String, GameError> {
        let mut game = self.start.clone();
        let mut tokens = Vec::with_capacity(self.moves.len() * 3 / 2 + 2);
        for (i, &my_move) in self.moves.iter().enumerate() {
            match game.to_move() {
                Color::White => tokens.push(format!("{}.", game.fullmove_number)),
                Color::Black if i == 0 => tokens.push(format!("{}...", game.fullmove_number)),
                Color::Black => {}
            }
            tokens.push(to_san(&game, my_move)?);
            game.play(my_move)?;
        }
        let result = game.result();
        tokens.push(result.pgn_result().to_owned());

        let given = |name: &str| tags.iter().find(|(tag, _)| *tag == name).map(|(_, value)| *value);
        let mut header: Vec<(&str, String)> = SEVEN_TAG_ROSTER
            .iter()
            .map(|&name| {
                let value = match name {
                    "Result" => result.pgn_result(),
                    "Date" => given(name).unwrap_or("????.??.??"),
                    _ => given(name).unwrap_or("?"),
                };
                (name, value.to_owned())
            })
            .collect();
        let start = self.start.to_fen();
        if start != Game::default().to_fen() {
            header.push(("SetUp", "1".to_owned()));
            header.push(("FEN", start));
        }
        if let Some(termination) = result.termination() {
            header.push(("Termination", termination.to_owned()));
        }
        header.push(("PlyCount", game.ply().to_string()));
        for &(name, value) in tags {
            if !SEVEN_TAG_ROSTER.contains(&name) {
                header.push((name, value.to_owned()));
            }
        }

        let mut pgn = String::new();
        for (name, value) in header {
            let value = value.replace('\\', "\\\\").replace('"', "\\\"");
            pgn.push_str(&format!("[{name} \"{value}\"]\n"));
        }
        pgn.push('\n');

        let mut line_len = 0;
        for token in tokens {
            if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
                pgn.push('\n');
                line_len = 0;
            } else if line_len > 0 {
                pgn.push(' ');
                line_len += 1;
            }
            line_len += token.len();
            pgn.push_str(&token);
        }
        pgn.push('\n');
        Ok(pgn)
    }
}
