use chess::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Winner { color: Color },
    Draw { reason: DrawReason },
    Ongoing,
}

impl Default for GameResult {
    fn default() -> Self {
        GameResult::Ongoing
    }
}

impl GameResult {
    pub fn is_ongoing(self) -> bool {
        matches!(self, GameResult::Ongoing)
    }

    /// Score of a finished game for `perspective`: 1 for a win,
    /// -1 for a loss and 0 for a draw. `None` while the game goes on.
    pub fn value(self, perspective: Color) -> Option<f32> {
        match self {
            GameResult::Winner { color } if color == perspective => Some(1.0),
            GameResult::Winner { .. } => Some(-1.0),
            GameResult::Draw { .. } => Some(0.0),
            GameResult::Ongoing => None,
        }
    }

    /// Result tag of a PGN game.
    pub fn pgn_result(self) -> &'static str {
        match self {
            GameResult::Winner { color: Color::White } => "1-0",
            GameResult::Winner { color: Color::Black } => "0-1",
            GameResult::Draw { .. } => "1/2-1/2",
            GameResult::Ongoing => "*",
        }
    }

    /// Why the game ended, in the upper case form used by PGN tools.
    pub fn termination(self) -> Option<&'static str> {
        match self {
            GameResult::Winner { .. } => Some("CHECKMATE"),
            GameResult::Draw { reason } => Some(match reason {
                DrawReason::Stalemate => "STALEMATE",
                DrawReason::InsufficientMaterial => "INSUFFICIENT_MATERIAL",
                DrawReason::SeventyFiveMoves => "SEVENTYFIVE_MOVES",
                DrawReason::FivefoldRepetition => "FIVEFOLD_REPETITION",
            }),
            GameResult::Ongoing => None,
        }
    }
}
