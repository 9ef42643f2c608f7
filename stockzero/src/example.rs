use std::{
    fmt,
    fs,
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use chessgame::{parse_uci, ChessMove, Game, GameError};
use thiserror::Error;

use crate::{
    repr::{move_index, NUM_MOVES},
    sys_time,
};

#[derive(Debug, Error)]
pub enum ExampleError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("cannot parse result `{0}`")]
    Result(String),
    #[error("cannot parse visit entry `{0}`")]
    Visits(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A searched position whose game is still being played.
#[derive(Clone, Debug)]
pub struct IncompleteExample {
    pub game: Game,
    pub policy: Vec<(ChessMove, u32)>,
}

impl IncompleteExample {
    /// `result` is the outcome for the side to move in this position.
    #[must_use]
    pub fn complete(self, result: f32) -> Example {
        Example {
            fen: self.game.to_fen(),
            policy: self.policy,
            result,
        }
    }
}

/// One training sample: a position, the visit counts of its search and the
/// final outcome for the side to move.
#[derive(Clone, Debug, PartialEq)]
pub struct Example {
    pub fen: String,
    pub policy: Vec<(ChessMove, u32)>,
    pub result: f32,
}

impl Example {
    /// Visit counts spread over the policy indices and normalised.
    pub fn policy_target(&self) -> Vec<f32> {
        let mut target = vec![0.0; NUM_MOVES];
        let total = self.policy.iter().map(|(_, visits)| visits).sum::<u32>() as f32;
        if total == 0.0 {
            return target;
        }
        for &(my_move, visits) in &self.policy {
            if let Ok(index) = move_index(my_move) {
                target[index] += visits as f32 / total;
            }
        }
        target
    }

    pub fn game(&self) -> Result<Game, GameError> {
        Game::from_fen(&self.fen)
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};", self.fen, self.result)?;
        for (my_move, visits) in &self.policy {
            write!(f, "{my_move} {visits},")?;
        }
        Ok(())
    }
}

impl FromStr for Example {
    type Err = ExampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chunks = s.trim_end().split(';');
        let fen = chunks.next().filter(|fen| !fen.is_empty()).ok_or(ExampleError::Missing("position"))?;
        // Reject broken positions now rather than at training time.
        Game::from_fen(fen)?;

        let result = chunks.next().ok_or(ExampleError::Missing("result"))?;
        let result = result.parse().map_err(|_| ExampleError::Result(result.to_owned()))?;

        let policy = chunks
            .next()
            .ok_or(ExampleError::Missing("policy"))?
            .split_terminator(',')
            .map(|entry| {
                let (my_move, visits) = entry
                    .split_once(' ')
                    .ok_or_else(|| ExampleError::Visits(entry.to_owned()))?;
                let visits = visits.parse().map_err(|_| ExampleError::Visits(entry.to_owned()))?;
                Ok((parse_uci(my_move)?, visits))
            })
            .collect::<Result<_, ExampleError>>()?;

        Ok(Example {
            fen: fen.to_owned(),
            policy,
            result,
        })
    }
}

/// Write `examples` to a new file named after the current time inside `dir`.
pub fn save_examples(dir: impl AsRef<Path>, examples: &[Example]) -> io::Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.data", sys_time()));
    let out = examples.iter().map(|example| format!("{example}\n")).collect::<String>();
    fs::write(&path, out)?;
    Ok(path)
}

pub fn load_examples(path: impl AsRef<Path>) -> Result<Vec<Example>, ExampleError> {
    fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use chessgame::{parse_uci, Game};

    use super::{load_examples, save_examples, Example, ExampleError, IncompleteExample};
    use crate::repr::move_index;

    fn example() -> Example {
        IncompleteExample {
            game: Game::from_uci_moves(&["g1f3"]).unwrap(),
            policy: vec![(parse_uci("e7e5").unwrap(), 3), (parse_uci("c7c5").unwrap(), 1)],
        }
        .complete(-1.0)
    }

    #[test]
    fn line_format() {
        let line = example().to_string();
        assert_eq!(
            line,
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1;-1;e7e5 3,c7c5 1,"
        );
        assert_eq!(line.parse::<Example>().unwrap(), example());
    }

    #[test]
    fn promotions_survive_parsing() {
        let line = "8/P6k/8/8/8/8/8/K7 w - - 0 1;1;a7a8q 5,a7a8n 2,a1b1 1,";
        let example: Example = line.parse().unwrap();
        assert_eq!(example.policy[1].0, parse_uci("a7a8n").unwrap());
        assert_eq!(example.to_string(), line);
    }

    #[test]
    fn bad_lines() {
        assert!(matches!("".parse::<Example>(), Err(ExampleError::Missing("position"))));
        assert!(matches!("8/8/8 w - - 0 1;0;".parse::<Example>(), Err(ExampleError::Game(_))));
        let start = Game::default().to_fen();
        assert!(matches!(start.parse::<Example>(), Err(ExampleError::Missing("result"))));
        assert!(matches!(format!("{start};draw;").parse::<Example>(), Err(ExampleError::Result(_))));
        assert!(matches!(format!("{start};0;e2e4,").parse::<Example>(), Err(ExampleError::Visits(_))));
        assert!(matches!(format!("{start};0;e2e4 x,").parse::<Example>(), Err(ExampleError::Visits(_))));
        assert!(matches!(format!("{start};0;zz 1,").parse::<Example>(), Err(ExampleError::Game(_))));
    }

    #[test]
    fn policy_target_is_normalised() {
        let example = example();
        let target = example.policy_target();
        assert!((target.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert_eq!(target[move_index(parse_uci("e7e5").unwrap()).unwrap()], 0.75);
        assert_eq!(target[move_index(parse_uci("c7c5").unwrap()).unwrap()], 0.25);
        assert_eq!(example.game().unwrap().to_fen(), example.fen);
    }

    #[test]
    fn save_and_load() {
        let dir = env::temp_dir().join(format!("stockzero-examples-{}", std::process::id()));
        let examples = vec![example(), example()];
        let path = save_examples(&dir, &examples).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("data"));
        assert_eq!(load_examples(&path).unwrap(), examples);
        fs::remove_dir_all(dir).unwrap();
    }
}
