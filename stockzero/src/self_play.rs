use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::channel,
    },
    thread,
};

use chessgame::{Game, GameRecord, GameResult};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    agent::Agent,
    cache::EvalCache,
    config::{DIRICHLET_ALPHA, NOISE_RATIO, SELECTION_TEMPERATURE, SELF_PLAY_ROLLOUTS},
    error::SearchError,
    example::{Example, ExampleError, IncompleteExample},
    search::Engine,
};

#[derive(Clone, Copy, Debug)]
pub struct SelfPlaySettings {
    pub rollouts: u32,
    /// Must be above zero so that games differ.
    pub temperature: f32,
    pub noise_alpha: f32,
    /// Share of Dirichlet noise in the root priors, 0 disables it.
    pub noise_ratio: f32,
}

impl Default for SelfPlaySettings {
    fn default() -> Self {
        SelfPlaySettings {
            rollouts: SELF_PLAY_ROLLOUTS,
            temperature: SELECTION_TEMPERATURE,
            noise_alpha: DIRICHLET_ALPHA,
            noise_ratio: NOISE_RATIO,
        }
    }
}

/// A finished self-play game: its training examples and the moves played.
#[derive(Clone, Debug)]
pub struct SelfPlayGame {
    pub examples: Vec<Example>,
    pub record: GameRecord,
    pub result: GameResult,
}

impl SelfPlayGame {
    /// PGN of the game, `round` counting from 1.
    pub fn to_pgn(&self, round: usize) -> Result<String, ExampleError> {
        let round = round.to_string();
        Ok(self.record.to_pgn(&[
            ("Event", "StockZero Self-Play Game"),
            ("Round", round.as_str()),
            ("AI-Engine", "StockZero"),
        ])?)
    }
}

/// Play one game against self from `start` and return an example for
/// every position where a move was searched.
pub fn play_game<A, C, R>(
    engine: &Engine<A, C>,
    start: Game,
    settings: &SelfPlaySettings,
    rng: &mut R,
) -> Result<Vec<Example>, SearchError>
where
    A: Agent,
    C: EvalCache,
    R: Rng + ?Sized,
{
    play_recorded_game(engine, start, settings, rng).map(|game| game.examples)
}

/// Like `play_game`, keeping the moves and the result as well.
pub fn play_recorded_game<A, C, R>(
    engine: &Engine<A, C>,
    start: Game,
    settings: &SelfPlaySettings,
    rng: &mut R,
) -> Result<SelfPlayGame, SearchError>
where
    A: Agent,
    C: EvalCache,
    R: Rng + ?Sized,
{
    if settings.rollouts < 1 {
        return Err(SearchError::InvalidArgument(settings.rollouts));
    }

    let mut record = GameRecord::new(start.clone());
    let mut game = start;
    let mut game_examples = Vec::new();
    while game.result().is_ongoing() {
        let mut tree = engine.new_tree(&game)?;
        tree.apply_dirichlet(settings.noise_alpha, settings.noise_ratio, rng);
        engine.rollouts(&mut tree, settings.rollouts)?;

        game_examples.push(IncompleteExample {
            game: game.clone(),
            policy: tree.improved_policy(),
        });

        // play the tree's own move, promotions included
        let my_move = tree
            .pick_move(settings.temperature, rng)
            .ok_or_else(|| SearchError::NoLegalMoves(game.result()))?;
        game.play(my_move)?;
        record.push(my_move);
    }

    let result = game.result();
    debug!("self-play game over after {} plies: {result:?}", game_examples.len());
    let examples = game_examples
        .into_iter()
        .map(|example| {
            let value = result.value(example.game.to_move()).unwrap_or_default();
            example.complete(value)
        })
        .collect();
    Ok(SelfPlayGame {
        examples,
        record,
        result,
    })
}

/// Play `games` games against self on `workers` threads sharing `engine`
/// and return their examples.
///
/// Game `i` is played with an RNG seeded with `seed + i` and the examples
/// are returned in game order, so the output only depends on the seed.
pub fn self_play<A, C>(
    engine: &Engine<A, C>,
    start: &Game,
    games: usize,
    workers: usize,
    settings: &SelfPlaySettings,
    seed: u64,
) -> Result<Vec<Example>, SearchError>
where
    A: Agent,
    C: EvalCache,
{
    Ok(self_play_games(engine, start, games, workers, settings, seed)?
        .into_iter()
        .flat_map(|game| game.examples)
        .collect())
}

/// Same as `self_play` but returns whole games, in game order.
pub fn self_play_games<A, C>(
    engine: &Engine<A, C>,
    start: &Game,
    games: usize,
    workers: usize,
    settings: &SelfPlaySettings,
    seed: u64,
) -> Result<Vec<SelfPlayGame>, SearchError>
where
    A: Agent,
    C: EvalCache,
{
    let workers = workers.clamp(1, games.max(1));
    info!("starting self-play: {games} games on {workers} workers");

    let next_game = AtomicUsize::new(0);
    let (tx, rx) = channel();
    let mut finished = thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next_game = &next_game;
            s.spawn(move || loop {
                let i = next_game.fetch_add(1, Ordering::Relaxed);
                if i >= games {
                    break;
                }
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                let game = play_recorded_game(engine, start.clone(), settings, &mut rng);
                if tx.send((i, game)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        let mut finished = Vec::with_capacity(games);
        for (i, game) in rx {
            match &game {
                Ok(game) => info!(
                    "self-play game {}/{games} done: {} plies, {}, termination {}",
                    finished.len() + 1,
                    game.record.moves.len(),
                    game.result.pgn_result(),
                    game.result.termination().unwrap_or("none"),
                ),
                Err(error) => warn!("self-play game {i} failed: {error}"),
            }
            finished.push((i, game));
        }
        finished
    });

    finished.sort_by_key(|(i, _)| *i);
    finished.into_iter().map(|(_, game)| game).collect()
}

/// Write each game to `<dir>/self_play_game_<n>.pgn`, `n` counting from 1.
pub fn save_pgns(dir: impl AsRef<Path>, games: &[SelfPlayGame]) -> Result<Vec<PathBuf>, ExampleError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    games
        .iter()
        .enumerate()
        .map(|(i, game)| {
            let path = dir.join(format!("self_play_game_{}.pgn", i + 1));
            fs::write(&path, game.to_pgn(i + 1)?)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use chessgame::{Color, DrawReason, Game, GameResult};
    use rand::{rngs::StdRng, SeedableRng};

    use super::{play_game, play_recorded_game, save_pgns, self_play, self_play_games, SelfPlaySettings};
    use crate::{
        agent::Uniform,
        cache::{MemoryCache, NoCache},
        error::SearchError,
        search::{Engine, SearchConfig},
    };

    /// White to move, the 75-move rule triggers after one reversible move.
    const ONE_PLY_DRAW: &str = "8/8/4k3/8/8/3K4/8/R7 w - - 149 120";
    /// Same material, two plies left.
    const TWO_PLY_DRAW: &str = "8/8/4k3/8/8/3K4/8/R7 w - - 148 120";
    const MATE_IN_ONE: &str = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";

    fn engine() -> Engine<Uniform, NoCache> {
        Engine::new(Uniform, NoCache, SearchConfig::default())
    }

    fn settings(rollouts: u32, temperature: f32) -> SelfPlaySettings {
        SelfPlaySettings {
            rollouts,
            temperature,
            ..Default::default()
        }
    }

    #[test]
    fn forced_draw() -> Result<(), SearchError> {
        let start = Game::from_fen(ONE_PLY_DRAW)?;
        let mut rng = StdRng::seed_from_u64(0);
        let examples = play_game(&engine(), start.clone(), &settings(10, 1.0), &mut rng)?;

        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].result, 0.0);
        assert_eq!(examples[0].fen, start.to_fen());
        assert_eq!(examples[0].policy.iter().map(|(_, visits)| visits).sum::<u32>(), 10);
        Ok(())
    }

    #[test]
    fn draw_after_two_plies() -> Result<(), SearchError> {
        let start = Game::from_fen(TWO_PLY_DRAW)?;
        let mut rng = StdRng::seed_from_u64(3);
        let examples = play_game(&engine(), start, &settings(10, 1.0), &mut rng)?;

        assert_eq!(examples.len(), 2);
        assert!(examples.iter().all(|example| example.result == 0.0));
        assert_eq!(examples[1].game()?.to_move(), Color::Black);
        Ok(())
    }

    #[test]
    fn mate_scores_for_the_winner() -> Result<(), SearchError> {
        let start = Game::from_fen(MATE_IN_ONE)?;
        let mut rng = StdRng::seed_from_u64(0);
        let examples = play_game(&engine(), start, &settings(50, 0.05), &mut rng)?;
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].result, 1.0);

        // black delivers the mate here, so the outcome is positive for black
        let start = Game::from_uci_moves(&["f2f3", "e7e5", "g2g4"])?;
        let examples = play_game(&engine(), start, &settings(50, 0.05), &mut rng)?;
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].game()?.to_move(), Color::Black);
        assert_eq!(examples[0].result, 1.0);
        Ok(())
    }

    #[test]
    fn no_rollouts_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            play_game(&engine(), Game::default(), &settings(0, 1.0), &mut rng).unwrap_err(),
            SearchError::InvalidArgument(0)
        );
    }

    #[test]
    fn finished_start_gives_no_examples() -> Result<(), SearchError> {
        let mated = Game::from_uci_moves(&["f2f3", "e7e5", "g2g4", "d8h4"])?;
        let mut rng = StdRng::seed_from_u64(0);
        assert!(play_game(&engine(), mated, &settings(10, 1.0), &mut rng)?.is_empty());
        Ok(())
    }

    #[test]
    fn batch_is_reproducible() -> Result<(), SearchError> {
        let start = Game::from_fen(TWO_PLY_DRAW)?;
        let engine = Engine::new(Uniform, MemoryCache::new(), SearchConfig::default());
        let settings = SelfPlaySettings {
            noise_ratio: 0.25,
            ..settings(8, 1.0)
        };

        let a = self_play(&engine, &start, 5, 3, &settings, 42)?;
        let b = self_play(&engine, &start, 5, 1, &settings, 42)?;
        assert_eq!(a.len(), 10);
        assert_eq!(a, b);
        assert!(self_play(&engine, &start, 0, 3, &settings, 42)?.is_empty());
        Ok(())
    }

    #[test]
    fn recorded_game_keeps_moves_and_result() -> Result<(), SearchError> {
        let start = Game::from_fen(TWO_PLY_DRAW)?;
        let mut rng = StdRng::seed_from_u64(5);
        let game = play_recorded_game(&engine(), start.clone(), &settings(10, 1.0), &mut rng)?;

        assert_eq!(game.record.moves.len(), 2);
        assert_eq!(game.examples.len(), 2);
        assert_eq!(game.result, GameResult::Draw {
            reason: DrawReason::SeventyFiveMoves
        });
        assert_eq!(game.record.end()?.result(), game.result);
        assert_eq!(game.record.start.to_fen(), start.to_fen());
        Ok(())
    }

    #[test]
    fn self_play_pgn() -> Result<(), Box<dyn std::error::Error>> {
        let start = Game::from_fen(MATE_IN_ONE)?;
        let settings = settings(50, 0.05);
        let games = self_play_games(&engine(), &start, 2, 2, &settings, 0)?;
        assert_eq!(games.len(), 2);

        let pgn = games[1].to_pgn(2)?;
        for tag in [
            "[Event \"StockZero Self-Play Game\"]",
            "[Round \"2\"]",
            "[Result \"1-0\"]",
            "[SetUp \"1\"]",
            "[Termination \"CHECKMATE\"]",
            "[PlyCount \"1\"]",
            "[AI-Engine \"StockZero\"]",
        ] {
            assert!(pgn.contains(tag), "{tag} missing from\n{pgn}");
        }
        assert!(pgn.ends_with("\n\n1. Ra8# 1-0\n"), "{pgn}");

        let dir = env::temp_dir().join(format!("stockzero-pgn-{}", std::process::id()));
        let paths = save_pgns(&dir, &games)?;
        assert_eq!(paths[1].file_name().and_then(|name| name.to_str()), Some("self_play_game_2.pgn"));
        assert_eq!(fs::read_to_string(&paths[1])?, pgn);
        fs::remove_dir_all(dir)?;
        Ok(())
    }
}
