use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use chessgame::Game;
use clap::Parser;
use cli::Args;
use log::{debug, warn, LevelFilter};
use mimalloc::MiMalloc;
use stockzero::{Agent, EvalCache, Engine, MemoryCache, SearchConfig, Tree, Uniform};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod cli;

fn main() -> Result<()> {
    let args = Args::parse();
    match &args.log_file {
        Some(path) => simple_logging::log_to_file(path, LevelFilter::Debug)?,
        None => simple_logging::log_to_stderr(LevelFilter::Warn),
    }

    let engine = Engine::new(
        Uniform,
        MemoryCache::new(),
        SearchConfig {
            rollouts: args.rollouts,
            ..Default::default()
        },
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut game = Game::default();
    for line in stdin.lock().lines() {
        let line = line?;
        debug!("> {line}");
        match handle(&line, &mut game, &engine, &mut stdout) {
            Ok(true) => {}
            Ok(false) => break,
            Err(error) => warn!("{line:?}: {error:#}"),
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Respond to one command. Returns `false` once the GUI asks us to quit.
fn handle<A: Agent, C: EvalCache>(
    line: &str,
    game: &mut Game,
    engine: &Engine<A, C>,
    out: &mut impl Write,
) -> Result<bool> {
    let words: Vec<_> = line.split_whitespace().collect();
    match words.first().copied() {
        Some("uci") => {
            writeln!(out, "id name StockZero")?;
            writeln!(out, "id author StockZero developers")?;
            writeln!(out, "uciok")?;
        }
        Some("isready") => writeln!(out, "readyok")?,
        Some("ucinewgame") => *game = Game::default(),
        Some("position") => *game = parse_position(&words[1..])?,
        Some("go") => {
            // The GUI waits for a bestmove, so a bad node count only costs
            // the limit and not the answer.
            let nodes = words
                .iter()
                .position(|&w| w == "nodes")
                .and_then(|i| words.get(i + 1))
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|&n| n > 0)
                .unwrap_or_else(|| engine.config().rollouts);
            go(game, nodes, engine, out)?;
        }
        Some("quit") => return Ok(false),
        _ => {}
    }
    Ok(true)
}

/// `startpos [moves ...]` or `fen <fen> [moves ...]`.
fn parse_position(words: &[&str]) -> Result<Game> {
    let moves_at = words.iter().position(|&w| w == "moves").unwrap_or(words.len());
    let game = match words.first().copied() {
        Some("startpos") => Game::default(),
        Some("fen") => Game::from_fen(&words[1..moves_at].join(" "))?,
        _ => bail!("expected startpos or fen"),
    };
    let moves = words.get(moves_at + 1..).unwrap_or_default();
    Ok(game.with_moves(moves)?)
}

fn go<A: Agent, C: EvalCache>(game: &Game, nodes: u32, engine: &Engine<A, C>, out: &mut impl Write) -> Result<()> {
    if !game.result().is_ongoing() {
        // nothing to play, UCI spells that as a null move
        writeln!(out, "bestmove 0000")?;
        return Ok(());
    }

    let tree: Tree = engine.search(game, nodes)?;
    let best = tree.best_child().context("searched tree has no moves")?;
    let score = tree.node(best.node).expected_reward;
    let pv = tree
        .principal_variation()
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        out,
        "info nodes {} score cp {} pv {pv}",
        tree.root().visits,
        (score * 100.0).round() as i32
    )?;
    writeln!(out, "bestmove {}", best.my_move)?;
    Ok(())
}
