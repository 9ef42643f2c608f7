use anyhow::{ensure, Result};
use chessgame::Game;
use clap::Parser;
use cli::Args;
use log::{info, LevelFilter};
use mimalloc::MiMalloc;
use stockzero::{save_examples, save_pgns, self_play_games, Engine, MemoryCache, SearchConfig, SelfPlaySettings, Uniform};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod cli;

fn main() -> Result<()> {
    let args = Args::parse();
    match &args.log_file {
        Some(path) => simple_logging::log_to_file(path, LevelFilter::Info)?,
        None => simple_logging::log_to_stderr(LevelFilter::Info),
    }
    ensure!(args.temperature > 0.0, "self-play needs a temperature above zero");

    let mut settings = SelfPlaySettings {
        rollouts: args.rollouts,
        temperature: args.temperature,
        ..Default::default()
    };
    if let Some(ratio) = args.noise_ratio {
        settings.noise_ratio = ratio;
    }

    // Without trained weights the uniform agent bootstraps the first examples.
    let engine = Engine::new(Uniform, MemoryCache::new(), SearchConfig::default());
    let games = self_play_games(&engine, &Game::default(), args.games, args.workers, &settings, args.seed)?;

    let examples: Vec<_> = games.iter().flat_map(|game| game.examples.iter().cloned()).collect();
    let path = save_examples(&args.output, &examples)?;
    info!("saved {} examples to {}", examples.len(), path.display());
    let pgns = save_pgns(&args.output, &games)?;
    info!("saved {} games as PGN in {}", pgns.len(), args.output.display());
    Ok(())
}
