use std::path::PathBuf;

use clap::Parser;
use stockzero::config::{SELECTION_TEMPERATURE, SELF_PLAY_GAMES, SELF_PLAY_ROLLOUTS, WORKERS};

/// Generate StockZero training examples by self-play
#[derive(Parser)]
pub struct Args {
    /// Number of games to play
    #[clap(short, long, default_value_t = SELF_PLAY_GAMES)]
    pub games: usize,
    /// Simulations per move
    #[clap(short, long, default_value_t = SELF_PLAY_ROLLOUTS)]
    pub rollouts: u32,
    /// Move selection temperature, must be above zero
    #[clap(short, long, default_value_t = SELECTION_TEMPERATURE)]
    pub temperature: f32,
    /// Base seed, game `i` uses `seed + i`
    #[clap(short, long, default_value_t = 0)]
    pub seed: u64,
    /// Number of worker threads
    #[clap(short, long, default_value_t = WORKERS)]
    pub workers: usize,
    /// Share of Dirichlet noise mixed into the root priors
    #[clap(short, long)]
    pub noise_ratio: Option<f32>,
    /// Directory for the example files
    #[clap(short, long, default_value = "_examples")]
    pub output: PathBuf,
    /// Log to this file instead of stderr
    #[clap(short, long)]
    pub log_file: Option<PathBuf>,
}
