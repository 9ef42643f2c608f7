use std::path::PathBuf;

use clap::Parser;
use stockzero::config::ROLLOUTS_PER_MOVE;

/// Run StockZero as a UCI engine
#[derive(Parser)]
pub struct Args {
    /// Simulations per move when `go` does not say
    #[clap(short, long, default_value_t = ROLLOUTS_PER_MOVE)]
    pub rollouts: u32,
    /// Log to this file, stdout belongs to the GUI
    #[clap(short, long)]
    pub log_file: Option<PathBuf>,
}
