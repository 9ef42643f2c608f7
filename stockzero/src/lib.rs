use std::time::SystemTime;

pub mod agent;
pub mod cache;
pub mod config;
pub mod error;
pub mod example;
pub mod repr;
pub mod search;
pub mod self_play;

pub use agent::{mask_policy, Agent, Eval, Policy, Uniform};
pub use cache::{EvalCache, Evaluation, MemoryCache, NoCache};
pub use error::{CodecError, SearchError};
pub use example::{load_examples, save_examples, Example, ExampleError, IncompleteExample};
pub use repr::{game_repr, index_move, move_index, NUM_MOVES};
pub use search::{Engine, SearchConfig, Tree};
pub use self_play::{play_game, play_recorded_game, save_pgns, self_play, self_play_games, SelfPlayGame, SelfPlaySettings};

/// Get UNIX time in seconds.
pub fn sys_time() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
