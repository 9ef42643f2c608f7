// search
pub const EXPLORATION: f32 = 1.4;
pub const ROLLOUTS_PER_MOVE: u32 = 100;
pub const CACHE_TTL_SECONDS: u64 = 300;
/// Entries kept by `MemoryCache`, each holds a full policy vector.
pub const CACHE_CAPACITY: usize = 8192;

// self-play
pub const SELF_PLAY_GAMES: usize = 8;
pub const SELF_PLAY_ROLLOUTS: u32 = 50;
pub const SELECTION_TEMPERATURE: f32 = 0.8;
pub const WORKERS: usize = 4;

pub const DIRICHLET_ALPHA: f32 = 0.3;
pub const NOISE_RATIO: f32 = 0.0;
