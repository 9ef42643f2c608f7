mod board;
mod moves;

pub use board::{game_repr, INPUT_PLANES, INPUT_SIZE};
pub use moves::{index_move, move_index, NUM_MOVES, PROMOTION_ORIGIN_RANK};
