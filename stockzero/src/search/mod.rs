mod debug;
mod mcts;
mod node;
mod noise;
mod play;
mod tree;

pub use mcts::{Engine, SearchConfig};
pub use node::{Child, Node, NodeId, NodeState};
pub use tree::Tree;
