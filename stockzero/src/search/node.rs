use chessgame::{ChessMove, Game};

/// Position of a node inside its tree's arena.
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeState {
    /// Not evaluated yet, no children.
    Unexpanded,
    /// Children created from one agent call.
    Expanded,
    /// Finished game. `value` is the exact result for the side to move.
    Terminal { value: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Child {
    pub my_move: ChessMove,
    /// Policy index of `my_move`.
    pub index: usize,
    pub node: NodeId,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub game: Game,
    pub parent: Option<NodeId>,
    /// In legal move order.
    pub children: Vec<Child>,
    pub state: NodeState,
    pub policy: f32,
    pub visits: u32,
    /// Sum of backed up values, seen by the player who moved into this node.
    pub value_sum: f32,
    pub expected_reward: f32,
}

impl Node {
    pub fn new(game: Game, parent: Option<NodeId>, policy: f32) -> Self {
        Node {
            game,
            parent,
            children: Vec::new(),
            state: NodeState::Unexpanded,
            policy,
            visits: 0,
            value_sum: 0.0,
            expected_reward: 0.0,
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.state, NodeState::Expanded)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, NodeState::Terminal { .. })
    }

    pub(crate) fn update(&mut self, reward: f32) {
        self.visits += 1;
        self.value_sum += reward;
        self.expected_reward = self.value_sum / self.visits as f32;
    }
}
