use chessgame::{ChessMove, Game};

use super::node::{Child, Node, NodeId, NodeState};
use crate::error::SearchError;

/// Search tree for one move decision. Nodes live in an arena and refer to
/// each other by index; the whole tree is dropped once a move is chosen.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    exploration: f32,
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub(crate) fn new(game: Game, exploration: f32) -> Self {
        Tree {
            nodes: vec![Node::new(game, None, 1.0)],
            exploration,
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `id` with their nodes, in legal move order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&Child, &Node)> + '_ {
        self.nodes[id].children.iter().map(move |child| (child, &self.nodes[child.node]))
    }

    fn upper_confidence_bound(&self, parent: &Node, child: &Node) -> f32 {
        // U(s, a) = Q(s, a) + c * P(s, a) * sqrt(N(s)) / (1 + N(s, a))
        child.expected_reward
            + self.exploration * child.policy * (parent.visits as f32).sqrt() / (1.0 + child.visits as f32)
    }

    /// Child with the highest PUCT score. The earliest child wins ties.
    fn select(&self, id: NodeId) -> Option<NodeId> {
        let parent = &self.nodes[id];
        let mut best: Option<(f32, NodeId)> = None;
        for child in &parent.children {
            let ucb = self.upper_confidence_bound(parent, &self.nodes[child.node]);
            if best.map_or(true, |(best_ucb, _)| ucb > best_ucb) {
                best = Some((ucb, child.node));
            }
        }
        best.map(|(_, node)| node)
    }

    /// Walk down from the root through expanded nodes.
    /// The returned path starts at the root and ends at the leaf.
    pub(crate) fn selection_path(&self) -> Vec<NodeId> {
        let mut path = vec![Self::ROOT];
        let mut current = Self::ROOT;
        while self.nodes[current].is_expanded() {
            match self.select(current) {
                Some(next) => {
                    path.push(next);
                    current = next;
                }
                None => break,
            }
        }
        path
    }

    /// Create one child per legal move with its prior from `policy`.
    pub(crate) fn expand(
        &mut self,
        id: NodeId,
        moves: &[ChessMove],
        indices: &[usize],
        policy: &[f32],
    ) -> Result<(), SearchError> {
        let game = self.nodes[id].game.clone();
        let mut children = Vec::with_capacity(moves.len());
        for (&my_move, &index) in moves.iter().zip(indices) {
            let mut next = game.clone();
            next.play(my_move)?;
            let node = self.nodes.len();
            let prior = policy.get(index).copied().unwrap_or_default();
            self.nodes.push(Node::new(next, Some(id), prior));
            children.push(Child { my_move, index, node });
        }

        let node = &mut self.nodes[id];
        node.children = children;
        node.state = NodeState::Expanded;
        Ok(())
    }

    pub(crate) fn mark_terminal(&mut self, id: NodeId, value: f32) {
        self.nodes[id].state = NodeState::Terminal { value };
    }

    /// Propagate `value`, given for the side to move at the end of `path`,
    /// back to the root. Each node is credited from the point of view of the
    /// player who moved into it, so the sign flips on every level.
    pub(crate) fn backup(&mut self, path: &[NodeId], value: f32) {
        let mut reward = value;
        for &id in path.iter().rev() {
            reward = -reward;
            self.nodes[id].update(reward);
        }
    }
}
