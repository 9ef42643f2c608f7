use chessgame::ChessMove;

use super::{node::NodeId, tree::Tree};

const MAX_CONTINUATION_LEN: usize = 8;
const MIN_VISIT_COUNT: u32 = 1;

impl Tree {
    /// Table of the root's children, most visited first.
    pub fn debug(&self, limit: Option<usize>) -> String {
        let mut children: Vec<_> = self.children(Self::ROOT).collect();
        children.sort_by_key(|(_, node)| std::cmp::Reverse(node.visits));
        format!(
            "move      visits   reward   policy | continuation\n{}",
            children
                .into_iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|(child, node)| {
                    let continuation = self
                        .continuation(child.node, MIN_VISIT_COUNT, MAX_CONTINUATION_LEN)
                        .into_iter()
                        .map(|m| m.to_string())
                        .collect::<Vec<_>>()
                        .join(" ");
                    format!(
                        "{: <8} {: >8} {: >8.4} {: >8.4} | {}\n",
                        child.my_move.to_string(),
                        node.visits,
                        node.expected_reward,
                        node.policy,
                        continuation,
                    )
                })
                .collect::<String>()
        )
    }

    /// Expected line of play from the root.
    pub fn principal_variation(&self) -> Vec<ChessMove> {
        self.continuation(Self::ROOT, MIN_VISIT_COUNT, MAX_CONTINUATION_LEN)
    }

    /// Follow the most visited children from `id` as long as they have at
    /// least `min_visit_count` visits.
    pub fn continuation(&self, id: NodeId, min_visit_count: u32, depth: usize) -> Vec<ChessMove> {
        let mut line = Vec::new();
        let mut current = id;
        while line.len() < depth {
            let best = self
                .children(current)
                .filter(|(_, node)| node.visits >= min_visit_count)
                .fold(None, |best: Option<(u32, NodeId, ChessMove)>, (child, node)| match best {
                    Some((visits, ..)) if visits >= node.visits => best,
                    _ => Some((node.visits, child.node, child.my_move)),
                });
            match best {
                Some((_, next, my_move)) => {
                    line.push(my_move);
                    current = next;
                }
                None => break,
            }
        }
        line
    }
}
