use chessgame::ChessMove;
use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};

use super::{node::Child, tree::Tree};
use crate::repr::NUM_MOVES;

impl Tree {
    /// Visit counts of the root's children. After many simulations these
    /// are a better estimate of the policy than the priors (not normalised).
    pub fn improved_policy(&self) -> Vec<(ChessMove, u32)> {
        self.children(Self::ROOT)
            .map(|(child, node)| (child.my_move, node.visits))
            .collect()
    }

    /// Root visit distribution over policy indices, summing to one.
    pub fn policy_target(&self) -> Vec<f32> {
        let mut target = vec![0.0; NUM_MOVES];
        let total: u32 = self.children(Self::ROOT).map(|(_, node)| node.visits).sum();
        if total == 0 {
            return target;
        }
        for (child, node) in self.children(Self::ROOT) {
            target[child.index] += node.visits as f32 / total as f32;
        }
        target
    }

    /// Most visited root child, the earliest one on ties.
    pub fn best_child(&self) -> Option<&Child> {
        let mut best: Option<(u32, &Child)> = None;
        for (child, node) in self.children(Self::ROOT) {
            if best.map_or(true, |(visits, _)| node.visits > visits) {
                best = Some((node.visits, child));
            }
        }
        best.map(|(_, child)| child)
    }

    /// Pick a root child to play.
    /// With a temperature of zero this is `best_child`. Otherwise a child is
    /// sampled with probability proportional to `visits^(1 / temperature)`.
    pub fn pick_child<R: Rng + ?Sized>(&self, temperature: f32, rng: &mut R) -> Option<&Child> {
        if temperature <= 0.0 {
            return self.best_child();
        }

        let max_visits = self.children(Self::ROOT).map(|(_, node)| node.visits).max()?;
        if max_visits == 0 {
            return self.best_child();
        }
        // Scale by the largest count first so the power cannot overflow.
        let exponent = 1.0 / temperature as f64;
        let weights: Vec<f64> = self
            .children(Self::ROOT)
            .map(|(_, node)| (node.visits as f64 / max_visits as f64).powf(exponent))
            .collect();
        match WeightedIndex::new(&weights) {
            Ok(distr) => self.root().children.get(distr.sample(rng)),
            Err(_) => self.best_child(),
        }
    }

    pub fn pick_move<R: Rng + ?Sized>(&self, temperature: f32, rng: &mut R) -> Option<ChessMove> {
        self.pick_child(temperature, rng).map(|child| child.my_move)
    }
}
