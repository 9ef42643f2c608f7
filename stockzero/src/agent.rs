use chessgame::Game;

use crate::repr::NUM_MOVES;

/// Raw move probabilities, one entry per policy index.
pub type Policy = Vec<f32>;
/// Position value in `[-1, 1]` for the side to move.
pub type Eval = f32;

/// Anything that can judge a position: a trained network, a remote model, a stub.
/// One agent is shared by every search running in the process.
pub trait Agent: Sync {
    fn policy_eval(&self, game: &Game) -> (Policy, Eval);
}

impl<A: Agent + ?Sized> Agent for &A {
    fn policy_eval(&self, game: &Game) -> (Policy, Eval) {
        (**self).policy_eval(game)
    }
}

/// Knows nothing: flat policy and an even evaluation.
/// Used before any weights exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uniform;

impl Agent for Uniform {
    fn policy_eval(&self, _game: &Game) -> (Policy, Eval) {
        (vec![1.0; NUM_MOVES], 0.0)
    }
}

/// Keep only the entries of `policy` at the `legal` indices and renormalise
/// them to sum to one. Falls back to a uniform distribution over the legal
/// indices when the network puts no usable mass on them.
pub fn mask_policy(policy: &[f32], legal: &[usize]) -> Vec<f32> {
    let mut masked = vec![0.0; NUM_MOVES];
    for &index in legal {
        let p = policy.get(index).copied().unwrap_or_default();
        if p.is_finite() && p > 0.0 {
            masked[index] = p;
        }
    }

    let total: f32 = masked.iter().sum();
    if total.is_finite() && total > 0.0 {
        masked.iter_mut().for_each(|p| *p /= total);
    } else {
        let mut distinct = legal.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        let uniform = 1.0 / distinct.len() as f32;
        for index in distinct {
            masked[index] = uniform;
        }
    }
    masked
}
