use rand::Rng;
use rand_distr::{Dirichlet, Distribution};

use super::tree::Tree;

impl Tree {
    /// Mix Dirichlet noise into the priors of the root's children.
    pub fn apply_dirichlet<R: Rng + ?Sized>(&mut self, alpha: f32, ratio: f32, rng: &mut R) {
        let children: Vec<_> = self.root().children.iter().map(|child| child.node).collect();
        // Dirichlet needs at least two categories.
        if children.len() < 2 || ratio <= 0.0 {
            return;
        }
        let dirichlet = match Dirichlet::new(&vec![alpha; children.len()]) {
            Ok(dirichlet) => dirichlet,
            Err(_) => return,
        };
        let samples = dirichlet.sample(rng);
        for (id, noise) in children.into_iter().zip(samples) {
            let node = self.node_mut(id);
            node.policy = noise * ratio + node.policy * (1. - ratio);
        }
    }
}
