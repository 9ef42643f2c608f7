use std::time::Duration;

use arrayvec::ArrayVec;
use chessgame::{ChessMove, Game, MAX_MOVES};
use log::debug;
use rand::Rng;

use super::{node::NodeState, tree::Tree};
use crate::{
    agent::{mask_policy, Agent},
    cache::{EvalCache, Evaluation},
    config::{CACHE_TTL_SECONDS, EXPLORATION, ROLLOUTS_PER_MOVE},
    error::SearchError,
    repr::move_index,
};

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// PUCT exploration constant.
    pub exploration: f32,
    /// Simulations per move for `Engine::choose_move`.
    pub rollouts: u32,
    pub cache_ttl: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration: EXPLORATION,
            rollouts: ROLLOUTS_PER_MOVE,
            cache_ttl: Duration::from_secs(CACHE_TTL_SECONDS),
        }
    }
}

/// Handle to the search: the agent, the evaluation cache they share and the
/// settings. Build one per process and lend it to whoever needs moves.
pub struct Engine<A, C> {
    agent: A,
    cache: C,
    config: SearchConfig,
}

impl<A: Agent, C: EvalCache> Engine<A, C> {
    pub fn new(agent: A, cache: C, config: SearchConfig) -> Self {
        Engine { agent, cache, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Search `game` and return the policy index of the chosen move.
    /// A `temperature` of zero picks the most visited move, anything above
    /// samples from the visit counts using `rng`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        game: &Game,
        simulations: u32,
        temperature: f32,
        rng: &mut R,
    ) -> Result<usize, SearchError> {
        let tree = self.search(game, simulations)?;
        let child = tree
            .pick_child(temperature, rng)
            .ok_or_else(|| SearchError::NoLegalMoves(game.result()))?;
        Ok(child.index)
    }

    /// Deployment entry point: configured number of simulations, no randomness.
    pub fn choose_move(&self, game: &Game) -> Result<ChessMove, SearchError> {
        let tree = self.search(game, self.config.rollouts)?;
        tree.best_child()
            .map(|child| child.my_move)
            .ok_or_else(|| SearchError::NoLegalMoves(game.result()))
    }

    /// Build a fresh tree for `game` and run `simulations` simulations on it.
    pub fn search(&self, game: &Game, simulations: u32) -> Result<Tree, SearchError> {
        if simulations < 1 {
            return Err(SearchError::InvalidArgument(simulations));
        }
        let mut tree = self.new_tree(game)?;
        self.rollouts(&mut tree, simulations)?;
        debug!(
            "searched {} with {simulations} simulations\n{}",
            game.to_fen(),
            tree.debug(Some(5))
        );
        Ok(tree)
    }

    /// A tree whose root is already expanded, ready for simulations.
    /// Expanding the root does not count as a simulation.
    pub fn new_tree(&self, game: &Game) -> Result<Tree, SearchError> {
        let result = game.result();
        if !result.is_ongoing() {
            return Err(SearchError::NoLegalMoves(result));
        }
        let mut tree = Tree::new(game.clone(), self.config.exploration);
        self.expand(&mut tree, Tree::ROOT)?;
        Ok(tree)
    }

    pub fn rollouts(&self, tree: &mut Tree, simulations: u32) -> Result<(), SearchError> {
        for _ in 0..simulations {
            self.simulate(tree)?;
        }
        Ok(())
    }

    /// One selection, expansion (or terminal scoring) and backup cycle.
    pub fn simulate(&self, tree: &mut Tree) -> Result<(), SearchError> {
        let path = tree.selection_path();
        let leaf = path.last().copied().unwrap_or(Tree::ROOT);

        let value = match tree.node(leaf).state {
            NodeState::Terminal { value } => value,
            _ => match tree.node(leaf).game.terminal_value() {
                Some(value) => {
                    tree.mark_terminal(leaf, value);
                    value
                }
                None => self.expand(tree, leaf)?,
            },
        };
        tree.backup(&path, value);
        Ok(())
    }

    /// Expand `id` and return the agent's value for it.
    fn expand(&self, tree: &mut Tree, id: usize) -> Result<f32, SearchError> {
        let game = &tree.node(id).game;
        let moves = game.possible_moves();
        let indices = moves
            .iter()
            .map(|&my_move| move_index(my_move))
            .collect::<Result<ArrayVec<_, MAX_MOVES>, _>>()?;
        let evaluation = self.evaluate(game, &indices);
        tree.expand(id, &moves, &indices, &evaluation.policy)?;
        Ok(evaluation.eval)
    }

    /// Agent output for `game` with the policy masked to `legal`, through the cache.
    fn evaluate(&self, game: &Game, legal: &[usize]) -> Evaluation {
        let key = game.canonical_key();
        if let Some(evaluation) = self.cache.get(&key) {
            return evaluation;
        }

        let (policy, eval) = self.agent.policy_eval(game);
        let evaluation = Evaluation {
            policy: mask_policy(&policy, legal).into(),
            eval: eval.clamp(-1.0, 1.0),
        };
        self.cache.set(key, evaluation.clone(), self.config.cache_ttl);
        evaluation
    }
}
