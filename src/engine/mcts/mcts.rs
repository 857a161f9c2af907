use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::codec::{self, ActionId};
use crate::config::SearchConfig;
use crate::engine::evaluation::{terminal_value, Evaluator};
use crate::engine::mcts::mcts_node::MctsNode;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::rules::Position;

/// Most probable action of a policy, the first one on ties. `None` if the policy has no mass.
pub fn greedy(policy: &[f32]) -> Option<ActionId> {
    let mut best: Option<(ActionId, f32)> = None;
    for (action, &p) in policy.iter().enumerate() {
        if p <= 0. {
            continue;
        }
        match best {
            Some((_, best_p)) if p <= best_p => {}
            _ => best = Some((action, p)),
        }
    }
    best.map(|(action, _)| action)
}

/// PUCT search over a store of nodes keyed by position hash.
///
/// Transpositions share a node. Nodes live until [`Mcts::clear`] or [`Mcts::retain_subtree`],
/// so statistics gathered for one decision carry over to the next one if the caller keeps
/// the same `Mcts`.
pub struct Mcts<E: Evaluator> {
    evaluator: E,
    config: SearchConfig,
    nodes: IndexMap<u64, MctsNode>,
    rng: StdRng,
}

impl<E: Evaluator> Mcts<E> {
    pub fn new(evaluator: E, config: SearchConfig) -> Result<Self> {
        Self::with_rng(evaluator, config, StdRng::from_entropy())
    }

    /// Rejects configurations with fewer than two simulations before anything is searched.
    pub fn with_rng(evaluator: E, config: SearchConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            evaluator,
            config,
            nodes: IndexMap::new(),
            rng,
        })
    }

    pub fn node(&self, hash: u64) -> Option<&MctsNode> {
        self.nodes.get(&hash)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Drops every node that cannot be reached from `position` along visited actions.
    /// Called after a move is committed so the store only holds the tree still in play.
    pub fn retain_subtree<P: Position>(&mut self, position: &P) -> Result<()> {
        let mut reachable = HashSet::new();
        let mut frontier = vec![position.clone()];
        while let Some(position) = frontier.pop() {
            let hash = position.position_hash();
            let Some(node) = self.nodes.get(&hash) else {
                continue;
            };
            if !reachable.insert(hash) {
                continue;
            }
            for &action in node.actions() {
                if node.visits(action) == 0 {
                    continue;
                }
                let mut child = position.clone();
                child.push(codec::decode(action, &position)?)?;
                frontier.push(child);
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|hash, _| reachable.contains(hash));
        debug!("Kept {} of {} nodes below the new root", self.nodes.len(), before);
        Ok(())
    }

    /// Runs `num_sims` simulations from the position of `game`.
    ///
    /// The root is expanded up front, so every simulation adds exactly one visit to it.
    /// Each simulation plays on its own copy of `game`.
    pub fn run<P: Position>(&mut self, game: &Game<P>) -> Result<()> {
        let position = game.position();
        if position.is_terminal() {
            debug!("Search skipped: root is already terminal");
            return Ok(());
        }

        let root = position.position_hash();
        if !self.nodes.contains_key(&root) {
            self.expand(game, true)?;
        }
        for _ in 0..self.config.num_sims {
            let mut scratch = game.clone();
            self.search(&mut scratch)?;
        }

        if let Some(node) = self.nodes.get(&root) {
            debug!(
                "Searched {} simulations, {} nodes in store. Root {}",
                self.config.num_sims,
                self.nodes.len(),
                node
            );
        }
        Ok(())
    }

    /// Normalised visit counts at `position`, zero on every action not legal there.
    pub fn policy<P: Position>(&self, position: &P) -> Result<Vec<f32>> {
        let hash = position.position_hash();
        let node = self.nodes.get(&hash).ok_or(Error::UnvisitedPosition(hash))?;

        let mut policy = node.visit_distribution();
        let legal = codec::legal_mask(position)?;
        for (p, &is_legal) in policy.iter_mut().zip(&legal) {
            if !is_legal {
                *p = 0.;
            }
        }
        let total: f32 = policy.iter().sum();
        if total <= 0. {
            return Err(Error::UnvisitedPosition(hash));
        }
        policy.iter_mut().for_each(|p| *p /= total);
        Ok(policy)
    }

    /// Most visited legal action at `position`, for play rather than training.
    pub fn best_action<P: Position>(&self, position: &P) -> Result<ActionId> {
        let hash = position.position_hash();
        greedy(&self.policy(position)?).ok_or(Error::UnvisitedPosition(hash))
    }

    /// One simulation. Returns the value of `game`'s position from the perspective of the
    /// player who moved into it.
    fn search<P: Position>(&mut self, game: &mut Game<P>) -> Result<f32> {
        let position = game.position();
        if position.is_terminal() {
            return Ok(-terminal_value(position));
        }

        let hash = position.position_hash();
        if !self.nodes.contains_key(&hash) {
            let value = self.expand(game, false)?;
            return Ok(-value);
        }

        let action = self.select(hash)?;
        game.apply(action)?;
        let value = self.search(game)?;
        self.backup(hash, action, value);
        Ok(-value)
    }

    /// Creates the node for `game`'s position and returns the model's value for it.
    fn expand<P: Position>(&mut self, game: &Game<P>, is_root: bool) -> Result<f32> {
        let position = game.position();
        let actions = codec::legal_actions(position)?
            .into_iter()
            .map(|(action, _)| action)
            .collect();
        let prediction = self.evaluator.predict(game.state())?.check()?;

        let mut node = MctsNode::new(actions, &prediction.policy);
        if is_root {
            if let Some(noise) = self.config.root_noise {
                node.mix_noise(noise, &mut self.rng)?;
            }
        }
        self.nodes.insert(position.position_hash(), node);
        Ok(prediction.value)
    }

    fn select(&self, hash: u64) -> Result<ActionId> {
        self.nodes
            .get(&hash)
            .and_then(|node| node.select(self.config.c_puct))
            .ok_or(Error::UnvisitedPosition(hash))
    }

    fn backup(&mut self, hash: u64, action: ActionId, value: f32) {
        if let Some(node) = self.nodes.get_mut(&hash) {
            node.update(action, value);
        }
    }
}
