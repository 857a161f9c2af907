use chess::Color;
use log::{debug, info};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::codec::ActionId;
use crate::config::{MoveSelection, SelfPlayConfig};
use crate::encoder::GameState;
use crate::engine::evaluation::Evaluator;
use crate::engine::mcts::{greedy, Mcts};
use crate::error::{Error, Result};
use crate::game::Game;
use crate::rules::{ChessPosition, Outcome, Position};

/// Reward of a training example, known only once the episode is over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reward {
    /// The player to move when the example was recorded.
    Pending(Color),
    Resolved(f32),
}

impl Reward {
    pub fn resolve(&mut self, outcome: &Outcome) {
        if let Reward::Pending(mover) = *self {
            *self = Reward::Resolved(outcome.reward_for(mover));
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub state: GameState,
    pub policy: Vec<f32>,
    pub reward: Reward,
}

impl TrainingExample {
    /// Flattens the example for the model. Fails while the reward is still pending.
    pub fn into_labeled(self) -> Result<LabeledExample> {
        let Reward::Resolved(value) = self.reward else {
            return Err(Error::UnresolvedReward);
        };
        Ok(LabeledExample {
            planes: self.state.to_chw(),
            policy: self.policy,
            value,
        })
    }
}

/// A training example in the form the model consumes and the drivers persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    /// State planes, channel-first.
    pub planes: Vec<f32>,
    pub policy: Vec<f32>,
    pub value: f32,
}

#[derive(Debug, Clone)]
pub struct Episode {
    pub examples: Vec<TrainingExample>,
    pub outcome: Outcome,
    pub plies: usize,
}

impl Episode {
    pub fn into_labeled(self) -> Result<Vec<LabeledExample>> {
        self.examples.into_iter().map(TrainingExample::into_labeled).collect()
    }
}

pub struct SelfPlay<E: Evaluator> {
    mcts: Mcts<E>,
    config: SelfPlayConfig,
    rng: StdRng,
}

impl<E: Evaluator> SelfPlay<E> {
    pub fn new(evaluator: E, config: SelfPlayConfig) -> Result<Self> {
        Self::with_rng(evaluator, config, StdRng::from_entropy())
    }

    pub fn with_seed(evaluator: E, config: SelfPlayConfig, seed: u64) -> Result<Self> {
        Self::with_rng(evaluator, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(evaluator: E, config: SelfPlayConfig, mut rng: StdRng) -> Result<Self> {
        let search_rng = StdRng::seed_from_u64(rng.gen());
        let mcts = Mcts::with_rng(evaluator, config.search.clone(), search_rng)?;
        Ok(Self { mcts, config, rng })
    }

    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    pub fn run_episode(&mut self) -> Result<Episode> {
        self.run_episode_from(ChessPosition::initial())
    }

    /// Plays one game from `position` until it ends and labels every ply with the result.
    pub fn run_episode_from<P: Position>(&mut self, position: P) -> Result<Episode> {
        self.mcts.clear();
        let mut game = Game::new(position, self.config.history);
        let mut examples = Vec::new();

        let outcome = loop {
            if let Some(outcome) = game.position().outcome() {
                break outcome;
            }
            if !self.config.reuse_tree {
                self.mcts.clear();
            }

            self.mcts.run(&game)?;
            let policy = self.mcts.policy(game.position())?;
            let action = self.choose(&policy)?;
            let mover = game.position().side_to_move();
            examples.push(TrainingExample {
                state: game.state().clone(),
                policy,
                reward: Reward::Pending(mover),
            });

            let mv = game.apply(action)?;
            debug!("Ply {}: {} played {}", examples.len(), color_name(mover), mv);
            if self.config.reuse_tree {
                self.mcts.retain_subtree(game.position())?;
            }
        };

        for example in &mut examples {
            example.reward.resolve(&outcome);
        }
        let plies = examples.len();
        match outcome.winner {
            Some(winner) if outcome.termination.is_decisive() => {
                info!("Episode finished after {} plies: {} mates", plies, color_name(winner))
            }
            _ => info!("Episode finished after {} plies: drawn by {:?}", plies, outcome.termination),
        }
        Ok(Episode { examples, outcome, plies })
    }

    fn choose(&mut self, policy: &[f32]) -> Result<ActionId> {
        match self.config.selection {
            MoveSelection::Sample => {
                let distribution = WeightedIndex::new(policy).map_err(|e| Error::Sampling(e.to_string()))?;
                Ok(distribution.sample(&mut self.rng))
            }
            MoveSelection::Greedy => {
                greedy(policy).ok_or_else(|| Error::Sampling("policy has no mass".to_string()))
            }
        }
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SearchConfig;
    use crate::engine::uniform_evaluator::UniformEvaluator;
    use crate::rules::Termination;
    use super::*;

    fn config(selection: MoveSelection, num_sims: usize) -> SelfPlayConfig {
        SelfPlayConfig::new()
            .with_search(SearchConfig::new().with_simulations(num_sims))
            .with_selection(selection)
    }

    #[test]
    fn test_forced_draw() {
        // Black's only move takes the queen, leaving two bare kings.
        let position = ChessPosition::from_fen("k7/1Q6/8/8/8/8/8/7K b - - 0 1").unwrap();
        let mut self_play = SelfPlay::with_seed(UniformEvaluator, config(MoveSelection::Sample, 10), 3).unwrap();
        let episode = self_play.run_episode_from(position).unwrap();

        assert_eq!(episode.plies, 1);
        assert_eq!(episode.outcome.termination, Termination::InsufficientMaterial);
        assert_eq!(episode.outcome.winner, None);
        let labeled = episode.into_labeled().unwrap();
        assert_eq!(labeled.len(), 1);
        assert!(labeled.iter().all(|example| example.value == 0.));
        assert_eq!(labeled[0].planes.len(), 21 * 64);
        assert!((labeled[0].policy.iter().sum::<f32>() - 1.).abs() < 1e-5);
    }

    #[test]
    fn test_decisive_line_signs() {
        // Black must play Kg8, then Ra8 mates.
        let position = ChessPosition::from_fen("7k/8/6K1/8/8/8/8/R7 b - - 0 1").unwrap();
        let mut self_play = SelfPlay::with_seed(UniformEvaluator, config(MoveSelection::Greedy, 100), 5).unwrap();
        let episode = self_play.run_episode_from(position).unwrap();

        assert_eq!(episode.plies, 2);
        assert_eq!(episode.outcome.termination, Termination::Checkmate);
        assert_eq!(episode.outcome.winner, Some(Color::White));
        let rewards: Vec<Reward> = episode.examples.iter().map(|example| example.reward).collect();
        assert_eq!(rewards, vec![Reward::Resolved(-1.), Reward::Resolved(1.)]);
    }

    #[test]
    fn test_sampled_rewards_follow_the_mover() {
        let position = ChessPosition::from_fen("6k1/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        let self_play_config = config(MoveSelection::Sample, 4).with_reuse_tree(false);
        let mut self_play = SelfPlay::with_seed(UniformEvaluator, self_play_config, 11).unwrap();
        let episode = self_play.run_episode_from(position).unwrap();

        assert_eq!(episode.plies, episode.examples.len());
        for (ply, example) in episode.examples.iter().enumerate() {
            let mover = if ply % 2 == 0 { Color::White } else { Color::Black };
            assert_eq!(example.reward, Reward::Resolved(episode.outcome.reward_for(mover)));
        }
    }

    #[test]
    fn test_store_only_holds_the_live_tree() {
        let position = ChessPosition::from_fen("6k1/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        let num_sims = 8;
        for reuse_tree in [true, false] {
            let self_play_config = config(MoveSelection::Sample, num_sims).with_reuse_tree(reuse_tree);
            let mut self_play = SelfPlay::with_seed(UniformEvaluator, self_play_config, 13).unwrap();
            let episode = self_play.run_episode_from(position.clone()).unwrap();
            assert!(episode.plies > 0);
            if reuse_tree {
                // Nothing lies below a finished game.
                assert!(self_play.mcts.is_empty());
            } else {
                assert!(self_play.mcts.len() <= num_sims + 1);
            }
        }
    }

    #[test]
    fn test_pending_reward_is_not_labeled() {
        let example = TrainingExample {
            state: GameState::new(&ChessPosition::initial(), 1),
            policy: vec![],
            reward: Reward::Pending(Color::White),
        };
        assert!(matches!(example.into_labeled(), Err(Error::UnresolvedReward)));
    }

    #[test]
    fn test_terminal_start_has_no_examples() {
        let position = ChessPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut self_play = SelfPlay::new(UniformEvaluator, SelfPlayConfig::default()).unwrap();
        let episode = self_play.run_episode_from(position).unwrap();
        assert_eq!(episode.plies, 0);
        assert_eq!(episode.outcome.termination, Termination::Stalemate);
    }
}
