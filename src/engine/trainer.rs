use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TrainingConfig;
use crate::engine::arena::Arena;
use crate::engine::evaluation::TrainableModel;
use crate::engine::self_play::{LabeledExample, SelfPlay};
use crate::error::Result;
use crate::rules::ChessPosition;

/// The generate, train and compare loop.
///
/// Examples accumulate over every iteration. A retrained model only replaces the current one
/// when it wins more than `threshold` of its pit games.
pub struct Trainer<M: TrainableModel> {
    model: M,
    config: TrainingConfig,
    start: ChessPosition,
    examples: Vec<LabeledExample>,
    rng: StdRng,
}

impl<M: TrainableModel> Trainer<M> {
    pub fn new(model: M, config: TrainingConfig) -> Self {
        Self::with_rng(model, config, StdRng::from_entropy())
    }

    pub fn with_seed(model: M, config: TrainingConfig, seed: u64) -> Self {
        Self::with_rng(model, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(model: M, config: TrainingConfig, rng: StdRng) -> Self {
        Self {
            model,
            config,
            start: ChessPosition::initial(),
            examples: Vec::new(),
            rng,
        }
    }

    /// Position every self-play episode and pit game starts from.
    pub fn with_start_position(mut self, start: ChessPosition) -> Self {
        self.start = start;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    /// Runs one iteration and reports whether the retrained model was accepted.
    pub fn run_iteration(&mut self) -> Result<bool> {
        let self_play_config = self.config.self_play.clone();
        let mut self_play = SelfPlay::with_seed(&self.model, self_play_config, self.rng.gen())?;
        for _ in 0..self.config.num_episodes {
            let episode = self_play.run_episode_from(self.start.clone())?;
            self.examples.extend(episode.into_labeled()?);
        }

        let candidate = self.model.train(&self.examples)?;
        let arena = Arena::new(
            &candidate,
            &self.model,
            self.config.self_play.search.clone(),
            self.config.self_play.history,
        );
        let win_fraction = arena.pit_from(&self.start, self.config.pit_games, &mut self.rng)?;

        let accepted = win_fraction > self.config.threshold;
        if accepted {
            self.model = candidate;
        }
        info!(
            "Pool of {} examples, candidate won {:.2} of pit games: {}",
            self.examples.len(),
            win_fraction,
            if accepted { "accepted" } else { "rejected" }
        );
        Ok(accepted)
    }

    /// Runs every iteration, saves the final model to the configured output if there is one,
    /// and returns how many candidates were accepted.
    pub fn run(&mut self) -> Result<usize> {
        let mut accepted = 0;
        for iteration in 0..self.config.num_iters {
            info!("Iteration {}/{}", iteration + 1, self.config.num_iters);
            if self.run_iteration()? {
                accepted += 1;
            }
        }
        if let Some(output) = &self.config.output {
            self.model.save(output)?;
            info!("Saved final model to {}", output.display());
        }
        Ok(accepted)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.model.save(path)
    }
}
