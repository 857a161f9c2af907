use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::encoder::DEFAULT_HISTORY;
use crate::error::{Error, Result};

/// Dirichlet noise mixed into the priors of the search root when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirichletNoise {
    pub alpha: f64,
    pub epsilon: f32,
}

impl Default for DirichletNoise {
    fn default() -> Self {
        Self { alpha: 0.3, epsilon: 0.25 }
    }
}

/// Configuration for one PUCT search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Simulations run from the root per decision
    pub num_sims: usize,

    /// PUCT exploration constant
    pub c_puct: f32,

    /// Root noise; `None` keeps the model's priors untouched
    pub root_noise: Option<DirichletNoise>,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_simulations(mut self, num_sims: usize) -> Self {
        self.num_sims = num_sims;
        self
    }

    pub fn with_c_puct(mut self, c_puct: f32) -> Self {
        self.c_puct = c_puct;
        self
    }

    pub fn with_root_noise(mut self, noise: DirichletNoise) -> Self {
        self.root_noise = Some(noise);
        self
    }

    pub fn without_root_noise(mut self) -> Self {
        self.root_noise = None;
        self
    }

    /// A visit distribution needs at least two simulations.
    pub fn validate(&self) -> Result<()> {
        if self.num_sims < 2 {
            return Err(Error::TooFewSimulations(self.num_sims));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_sims: 25,
            c_puct: 1.0,
            root_noise: None,
        }
    }
}

/// How a move is chosen from the search policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSelection {
    /// Draw an action with probability proportional to the policy (training self-play).
    Sample,
    /// Take the most probable legal action (deployed play).
    Greedy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    pub search: SearchConfig,

    /// Time steps kept in the encoded state
    pub history: usize,

    pub selection: MoveSelection,

    /// Keep node statistics from earlier plies of the same episode
    pub reuse_tree: bool,
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history.max(1);
        self
    }

    pub fn with_selection(mut self, selection: MoveSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_reuse_tree(mut self, reuse_tree: bool) -> Self {
        self.reuse_tree = reuse_tree;
        self
    }
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            history: DEFAULT_HISTORY,
            selection: MoveSelection::Sample,
            reuse_tree: true,
        }
    }
}

/// Configuration for the generate-train-compare loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub self_play: SelfPlayConfig,

    /// Generations of self-play followed by training
    pub num_iters: usize,

    /// Self-play episodes per iteration
    pub num_episodes: usize,

    /// Games played between the candidate and the current model
    pub pit_games: usize,

    /// Fraction of pit games the candidate must exceed to replace the current model
    pub threshold: f32,

    /// Where the final model is saved once every iteration has run
    pub output: Option<PathBuf>,
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_self_play(mut self, self_play: SelfPlayConfig) -> Self {
        self.self_play = self_play;
        self
    }

    pub fn with_iterations(mut self, num_iters: usize) -> Self {
        self.num_iters = num_iters;
        self
    }

    pub fn with_episodes(mut self, num_episodes: usize) -> Self {
        self.num_episodes = num_episodes;
        self
    }

    pub fn with_pit_games(mut self, pit_games: usize) -> Self {
        self.pit_games = pit_games;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            self_play: SelfPlayConfig::default(),
            num_iters: 80,
            num_episodes: 100,
            pit_games: 20,
            threshold: 0.55,
            output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert_eq!(config.num_iters, 80);
        assert_eq!(config.num_episodes, 100);
        assert_eq!(config.pit_games, 20);
        assert_eq!(config.threshold, 0.55);
        assert_eq!(config.self_play.search.num_sims, 25);
        assert_eq!(config.self_play.search.c_puct, 1.0);
        assert_eq!(config.self_play.search.root_noise, None);
        assert_eq!(config.self_play.history, 1);
        assert_eq!(config.self_play.selection, MoveSelection::Sample);
        assert!(config.self_play.reuse_tree);
    }

    #[test]
    fn test_builder_pattern() {
        let search = SearchConfig::new()
            .with_simulations(50)
            .with_c_puct(2.0)
            .with_root_noise(DirichletNoise { alpha: 0.15, epsilon: 0.1 });
        assert_eq!(search.num_sims, 50);
        assert_eq!(search.c_puct, 2.0);
        assert_eq!(search.root_noise.unwrap().alpha, 0.15);
        assert_eq!(search.clone().without_root_noise().root_noise, None);

        let self_play = SelfPlayConfig::new()
            .with_search(search)
            .with_history(0)
            .with_selection(MoveSelection::Greedy)
            .with_reuse_tree(false);
        assert_eq!(self_play.history, 1);
        assert_eq!(self_play.selection, MoveSelection::Greedy);
        assert!(!self_play.reuse_tree);
    }

    #[test]
    fn test_validate() {
        assert!(SearchConfig::new().with_simulations(2).validate().is_ok());
        assert!(matches!(
            SearchConfig::new().with_simulations(1).validate(),
            Err(Error::TooFewSimulations(1))
        ));
    }

    #[test]
    fn test_round_trip_through_bincode() {
        let config = TrainingConfig::default().with_iterations(3).with_output("weights.ot");
        let bytes = bincode::serialize(&config).unwrap();
        let decoded: TrainingConfig = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, config);
    }
}
