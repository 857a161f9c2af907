use std::fmt;
use std::fmt::{Display, Formatter};

use rand::Rng;
use rand_distr::{Distribution, Gamma};

use crate::codec::{ActionId, NUM_ACTIONS};
use crate::config::DirichletNoise;
use crate::error::{Error, Result};

/// Search statistics for one position.
///
/// N, Q and P are tables over the whole action space, but only the entries of `actions`
/// (the legal actions, in generation order) are ever read or written.
#[derive(Debug, Clone)]
pub struct MctsNode {
    actions: Vec<ActionId>,
    visits: Box<[u32]>,
    q: Box<[f32]>,
    prior: Box<[f32]>,
    total_visits: u32,
}

impl MctsNode {
    /// Masks `policy` to `actions` and renormalises it into the node's priors.
    /// Falls back to a uniform prior when the legal actions get no mass.
    pub fn new(actions: Vec<ActionId>, policy: &[f32]) -> Self {
        let mut prior = vec![0.; NUM_ACTIONS].into_boxed_slice();
        let mass: f32 = actions.iter().map(|&action| policy[action].max(0.)).sum();
        for &action in &actions {
            prior[action] = if mass > 0. {
                policy[action].max(0.) / mass
            } else {
                1. / actions.len() as f32
            };
        }

        MctsNode {
            actions,
            visits: vec![0; NUM_ACTIONS].into_boxed_slice(),
            q: vec![0.; NUM_ACTIONS].into_boxed_slice(),
            prior,
            total_visits: 0,
        }
    }

    /// Mixes Dirichlet noise into the priors. Only called before the node enters the store.
    pub(super) fn mix_noise<R: Rng + ?Sized>(&mut self, noise: DirichletNoise, rng: &mut R) -> Result<()> {
        if self.actions.is_empty() {
            return Ok(());
        }
        let gamma = Gamma::new(noise.alpha, 1.0).map_err(|e| Error::Sampling(e.to_string()))?;
        let samples: Vec<f64> = self.actions.iter().map(|_| gamma.sample(rng)).collect();
        let sum: f64 = samples.iter().sum();
        if sum <= 0. {
            return Ok(());
        }
        for (&action, sample) in self.actions.iter().zip(samples) {
            let p = &mut self.prior[action];
            *p = (1. - noise.epsilon) * *p + noise.epsilon * (sample / sum) as f32;
        }
        Ok(())
    }

    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    pub fn visits(&self, action: ActionId) -> u32 {
        self.visits[action]
    }

    pub fn q(&self, action: ActionId) -> f32 {
        self.q[action]
    }

    pub fn prior(&self, action: ActionId) -> f32 {
        self.prior[action]
    }

    pub fn total_visits(&self) -> u32 {
        self.total_visits
    }

    pub fn puct_score(&self, action: ActionId, c_puct: f32) -> f32 {
        let exploration = c_puct * self.prior[action] * (self.total_visits as f32).sqrt()
            / (1. + self.visits[action] as f32);
        self.q[action] + exploration
    }

    /// Legal action with the highest PUCT score; the first one wins ties.
    pub fn select(&self, c_puct: f32) -> Option<ActionId> {
        let mut best: Option<(ActionId, f32)> = None;
        for &action in &self.actions {
            let score = self.puct_score(action, c_puct);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((action, score)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Folds `value` (from this node's perspective) into the running mean of `action`.
    pub fn update(&mut self, action: ActionId, value: f32) {
        let n = self.visits[action] as f32;
        self.q[action] = (n * self.q[action] + value) / (n + 1.);
        self.visits[action] += 1;
        self.total_visits += 1;
    }

    /// Visit counts of the legal actions as a distribution over the action space.
    pub fn visit_distribution(&self) -> Vec<f32> {
        let mut policy = vec![0.; NUM_ACTIONS];
        if self.total_visits == 0 {
            return policy;
        }
        for &action in &self.actions {
            policy[action] = self.visits[action] as f32 / self.total_visits as f32;
        }
        policy
    }
}

impl Display for MctsNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "MctsNode(actions: {}, visits: {})", self.actions.len(), self.total_visits)?;
        for &action in &self.actions {
            if self.visits[action] > 0 {
                writeln!(
                    f,
                    "| action: {}, prior: {:.4}, visits: {}, q: {:.4}",
                    action, self.prior[action], self.visits[action], self.q[action]
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn uniform() -> Vec<f32> {
        vec![1. / NUM_ACTIONS as f32; NUM_ACTIONS]
    }

    #[test]
    fn test_priors_are_masked_and_renormalised() {
        let mut policy = vec![0.; NUM_ACTIONS];
        policy[3] = 0.2;
        policy[7] = 0.6;
        policy[100] = 0.2;
        let node = MctsNode::new(vec![3, 100, 42], &policy);
        assert!((node.prior(3) - 0.5).abs() < 1e-6);
        assert!((node.prior(100) - 0.5).abs() < 1e-6);
        assert_eq!(node.prior(42), 0.);
        assert_eq!(node.prior(7), 0.);
    }

    #[test]
    fn test_zero_mass_falls_back_to_uniform() {
        let node = MctsNode::new(vec![1, 2, 3, 4], &vec![0.; NUM_ACTIONS]);
        for action in 1..=4 {
            assert_eq!(node.prior(action), 0.25);
        }
    }

    #[test]
    fn test_select_breaks_ties_by_order() {
        let node = MctsNode::new(vec![9, 4, 200], &uniform());
        assert_eq!(node.select(1.), Some(9));
        assert_eq!(MctsNode::new(vec![], &uniform()).select(1.), None);
    }

    #[test]
    fn test_update_keeps_running_mean() {
        let mut node = MctsNode::new(vec![5, 6], &uniform());
        node.update(5, 1.);
        node.update(5, -1.);
        node.update(5, 1.);
        assert_eq!(node.visits(5), 3);
        assert!((node.q(5) - 1. / 3.).abs() < 1e-6);
        assert_eq!(node.total_visits(), 3);

        // Exploration decides between the visited action and the untouched one.
        assert_eq!(node.select(0.1), Some(5));
        assert_eq!(node.select(1.), Some(6));
    }

    #[test]
    fn test_visit_distribution() {
        let mut node = MctsNode::new(vec![0, 1, 2], &uniform());
        assert!(node.visit_distribution().iter().all(|&p| p == 0.));
        node.update(0, 0.);
        node.update(2, 0.);
        node.update(2, 0.);
        node.update(2, 0.);
        let policy = node.visit_distribution();
        assert_eq!(policy[0], 0.25);
        assert_eq!(policy[1], 0.);
        assert_eq!(policy[2], 0.75);
    }

    #[test]
    fn test_display_lists_visited_actions() {
        let mut node = MctsNode::new(vec![5, 6], &uniform());
        node.update(6, 1.);
        let text = node.to_string();
        assert!(text.starts_with("MctsNode(actions: 2, visits: 1)"));
        assert!(text.contains("action: 6, prior: 0.5000, visits: 1, q: 1.0000"));
        assert!(!text.contains("action: 5"));
    }

    #[test]
    fn test_noise_keeps_prior_a_distribution() {
        let mut node = MctsNode::new(vec![10, 20, 30, 40], &uniform());
        let mut rng = StdRng::seed_from_u64(7);
        node.mix_noise(DirichletNoise::default(), &mut rng).unwrap();
        let total: f32 = node.actions().iter().map(|&a| node.prior(a)).sum();
        assert!((total - 1.).abs() < 1e-5);
        assert!(node.actions().iter().all(|&a| node.prior(a) > 0.));
        assert_eq!(node.prior(11), 0.);

        let bad = DirichletNoise { alpha: -1., epsilon: 0.25 };
        assert!(matches!(node.mix_noise(bad, &mut rng), Err(Error::Sampling(_))));
    }
}
