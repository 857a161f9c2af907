use std::str::FromStr;

use chess::ChessMove;

use zerochess::codec::{self, NUM_ACTIONS};
use zerochess::config::{MoveSelection, SearchConfig, SelfPlayConfig};
use zerochess::encoder::GameState;
use zerochess::engine::evaluation::{Evaluator, Prediction};
use zerochess::engine::mcts::Mcts;
use zerochess::engine::self_play::{LabeledExample, SelfPlay};
use zerochess::engine::uniform_evaluator::UniformEvaluator;
use zerochess::game::Game;
use zerochess::rules::{ChessPosition, Position};

/// Puts all prior mass on one action and never has an opinion on the value.
struct FixedModel {
    action: usize,
}

impl Evaluator for FixedModel {
    fn predict(&self, _state: &GameState) -> zerochess::Result<Prediction> {
        let mut policy = vec![0.; NUM_ACTIONS];
        policy[self.action] = 1.;
        Ok(Prediction { policy, value: 0. })
    }
}

#[test]
fn search_follows_a_confident_prior() {
    let e4 = codec::encode(ChessMove::from_str("e2e4").unwrap()).unwrap();
    let game = Game::initial(1);
    let mut mcts = Mcts::new(FixedModel { action: e4 }, SearchConfig::new().with_simulations(50)).unwrap();
    mcts.run(&game).unwrap();

    assert_eq!(mcts.best_action(game.position()).unwrap(), e4);
    let root = mcts.node(game.position().position_hash()).unwrap();
    assert_eq!(root.total_visits(), 50);
    assert!(root.visits(e4) >= 49);
}

#[test]
fn statistics_carry_over_between_runs() {
    let game = Game::initial(1);
    let hash = game.position().position_hash();
    let mut mcts = Mcts::new(UniformEvaluator, SearchConfig::new().with_simulations(10)).unwrap();
    mcts.run(&game).unwrap();
    mcts.run(&game).unwrap();
    assert_eq!(mcts.node(hash).unwrap().total_visits(), 20);

    mcts.clear();
    assert!(mcts.node(hash).is_none());
}

#[test]
fn promotion_moves_survive_the_codec() {
    let position = ChessPosition::from_fen("1n2k3/P1P5/8/8/8/8/7p/4K1N1 w - - 0 1").unwrap();
    for (action, mv) in codec::legal_actions(&position).unwrap() {
        assert!(action < NUM_ACTIONS);
        assert_eq!(codec::decode(action, &position).unwrap(), mv);
    }
}

#[test]
fn episodes_serialize_for_training() {
    let position = ChessPosition::from_fen("7k/8/6K1/8/8/8/8/R7 b - - 0 1").unwrap();
    let config = SelfPlayConfig::new()
        .with_search(SearchConfig::new().with_simulations(100))
        .with_selection(MoveSelection::Greedy);
    let mut self_play = SelfPlay::with_seed(UniformEvaluator, config, 17).unwrap();
    let labeled = self_play.run_episode_from(position).unwrap().into_labeled().unwrap();

    let bytes = bincode::serialize(&labeled).unwrap();
    let decoded: Vec<LabeledExample> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, labeled);
    assert_eq!(decoded.iter().map(|example| example.value).collect::<Vec<_>>(), vec![-1., 1.]);
}
