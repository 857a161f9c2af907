use chess::Color;
use log::{debug, info};
use rand::Rng;

use crate::codec::ActionId;
use crate::config::SearchConfig;
use crate::encoder::DEFAULT_HISTORY;
use crate::engine::evaluation::Evaluator;
use crate::engine::mcts::Mcts;
use crate::error::Result;
use crate::game::Game;
use crate::rules::{ChessPosition, Outcome, Position};

/// Matches between a candidate model and the model it would replace.
/// Both sides search with their own tree and always play their most visited move.
pub struct Arena<'a, N: Evaluator, B: Evaluator> {
    new: &'a N,
    baseline: &'a B,
    search: SearchConfig,
    history: usize,
}

impl<'a, N: Evaluator, B: Evaluator> Arena<'a, N, B> {
    pub fn new(new: &'a N, baseline: &'a B, search: SearchConfig, history: usize) -> Self {
        Self { new, baseline, search, history }
    }

    pub fn play_game<P: Position>(&self, position: P, new_color: Color) -> Result<Outcome> {
        let mut game = Game::new(position, self.history);
        let mut new_mcts = Mcts::new(self.new, self.search.clone())?;
        let mut baseline_mcts = Mcts::new(self.baseline, self.search.clone())?;

        loop {
            if let Some(outcome) = game.position().outcome() {
                return Ok(outcome);
            }
            let action = if game.position().side_to_move() == new_color {
                decide(&mut new_mcts, &game)?
            } else {
                decide(&mut baseline_mcts, &game)?
            };
            game.apply(action)?;
        }
    }

    /// Fraction of `games` won by the new model, each game from the standard start.
    pub fn pit<R: Rng + ?Sized>(&self, games: usize, rng: &mut R) -> Result<f32> {
        self.pit_from(&ChessPosition::initial(), games, rng)
    }

    /// Fraction of `games` won by the new model. Draws count as non-wins.
    pub fn pit_from<P: Position, R: Rng + ?Sized>(&self, position: &P, games: usize, rng: &mut R) -> Result<f32> {
        if games == 0 {
            return Ok(0.);
        }
        let mut wins = 0;
        let mut draws = 0;
        for game in 0..games {
            let new_color = if rng.gen_bool(0.5) { Color::White } else { Color::Black };
            let outcome = self.play_game(position.clone(), new_color)?;
            if outcome.winner == Some(new_color) {
                wins += 1;
            } else if outcome.termination.is_draw() {
                draws += 1;
            }
            debug!("Pit game {}: new model as {:?}, {:?}", game + 1, new_color, outcome);
        }
        let fraction = wins as f32 / games as f32;
        info!("New model won {}/{} pit games, {} drawn", wins, games, draws);
        Ok(fraction)
    }
}

fn decide<E: Evaluator, P: Position>(mcts: &mut Mcts<E>, game: &Game<P>) -> Result<ActionId> {
    mcts.run(game)?;
    mcts.best_action(game.position())
}

/// Compares two models over `games` games from the standard start.
pub fn pit<N: Evaluator, B: Evaluator, R: Rng + ?Sized>(
    new: &N,
    baseline: &B,
    games: usize,
    search: &SearchConfig,
    rng: &mut R,
) -> Result<f32> {
    Arena::new(new, baseline, search.clone(), DEFAULT_HISTORY).pit(games, rng)
}
