use chess::ChessMove;

use crate::codec::{self, ActionId};
use crate::encoder::GameState;
use crate::error::Result;
use crate::rules::{ChessPosition, Position};

/// A position together with the encoded state the network sees for it.
/// Both advance together; the state keeps the history window the position alone cannot rebuild.
#[derive(Clone, Debug)]
pub struct Game<P: Position = ChessPosition> {
    position: P,
    state: GameState,
}

impl Game<ChessPosition> {
    pub fn initial(history: usize) -> Self {
        Game::new(ChessPosition::initial(), history)
    }
}

impl<P: Position> Game<P> {
    pub fn new(position: P, history: usize) -> Self {
        let state = GameState::new(&position, history);
        Game { position, state }
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_position(self) -> P {
        self.position
    }

    /// Decodes `action` against the current position and plays it.
    pub fn apply(&mut self, action: ActionId) -> Result<ChessMove> {
        let mv = codec::decode(action, &self.position)?;
        self.play(mv)?;
        Ok(mv)
    }

    pub fn play(&mut self, mv: ChessMove) -> Result<()> {
        self.position.push(mv)?;
        self.state.advance(&self.position);
        Ok(())
    }
}
