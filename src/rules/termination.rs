use chess::Color;

/// Ways a game ends without either side having to claim anything.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoveRule,
    FivefoldRepetition,
}

impl Termination {
    pub fn is_decisive(&self) -> bool {
        self == &Termination::Checkmate
    }

    pub fn is_draw(&self) -> bool {
        !self.is_decisive()
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub struct Outcome {
    pub termination: Termination,
    pub winner: Option<Color>,
}

impl Outcome {
    /// Reward for `color`: +1 for a win, -1 for a loss, 0 for any draw.
    pub fn reward_for(&self, color: Color) -> f32 {
        match self.winner {
            Some(winner) if winner == color => 1.,
            Some(_) => -1.,
            None => 0.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination() {
        assert!(Termination::Checkmate.is_decisive());
        for termination in [
            Termination::Stalemate,
            Termination::InsufficientMaterial,
            Termination::SeventyFiveMoveRule,
            Termination::FivefoldRepetition,
        ] {
            assert!(termination.is_draw());
        }
    }

    #[test]
    fn test_reward_for() {
        let decisive = Outcome { termination: Termination::Checkmate, winner: Some(Color::Black) };
        assert_eq!(decisive.reward_for(Color::Black), 1.);
        assert_eq!(decisive.reward_for(Color::White), -1.);

        let drawn = Outcome { termination: Termination::Stalemate, winner: None };
        assert_eq!(drawn.reward_for(Color::White), 0.);
        assert_eq!(drawn.reward_for(Color::Black), 0.);
    }
}
