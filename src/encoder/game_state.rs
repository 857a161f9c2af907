use chess::{CastleRights, Color, ALL_SQUARES};
use serde::{Deserialize, Serialize};

use crate::encoder::constants::*;
use crate::rules::Position;

/// The network input: an `8 x 8 x (14T + 7)` array stored rank-major, then file, then plane.
///
/// Time step `T - 1` holds the current position, lower slots hold earlier ones.
/// Each time step has 12 piece planes (mover's pawn..king, then the opponent's) and
/// two repetition planes. The last 7 planes carry colour, move counters and castling rights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    history: usize,
    num_planes: usize,
    data: Vec<f32>,
}

impl GameState {
    pub fn new<P: Position>(position: &P, history: usize) -> Self {
        let history = history.max(1);
        let num_planes = num_planes(history);
        let mut state = GameState {
            history,
            num_planes,
            data: vec![0.; NUM_SQUARES * num_planes],
        };
        state.write_time_step(history - 1, position);
        state.write_constants(position);
        state
    }

    /// Moves every time step one slot back and writes `position` as the newest one.
    pub fn advance<P: Position>(&mut self, position: &P) {
        for slot in 0..self.history - 1 {
            let dst = slot * NUM_BITS_PER_TIME_STEP;
            let src = dst + NUM_BITS_PER_TIME_STEP;
            for square in 0..NUM_SQUARES {
                let base = square * self.num_planes;
                self.data.copy_within(base + src..base + src + NUM_BITS_PER_TIME_STEP, base + dst);
            }
        }
        self.write_time_step(self.history - 1, position);
        self.write_constants(position);
    }

    pub fn history(&self) -> usize {
        self.history
    }

    pub fn num_planes(&self) -> usize {
        self.num_planes
    }

    pub fn shape(&self) -> [usize; 3] {
        [BOARD_SIZE, BOARD_SIZE, self.num_planes]
    }

    pub fn get(&self, rank: usize, file: usize, plane: usize) -> f32 {
        self.data[self.index(rank, file, plane)]
    }

    /// One plane as 64 values, row-major.
    pub fn plane(&self, plane: usize) -> [f32; NUM_SQUARES] {
        let mut values = [0.; NUM_SQUARES];
        for (square, value) in values.iter_mut().enumerate() {
            *value = self.data[square * self.num_planes + plane];
        }
        values
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Channel-first copy (`planes x 8 x 8`), the layout convolution layers expect.
    pub fn to_chw(&self) -> Vec<f32> {
        (0..self.num_planes).flat_map(|plane| self.plane(plane)).collect()
    }

    fn index(&self, rank: usize, file: usize, plane: usize) -> usize {
        (rank * BOARD_SIZE + file) * self.num_planes + plane
    }

    fn fill_plane(&mut self, plane: usize, value: f32) {
        for square in 0..NUM_SQUARES {
            self.data[square * self.num_planes + plane] = value;
        }
    }

    fn write_time_step<P: Position>(&mut self, slot: usize, position: &P) {
        let offset = slot * NUM_BITS_PER_TIME_STEP;
        for plane in offset..offset + NUM_BITS_PER_TIME_STEP {
            self.fill_plane(plane, 0.);
        }

        let side_to_move = position.side_to_move();
        for square in ALL_SQUARES {
            let Some((piece, color)) = position.piece_on(square) else {
                continue;
            };
            let rank = square.to_index() / BOARD_SIZE;
            let file = square.to_index() % BOARD_SIZE;
            // White's board is flipped so the mover's pieces always start at the bottom rows
            // and advance towards row 0.
            let row = if side_to_move == Color::White { BOARD_SIZE - 1 - rank } else { rank };
            let player_offset = if color == side_to_move { 0 } else { NUM_PIECE_TYPE_BITS };
            let index = self.index(row, file, offset + player_offset + piece.to_index());
            self.data[index] = 1.;
        }

        if position.is_repetition(2) {
            self.fill_plane(offset + NUM_BITS_PER_BOARD, 1.);
        }
        if position.is_repetition(3) {
            self.fill_plane(offset + NUM_BITS_PER_BOARD + 1, 1.);
        }
    }

    fn write_constants<P: Position>(&mut self, position: &P) {
        let base = NUM_BITS_PER_TIME_STEP * self.history;
        let flag = |set: bool| if set { 1. } else { 0. };
        let kingside = |rights: CastleRights| matches!(rights, CastleRights::KingSide | CastleRights::Both);
        let queenside = |rights: CastleRights| matches!(rights, CastleRights::QueenSide | CastleRights::Both);
        let white = position.castle_rights(Color::White);
        let black = position.castle_rights(Color::Black);

        self.fill_plane(base + COLOR_PLANE, flag(position.side_to_move() == Color::Black));
        self.fill_plane(base + FULLMOVE_PLANE, position.fullmove_number() as f32);
        self.fill_plane(base + HALFMOVE_PLANE, position.halfmove_clock() as f32);
        self.fill_plane(base + WHITE_QUEENSIDE_PLANE, flag(queenside(white)));
        self.fill_plane(base + WHITE_KINGSIDE_PLANE, flag(kingside(white)));
        self.fill_plane(base + BLACK_QUEENSIDE_PLANE, flag(queenside(black)));
        self.fill_plane(base + BLACK_KINGSIDE_PLANE, flag(kingside(black)));
    }
}
