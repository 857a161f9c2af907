//! Move direction related enums and functions.

use chess::Square;

#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RayDirection {
    NorthWest = 0,
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
}

const ALL_RAY_DIRECTIONS: [RayDirection; 8] = [
    RayDirection::NorthWest, RayDirection::North,
    RayDirection::NorthEast, RayDirection::East,
    RayDirection::SouthEast, RayDirection::South,
    RayDirection::SouthWest, RayDirection::West,
];

impl RayDirection {
    pub const fn from_index(index: usize) -> Option<RayDirection> {
        if index < ALL_RAY_DIRECTIONS.len() {
            Some(ALL_RAY_DIRECTIONS[index])
        } else {
            None
        }
    }

    pub const fn flip(&self) -> RayDirection {
        ALL_RAY_DIRECTIONS[(*self as usize + 4) % 8]
    }

    pub fn iter() -> impl Iterator<Item = RayDirection> {
        ALL_RAY_DIRECTIONS.iter().copied()
    }

    /// One step along the ray as (rank change, file change).
    pub const fn step(&self) -> (i8, i8) {
        match self {
            RayDirection::NorthWest => (1, -1),
            RayDirection::North => (1, 0),
            RayDirection::NorthEast => (1, 1),
            RayDirection::East => (0, 1),
            RayDirection::SouthEast => (-1, 1),
            RayDirection::South => (-1, 0),
            RayDirection::SouthWest => (-1, -1),
            RayDirection::West => (0, -1),
        }
    }

    /// Which of the three underpromotion plane groups a pawn moving this way uses.
    /// Opposite directions share a group, since only one of them is forward for each colour.
    pub const fn underpromotion_group(&self) -> Option<usize> {
        match self {
            RayDirection::NorthWest | RayDirection::SouthEast => Some(0),
            RayDirection::North | RayDirection::South => Some(1),
            RayDirection::NorthEast | RayDirection::SouthWest => Some(2),
            RayDirection::East | RayDirection::West => None,
        }
    }

    /// Direction and Chebyshev distance of a queen-like move, or `None` when the two
    /// squares share no rank, file or diagonal.
    pub fn calc_and_measure_distance(src_square: Square, dst_square: Square) -> Option<(RayDirection, u8)> {
        let (rank_change, file_change) = rank_and_file_change(src_square, dst_square);
        if rank_change == 0 && file_change == 0 {
            return None;
        }
        if rank_change != 0 && file_change != 0 && rank_change.abs() != file_change.abs() {
            return None;
        }

        let direction = match (rank_change.signum(), file_change.signum()) {
            (1, -1) => RayDirection::NorthWest,
            (1, 0) => RayDirection::North,
            (1, 1) => RayDirection::NorthEast,
            (0, 1) => RayDirection::East,
            (-1, 1) => RayDirection::SouthEast,
            (-1, 0) => RayDirection::South,
            (-1, -1) => RayDirection::SouthWest,
            _ => RayDirection::West,
        };
        let distance = rank_change.abs().max(file_change.abs()) as u8;

        Some((direction, distance))
    }
}

#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum KnightDirection {
    TwoUpOneRight = 0,
    OneUpTwoRight = 1,
    OneDownTwoRight = 2,
    TwoDownOneRight = 3,
    TwoDownOneLeft = 4,
    OneDownTwoLeft = 5,
    OneUpTwoLeft = 6,
    TwoUpOneLeft = 7,
}

const ALL_KNIGHT_DIRECTIONS: [KnightDirection; 8] = [
    KnightDirection::TwoUpOneRight, KnightDirection::OneUpTwoRight,
    KnightDirection::OneDownTwoRight, KnightDirection::TwoDownOneRight,
    KnightDirection::TwoDownOneLeft, KnightDirection::OneDownTwoLeft,
    KnightDirection::OneUpTwoLeft, KnightDirection::TwoUpOneLeft,
];

impl KnightDirection {
    pub const fn from_index(index: usize) -> Option<KnightDirection> {
        if index < ALL_KNIGHT_DIRECTIONS.len() {
            Some(ALL_KNIGHT_DIRECTIONS[index])
        } else {
            None
        }
    }

    pub const fn flip(&self) -> KnightDirection {
        ALL_KNIGHT_DIRECTIONS[(*self as usize + 4) % 8]
    }

    pub fn iter() -> impl Iterator<Item = KnightDirection> {
        ALL_KNIGHT_DIRECTIONS.iter().copied()
    }

    /// The jump as (rank change, file change).
    pub const fn jump(&self) -> (i8, i8) {
        match self {
            KnightDirection::TwoUpOneRight => (2, 1),
            KnightDirection::OneUpTwoRight => (1, 2),
            KnightDirection::OneDownTwoRight => (-1, 2),
            KnightDirection::TwoDownOneRight => (-2, 1),
            KnightDirection::TwoDownOneLeft => (-2, -1),
            KnightDirection::OneDownTwoLeft => (-1, -2),
            KnightDirection::OneUpTwoLeft => (1, -2),
            KnightDirection::TwoUpOneLeft => (2, -1),
        }
    }

    pub fn calc(src_square: Square, dst_square: Square) -> Option<KnightDirection> {
        let change = rank_and_file_change(src_square, dst_square);
        KnightDirection::iter().find(|direction| direction.jump() == change)
    }
}

fn rank_and_file_change(src_square: Square, dst_square: Square) -> (i8, i8) {
    let src = src_square.to_index() as i8;
    let dst = dst_square.to_index() as i8;
    (dst / 8 - src / 8, dst % 8 - src % 8)
}

/// The square reached from `square` after `times` steps of (rank change, file change),
/// or `None` if it falls off the board.
pub fn offset_square(square: Square, (rank_step, file_step): (i8, i8), times: i8) -> Option<Square> {
    let index = square.to_index() as i8;
    let rank = index / 8 + rank_step * times;
    let file = index % 8 + file_step * times;
    if (0..8).contains(&rank) && (0..8).contains(&file) {
        Some(chess::ALL_SQUARES[(rank * 8 + file) as usize])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use chess::ALL_SQUARES;
    use super::*;

    fn test_ray_direction_for_square(square: Square, direction: RayDirection) {
        let mut distance = 1;
        while let Some(next_square) = offset_square(square, direction.step(), distance) {
            assert_eq!(
                RayDirection::calc_and_measure_distance(square, next_square),
                Some((direction, distance as u8))
            );
            assert_eq!(
                RayDirection::calc_and_measure_distance(next_square, square),
                Some((direction.flip(), distance as u8))
            );
            distance += 1;
        }
        assert!(distance <= 8);
    }

    #[test]
    fn test_ray_direction() {
        for square in ALL_SQUARES {
            for direction in RayDirection::iter() {
                test_ray_direction_for_square(square, direction);
            }
            assert_eq!(RayDirection::calc_and_measure_distance(square, square), None);
        }
    }

    #[test]
    fn test_knight_direction() {
        for square in ALL_SQUARES {
            for direction in KnightDirection::iter() {
                if let Some(next_square) = offset_square(square, direction.jump(), 1) {
                    assert_eq!(KnightDirection::calc(square, next_square), Some(direction));
                    assert_eq!(KnightDirection::calc(next_square, square), Some(direction.flip()));
                    assert_eq!(RayDirection::calc_and_measure_distance(square, next_square), None);
                }
            }
        }
    }

    #[test]
    fn test_from_index() {
        for (i, direction) in RayDirection::iter().enumerate() {
            assert_eq!(RayDirection::from_index(i), Some(direction));
        }
        for (i, direction) in KnightDirection::iter().enumerate() {
            assert_eq!(KnightDirection::from_index(i), Some(direction));
        }
        assert_eq!(RayDirection::from_index(8), None);
        assert_eq!(KnightDirection::from_index(8), None);
    }

    #[test]
    fn test_underpromotion_group() {
        for direction in RayDirection::iter() {
            assert_eq!(direction.underpromotion_group(), direction.flip().underpromotion_group());
        }
        assert_eq!(RayDirection::East.underpromotion_group(), None);
    }
}
