/// Which way to move along an axis.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Negative, Direction::Positive];

    pub fn sign(&self) -> i32 {
        match self {
            Direction::Negative => -1,
            Direction::Positive => 1,
        }
    }

    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            -1 => Some(Direction::Negative),
            1 => Some(Direction::Positive),
            _ => None,
        }
    }

    pub fn flip(&self) -> Self {
        match self {
            Direction::Negative => Direction::Positive,
            Direction::Positive => Direction::Negative,
        }
    }
}

/// An axis index paired with a direction, naming one face of a cell.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SignedAxis {
    pub axis: usize,
    pub dir: Direction,
}

impl SignedAxis {
    pub fn new(axis: usize, dir: Direction) -> Self {
        Self { axis, dir }
    }

    /// All `2 * dimension` faces, axis by axis with the negative side first.
    pub fn all_faces(dimension: usize) -> impl Iterator<Item = SignedAxis> {
        (0..dimension).flat_map(|axis| {
            Direction::BOTH
                .iter()
                .map(move |&dir| SignedAxis::new(axis, dir))
        })
    }

    pub fn flip(&self) -> Self {
        Self::new(self.axis, self.dir.flip())
    }
}
