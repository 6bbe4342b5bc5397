use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis. Signed so that callers can submit positions left of or above the board, which are then
/// rejected instead of wrapping around.
pub type Coord = i32;

/// Board width or height.
pub type Dim = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Position on the board as `(row, col)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: Coord,
    pub col: Coord,
}

impl Coordinate {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// Whether the position lies inside a `height` by `width` grid.
    pub const fn is_within(self, height: Dim, width: Dim) -> bool {
        self.row >= 0 && self.row < height as Coord && self.col >= 0 && self.col < width as Coord
    }

    pub(crate) const fn from_flat_index(index: usize, width: Dim) -> Self {
        let width = width as usize;
        Self::new((index / width) as Coord, (index % width) as Coord)
    }

    /// Row-major index, only meaningful for in-bounds positions.
    pub(crate) const fn flat_index(self, width: Dim) -> usize {
        self.row as usize * width as usize + self.col as usize
    }
}

impl From<(Coord, Coord)> for Coordinate {
    fn from((row, col): (Coord, Coord)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub(crate) trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coordinate {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row as usize, self.col as usize]
    }
}

pub const fn mult(a: Dim, b: Dim) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coordinate, delta: (Coord, Coord), height: Dim, width: Dim) -> Option<Coordinate> {
    let (d_row, d_col) = delta;
    let next = Coordinate::new(coords.row.checked_add(d_row)?, coords.col.checked_add(d_col)?);
    next.is_within(height, width).then_some(next)
}

/// Iterates over the up to 8 in-bounds positions sharing an edge or a corner with `center`.
///
/// Holds no reference to the grid, so a board can be mutated while walking its neighbors.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coordinate,
    height: Dim,
    width: Dim,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coordinate, height: Dim, width: Dim) -> Self {
        Self {
            center,
            height,
            width,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(
                self.center,
                DISPLACEMENTS[self.index as usize],
                self.height,
                self.width,
            );
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        assert_eq!(NeighborIter::new(Coordinate::new(0, 0), 5, 5).count(), 3);
        assert_eq!(NeighborIter::new(Coordinate::new(4, 4), 5, 5).count(), 3);
    }

    #[test]
    fn edge_and_interior_neighbor_counts() {
        assert_eq!(NeighborIter::new(Coordinate::new(0, 2), 5, 5).count(), 5);
        assert_eq!(NeighborIter::new(Coordinate::new(2, 2), 5, 5).count(), 8);
    }

    #[test]
    fn neighbors_exclude_center() {
        let center = Coordinate::new(1, 1);
        assert!(NeighborIter::new(center, 3, 3).all(|pos| pos != center));
    }

    #[test]
    fn bounds_reject_negative_and_overflowing_positions() {
        assert!(!Coordinate::new(-1, 5).is_within(10, 10));
        assert!(!Coordinate::new(5, 10).is_within(10, 10));
        assert!(Coordinate::new(9, 9).is_within(10, 10));
    }

    #[test]
    fn flat_index_is_row_major() {
        let coords = Coordinate::new(2, 3);
        assert_eq!(coords.flat_index(7), 17);
        assert_eq!(Coordinate::from_flat_index(17, 7), coords);
    }
}
