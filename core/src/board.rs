use core::ops::Index;
use ndarray::Array2;

use crate::*;

/// Dense grid of cells stored row-major, so `(row, col)` lives at `row * width + col`.
///
/// The layout never changes after construction. Visibility is only changed through the crate-private mutators, which
/// also keep the revealed and flagged counters in sync.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    width: Dim,
    height: Dim,
    mine_count: CellCount,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl Board {
    pub(crate) fn from_cells(cells: Array2<Cell>, width: Dim, height: Dim, mine_count: CellCount) -> Self {
        debug_assert_eq!(cells.dim(), (height as usize, width as usize));
        Self {
            cells,
            width,
            height,
            mine_count,
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    /// Builds a board with mines at exactly the given positions. Duplicates are counted once.
    pub fn from_mine_coords(width: Dim, height: Dim, mine_coords: &[Coordinate]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((height as usize, width as usize));

        for &coords in mine_coords {
            if !coords.is_within(height, width) {
                return Err(GameError::OutOfBounds(coords));
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        let cells = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[(row, col)] {
                return Cell::mine();
            }
            let adjacent_mines = NeighborIter::new(Coordinate::new(row as Coord, col as Coord), height, width)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            Cell::safe(adjacent_mines as u8)
        });

        Ok(Self::from_cells(cells, width, height, mine_count))
    }

    pub fn width(&self) -> Dim {
        self.width
    }

    pub fn height(&self) -> Dim {
        self.height
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    /// Number of revealed cells that do not hold a mine.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn is_valid_coordinate(&self, coords: Coordinate) -> bool {
        coords.is_within(self.height, self.width)
    }

    pub fn validate_coordinate(&self, coords: Coordinate) -> Result<Coordinate> {
        if self.is_valid_coordinate(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    /// Copy of the cell at `coords`.
    pub fn cell(&self, coords: Coordinate) -> Result<Cell> {
        let coords = self.validate_coordinate(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn iter_neighbors(&self, coords: Coordinate) -> NeighborIter {
        NeighborIter::new(coords, self.height, self.width)
    }

    /// All positions with their cells, row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coordinate, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| (Coordinate::new(row as Coord, col as Coord), cell))
    }

    pub(crate) fn cell_at(&self, coords: Coordinate) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub(crate) fn count_neighbors(&self, coords: Coordinate, visibility: Visibility) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self.cell_at(pos).visibility() == visibility)
            .count() as u8
    }

    pub(crate) fn set_visibility(&mut self, coords: Coordinate, visibility: Visibility) {
        let cell = &mut self.cells[coords.to_nd_index()];
        let previous = cell.visibility();
        if previous == visibility {
            return;
        }
        cell.set_visibility(visibility);
        let is_safe = !cell.has_mine();

        match previous {
            Visibility::Revealed if is_safe => self.revealed_count -= 1,
            Visibility::Flagged => self.flagged_count -= 1,
            _ => {}
        }
        match visibility {
            Visibility::Revealed if is_safe => self.revealed_count += 1,
            Visibility::Flagged => self.flagged_count += 1,
            _ => {}
        }
    }
}

impl Index<Coordinate> for Board {
    type Output = Cell;

    fn index(&self, coords: Coordinate) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// Read-only view of the board the engine currently exposes.
///
/// Before the first move no real board exists yet; the placeholder answers every in-bounds lookup with a hidden,
/// mine-free cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BoardView<'a> {
    Placeholder(&'a Configuration),
    Active(&'a Board),
}

impl BoardView<'_> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    pub fn width(&self) -> Dim {
        match self {
            Self::Placeholder(config) => config.width(),
            Self::Active(board) => board.width(),
        }
    }

    pub fn height(&self) -> Dim {
        match self {
            Self::Placeholder(config) => config.height(),
            Self::Active(board) => board.height(),
        }
    }

    pub fn mine_count(&self) -> CellCount {
        match self {
            Self::Placeholder(config) => config.mine_count(),
            Self::Active(board) => board.mine_count(),
        }
    }

    pub fn is_valid_coordinate(&self, coords: Coordinate) -> bool {
        coords.is_within(self.height(), self.width())
    }

    pub fn cell(&self, coords: Coordinate) -> Result<Cell> {
        match self {
            Self::Placeholder(_) if self.is_valid_coordinate(coords) => Ok(Cell::default()),
            Self::Placeholder(_) => Err(GameError::OutOfBounds(coords)),
            Self::Active(board) => board.cell(coords),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(row: Coord, col: Coord) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn fixed_layout_counts_adjacent_mines() {
        let board = Board::from_mine_coords(5, 5, &[coords(0, 0), coords(0, 2)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.cell(coords(0, 1)).unwrap().adjacent_mine_count(), Some(2));
        assert_eq!(board.cell(coords(1, 1)).unwrap().adjacent_mine_count(), Some(2));
        assert_eq!(board.cell(coords(1, 3)).unwrap().adjacent_mine_count(), Some(1));
        assert_eq!(board.cell(coords(4, 4)).unwrap().adjacent_mine_count(), Some(0));
        assert_eq!(board.cell(coords(0, 0)).unwrap().adjacent_mine_count(), None);
    }

    #[test]
    fn fixed_layout_rejects_out_of_bounds_mine() {
        let result = Board::from_mine_coords(5, 5, &[coords(5, 0)]);
        assert_eq!(result, Err(GameError::OutOfBounds(coords(5, 0))));
    }

    #[test]
    fn duplicate_mines_are_counted_once() {
        let board = Board::from_mine_coords(5, 5, &[coords(1, 1), coords(1, 1)]).unwrap();
        assert_eq!(board.mine_count(), 1);
        assert_eq!(board.safe_cell_count(), 24);
    }

    #[test]
    fn cell_lookup_fails_out_of_bounds() {
        let board = Board::from_mine_coords(10, 10, &[coords(0, 0)]).unwrap();

        assert_eq!(board.cell(coords(-1, 5)), Err(GameError::OutOfBounds(coords(-1, 5))));
        assert_eq!(board.cell(coords(5, 10)), Err(GameError::OutOfBounds(coords(5, 10))));
        assert_eq!(board.cell(coords(10, 5)), Err(GameError::OutOfBounds(coords(10, 5))));
        assert!(board.cell(coords(9, 9)).is_ok());
    }

    #[test]
    fn visibility_changes_keep_counters_in_sync() {
        let mut board = Board::from_mine_coords(5, 5, &[coords(0, 0)]).unwrap();

        board.set_visibility(coords(2, 2), Visibility::Revealed);
        board.set_visibility(coords(2, 2), Visibility::Revealed);
        board.set_visibility(coords(0, 0), Visibility::Flagged);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.flagged_count(), 1);

        board.set_visibility(coords(0, 0), Visibility::Revealed);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.flagged_count(), 0);

        board.set_visibility(coords(2, 2), Visibility::Hidden);
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn placeholder_view_is_hidden_and_mine_free() {
        let config = Configuration::new(6, 5, 4).unwrap();
        let view = BoardView::Placeholder(&config);

        assert!(view.is_placeholder());
        assert_eq!((view.width(), view.height(), view.mine_count()), (6, 5, 4));
        let cell = view.cell(coords(4, 5)).unwrap();
        assert!(cell.is_hidden());
        assert!(!cell.has_mine());
        assert_eq!(view.cell(coords(5, 0)), Err(GameError::OutOfBounds(coords(5, 0))));
    }
}
