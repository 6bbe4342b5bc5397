use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// A cell as a renderer is allowed to see it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotCell {
    Hidden,
    Flagged,
    Revealed(u8),
    /// Mine shown after the game ended
    Mine,
    /// The mine that ended the game
    Exploded,
    /// Flag on a safe cell, shown after a loss
    WrongFlag,
}

impl SnapshotCell {
    fn from_cell(cell: Cell, lifecycle: Lifecycle, triggered: bool) -> Self {
        use SnapshotCell::*;
        use Visibility as V;

        match (cell.visibility(), cell.has_mine(), lifecycle) {
            (_, true, _) if triggered => Exploded,
            (V::Revealed, true, _) => Mine,
            (V::Revealed, false, _) => Revealed(cell.adjacent_mine_count().unwrap_or(0)),
            (V::Hidden, true, Lifecycle::Lost) => Mine,
            (V::Hidden, true, Lifecycle::Won) => Flagged,
            (V::Flagged, false, Lifecycle::Lost) => WrongFlag,
            (V::Flagged, _, _) => Flagged,
            (V::Hidden, _, _) => Hidden,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => '.',
            Self::Flagged => 'F',
            Self::Revealed(0) => ' ',
            Self::Revealed(count) => (b'0' + count) as char,
            Self::Mine => '*',
            Self::Exploded => 'X',
            Self::WrongFlag => '!',
        }
    }
}

/// Owned copy of everything needed to draw the game, detached from the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: Dim,
    pub height: Dim,
    pub mine_count: CellCount,
    pub mines_left: i64,
    pub lifecycle: Lifecycle,
    pub cells: Array2<SnapshotCell>,
}

impl BoardSnapshot {
    /// `None` before the first game is started.
    pub fn from_engine<G: BoardGenerator>(engine: &Engine<G>) -> Option<Self> {
        let view = engine.board()?;
        let lifecycle = engine.lifecycle();
        let triggered = engine.triggered_mine();
        let (width, height) = (view.width(), view.height());

        let cells = Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
            let coords = Coordinate::new(row as Coord, col as Coord);
            let cell = view.cell(coords).unwrap_or_default();
            SnapshotCell::from_cell(cell, lifecycle, triggered == Some(coords))
        });

        Some(Self {
            width,
            height,
            mine_count: view.mine_count(),
            mines_left: engine.mines_left(),
            lifecycle,
            cells,
        })
    }

    pub fn cell(&self, coords: Coordinate) -> Option<SnapshotCell> {
        if coords.is_within(self.height, self.width) {
            Some(self.cells[coords.to_nd_index()])
        } else {
            None
        }
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::testing::*;
    use std::string::ToString;

    #[test]
    fn no_snapshot_before_first_game() {
        let engine = Engine::with_seed(0);
        assert!(BoardSnapshot::from_engine(&engine).is_none());
    }

    #[test]
    fn placeholder_renders_hidden_grid() {
        let engine = fixed_engine(5, 5, &[Coordinate::new(0, 0)]);
        let snapshot = BoardSnapshot::from_engine(&engine).unwrap();

        assert_eq!(snapshot.lifecycle, Lifecycle::InProgress);
        assert_eq!(snapshot.mines_left, 1);
        assert!(snapshot.cells.iter().all(|&cell| cell == SnapshotCell::Hidden));
        assert_eq!(snapshot.to_string(), ".....\n".repeat(5));
    }

    #[test]
    fn hidden_mines_stay_hidden_while_playing() {
        let mut engine = fixed_engine(5, 5, &[Coordinate::new(0, 0), Coordinate::new(4, 4)]);
        engine.handle_cell_click(Coordinate::new(1, 1)).unwrap();
        engine.toggle_flag(Coordinate::new(4, 4)).unwrap();

        let snapshot = BoardSnapshot::from_engine(&engine).unwrap();

        assert_eq!(snapshot.cell(Coordinate::new(1, 1)), Some(SnapshotCell::Revealed(1)));
        assert_eq!(snapshot.cell(Coordinate::new(0, 0)), Some(SnapshotCell::Hidden));
        assert_eq!(snapshot.cell(Coordinate::new(4, 4)), Some(SnapshotCell::Flagged));
        assert_eq!(snapshot.cell(Coordinate::new(5, 0)), None);
        assert_eq!(snapshot.mines_left, 1);
    }

    #[test]
    fn loss_shows_mines_and_wrong_flags() {
        let mut engine = fixed_engine(5, 5, &[Coordinate::new(0, 0), Coordinate::new(4, 4)]);
        engine.reveal_cell(Coordinate::new(1, 1)).unwrap();
        engine.toggle_flag(Coordinate::new(2, 2)).unwrap();
        engine.reveal_cell(Coordinate::new(0, 0)).unwrap();

        let snapshot = BoardSnapshot::from_engine(&engine).unwrap();

        assert_eq!(snapshot.lifecycle, Lifecycle::Lost);
        assert_eq!(snapshot.cell(Coordinate::new(0, 0)), Some(SnapshotCell::Exploded));
        assert_eq!(snapshot.cell(Coordinate::new(4, 4)), Some(SnapshotCell::Mine));
        assert_eq!(snapshot.cell(Coordinate::new(2, 2)), Some(SnapshotCell::WrongFlag));
        assert_eq!(snapshot.to_string().lines().next(), Some("X...."));
    }

    #[test]
    fn serializes_to_json() {
        let mut engine = fixed_engine(5, 5, &[Coordinate::new(0, 0)]);
        engine.handle_cell_click(Coordinate::new(4, 4)).unwrap();
        let snapshot = BoardSnapshot::from_engine(&engine).unwrap();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"lifecycle\":\"Won\""));

        let parsed: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
