#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::Serialize;

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod snapshot;
mod types;

#[cfg(test)]
mod testing;

/// Smallest allowed board side.
pub const MIN_DIM: Dim = 5;

/// Largest allowed board side.
pub const MAX_DIM: Dim = 500;

/// Largest mine density accepted by [`Configuration::from_percentage`].
pub const MAX_PERCENT: u8 = 99;

/// Validated board dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Configuration {
    width: Dim,
    height: Dim,
    mine_count: CellCount,
}

impl Configuration {
    const fn new_unchecked(width: Dim, height: Dim, mine_count: CellCount) -> Self {
        Self {
            width,
            height,
            mine_count,
        }
    }

    pub fn new(width: Dim, height: Dim, mine_count: CellCount) -> Result<Self> {
        let valid_dim = MIN_DIM..=MAX_DIM;
        if !valid_dim.contains(&width) || !valid_dim.contains(&height) {
            return Err(GameError::InvalidDimensions { width, height });
        }

        // at least one mine and at least one safe cell
        let total_cells = mult(width, height);
        if mine_count < 1 || mine_count >= total_cells {
            return Err(GameError::InvalidMineCount {
                mine_count,
                total_cells,
            });
        }

        Ok(Self::new_unchecked(width, height, mine_count))
    }

    /// Derives the mine count as `percent` of all cells, rounded down.
    pub fn from_percentage(width: Dim, height: Dim, percent: u8) -> Result<Self> {
        if percent > MAX_PERCENT {
            return Err(GameError::InvalidPercentage(percent));
        }

        let mine_count = mult(width, height) * CellCount::from(percent) / 100;
        Self::new(width, height, mine_count)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(30, 16, 99)
    }

    pub const fn width(&self) -> Dim {
        self.width
    }

    pub const fn height(&self) -> Dim {
        self.height
    }

    pub const fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub const fn is_valid_coordinate(&self, coords: Coordinate) -> bool {
        coords.is_within(self.height, self.width)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// At least one cell was revealed or flagged.
    Revealed,
    /// A revealed cell was hidden again.
    Collapsed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Collapsed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes of several moves
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (Collapsed, _) | (_, Collapsed) => Collapsed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
