use thiserror::Error;

use crate::{CellCount, Coordinate, Dim, MAX_DIM, MAX_PERCENT, MIN_DIM};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(
        "Board size {width}x{height} is invalid, both sides must be between {min} and {max}",
        min = MIN_DIM,
        max = MAX_DIM
    )]
    InvalidDimensions { width: Dim, height: Dim },
    #[error("Invalid mine count {mine_count}, must be at least 1 and less than {total_cells}")]
    InvalidMineCount {
        mine_count: CellCount,
        total_cells: CellCount,
    },
    #[error("Invalid mine percentage {0}, must be between 0 and {max}", max = MAX_PERCENT)]
    InvalidPercentage(u8),
    #[error("Coordinates {0} are out of bounds")]
    OutOfBounds(Coordinate),
}

pub type Result<T> = core::result::Result<T, GameError>;
