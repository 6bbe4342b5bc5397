use crate::*;
pub use random::*;

mod random;

/// Source of fresh boards for the engine.
pub trait BoardGenerator {
    /// Builds a board for `config`. When `safe_zone` is given, neither it nor any of its neighbors may hold a mine.
    ///
    /// The board should have the configured dimensions. The engine rejects moves outside the returned board with
    /// [`GameError::OutOfBounds`] even when they fit the configuration.
    fn generate(&mut self, config: &Configuration, safe_zone: Option<Coordinate>) -> Board;
}
