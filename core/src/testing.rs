use crate::*;

/// Hands out a fixed layout, ignoring the safe zone.
pub(crate) struct FixedBoard(pub(crate) Board);

impl BoardGenerator for FixedBoard {
    fn generate(&mut self, _config: &Configuration, _safe_zone: Option<Coordinate>) -> Board {
        self.0.clone()
    }
}

pub(crate) fn coords(row: Coord, col: Coord) -> Coordinate {
    Coordinate::new(row, col)
}

/// Engine with a started game whose board will be exactly `mines`.
pub(crate) fn fixed_engine(width: Dim, height: Dim, mines: &[Coordinate]) -> Engine<FixedBoard> {
    let board = Board::from_mine_coords(width, height, mines).unwrap();
    let config = Configuration::new(width, height, board.mine_count()).unwrap();
    let mut engine = Engine::new(FixedBoard(board));
    engine.start_new_game(config);
    engine
}
