use serde::{Deserialize, Serialize};

/// What the player currently knows about a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Revealed,
    Flagged,
}

impl Visibility {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One board position: whether it holds a mine, how many of its neighbors do, and its visibility.
///
/// The first two never change after generation; visibility is only changed by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    has_mine: bool,
    adjacent_mines: u8,
    visibility: Visibility,
}

impl Cell {
    pub(crate) const fn mine() -> Self {
        Self {
            has_mine: true,
            adjacent_mines: 0,
            visibility: Visibility::Hidden,
        }
    }

    pub(crate) fn safe(adjacent_mines: u8) -> Self {
        debug_assert!(adjacent_mines <= 8, "a cell has at most 8 neighbors");
        Self {
            has_mine: false,
            adjacent_mines,
            visibility: Visibility::Hidden,
        }
    }

    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    /// Number of mines among the neighbors, `None` for a mine.
    pub const fn adjacent_mine_count(self) -> Option<u8> {
        if self.has_mine {
            None
        } else {
            Some(self.adjacent_mines)
        }
    }

    pub const fn visibility(self) -> Visibility {
        self.visibility
    }

    pub const fn is_hidden(self) -> bool {
        self.visibility.is_hidden()
    }

    pub const fn is_revealed(self) -> bool {
        self.visibility.is_revealed()
    }

    pub const fn is_flagged(self) -> bool {
        self.visibility.is_flagged()
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::safe(0)
    }
}
