use alloc::collections::{BTreeSet, VecDeque};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
/// - any -> InProgress, when a new game is started
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// No game was started yet
    NotStarted,
    /// Moves are accepted
    InProgress,
    /// Every safe cell was revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl Lifecycle {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// The board is only generated on the first move, so that the clicked cell can be kept safe.
#[derive(Clone, Debug, PartialEq)]
enum BoardSlot {
    Uninitialized,
    Active(Board),
}

/// What a single move did to the board, before the lifecycle is updated.
#[derive(Copy, Clone, Debug)]
struct MoveReport {
    outcome: RevealOutcome,
    triggered: Option<Coordinate>,
}

impl Default for MoveReport {
    fn default() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            triggered: None,
        }
    }
}

/// One game session: the board, the lifecycle, and the rules for every player move.
///
/// Moves made while the game is not in progress are ignored and report [`RevealOutcome::NoChange`] or
/// [`MarkOutcome::NoChange`]. Only out-of-bounds coordinates are errors.
#[derive(Clone, Debug)]
pub struct Engine<G = RandomBoardGenerator> {
    generator: G,
    config: Option<Configuration>,
    board: BoardSlot,
    lifecycle: Lifecycle,
    triggered_mine: Option<Coordinate>,
}

impl Engine<RandomBoardGenerator> {
    pub fn with_seed(seed: u64) -> Self {
        Self::new(RandomBoardGenerator::new(seed))
    }
}

impl<G: BoardGenerator> Engine<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            config: None,
            board: BoardSlot::Uninitialized,
            lifecycle: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_finished(&self) -> bool {
        self.lifecycle.is_finished()
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    /// Read-only view of the board, `None` before the first game is started.
    pub fn board(&self) -> Option<BoardView<'_>> {
        let config = self.config.as_ref()?;
        Some(match &self.board {
            BoardSlot::Uninitialized => BoardView::Placeholder(config),
            BoardSlot::Active(board) => BoardView::Active(board),
        })
    }

    pub fn is_first_move_pending(&self) -> bool {
        self.config.is_some() && matches!(self.board, BoardSlot::Uninitialized)
    }

    /// Number of revealed cells without a mine.
    pub fn revealed_count(&self) -> CellCount {
        match &self.board {
            BoardSlot::Uninitialized => 0,
            BoardSlot::Active(board) => board.revealed_count(),
        }
    }

    pub fn flagged_count(&self) -> CellCount {
        match &self.board {
            BoardSlot::Uninitialized => 0,
            BoardSlot::Active(board) => board.flagged_count(),
        }
    }

    /// How many mines have not been flagged yet, negative when there are more flags than mines
    pub fn mines_left(&self) -> i64 {
        let mines = self.board().map_or(0, |view| view.mine_count());
        i64::from(mines) - i64::from(self.flagged_count())
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coordinate> {
        self.triggered_mine
    }

    pub fn start_new_game(&mut self, config: Configuration) {
        log::debug!(
            "Starting new {}x{} game with {} mines",
            config.width(),
            config.height(),
            config.mine_count()
        );
        self.config = Some(config);
        self.board = BoardSlot::Uninitialized;
        self.lifecycle = Lifecycle::InProgress;
        self.triggered_mine = None;
    }

    /// Primary click: hides an already revealed cell again, otherwise reveals the cell and cascades through every
    /// neighbor whose state follows from the numbers.
    pub fn handle_cell_click(&mut self, coords: Coordinate) -> Result<RevealOutcome> {
        let Some(board) = self.prepare_move(coords)? else {
            return Ok(RevealOutcome::NoChange);
        };

        let report = if board.cell_at(coords).is_revealed() {
            board.set_visibility(coords, Visibility::Hidden);
            log::trace!("Collapsed cell at {}", coords);
            MoveReport {
                outcome: RevealOutcome::Collapsed,
                triggered: None,
            }
        } else {
            cascade(board, coords)
        };

        Ok(self.settle(report))
    }

    /// Runs the deduction cascade from `coords` without the collapse toggle, so a satisfied number can be chorded.
    pub fn chord(&mut self, coords: Coordinate) -> Result<RevealOutcome> {
        let Some(board) = self.prepare_move(coords)? else {
            return Ok(RevealOutcome::NoChange);
        };

        let report = cascade(board, coords);
        Ok(self.settle(report))
    }

    /// Reveals a single hidden cell, flood-filling through zero cells. Flagged and revealed cells are left alone.
    pub fn reveal_cell(&mut self, coords: Coordinate) -> Result<RevealOutcome> {
        let Some(board) = self.prepare_move(coords)? else {
            return Ok(RevealOutcome::NoChange);
        };

        let report = flood_reveal(board, coords);
        Ok(self.settle(report))
    }

    /// Switches a hidden cell to flagged and back. Revealed cells and moves before the first reveal are ignored.
    pub fn toggle_flag(&mut self, coords: Coordinate) -> Result<MarkOutcome> {
        if !self.accepts_move(coords)? {
            return Ok(MarkOutcome::NoChange);
        }
        let BoardSlot::Active(board) = &mut self.board else {
            log::debug!("Ignoring flag at {} before the first move", coords);
            return Ok(MarkOutcome::NoChange);
        };
        board.validate_coordinate(coords)?;

        Ok(match board.cell_at(coords).visibility() {
            Visibility::Hidden => {
                board.set_visibility(coords, Visibility::Flagged);
                MarkOutcome::Changed
            }
            Visibility::Flagged => {
                board.set_visibility(coords, Visibility::Hidden);
                MarkOutcome::Changed
            }
            Visibility::Revealed => MarkOutcome::NoChange,
        })
    }

    /// `Ok(false)` when moves are currently ignored, an error when `coords` is outside the board.
    fn accepts_move(&self, coords: Coordinate) -> Result<bool> {
        let Some(config) = &self.config else {
            return Ok(false);
        };
        if !self.lifecycle.is_in_progress() {
            return Ok(false);
        }
        if !config.is_valid_coordinate(coords) {
            return Err(GameError::OutOfBounds(coords));
        }
        Ok(true)
    }

    /// Validates a reveal-type move and generates the board around `coords` if this is the first one.
    ///
    /// `coords` is checked against the generated board as well, which may not match the configuration.
    fn prepare_move(&mut self, coords: Coordinate) -> Result<Option<&mut Board>> {
        if !self.accepts_move(coords)? {
            return Ok(None);
        }

        if let (true, Some(config)) = (self.is_first_move_pending(), self.config) {
            log::debug!("First move at {}, generating board", coords);
            self.board = BoardSlot::Active(self.generator.generate(&config, Some(coords)));
        }

        match &mut self.board {
            BoardSlot::Active(board) => {
                board.validate_coordinate(coords)?;
                Ok(Some(board))
            }
            BoardSlot::Uninitialized => Ok(None),
        }
    }

    /// Applies the lifecycle changes caused by a move.
    fn settle(&mut self, report: MoveReport) -> RevealOutcome {
        if let Some(mine) = report.triggered {
            self.triggered_mine = Some(mine);
            self.end_game(Lifecycle::Lost);
            return RevealOutcome::HitMine;
        }

        if self.check_win_condition() {
            RevealOutcome::Won
        } else {
            report.outcome
        }
    }

    /// Every safe cell revealed wins, flags do not matter.
    fn check_win_condition(&mut self) -> bool {
        let BoardSlot::Active(board) = &self.board else {
            return false;
        };
        if self.lifecycle.is_in_progress() && board.revealed_count() == board.safe_cell_count() {
            self.end_game(Lifecycle::Won);
            true
        } else {
            false
        }
    }

    fn end_game(&mut self, lifecycle: Lifecycle) {
        if self.lifecycle.is_finished() {
            return;
        }
        log::debug!("Game ended: {:?}", lifecycle);
        self.lifecycle = lifecycle;
    }
}

fn reveal(board: &mut Board, coords: Coordinate, report: &mut MoveReport) {
    board.set_visibility(coords, Visibility::Revealed);
    report.outcome = RevealOutcome::Revealed;
    if board.cell_at(coords).has_mine() {
        log::debug!("Revealed mine at {}", coords);
        report.triggered.get_or_insert(coords);
    }
}

/// Breadth-first deduction from `start`.
///
/// For every revealed number: when its flags already account for all adjacent mines, the remaining hidden neighbors
/// are revealed and visited in turn; when the hidden neighbors are exactly the missing mines, they are flagged.
/// A cell is only queued on its transition to revealed, so each cell is visited at most once.
fn cascade(board: &mut Board, start: Coordinate) -> MoveReport {
    let mut report = MoveReport::default();
    let mut to_visit = VecDeque::new();

    match board.cell_at(start).visibility() {
        Visibility::Hidden => {
            reveal(board, start, &mut report);
            to_visit.push_back(start);
        }
        Visibility::Revealed => to_visit.push_back(start),
        Visibility::Flagged => return report,
    }

    while let Some(visit_coords) = to_visit.pop_front() {
        // revealed mines carry no clue
        let Some(mines) = board.cell_at(visit_coords).adjacent_mine_count() else {
            continue;
        };
        let flagged = board.count_neighbors(visit_coords, Visibility::Flagged);
        let hidden = board.count_neighbors(visit_coords, Visibility::Hidden);
        if hidden == 0 {
            continue;
        }

        if mines == flagged {
            log::trace!("Cascade reveals around {}", visit_coords);
            for pos in board.iter_neighbors(visit_coords) {
                if board.cell_at(pos).is_hidden() {
                    reveal(board, pos, &mut report);
                    to_visit.push_back(pos);
                }
            }
        } else if mines == flagged + hidden {
            log::trace!("Cascade flags around {}", visit_coords);
            for pos in board.iter_neighbors(visit_coords) {
                if board.cell_at(pos).is_hidden() {
                    board.set_visibility(pos, Visibility::Flagged);
                    report.outcome = RevealOutcome::Revealed;
                }
            }
        }
    }

    report
}

/// Reveals `start` and, if it has no adjacent mines, the whole connected zero region plus its numbered border.
fn flood_reveal(board: &mut Board, start: Coordinate) -> MoveReport {
    let mut report = MoveReport::default();
    if !board.cell_at(start).is_hidden() {
        return report;
    }

    reveal(board, start, &mut report);
    if board.cell_at(start).adjacent_mine_count() != Some(0) {
        return report;
    }

    let mut visited = BTreeSet::from([start]);
    let mut to_visit: VecDeque<_> = board
        .iter_neighbors(start)
        .filter(|&pos| board.cell_at(pos).is_hidden())
        .collect();

    while let Some(visit_coords) = to_visit.pop_front() {
        if !visited.insert(visit_coords) {
            continue;
        }

        // skip flagged or already revealed cells
        if !board.cell_at(visit_coords).is_hidden() {
            continue;
        }

        reveal(board, visit_coords, &mut report);
        log::trace!("Flood revealed cell at {}", visit_coords);

        if board.cell_at(visit_coords).adjacent_mine_count() == Some(0) {
            to_visit.extend(
                board
                    .iter_neighbors(visit_coords)
                    .filter(|&pos| board.cell_at(pos).is_hidden())
                    .filter(|pos| !visited.contains(pos)),
            );
        }
    }

    report
}
