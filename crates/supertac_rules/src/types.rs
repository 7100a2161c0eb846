//! Core domain types for super tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Number of cells in a sub-board, and of sub-boards in the meta-board.
pub const BOARD_CELLS: usize = 9;

/// Index of the center cell of a 3x3 board.
pub const CENTER: usize = 4;

/// Symbol placed by a player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Player X (goes first).
    #[display("X")]
    X,
    /// Player O (goes second).
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single cell of a sub-board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Occupied by X.
    X,
    /// Occupied by O.
    O,
}

impl Cell {
    /// Returns the mark occupying this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// One of the nine inner 3x3 boards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubBoard {
    /// Cells in row-major order (0-8).
    cells: [Cell; BOARD_CELLS],
}

impl SubBoard {
    /// Creates an empty sub-board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sub-board from explicit cells.
    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    /// Parses a nine-character row-major pattern of `X`, `O` and `.`.
    ///
    /// Returns `None` for any other length or character.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        let cells: Vec<Cell> = pattern
            .chars()
            .map(|ch| match ch {
                'X' | 'x' => Some(Cell::X),
                'O' | 'o' => Some(Cell::O),
                '.' | '_' => Some(Cell::Empty),
                _ => None,
            })
            .collect::<Option<_>>()?;
        Some(Self::from_cells(cells.try_into().ok()?))
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, cell: usize) -> Option<Cell> {
        self.cells.get(cell).copied()
    }

    /// Checks if a cell is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, cell: usize) -> bool {
        matches!(self.get(cell), Some(Cell::Empty))
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Number of occupied cells.
    pub fn count_filled(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Number of cells occupied by `mark`.
    pub fn count_of(&self, mark: Mark) -> usize {
        let target = Cell::from(mark);
        self.cells.iter().filter(|c| **c == target).count()
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    pub(crate) fn place(&mut self, cell: usize, mark: Mark) {
        self.cells[cell] = Cell::from(mark);
    }
}

/// Outcome of a single sub-board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubOutcome {
    /// Still open for play.
    #[default]
    Undecided,
    /// Won by X.
    X,
    /// Won by O.
    O,
    /// Filled without a line.
    Draw,
}

impl SubOutcome {
    /// True once the sub-board is won or drawn.
    pub fn is_decided(self) -> bool {
        self != SubOutcome::Undecided
    }

    /// The winning mark, if the board was won.
    pub fn winner(self) -> Option<Mark> {
        match self {
            SubOutcome::X => Some(Mark::X),
            SubOutcome::O => Some(Mark::O),
            SubOutcome::Undecided | SubOutcome::Draw => None,
        }
    }
}

impl From<Mark> for SubOutcome {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => SubOutcome::X,
            Mark::O => SubOutcome::O,
        }
    }
}

/// Final result of a match decided by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum MetaOutcome {
    /// X completed a line of sub-boards.
    #[display("X wins")]
    X,
    /// O completed a line of sub-boards.
    #[display("O wins")]
    O,
    /// Every sub-board decided, no line.
    #[display("Draw")]
    Draw,
}

impl MetaOutcome {
    /// The winning mark, if not a draw.
    pub fn winner(self) -> Option<Mark> {
        match self {
            MetaOutcome::X => Some(Mark::X),
            MetaOutcome::O => Some(Mark::O),
            MetaOutcome::Draw => None,
        }
    }
}

impl From<Mark> for MetaOutcome {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => MetaOutcome::X,
            Mark::O => MetaOutcome::O,
        }
    }
}

/// A coordinate on the meta-board: which sub-board, which cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Sub-board index (0-8).
    #[serde(rename = "boardIndex")]
    pub board: usize,
    /// Cell index within the sub-board (0-8).
    #[serde(rename = "cellIndex")]
    pub cell: usize,
}

impl Move {
    /// Creates a new move coordinate.
    pub const fn new(board: usize, cell: usize) -> Self {
        Self { board, cell }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.board, self.cell)
    }
}

/// Complete state of one match.
///
/// Fields are only mutated through the rule engine, which keeps
/// `active_board`, `sub_winners`, `meta_winner` and `is_over` consistent
/// with the cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaBoard {
    pub(crate) boards: [SubBoard; BOARD_CELLS],
    pub(crate) sub_winners: [SubOutcome; BOARD_CELLS],
    pub(crate) active_board: Option<usize>,
    pub(crate) current_player: Mark,
    pub(crate) is_over: bool,
    pub(crate) meta_winner: Option<MetaOutcome>,
}

impl MetaBoard {
    /// Creates the initial board: all cells empty, any board open, X to move.
    pub fn new() -> Self {
        Self {
            boards: [SubBoard::new(); BOARD_CELLS],
            sub_winners: [SubOutcome::Undecided; BOARD_CELLS],
            active_board: None,
            current_player: Mark::X,
            is_over: false,
            meta_winner: None,
        }
    }

    /// Returns all sub-boards.
    pub fn boards(&self) -> &[SubBoard; BOARD_CELLS] {
        &self.boards
    }

    /// Returns one sub-board.
    pub fn board(&self, index: usize) -> Option<&SubBoard> {
        self.boards.get(index)
    }

    /// Returns the cell at a coordinate.
    pub fn cell(&self, board: usize, cell: usize) -> Option<Cell> {
        self.boards.get(board).and_then(|b| b.get(cell))
    }

    /// Returns the per-board outcomes.
    pub fn sub_winners(&self) -> &[SubOutcome; BOARD_CELLS] {
        &self.sub_winners
    }

    /// The sub-board the next mover is confined to, or `None` for any.
    pub fn active_board(&self) -> Option<usize> {
        self.active_board
    }

    /// Mark of the player to move.
    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    /// True once the match is decided.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// The match result, once decided.
    pub fn meta_winner(&self) -> Option<MetaOutcome> {
        self.meta_winner
    }

    /// Total number of occupied cells across all sub-boards.
    pub fn filled_cells(&self) -> usize {
        self.boards.iter().map(SubBoard::count_filled).sum()
    }

    /// Total number of cells occupied by `mark`.
    pub fn count_of(&self, mark: Mark) -> usize {
        self.boards.iter().map(|b| b.count_of(mark)).sum()
    }

    /// Returns a copy with the labels X and O swapped everywhere.
    ///
    /// Cells, sub-board outcomes, the match result and the side to move
    /// are all mirrored; `active_board` is unchanged.
    pub fn mirrored(&self) -> Self {
        let swap_cell = |c: Cell| match c {
            Cell::X => Cell::O,
            Cell::O => Cell::X,
            Cell::Empty => Cell::Empty,
        };
        let swap_sub = |s: SubOutcome| match s {
            SubOutcome::X => SubOutcome::O,
            SubOutcome::O => SubOutcome::X,
            other => other,
        };
        Self {
            boards: self.boards.map(|b| SubBoard::from_cells(b.cells.map(swap_cell))),
            sub_winners: self.sub_winners.map(swap_sub),
            active_board: self.active_board,
            current_player: self.current_player.opponent(),
            is_over: self.is_over,
            meta_winner: self.meta_winner.map(|m| match m {
                MetaOutcome::X => MetaOutcome::O,
                MetaOutcome::O => MetaOutcome::X,
                MetaOutcome::Draw => MetaOutcome::Draw,
            }),
        }
    }
}

impl Default for MetaBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MetaBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Nine text rows; each row crosses three sub-boards.
        for meta_row in 0..3 {
            for inner_row in 0..3 {
                let mut line = String::new();
                for meta_col in 0..3 {
                    let board = &self.boards[meta_row * 3 + meta_col];
                    for inner_col in 0..3 {
                        line.push(match board.cells[inner_row * 3 + inner_col] {
                            Cell::Empty => '.',
                            Cell::X => 'X',
                            Cell::O => 'O',
                        });
                    }
                    if meta_col < 2 {
                        line.push_str(" | ");
                    }
                }
                writeln!(f, "{line}")?;
            }
            if meta_row < 2 {
                writeln!(f, "----+-----+----")?;
            }
        }
        Ok(())
    }
}
