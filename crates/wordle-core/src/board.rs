use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ROWS: usize = 6;
pub const COLS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the 6x5 grid")]
    OutOfRange { row: usize, col: usize },
}

/// Feedback color of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    #[serde(rename = "")]
    None,
    Absent,
    Present,
    Correct,
}

impl Status {
    /// Next color in the click cycle. `None` at the end means the tile is
    /// dismissed entirely.
    pub fn cycled(self) -> Option<Status> {
        match self {
            Status::None => Some(Status::Absent),
            Status::Absent => Some(Status::Present),
            Status::Present => Some(Status::Correct),
            Status::Correct => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(with = "letter_field")]
    pub letter: Option<char>,
    #[serde(default)]
    pub status: Status,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        letter: None,
        status: Status::None,
    };

    pub fn new(letter: char, status: Status) -> Self {
        Self {
            letter: Some(letter.to_ascii_uppercase()),
            status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.letter.is_none()
    }
}

/// Letters travel as `""` or a one-character uppercase string.
mod letter_field {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(letter: &Option<char>, s: S) -> Result<S::Ok, S::Error> {
        match letter {
            Some(c) => s.serialize_str(&c.to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<char>, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(raw
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_uppercase()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 0, col: 0 };
    pub const LAST: Position = Position {
        row: ROWS - 1,
        col: COLS - 1,
    };

    pub fn new(row: usize, col: usize) -> Result<Self, BoardError> {
        if row < ROWS && col < COLS {
            Ok(Self { row, col })
        } else {
            Err(BoardError::OutOfRange { row, col })
        }
    }

    /// Following cell in row-major order.
    pub fn next(self) -> Option<Position> {
        if self.col + 1 < COLS {
            Some(Position {
                row: self.row,
                col: self.col + 1,
            })
        } else if self.row + 1 < ROWS {
            Some(Position {
                row: self.row + 1,
                col: 0,
            })
        } else {
            None
        }
    }

    /// Preceding cell in row-major order.
    pub fn prev(self) -> Option<Position> {
        if self.col > 0 {
            Some(Position {
                row: self.row,
                col: self.col - 1,
            })
        } else if self.row > 0 {
            Some(Position {
                row: self.row - 1,
                col: COLS - 1,
            })
        } else {
            None
        }
    }

    pub fn up(self) -> Option<Position> {
        (self.row > 0).then(|| Position {
            row: self.row - 1,
            col: self.col,
        })
    }

    pub fn down(self) -> Option<Position> {
        (self.row + 1 < ROWS).then(|| Position {
            row: self.row + 1,
            col: self.col,
        })
    }

    /// Every coordinate, row-major.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}C{}", self.row + 1, self.col + 1)
    }
}

/// The 6x5 board. Serializes as a nested `[[cell; 5]; 6]` array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        let at = Position::new(row, col)?;
        Ok(self.cells[at.row][at.col])
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), BoardError> {
        let at = Position::new(row, col)?;
        self.cells[at.row][at.col] = cell;
        Ok(())
    }

    pub fn get_at(&self, at: Position) -> Result<Cell, BoardError> {
        self.get(at.row, at.col)
    }

    pub fn set_at(&mut self, at: Position, cell: Cell) -> Result<(), BoardError> {
        self.set(at.row, at.col, cell)
    }

    pub fn reset_all(&mut self) {
        self.cells = [[Cell::EMPTY; COLS]; ROWS];
    }

    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Lowercased letters of every absent tile, de-duplicated in row-major
    /// order of first appearance. A letter marked absent anywhere is reported
    /// even if it is present or correct elsewhere.
    pub fn derive_invalid_letters(&self) -> Vec<char> {
        let mut letters = Vec::new();
        for cell in self.cells.iter().flatten() {
            if cell.status != Status::Absent {
                continue;
            }
            if let Some(letter) = cell.letter {
                let lower = letter.to_ascii_lowercase();
                if !letters.contains(&lower) {
                    letters.push(lower);
                }
            }
        }
        letters
    }
}

/// One line per row, e.g. `Row 0: C(A) R(P) _(E) _(E) _(E)`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "Row {}:", r)?;
            for cell in row {
                let status = match cell.status {
                    Status::None => 'E',
                    Status::Absent => 'A',
                    Status::Present => 'P',
                    Status::Correct => 'C',
                };
                write!(f, " {}({})", cell.letter.unwrap_or('_'), status)?;
            }
            if r + 1 < ROWS {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
