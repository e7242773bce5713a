//! Per-tile state machine: `empty -> absent -> present -> correct -> empty`.
//!
//! Every input channel ends up here. The controller owns the [`Board`] and is
//! the only thing that mutates it, so the tile invariants hold no matter how
//! the change was requested.

use tracing::debug;

use crate::board::{Board, BoardError, Cell, Position, Status};

/// A normalized request from the input router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Move the cursor without touching the board.
    Focus(Position),
    EnterLetter {
        at: Position,
        letter: char,
        advance: bool,
    },
    Cycle(Position),
    /// Empty the tile in place.
    Clear(Position),
    /// Backspace semantics: clear if occupied, otherwise clear-and-retreat.
    Erase(Position),
    /// Distribute letters from `at` onward in row-major order.
    Fill { at: Position, letters: Vec<char> },
    Ignore,
}

/// What an applied intent changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub changed: Vec<Position>,
    /// Where the cursor should land afterwards; `None` keeps it in place.
    pub focus: Option<Position>,
}

impl Transition {
    fn focus_only(at: Position) -> Self {
        Self {
            changed: Vec::new(),
            focus: Some(at),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.focus.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Controller {
    board: Board,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Transition, BoardError> {
        debug!(?intent, "applying intent");
        match intent {
            Intent::Focus(at) => {
                self.board.get_at(at)?;
                Ok(Transition::focus_only(at))
            }
            Intent::EnterLetter {
                at,
                letter,
                advance,
            } => {
                let mut transition = self.enter_letter(at, letter)?;
                if advance && !transition.changed.is_empty() {
                    transition.focus = at.next();
                }
                Ok(transition)
            }
            Intent::Cycle(at) => self.cycle(at),
            Intent::Clear(at) => self.clear(at),
            Intent::Erase(at) => self.erase(at),
            Intent::Fill { at, letters } => self.fill(at, &letters),
            Intent::Ignore => Ok(Transition::default()),
        }
    }

    /// Place or replace a letter. A tile without a color picks up `absent`;
    /// an existing color is kept. Non A-Z input is dropped.
    pub fn enter_letter(&mut self, at: Position, letter: char) -> Result<Transition, BoardError> {
        let mut cell = self.board.get_at(at)?;
        if !letter.is_ascii_alphabetic() {
            return Ok(Transition::default());
        }
        cell.letter = Some(letter.to_ascii_uppercase());
        if cell.status == Status::None {
            cell.status = Status::Absent;
        }
        self.board.set_at(at, cell)?;
        Ok(Transition {
            changed: vec![at],
            focus: None,
        })
    }

    /// Advance the tile color. The step after `correct` empties the tile,
    /// letter included. A tile with no letter only takes focus.
    pub fn cycle(&mut self, at: Position) -> Result<Transition, BoardError> {
        let cell = self.board.get_at(at)?;
        if cell.is_empty() {
            return Ok(Transition::focus_only(at));
        }
        let next = match cell.status.cycled() {
            Some(status) => Cell { status, ..cell },
            None => Cell::EMPTY,
        };
        self.board.set_at(at, next)?;
        Ok(Transition {
            changed: vec![at],
            focus: Some(at),
        })
    }

    pub fn clear(&mut self, at: Position) -> Result<Transition, BoardError> {
        self.board.set_at(at, Cell::EMPTY)?;
        Ok(Transition {
            changed: vec![at],
            focus: Some(at),
        })
    }

    /// Step back one tile in row-major order and empty it. No-op at (0, 0).
    pub fn clear_and_retreat(&mut self, at: Position) -> Result<Transition, BoardError> {
        self.board.get_at(at)?;
        match at.prev() {
            Some(prev) => self.clear(prev),
            None => Ok(Transition::default()),
        }
    }

    pub fn erase(&mut self, at: Position) -> Result<Transition, BoardError> {
        if self.board.get_at(at)?.is_empty() {
            self.clear_and_retreat(at)
        } else {
            self.clear(at)
        }
    }

    /// Paste-style fill. Letters past the last tile are dropped; focus ends on
    /// the last tile written.
    pub fn fill(&mut self, at: Position, letters: &[char]) -> Result<Transition, BoardError> {
        self.board.get_at(at)?;
        let mut transition = Transition::default();
        let mut cursor = Some(at);
        for &letter in letters.iter().filter(|c| c.is_ascii_alphabetic()) {
            let Some(target) = cursor else {
                break;
            };
            self.enter_letter(target, letter)?;
            transition.changed.push(target);
            transition.focus = Some(target);
            cursor = target.next();
        }
        Ok(transition)
    }

    pub fn reset_all(&mut self) {
        self.board.reset_all();
    }
}
