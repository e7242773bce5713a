pub mod board;
pub mod input;
pub mod lifecycle;
pub mod protocol;
pub mod session;

pub use board::{Board, BoardError, Cell, Position, Status, COLS, ROWS};
pub use input::{FocusTransfer, InputEvent, InputRouter, Key, Platform};
pub use lifecycle::{Controller, Intent, Transition};
pub use protocol::{SolveOptions, SolveRequest, SolveResponse, SolveResult, Suggestions};
pub use session::{Phase, RenderPlan, SolveSession, SuggestionView, WordList};
