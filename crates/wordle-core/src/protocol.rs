use serde::{Deserialize, Serialize};

use crate::board::Board;

/// Shown when the service could not be reached or replied with garbage.
pub const CONNECTION_FAILED: &str = "connection failed";
/// Used when the service reports failure without saying why.
pub const GENERIC_SERVICE_ERROR: &str = "An error occurred while solving";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOptions {
    pub hard_mode: bool,
    pub exclude_known_letters: bool,
}

/// Body of `POST /api/solve`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub grid: Board,
    pub invalid_letters: Vec<char>,
    pub hard_mode: bool,
    pub exclude_known_letters: bool,
}

impl SolveRequest {
    pub fn new(board: &Board, options: SolveOptions) -> Self {
        Self {
            grid: board.clone(),
            invalid_letters: board.derive_invalid_letters(),
            hard_mode: options.hard_mode,
            exclude_known_letters: options.exclude_known_letters,
        }
    }
}

/// Raw reply from the solving service. Both the success and failure shapes
/// decode into this; [`SolveResult`] is the typed view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub success: bool,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_words: Option<Vec<String>>,
    #[serde(default)]
    pub valid_words_count: usize,
    #[serde(default)]
    pub answer_found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_mode_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Suggestions {
    pub suggestions: Vec<String>,
    pub valid_words: Option<Vec<String>>,
    pub valid_words_count: usize,
    pub answer_found: bool,
    pub suggestion_source: Option<String>,
    pub hard_mode_count: Option<usize>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveResult {
    Success(Suggestions),
    Failure { error: String },
}

impl SolveResult {
    pub fn connection_failed() -> Self {
        SolveResult::Failure {
            error: CONNECTION_FAILED.to_string(),
        }
    }
}

impl From<SolveResponse> for SolveResult {
    fn from(resp: SolveResponse) -> Self {
        if !resp.success {
            return SolveResult::Failure {
                error: resp
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| GENERIC_SERVICE_ERROR.to_string()),
            };
        }
        SolveResult::Success(Suggestions {
            suggestions: resp.suggestions,
            valid_words: resp.valid_words,
            valid_words_count: resp.valid_words_count,
            answer_found: resp.answer_found,
            suggestion_source: resp.suggestion_source,
            hard_mode_count: resp.hard_mode_count,
            message: resp.message,
        })
    }
}
