//! Solve session: `idle -> requesting -> idle`.
//!
//! The session snapshots the board into a [`SolveRequest`], refuses a second
//! request while one is in flight, and turns whatever comes back into a
//! [`RenderPlan`] or a transient [`Notification`]. It never touches the board,
//! so a failed solve cannot lose edits.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::board::Board;
use crate::protocol::{SolveOptions, SolveRequest, SolveResult, Suggestions};

/// How long an error notification stays up.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);
/// Above this many matches without a list, show a placeholder instead.
pub const WORD_LIST_THRESHOLD: usize = 100;

pub const HARD_MODE_SOURCE: &str = "hard_mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a solve request is already in flight")]
    AlreadyRequesting,
    #[error("no solve request is in flight")]
    NotRequesting,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Requesting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub expires_at: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuggestionView {
    /// Exactly one word is left.
    Answer { word: String, message: String },
    Ranked {
        note: Option<String>,
        words: Vec<String>,
    },
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WordList {
    Hidden,
    Words(Vec<String>),
    TooMany,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPlan {
    pub word_count: usize,
    pub suggestions: SuggestionView,
    pub word_list: WordList,
}

impl RenderPlan {
    pub fn from_suggestions(result: &Suggestions) -> Self {
        let suggestions = if result.answer_found {
            let word = result
                .suggestions
                .first()
                .map(|w| w.to_uppercase())
                .unwrap_or_default();
            let message = result
                .message
                .clone()
                .unwrap_or_else(|| format!("Only one possible word remains: {}", word));
            SuggestionView::Answer { word, message }
        } else if result.suggestions.is_empty() {
            SuggestionView::Empty
        } else {
            let note = (result.suggestion_source.as_deref() == Some(HARD_MODE_SOURCE)).then(|| {
                format!(
                    "Enhanced suggestions using hard mode logic ({} words)",
                    result.hard_mode_count.unwrap_or(result.valid_words_count)
                )
            });
            SuggestionView::Ranked {
                note,
                words: result.suggestions.iter().map(|w| w.to_uppercase()).collect(),
            }
        };

        let word_list = match &result.valid_words {
            _ if result.answer_found => WordList::Hidden,
            Some(words) if !words.is_empty() => {
                WordList::Words(words.iter().map(|w| w.to_uppercase()).collect())
            }
            _ if result.valid_words_count <= WORD_LIST_THRESHOLD => WordList::Hidden,
            _ => WordList::TooMany,
        };

        Self {
            word_count: result.valid_words_count,
            suggestions,
            word_list,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SolveSession {
    phase: Phase,
    options: SolveOptions,
    results: Option<RenderPlan>,
    notification: Option<Notification>,
}

impl SolveSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the solve trigger must stay disabled.
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Requesting
    }

    pub fn options(&self) -> SolveOptions {
        self.options
    }

    pub fn toggle_hard_mode(&mut self) {
        self.options.hard_mode = !self.options.hard_mode;
    }

    pub fn toggle_exclude_known(&mut self) {
        self.options.exclude_known_letters = !self.options.exclude_known_letters;
    }

    pub fn results(&self) -> Option<&RenderPlan> {
        self.results.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn build_request(&self, board: &Board) -> SolveRequest {
        SolveRequest::new(board, self.options)
    }

    /// Enter `requesting` and hand back the request to send.
    pub fn begin(&mut self, board: &Board) -> Result<SolveRequest, SessionError> {
        if self.phase == Phase::Requesting {
            warn!("solve triggered while a request is in flight");
            return Err(SessionError::AlreadyRequesting);
        }
        let request = self.build_request(board);
        info!(
            filled = board.filled_count(),
            invalid = request.invalid_letters.len(),
            hard_mode = request.hard_mode,
            exclude_known = request.exclude_known_letters,
            "solve requested"
        );
        self.phase = Phase::Requesting;
        Ok(request)
    }

    /// Leave `requesting` regardless of outcome, then render the result.
    pub fn finish(&mut self, result: SolveResult, now: Instant) -> Result<(), SessionError> {
        if self.phase != Phase::Requesting {
            return Err(SessionError::NotRequesting);
        }
        self.phase = Phase::Idle;
        self.render(result, now);
        Ok(())
    }

    pub fn render(&mut self, result: SolveResult, now: Instant) {
        match result {
            SolveResult::Success(suggestions) => {
                info!(
                    count = suggestions.valid_words_count,
                    answer_found = suggestions.answer_found,
                    "solve succeeded"
                );
                self.results = Some(RenderPlan::from_suggestions(&suggestions));
            }
            SolveResult::Failure { error } => {
                warn!(%error, "solve failed");
                self.notification = Some(Notification {
                    text: error,
                    expires_at: now + NOTICE_TTL,
                });
            }
        }
    }

    /// Drop the notification once its time is up. Safe to call repeatedly.
    pub fn expire(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.notification = None;
        }
    }

    /// Clear-all: options back to off and results hidden. An in-flight
    /// request is left alone.
    pub fn reset(&mut self) {
        self.options = SolveOptions::default();
        self.results = None;
    }
}
