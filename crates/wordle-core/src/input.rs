//! Input normalization.
//!
//! Four channels (pointer, key, composition and paste) are reduced to
//! [`Intent`]s and handed to the [`Controller`]. The router also decides how
//! focus moves after each event, which differs between desktop and touch
//! platforms.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, BoardError, Position};
use crate::lifecycle::{Controller, Intent};

/// Delay before re-focusing on touch devices, so the on-screen keyboard
/// reopens.
pub const TOUCH_FOCUS_DELAY: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Desktop,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Space,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Click(Position),
    Key { at: Position, key: Key },
    /// Raw text content of a tile after an input-method update.
    Compose { at: Position, raw: String },
    Paste { at: Position, text: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusTransfer {
    Immediate(Position),
    /// Focus after `delay`, then synthetically activate the tile. The target
    /// may be gone by then; the caller drops the transfer in that case.
    Deferred { target: Position, delay: Duration },
}

impl FocusTransfer {
    pub fn target(&self) -> Position {
        match *self {
            FocusTransfer::Immediate(target) | FocusTransfer::Deferred { target, .. } => target,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Routed {
    pub changed: Vec<Position>,
    pub focus: Option<FocusTransfer>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InputRouter {
    platform: Platform,
}

impl InputRouter {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Map an event to an intent against the current board. Only one of the
    /// key and composition channels carries letters on a given platform.
    pub fn normalize(&self, board: &Board, event: InputEvent) -> Result<Intent, BoardError> {
        let intent = match event {
            InputEvent::Click(at) => {
                if board.get_at(at)?.is_empty() {
                    Intent::Focus(at)
                } else {
                    Intent::Cycle(at)
                }
            }
            InputEvent::Key { at, key } => {
                board.get_at(at)?;
                self.normalize_key(at, key)
            }
            InputEvent::Compose { at, raw } => {
                board.get_at(at)?;
                if self.platform == Platform::Touch {
                    match alphabetic(&raw).last() {
                        Some(&letter) => Intent::EnterLetter {
                            at,
                            letter,
                            advance: true,
                        },
                        None => Intent::Clear(at),
                    }
                } else {
                    Intent::Ignore
                }
            }
            InputEvent::Paste { at, text } => {
                board.get_at(at)?;
                let letters = alphabetic(&text);
                if letters.is_empty() {
                    Intent::Ignore
                } else {
                    Intent::Fill { at, letters }
                }
            }
        };
        Ok(intent)
    }

    fn normalize_key(&self, at: Position, key: Key) -> Intent {
        let moved = |target: Option<Position>| target.map_or(Intent::Ignore, Intent::Focus);
        match key {
            Key::Char(' ') | Key::Space | Key::Enter => Intent::Cycle(at),
            Key::Char(c) if c.is_ascii_alphabetic() => match self.platform {
                Platform::Desktop => Intent::EnterLetter {
                    at,
                    letter: c,
                    advance: true,
                },
                Platform::Touch => Intent::Ignore,
            },
            Key::Char(_) => Intent::Ignore,
            Key::Backspace => Intent::Erase(at),
            Key::Left => moved(at.prev()),
            Key::Right => moved(at.next()),
            Key::Up => moved(at.up()),
            Key::Down => moved(at.down()),
        }
    }

    /// Normalize, apply, and wrap the resulting focus move in this platform's
    /// transfer policy.
    pub fn route(
        &self,
        controller: &mut Controller,
        event: InputEvent,
    ) -> Result<Routed, BoardError> {
        let intent = self.normalize(controller.board(), event)?;
        let transition = controller.apply(intent)?;
        let focus = transition.focus.map(|target| self.transfer(target));
        if let Some(transfer) = focus {
            debug!(?transfer, "focus moved");
        }
        Ok(Routed {
            changed: transition.changed,
            focus,
        })
    }

    pub fn transfer(&self, target: Position) -> FocusTransfer {
        match self.platform {
            Platform::Desktop => FocusTransfer::Immediate(target),
            Platform::Touch => FocusTransfer::Deferred {
                target,
                delay: TOUCH_FOCUS_DELAY,
            },
        }
    }
}

fn alphabetic(text: &str) -> Vec<char> {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Status};

    fn pos(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    fn key(at: Position, key: Key) -> InputEvent {
        InputEvent::Key { at, key }
    }

    fn focus_of(routed: &Routed) -> Option<Position> {
        routed.focus.map(|f| f.target())
    }

    #[test]
    fn typing_advances_across_rows() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        let mut at = pos(0, 3);
        for c in "abc".chars() {
            let routed = router.route(&mut ctl, key(at, Key::Char(c))).unwrap();
            at = focus_of(&routed).unwrap();
        }
        assert_eq!(at, pos(1, 1));
        assert_eq!(ctl.board().get(1, 0).unwrap(), Cell::new('C', Status::Absent));
    }

    #[test]
    fn typing_on_last_cell_stays_put() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        let routed = router
            .route(&mut ctl, key(Position::LAST, Key::Char('z')))
            .unwrap();
        assert_eq!(routed.focus, None);
        assert_eq!(routed.changed, vec![Position::LAST]);
    }

    #[test]
    fn arrows_clamp_vertically_and_wrap_horizontally() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();

        let up = router.route(&mut ctl, key(pos(0, 2), Key::Up)).unwrap();
        assert_eq!(up, Routed::default());
        let down = router.route(&mut ctl, key(pos(5, 2), Key::Down)).unwrap();
        assert_eq!(down, Routed::default());
        let down = router.route(&mut ctl, key(pos(2, 2), Key::Down)).unwrap();
        assert_eq!(focus_of(&down), Some(pos(3, 2)));

        let right = router.route(&mut ctl, key(pos(0, 4), Key::Right)).unwrap();
        assert_eq!(focus_of(&right), Some(pos(1, 0)));
        let left = router.route(&mut ctl, key(pos(1, 0), Key::Left)).unwrap();
        assert_eq!(focus_of(&left), Some(pos(0, 4)));
        let left = router.route(&mut ctl, key(pos(0, 0), Key::Left)).unwrap();
        assert_eq!(left, Routed::default());

        assert_eq!(ctl.board().filled_count(), 0);
    }

    #[test]
    fn space_and_enter_cycle() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        router.route(&mut ctl, key(pos(0, 0), Key::Char('a'))).unwrap();
        router.route(&mut ctl, key(pos(0, 0), Key::Space)).unwrap();
        assert_eq!(ctl.board().get(0, 0).unwrap().status, Status::Present);
        router.route(&mut ctl, key(pos(0, 0), Key::Enter)).unwrap();
        assert_eq!(ctl.board().get(0, 0).unwrap().status, Status::Correct);
    }

    #[test]
    fn backspace_on_empty_retreats() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        router.route(&mut ctl, key(pos(0, 0), Key::Char('a'))).unwrap();
        let routed = router.route(&mut ctl, key(pos(0, 1), Key::Backspace)).unwrap();
        assert_eq!(focus_of(&routed), Some(pos(0, 0)));
        assert!(ctl.board().get(0, 0).unwrap().is_empty());

        let routed = router.route(&mut ctl, key(pos(0, 0), Key::Backspace)).unwrap();
        assert_eq!(routed, Routed::default());
    }

    #[test]
    fn click_focuses_empty_and_cycles_filled() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();

        let routed = router.route(&mut ctl, InputEvent::Click(pos(4, 4))).unwrap();
        assert!(routed.changed.is_empty());
        assert_eq!(focus_of(&routed), Some(pos(4, 4)));

        router.route(&mut ctl, key(pos(4, 4), Key::Char('q'))).unwrap();
        let routed = router.route(&mut ctl, InputEvent::Click(pos(4, 4))).unwrap();
        assert_eq!(routed.changed, vec![pos(4, 4)]);
        assert_eq!(ctl.board().get(4, 4).unwrap().status, Status::Present);
    }

    #[test]
    fn desktop_ignores_composition() {
        let router = InputRouter::new(Platform::Desktop);
        let mut ctl = Controller::new();
        let routed = router
            .route(
                &mut ctl,
                InputEvent::Compose {
                    at: pos(0, 0),
                    raw: "A".into(),
                },
            )
            .unwrap();
        assert_eq!(routed, Routed::default());
        assert_eq!(ctl.board().filled_count(), 0);
    }

    #[test]
    fn touch_takes_letters_from_composition_only() {
        let router = InputRouter::new(Platform::Touch);
        let mut ctl = Controller::new();

        let routed = router.route(&mut ctl, key(pos(0, 0), Key::Char('a'))).unwrap();
        assert_eq!(routed, Routed::default());

        let routed = router
            .route(
                &mut ctl,
                InputEvent::Compose {
                    at: pos(0, 0),
                    raw: "Ab3".into(),
                },
            )
            .unwrap();
        assert_eq!(ctl.board().get(0, 0).unwrap(), Cell::new('B', Status::Absent));
        assert_eq!(
            routed.focus,
            Some(FocusTransfer::Deferred {
                target: pos(0, 1),
                delay: TOUCH_FOCUS_DELAY,
            })
        );
    }

    #[test]
    fn touch_composition_without_letters_clears() {
        let router = InputRouter::new(Platform::Touch);
        let mut ctl = Controller::new();
        router
            .route(
                &mut ctl,
                InputEvent::Compose {
                    at: pos(2, 2),
                    raw: "k".into(),
                },
            )
            .unwrap();
        let routed = router
            .route(
                &mut ctl,
                InputEvent::Compose {
                    at: pos(2, 2),
                    raw: " 4".into(),
                },
            )
            .unwrap();
        assert!(ctl.board().get(2, 2).unwrap().is_empty());
        assert_eq!(routed.focus.map(|f| f.target()), Some(pos(2, 2)));
    }

    #[test]
    fn paste_distributes_and_focuses_last_filled() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        let routed = router
            .route(
                &mut ctl,
                InputEvent::Paste {
                    at: pos(0, 3),
                    text: "abcdefgh".into(),
                },
            )
            .unwrap();
        assert_eq!(routed.changed.len(), 8);
        assert_eq!(focus_of(&routed), Some(pos(2, 0)));
        assert_eq!(ctl.board().get(1, 2).unwrap().letter, Some('E'));
        assert_eq!(ctl.board().get(1, 3).unwrap().letter, Some('F'));
        assert_eq!(ctl.board().get(1, 4).unwrap().letter, Some('G'));
        assert_eq!(ctl.board().get(2, 0).unwrap().letter, Some('H'));
        assert!(ctl.board().get(2, 1).unwrap().is_empty());
    }

    #[test]
    fn paste_past_last_tile_drops_the_rest() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        let routed = router
            .route(
                &mut ctl,
                InputEvent::Paste {
                    at: pos(5, 3),
                    text: "xyz".into(),
                },
            )
            .unwrap();
        assert_eq!(routed.changed, vec![pos(5, 3), pos(5, 4)]);
        assert_eq!(focus_of(&routed), Some(pos(5, 4)));
        assert_eq!(ctl.board().get(5, 4).unwrap().letter, Some('Y'));
        assert_eq!(ctl.board().filled_count(), 2);
    }

    #[test]
    fn paste_without_letters_keeps_focus() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        let routed = router
            .route(
                &mut ctl,
                InputEvent::Paste {
                    at: pos(1, 1),
                    text: "12 -- !!".into(),
                },
            )
            .unwrap();
        assert_eq!(routed, Routed::default());
    }

    #[test]
    fn out_of_range_event_rejected() {
        let router = InputRouter::default();
        let mut ctl = Controller::new();
        let err = router
            .route(&mut ctl, InputEvent::Click(pos(0, 9)))
            .unwrap_err();
        assert_eq!(err, BoardError::OutOfRange { row: 0, col: 9 });
    }
}
