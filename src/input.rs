//! Keyboard input interpretation
//!
//! Maps raw key presses to session commands. Keys only do something on the
//! game screen:
//!
//! | Key           | Command                          |
//! |---------------|----------------------------------|
//! | `1`–`6`       | reveal answer 1–6                |
//! | `7`, `8`, `9` | set strikes to 1, 2, 3           |
//! | `0`           | show the big cross               |
//! | Backspace     | clear the big cross and strikes  |

use serde::{Deserialize, Serialize};

use crate::session::{Command, Screen, Session};

/// A key press as reported by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character key
    Char(char),
    /// The erase key
    Backspace,
    /// Any key the game does not use
    Other,
}

impl Key {
    /// Parses a key from its DOM-style name, such as `"7"` or `"Backspace"`
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::Char(c),
            _ if name == "Backspace" => Self::Backspace,
            _ => Self::Other,
        }
    }
}

/// Returns the command a key press stands for in the current session
///
/// Returns `None` off the game screen, for unused keys, and for a reveal of
/// an answer that is already showing.
pub fn interpret(session: &Session, key: Key) -> Option<Command> {
    if session.screen() != Screen::Game {
        return None;
    }

    let command = match key {
        Key::Char(c @ '1'..='6') => Command::RevealAnswer(digit(c) - 1),
        Key::Char('7') => Command::SetStrikes(1),
        Key::Char('8') => Command::SetStrikes(2),
        Key::Char('9') => Command::SetStrikes(3),
        Key::Char('0') => Command::TriggerOverlay,
        Key::Backspace => Command::ClearOverlayAndStrikes,
        Key::Char(_) | Key::Other => return None,
    };

    match command {
        Command::RevealAnswer(slot) if session.is_revealed(slot) => None,
        command => Some(command),
    }
}

/// Numeric value of an ASCII digit
fn digit(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d as usize)
}
