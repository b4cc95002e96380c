//! Keyboard commands for the windowed monogram.
//!
//! | Key | Command |
//! |-----|---------|
//! | Space | rotate again |
//! | Tab | swap front and back letters |
//! | any letter or digit | new front letter |
//! | Escape | quit |

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, NamedKey};

use crate::config::MonogramConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Re-arm the rotation timer.
    Rotate,
    /// Exchange front and back text.
    SwapLetters,
    /// Replace the front text with this character.
    SetFront(char),
    Quit,
}

impl Command {
    /// Command for a key press. Releases and repeats map to nothing.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        Self::from_key(&event.logical_key)
    }

    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Space) => Some(Command::Rotate),
            Key::Named(NamedKey::Tab) => Some(Command::SwapLetters),
            Key::Named(NamedKey::Escape) => Some(Command::Quit),
            Key::Character(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_alphanumeric() => Some(Command::SetFront(c)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// The configuration this command leads to, if it changes one.
    pub fn apply(self, config: &MonogramConfig) -> Option<MonogramConfig> {
        match self {
            Command::SwapLetters => {
                let mut next = config.clone();
                std::mem::swap(&mut next.front_text, &mut next.back_text);
                Some(next)
            }
            Command::SetFront(c) => {
                let mut next = config.clone();
                next.front_text = c.to_string();
                Some(next)
            }
            Command::Rotate | Command::Quit => None,
        }
    }
}
