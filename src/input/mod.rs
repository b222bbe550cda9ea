//! # Input Module
//!
//! Decoded input events and the text parsers that produce them.
//!
//! The core never reads devices. Front ends turn whatever they read into
//! [`InputEvent`]s; the interactive driver uses [`InputHandler`] to decode
//! typed lines, and script mode uses [`ScriptCommand`].

pub mod commands;

pub use commands::*;

use crate::game::{Direction, Position};

/// Logical input delivered to the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Place a robot for the current player
    PlaceAt(Position),
    /// Move the selected robot one step
    MoveDirection(Direction),
    /// Choose which robot moves drive (zero-based)
    SelectRobot(usize),
    /// End the current player's turn
    SwitchPlayer,
    /// Throw the game away and start a fresh one
    Reset,
    /// End the game
    Quit,
}

/// Decodes typed lines from the interactive driver.
///
/// Accepts `place c4`, `select 2`, the four direction words (or WASD, or
/// hjkl when vi keys are enabled), `switch`, `reset` and `quit`.
pub struct InputHandler {
    /// Whether to accept Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::{Direction, InputEvent, InputHandler};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(
    ///     input_handler.parse_line("up"),
    ///     Some(InputEvent::MoveDirection(Direction::Up))
    /// );
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Decodes one line. Returns None when the line means nothing.
    pub fn parse_line(&self, line: &str) -> Option<InputEvent> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_ascii_lowercase();
        let argument = words.next();
        if words.next().is_some() {
            return None;
        }

        match (command.as_str(), argument) {
            ("place" | "p", Some(cell)) => Position::from_notation(cell).map(InputEvent::PlaceAt),
            ("select" | "robot", Some(number)) => {
                let number: usize = number.parse().ok()?;
                number.checked_sub(1).map(InputEvent::SelectRobot)
            }
            ("switch" | "tab" | "next", None) => Some(InputEvent::SwitchPlayer),
            ("reset" | "new", None) => Some(InputEvent::Reset),
            ("quit" | "q" | "exit" | "end", None) => Some(InputEvent::Quit),
            (word, None) => self.direction_for(word).map(InputEvent::MoveDirection),
            _ => None,
        }
    }

    fn direction_for(&self, word: &str) -> Option<Direction> {
        match word {
            "up" | "w" => Some(Direction::Up),
            "down" | "s" => Some(Direction::Down),
            "left" | "a" => Some(Direction::Left),
            "right" | "d" => Some(Direction::Right),
            "k" if self.vi_keys_enabled => Some(Direction::Up),
            "j" if self.vi_keys_enabled => Some(Direction::Down),
            "h" if self.vi_keys_enabled => Some(Direction::Left),
            "l" if self.vi_keys_enabled => Some(Direction::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.parse_line("place c4"),
            Some(InputEvent::PlaceAt(Position::new(2, 3)))
        );
        assert_eq!(handler.parse_line("select 2"), Some(InputEvent::SelectRobot(1)));
        assert_eq!(handler.parse_line("  Switch "), Some(InputEvent::SwitchPlayer));
        assert_eq!(handler.parse_line("reset"), Some(InputEvent::Reset));
        assert_eq!(handler.parse_line("q"), Some(InputEvent::Quit));
    }

    #[test]
    fn test_parse_directions() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_line("LEFT"), Some(InputEvent::MoveDirection(Direction::Left)));
        assert_eq!(handler.parse_line("s"), Some(InputEvent::MoveDirection(Direction::Down)));
        assert_eq!(handler.parse_line("l"), Some(InputEvent::MoveDirection(Direction::Right)));

        let plain = InputHandler {
            vi_keys_enabled: false,
        };
        assert_eq!(plain.parse_line("l"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_line(""), None);
        assert_eq!(handler.parse_line("place"), None);
        assert_eq!(handler.parse_line("place 9z"), None);
        assert_eq!(handler.parse_line("select 0"), None);
        assert_eq!(handler.parse_line("select two"), None);
        assert_eq!(handler.parse_line("up up"), None);
        assert_eq!(handler.parse_line("dance"), None);
    }
}
