//! # Script Commands
//!
//! The line grammar of script mode:
//!
//! ```text
//! GAMER <n>                 switch the active player (1-indexed)
//! PUT BOT <cell>            place a robot, e.g. PUT BOT c4
//! MOVE <cell>(-<cell>)+     walk a robot through adjacent cells
//! END                       end the game
//! ```
//!
//! Cells are a column letter `a`-`h` followed by a row digit `1`-`8`.
//! Keywords are case-sensitive.

use crate::game::Position;
use crate::{ParcelError, ParcelResult};
use std::fmt;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Make a player active (zero-based)
    Gamer(usize),
    /// Place a robot for the active player
    PutBot(Position),
    /// Walk the robot on the first cell through the rest
    Move(Vec<Position>),
    /// End the game
    End,
}

impl ScriptCommand {
    /// Parses one script line.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::{Position, ScriptCommand};
    ///
    /// let command = ScriptCommand::parse("MOVE a1-a2").unwrap();
    /// assert_eq!(
    ///     command,
    ///     ScriptCommand::Move(vec![Position::new(0, 0), Position::new(0, 1)])
    /// );
    /// assert!(ScriptCommand::parse("move a1-a2").is_err());
    /// ```
    pub fn parse(line: &str) -> ParcelResult<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["GAMER", number] => {
                let number: usize = number
                    .parse()
                    .map_err(|_| invalid(line, "player number must be a positive integer"))?;
                number
                    .checked_sub(1)
                    .map(ScriptCommand::Gamer)
                    .ok_or_else(|| invalid(line, "players are numbered from 1"))
            }
            ["PUT", "BOT", cell] => parse_cell(cell)
                .map(ScriptCommand::PutBot)
                .ok_or_else(|| invalid(line, "expected a cell like c4")),
            ["MOVE", chain] => {
                let cells = chain
                    .split('-')
                    .map(parse_cell)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid(line, "expected cells joined by '-'"))?;
                if cells.len() < 2 {
                    return Err(invalid(line, "a move needs at least two cells"));
                }
                Ok(ScriptCommand::Move(cells))
            }
            ["END"] => Ok(ScriptCommand::End),
            _ => Err(invalid(line, "unknown command")),
        }
    }
}

fn invalid(line: &str, reason: &str) -> ParcelError {
    ParcelError::InvalidCommand(format!("'{}': {}", line.trim(), reason))
}

/// Parses a script cell: column `a`-`h`, row `1`-`8`.
fn parse_cell(text: &str) -> Option<Position> {
    let bytes = text.as_bytes();
    match bytes {
        [column @ b'a'..=b'h', row @ b'1'..=b'8'] => {
            Some(Position::new((column - b'a') as i32, (row - b'1') as i32))
        }
        _ => None,
    }
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Gamer(player) => write!(f, "GAMER {}", player + 1),
            ScriptCommand::PutBot(pos) => write!(f, "PUT BOT {}", pos),
            ScriptCommand::Move(cells) => {
                let chain: Vec<String> = cells.iter().map(|pos| pos.to_string()).collect();
                write!(f, "MOVE {}", chain.join("-"))
            }
            ScriptCommand::End => write!(f, "END"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_shape() {
        assert_eq!(ScriptCommand::parse("GAMER 2").unwrap(), ScriptCommand::Gamer(1));
        assert_eq!(
            ScriptCommand::parse("PUT BOT h8").unwrap(),
            ScriptCommand::PutBot(Position::new(7, 7))
        );
        assert_eq!(
            ScriptCommand::parse("MOVE c4-c5-d5").unwrap(),
            ScriptCommand::Move(vec![
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(3, 4),
            ])
        );
        assert_eq!(ScriptCommand::parse("  END  ").unwrap(), ScriptCommand::End);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        for line in [
            "GAMER",
            "GAMER 0",
            "GAMER x",
            "gamer 1",
            "PUT BOT",
            "PUT BOT i1",
            "PUT BOT a9",
            "PUT BOT a10",
            "PUT ROBOT a1",
            "MOVE a1",
            "MOVE a1-",
            "MOVE a1 - a2",
            "END NOW",
            "JUMP a1",
        ] {
            assert!(
                matches!(ScriptCommand::parse(line), Err(ParcelError::InvalidCommand(_))),
                "{} should be rejected",
                line
            );
        }
    }

    #[test]
    fn test_display_matches_grammar() {
        for line in ["GAMER 3", "PUT BOT b7", "MOVE a1-b1-b2", "END"] {
            assert_eq!(ScriptCommand::parse(line).unwrap().to_string(), line);
        }
    }
}
