//! # Game Events
//!
//! Everything the core reports to the outside world: state transitions and
//! rejected requests. Events are handed to an [`EventSink`] injected into the
//! turn controller.

use crate::game::{Direction, Position, RobotId};
use crate::ParcelError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidCommand,
    IllegalMove,
    IllegalPlacement,
    NoPathFound,
    NoPackagesAvailable,
    InvalidState,
}

/// Something that happened in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A robot was put on the board
    RobotPlaced { robot: RobotId, position: Position },
    /// All robots are placed and packages are revealed
    PlacingFinished,
    /// A robot was chosen for manual moves
    RobotSelected { robot: RobotId },
    /// A robot took one step
    RobotMoved {
        robot: RobotId,
        direction: Direction,
        from: Position,
        to: Position,
    },
    /// A robot loaded a package from a shelf
    PackagePickedUp {
        robot: RobotId,
        number: u8,
        shelf: Position,
    },
    /// A new package appeared on a shelf
    PackageSpawned { number: u8, position: Position },
    /// A package reached its target cell
    PackageDelivered {
        robot: RobotId,
        number: u8,
        position: Position,
        score: u32,
    },
    /// The active player changed at the end of a turn
    TurnEnded {
        player: usize,
        next_player: usize,
        unused_moves: u32,
    },
    /// The active player was set directly
    PlayerSwitched { player: usize },
    /// An automated player could not move at all this turn
    Stalemate { player: usize },
    /// A player reached the winning score
    GameWon { player: usize, score: u32 },
    /// The game is over
    GameEnded,
    /// A fresh game replaced the old one
    GameReset { seed: u64 },
    /// A request was refused; nothing changed
    Rejected { kind: RejectionKind, message: String },
}

impl GameEvent {
    /// Reports a failed request. Errors without a rejection category are
    /// reported as `InvalidState`.
    pub fn rejection(error: &ParcelError) -> Self {
        GameEvent::Rejected {
            kind: error.rejection_kind().unwrap_or(RejectionKind::InvalidState),
            message: error.to_string(),
        }
    }

    /// Checks if this event reports a refused request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, GameEvent::Rejected { .. })
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::RobotPlaced { robot, position } => {
                write!(f, "Player {} placed a robot at {}", robot.player + 1, position)
            }
            GameEvent::PlacingFinished => {
                write!(f, "Placing phase ended, packages revealed")
            }
            GameEvent::RobotSelected { robot } => write!(f, "Selected {}", robot),
            GameEvent::RobotMoved {
                robot,
                direction,
                to,
                ..
            } => write!(f, "{} moved {} to {}", robot, direction, to),
            GameEvent::PackagePickedUp {
                robot,
                number,
                shelf,
            } => write!(f, "{} picked up package {} from {}", robot, number, shelf),
            GameEvent::PackageSpawned { number, position } => {
                write!(f, "Package {} appeared at {}", number, position)
            }
            GameEvent::PackageDelivered {
                robot,
                number,
                position,
                score,
            } => write!(
                f,
                "{} delivered package {} at {}, player {} score is now {}",
                robot,
                number,
                position,
                robot.player + 1,
                score
            ),
            GameEvent::TurnEnded {
                player,
                next_player,
                unused_moves,
            } => write!(
                f,
                "Player {} ended their turn ({} moves unused), player {} is up",
                player + 1,
                unused_moves,
                next_player + 1
            ),
            GameEvent::PlayerSwitched { player } => write!(f, "Switched to player {}", player + 1),
            GameEvent::Stalemate { player } => {
                write!(f, "Player {} has no available moves, skipping turn", player + 1)
            }
            GameEvent::GameWon { player, score } => {
                write!(f, "Player {} won with {} points", player + 1, score)
            }
            GameEvent::GameEnded => write!(f, "Game ended"),
            GameEvent::GameReset { seed } => write!(f, "Game reset with seed {}", seed),
            GameEvent::Rejected { kind, message } => write!(f, "Rejected ({:?}): {}", kind, message),
        }
    }
}

/// Observer that receives every event the turn controller produces.
pub trait EventSink {
    /// Receives one event.
    fn record(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn record(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &GameEvent) {
        (**self).record(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn record(&mut self, event: &GameEvent) {
        (**self).record(event);
    }
}

/// Sends every event to both sinks, first to second.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn record(&mut self, event: &GameEvent) {
        self.0.record(event);
        self.1.record(event);
    }
}

/// Sink that writes events through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: &GameEvent) {
        if event.is_rejection() {
            warn!("{}", event);
        } else {
            info!("{}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.record(&GameEvent::PlacingFinished);
        sink.record(&GameEvent::GameEnded);
        assert_eq!(sink, vec![GameEvent::PlacingFinished, GameEvent::GameEnded]);
    }

    fn report_end<S: EventSink>(mut sink: S) {
        sink.record(&GameEvent::GameEnded);
    }

    #[test]
    fn test_borrowed_sink_forwards() {
        let mut events: Vec<GameEvent> = Vec::new();
        report_end(&mut events);
        report_end(Box::new(LogSink));
        assert_eq!(events, vec![GameEvent::GameEnded]);

        let mut first: Vec<GameEvent> = Vec::new();
        let mut second: Vec<GameEvent> = Vec::new();
        report_end((&mut first, &mut second));
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_event_display() {
        let event = GameEvent::PackageDelivered {
            robot: RobotId::new(1, 0),
            number: 3,
            position: Position::new(3, 3),
            score: 2,
        };
        assert_eq!(
            event.to_string(),
            "robot 1 of player 2 delivered package 3 at d4, player 2 score is now 2"
        );
        assert!(!event.is_rejection());

        let rejected = GameEvent::Rejected {
            kind: RejectionKind::IllegalMove,
            message: "b1 is occupied".to_string(),
        };
        assert!(rejected.is_rejection());
    }

    #[test]
    fn test_rejection_from_error() {
        let event = GameEvent::rejection(&ParcelError::NoPackagesAvailable);
        match event {
            GameEvent::Rejected { kind, .. } => assert_eq!(kind, RejectionKind::NoPackagesAvailable),
            other => panic!("unexpected event {:?}", other),
        }

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let event = GameEvent::rejection(&ParcelError::Io(io));
        assert!(matches!(
            event,
            GameEvent::Rejected { kind: RejectionKind::InvalidState, .. }
        ));
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(GameEvent::Stalemate { player: 1 }).unwrap();
        assert_eq!(json["event"], "stalemate");
        assert_eq!(json["player"], 1);
    }
}
